use crate::upload::{SelectedFile, UploadError, UploadPhase};
use eframe::egui::Color32;

pub const FILE_INPUT_PLACEHOLDER: &str = "Select file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
    Warning,
    Primary,
}

impl AlertKind {
    pub fn color(self) -> Color32 {
        match self {
            AlertKind::Success => Color32::from_rgb(0x28, 0xa7, 0x45),
            AlertKind::Danger => Color32::from_rgb(0xdc, 0x35, 0x45),
            AlertKind::Warning => Color32::from_rgb(0xff, 0xc1, 0x07),
            AlertKind::Primary => Color32::from_rgb(0x00, 0x7b, 0xff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn new(message: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn for_error(error: &UploadError) -> Self {
        match error {
            UploadError::Transport(_) => Alert::new("Error uploading file", AlertKind::Warning),
            UploadError::Server { message, .. } => Alert::new(
                format!("Error uploading file: {}", message),
                AlertKind::Danger,
            ),
            UploadError::Cancelled => Alert::new("Upload cancelled", AlertKind::Primary),
            validation => Alert::new(validation.to_string(), AlertKind::Warning),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInputState {
    pub enabled: bool,
    pub selected: Option<SelectedFile>,
    pub label: String,
}

/// Observable state of every element the upload widget drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    pub file_input: FileInputState,
    pub upload_button_visible: bool,
    pub loading_button_visible: bool,
    pub cancel_button_visible: bool,
    pub progress_visible: bool,
    pub progress_percent: u8,
    pub progress_status: String,
    pub alert: Option<Alert>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            file_input: FileInputState {
                enabled: true,
                selected: None,
                label: FILE_INPUT_PLACEHOLDER.to_string(),
            },
            upload_button_visible: true,
            loading_button_visible: false,
            cancel_button_visible: false,
            progress_visible: false,
            progress_percent: 0,
            progress_status: String::new(),
            alert: None,
        }
    }
}

impl WidgetState {
    pub fn is_idle(&self) -> bool {
        self.file_input.enabled
            && self.upload_button_visible
            && !self.loading_button_visible
            && !self.cancel_button_visible
            && !self.progress_visible
    }

    pub fn show_uploading(&mut self) {
        self.alert = None;
        self.file_input.enabled = false;
        self.upload_button_visible = false;
        self.loading_button_visible = true;
        self.cancel_button_visible = true;
        self.progress_visible = true;
    }

    pub fn set_progress(&mut self, percent: u8) {
        self.progress_percent = percent;
        self.progress_status = format!("{}% uploaded", percent);
    }

    /// Back to idle. The alert survives so the last message stays visible.
    pub fn reset(&mut self) {
        let alert = self.alert.take();
        *self = WidgetState {
            alert,
            ..WidgetState::default()
        };
    }
}

/// Upload percentage, floored and clamped to 0..=100. An empty transfer
/// counts as complete.
pub fn percent_complete(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (loaded as u128 * 100) / total as u128;
    percent.min(100) as u8
}

/// Result of the most recent upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded { message: String },
    Failed(UploadError),
}

impl UploadOutcome {
    pub fn phase(&self) -> UploadPhase {
        match self {
            UploadOutcome::Succeeded { .. } => UploadPhase::Success,
            UploadOutcome::Failed(UploadError::Cancelled) => UploadPhase::Cancelled,
            UploadOutcome::Failed(_) => UploadPhase::Failed,
        }
    }
}
