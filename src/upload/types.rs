use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file chosen in the file input. Size and name are captured at selection
/// time, the way a browser `File` handle is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid filename"))?
            .to_string_lossy()
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

/// The `file` part of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub path: PathBuf,
    pub original_name: String,
    pub replacement_name: String,
    pub size: u64,
}

/// Everything the transport needs to issue the upload POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: reqwest::Url,
    /// Form entries in document order, sent as text parts ahead of the file.
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

/// Lifecycle notifications delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    Progress { loaded: u64, total: u64 },
    Load { status: u16, body: String },
    Error(String),
    Abort,
}

impl TransferEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferEvent::Progress { .. })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

impl UploadResponse {
    /// Reads `{ "message": ... }`, falling back to the raw body text.
    pub fn message_from_body(body: &str) -> String {
        match serde_json::from_str::<UploadResponse>(body) {
            Ok(response) => response.message,
            Err(_) => body.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading,
    Success,
    Failed,
    Cancelled,
}
