use super::state::{percent_complete, Alert, AlertKind, UploadOutcome, WidgetState};
use crate::upload::{
    FilePart, FormSubmitter, SelectedFile, TransferEvent, UploadError, UploadForm, UploadPhase,
    UploadRequest, UploadResponse, UploadTransport, ORIGINAL_FILENAME_FIELD, SAVED_FILENAME_FIELD,
};
use derivative::Derivative;
use reqwest::cookie::Jar;
use reqwest::Url;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Derivative)]
#[derivative(Debug)]
struct UploadSession {
    file: SelectedFile,
    replacement_name: String,
    total: u64,
    transferred: u64,
    #[derivative(Debug = "ignore")]
    events: Receiver<TransferEvent>,
    cancel: CancellationToken,
}

/// Drives one file input through the upload lifecycle.
///
/// All methods run on the UI thread. Transport events arrive over the
/// session channel and are applied by [`UploadController::poll`].
pub struct UploadController<T, S> {
    widgets: WidgetState,
    form: UploadForm,
    cookies: Arc<Jar>,
    transport: T,
    submitter: S,
    phase: UploadPhase,
    session: Option<UploadSession>,
    last_outcome: Option<UploadOutcome>,
}

impl<T: UploadTransport, S: FormSubmitter> UploadController<T, S> {
    pub fn new(form: UploadForm, cookies: Arc<Jar>, transport: T, submitter: S) -> Self {
        Self {
            widgets: WidgetState::default(),
            form,
            cookies,
            transport,
            submitter,
            phase: UploadPhase::Idle,
            session: None,
            last_outcome: None,
        }
    }

    pub fn widgets(&self) -> &WidgetState {
        &self.widgets
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UploadForm {
        &mut self.form
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<&UploadOutcome> {
        self.last_outcome.as_ref()
    }

    /// Bytes sent so far and the expected total, while uploading.
    pub fn transfer(&self) -> Option<(u64, u64)> {
        self.session
            .as_ref()
            .map(|session| (session.transferred, session.total))
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        if !self.widgets.file_input.enabled {
            debug!(file = %file.name, "file input disabled, ignoring selection");
            return;
        }
        self.widgets.file_input.label = file.name.clone();
        self.widgets.file_input.selected = Some(file);
    }

    pub fn show_alert(&mut self, alert: Alert) {
        self.widgets.alert = Some(alert);
    }

    pub fn dismiss_alert(&mut self) {
        self.widgets.alert = None;
    }

    pub fn start(&mut self, url: &str, replacement_name: &str) -> Result<(), UploadError> {
        let prepared = self.validate(url);
        let (url, file) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!(error = %e, "upload not started");
                self.widgets.alert = Some(Alert::for_error(&e));
                return Err(e);
            }
        };

        self.widgets.show_uploading();

        self.cookies
            .add_cookie_str(&format!("filesize={}", file.size), &url);

        // Both fields were checked by `validate`.
        self.form.set(ORIGINAL_FILENAME_FIELD, &file.name)?;
        self.form.set(SAVED_FILENAME_FIELD, replacement_name)?;

        let request = UploadRequest {
            url: url.clone(),
            fields: self.form.entries(),
            file: FilePart {
                path: file.path.clone(),
                original_name: file.name.clone(),
                replacement_name: replacement_name.to_string(),
                size: file.size,
            },
        };

        let (sender, receiver) = channel();
        let cancel = CancellationToken::new();

        info!(
            %url,
            original = %file.name,
            saved = %replacement_name,
            size = file.size,
            "starting upload"
        );

        self.session = Some(UploadSession {
            total: file.size,
            transferred: 0,
            file,
            replacement_name: replacement_name.to_string(),
            events: receiver,
            cancel: cancel.clone(),
        });
        self.phase = UploadPhase::Uploading;
        self.transport.send(request, sender, cancel);
        Ok(())
    }

    fn validate(&self, url: &str) -> Result<(Url, SelectedFile), UploadError> {
        if self.session.is_some() {
            return Err(UploadError::AlreadyUploading);
        }
        let file = self
            .widgets
            .file_input
            .selected
            .clone()
            .ok_or(UploadError::NoFileSelected)?;
        let url = Url::parse(url).map_err(|e| UploadError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        for field in [ORIGINAL_FILENAME_FIELD, SAVED_FILENAME_FIELD] {
            if !self.form.has_field(field) {
                return Err(UploadError::MissingFormField(field.to_string()));
            }
        }
        Ok((url, file))
    }

    /// Signals the in-flight request to stop. The session ends when the
    /// transport reports `Abort`.
    pub fn cancel(&mut self) {
        match &self.session {
            Some(session) => {
                info!(file = %session.file.name, "cancelling upload");
                session.cancel.cancel();
            }
            None => debug!("cancel requested with no upload in flight"),
        }
    }

    /// Applies every event the transport has queued. Returns whether the
    /// widget state may have changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        loop {
            let Some(session) = &self.session else {
                break;
            };
            match session.events.try_recv() {
                Ok(event) => {
                    self.handle(event);
                    changed = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.on_error("transport closed without a response");
                    changed = true;
                    break;
                }
            }
        }
        changed
    }

    pub fn handle(&mut self, event: TransferEvent) {
        if self.phase != UploadPhase::Uploading {
            debug!(?event, "no upload in flight, ignoring event");
            return;
        }
        if event.is_terminal() {
            debug!(?event, "terminal transfer event");
        }
        match event {
            TransferEvent::Progress { loaded, total } => self.progress(loaded, total),
            TransferEvent::Load { status, body } => self.on_complete(status, &body),
            TransferEvent::Error(reason) => self.on_error(&reason),
            TransferEvent::Abort => self.on_abort(),
        }
    }

    pub fn progress(&mut self, loaded: u64, total: u64) {
        let percent = percent_complete(loaded, total);
        if let Some(session) = self.session.as_mut() {
            session.transferred = loaded;
        }
        debug!(loaded, total, percent, "upload progress");
        self.widgets.set_progress(percent);
    }

    pub fn on_complete(&mut self, status: u16, body: &str) {
        let message = UploadResponse::message_from_body(body);
        if status == 200 {
            info!(%message, "upload succeeded, submitting form");
            self.widgets.alert = Some(Alert::new(message.clone(), AlertKind::Success));
            self.submitter.submit(&self.form);
            self.finish(UploadOutcome::Succeeded { message });
        } else {
            warn!(status, %message, "upload rejected by server");
            self.fail(UploadError::Server { status, message });
        }
    }

    pub fn on_error(&mut self, reason: &str) {
        warn!(%reason, "upload transport error");
        self.fail(UploadError::Transport(reason.to_string()));
    }

    pub fn on_abort(&mut self) {
        info!("upload cancelled by user");
        self.fail(UploadError::Cancelled);
    }

    fn fail(&mut self, error: UploadError) {
        self.widgets.alert = Some(Alert::for_error(&error));
        self.finish(UploadOutcome::Failed(error));
    }

    fn finish(&mut self, outcome: UploadOutcome) {
        self.phase = outcome.phase();
        if let Some(session) = &self.session {
            debug!(
                file = %session.file.name,
                saved = %session.replacement_name,
                transferred = session.transferred,
                total = session.total,
                phase = ?self.phase,
                "upload session finished"
            );
        }
        self.last_outcome = Some(outcome);
        self.reset();
    }

    /// Returns to idle. A request still in flight is cancelled so it cannot
    /// overlap the next upload.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            if !session.cancel.is_cancelled() {
                debug!(file = %session.file.name, "reset with upload in flight, cancelling");
                session.cancel.cancel();
            }
        }
        self.phase = UploadPhase::Idle;
        self.widgets.reset();
    }
}
