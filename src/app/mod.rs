mod controller;
mod state;
mod ui;

use crate::config::Config;
use crate::upload::{
    HttpFormSubmitter, HttpTransport, SelectedFile, SubmitResult, UploadForm,
    ORIGINAL_FILENAME_FIELD, SAVED_FILENAME_FIELD,
};
use eframe::{egui, App};
use reqwest::cookie::Jar;
use reqwest::Url;
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{info, warn};
use uuid::Uuid;

use controller::UploadController;
use state::{Alert, AlertKind, UploadOutcome};

pub struct FormUploaderApp {
    upload_url: String,
    controller: UploadController<HttpTransport, HttpFormSubmitter>,
    submit_results: Receiver<SubmitResult>,
    submit_pending: bool,
    completion: Option<SubmitResult>,
}

impl FormUploaderApp {
    pub fn new(config: &Config, runtime: Handle) -> anyhow::Result<Self> {
        info!(upload_url = %config.upload_url, complete_url = %config.complete_url, "initializing form uploader");

        let jar = Arc::new(Jar::default());
        let transport = HttpTransport::new(jar.clone(), runtime.clone())?;
        let complete_url = Url::parse(&config.complete_url)?;
        let (submitter, submit_results) =
            HttpFormSubmitter::new(transport.client(), runtime, complete_url);

        let form = UploadForm::standard(&config.name, &config.email);
        Ok(Self {
            upload_url: config.upload_url.clone(),
            controller: UploadController::new(form, jar, transport, submitter),
            submit_results,
            submit_pending: false,
            completion: None,
        })
    }

    pub fn choose_file(&mut self, path: &Path) {
        match SelectedFile::from_path(path) {
            Ok(file) => {
                info!(file = %file.name, size = file.size, "file selected");
                self.controller.select_file(file);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read selected file");
                self.controller.show_alert(Alert::new(
                    format!("Could not read {}: {}", path.display(), e),
                    AlertKind::Warning,
                ));
            }
        }
    }

    pub fn start_upload(&mut self) {
        let replacement_name = Uuid::new_v4().to_string();
        if self
            .controller
            .start(&self.upload_url, &replacement_name)
            .is_ok()
        {
            self.completion = None;
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let was_uploading = self.controller.transfer().is_some();
        if self.controller.poll() {
            ctx.request_repaint();
            let finished = was_uploading && self.controller.transfer().is_none();
            if let (true, Some(UploadOutcome::Succeeded { message })) =
                (finished, self.controller.last_outcome())
            {
                let form = self.controller.form();
                info!(
                    %message,
                    original = form.get(ORIGINAL_FILENAME_FIELD).unwrap_or_default(),
                    saved = form.get(SAVED_FILENAME_FIELD).unwrap_or_default(),
                    "upload stored, waiting for form submission"
                );
                self.submit_pending = true;
            }
        }

        if let Ok(result) = self.submit_results.try_recv() {
            match &result {
                Ok(report) => info!(status = report.status, "form submission finished"),
                Err(reason) => warn!(%reason, "form submission failed"),
            }
            self.completion = Some(result);
            self.submit_pending = false;
            ctx.request_repaint();
        }

        if self.controller.transfer().is_some() || self.submit_pending {
            ctx.request_repaint();
        }
    }
}

impl App for FormUploaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
