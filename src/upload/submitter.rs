use super::form::UploadForm;
use reqwest::{Client, Url};
use std::sync::mpsc::{channel, Receiver, Sender};
use tokio::runtime::Handle;
use tracing::{info, warn};

/// Submits the augmented form once the file has been stored.
pub trait FormSubmitter {
    fn submit(&self, form: &UploadForm);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    pub status: u16,
    pub body: String,
}

pub type SubmitResult = Result<SubmitReport, String>;

/// Posts the form URL-encoded to the completion endpoint and reports the
/// response back over a channel.
pub struct HttpFormSubmitter {
    client: Client,
    runtime: Handle,
    url: Url,
    results: Sender<SubmitResult>,
}

impl HttpFormSubmitter {
    pub fn new(client: Client, runtime: Handle, url: Url) -> (Self, Receiver<SubmitResult>) {
        let (results, receiver) = channel();
        (
            Self {
                client,
                runtime,
                url,
                results,
            },
            receiver,
        )
    }
}

impl FormSubmitter for HttpFormSubmitter {
    fn submit(&self, form: &UploadForm) {
        let client = self.client.clone();
        let url = self.url.clone();
        let entries = form.entries();
        let results = self.results.clone();

        info!(%url, fields = entries.len(), "submitting form");
        self.runtime.spawn(async move {
            let result = match client.post(url.clone()).form(&entries).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match response.text().await {
                        Ok(body) => Ok(SubmitReport { status, body }),
                        Err(e) => Err(format!("Failed to read response: {}", e)),
                    }
                }
                Err(e) => Err(format!("Failed to submit form: {}", e)),
            };

            if let Err(reason) = &result {
                warn!(%url, %reason, "form submission failed");
            }
            results.send(result).unwrap_or_default();
        });
    }
}
