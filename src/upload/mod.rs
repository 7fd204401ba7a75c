mod error;
mod form;
mod submitter;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod test_server;

pub use error::UploadError;
pub use form::{UploadForm, ORIGINAL_FILENAME_FIELD, SAVED_FILENAME_FIELD};
pub use submitter::{FormSubmitter, HttpFormSubmitter, SubmitResult};
pub use transport::{HttpTransport, UploadTransport};
pub use types::{FilePart, SelectedFile, TransferEvent, UploadPhase, UploadRequest, UploadResponse};
