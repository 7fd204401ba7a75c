use thiserror::Error;

/// Everything that can end (or prevent) an upload session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("An upload is already in progress")]
    AlreadyUploading,

    #[error("Invalid upload URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Form is missing the `{0}` field")]
    MissingFormField(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server responded with status {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Upload cancelled")]
    Cancelled,
}
