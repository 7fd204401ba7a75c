use clap::Parser;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} `{value}`: {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Desktop upload form for a multipart upload endpoint.
#[derive(Debug, Clone, Parser)]
#[command(name = "form-uploader", version)]
pub struct Config {
    /// Endpoint receiving the multipart upload.
    #[arg(
        long,
        env = "FORM_UPLOADER_UPLOAD_URL",
        default_value = "http://127.0.0.1:5000/api/upload"
    )]
    pub upload_url: String,

    /// Endpoint the completed form is submitted to.
    #[arg(
        long,
        env = "FORM_UPLOADER_COMPLETE_URL",
        default_value = "http://127.0.0.1:5000/complete"
    )]
    pub complete_url: String,

    /// Initial value of the name field.
    #[arg(long, env = "FORM_UPLOADER_NAME", default_value = "")]
    pub name: String,

    /// Initial value of the email field.
    #[arg(long, env = "FORM_UPLOADER_EMAIL", default_value = "")]
    pub email: String,

    /// tracing filter directive, e.g. `form_uploader=debug`.
    #[arg(long, env = "FORM_UPLOADER_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("upload url", &self.upload_url),
            ("complete url", &self.complete_url),
        ] {
            Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
                name,
                value: value.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
