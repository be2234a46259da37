//! Error types for the IonQ client.

use qcat_hal::{BackendKind, HalError};
use thiserror::Error;

/// Result type for IonQ operations.
pub type IonqResult<T> = Result<T, IonqError>;

/// Errors that can occur when talking to IonQ.
#[derive(Debug, Error)]
pub enum IonqError {
    /// No API key was supplied.
    #[error("IonQ API key not supplied")]
    MissingApiKey,

    /// Key cannot be used as a header value.
    #[error("Invalid IonQ API key")]
    InvalidApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IonQ API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Histogram key is not a basis state index.
    #[error("Invalid histogram key '{0}'")]
    InvalidHistogram(String),

    /// Histogram carries no probability mass.
    #[error("IonQ histogram is empty or sums to zero")]
    EmptyHistogram,

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<IonqError> for HalError {
    fn from(e: IonqError) -> Self {
        match e {
            IonqError::MissingApiKey => {
                HalError::missing_credentials(BackendKind::IonQ, super::API_KEY_CREDENTIAL)
            }
            IonqError::JobNotFound(id) => HalError::TaskFailed {
                task_id: id,
                reason: "job not found".into(),
            },
            IonqError::JsonError(e) => HalError::Serialization(e),
            _ => HalError::Backend(e.to_string()),
        }
    }
}
