//! Error types for the IBM Quantum client.

use qcat_hal::{BackendKind, HalError};
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur when talking to IBM Quantum.
#[derive(Debug, Error)]
pub enum IbmError {
    /// No API token was supplied.
    #[error("IBM Quantum API token not supplied")]
    MissingToken,

    /// Token cannot be used as a header value.
    #[error("Invalid IBM Quantum API token")]
    InvalidToken,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IBM Quantum API error: {message}")]
    ApiError {
        /// Error code from API.
        code: Option<String>,
        /// Error message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job failed.
    #[error("Job {job_id} failed: {reason}")]
    JobFailed {
        /// Job ID.
        job_id: String,
        /// Reason reported by IBM.
        reason: String,
    },

    /// Results did not contain samples.
    #[error("Job {0} returned no samples")]
    EmptyResult(String),

    /// A returned sample could not be decoded.
    #[error("Failed to parse job result: {0}")]
    ResultParse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::MissingToken => {
                HalError::missing_credentials(BackendKind::Qiskit, "an IBM Quantum API token")
            }
            IbmError::JobFailed { job_id, reason } => HalError::TaskFailed {
                task_id: job_id,
                reason,
            },
            IbmError::JobNotFound(id) => HalError::TaskFailed {
                task_id: id,
                reason: "job not found".into(),
            },
            IbmError::JsonError(e) => HalError::Serialization(e),
            _ => HalError::Backend(e.to_string()),
        }
    }
}
