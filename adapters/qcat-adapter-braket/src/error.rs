//! Error types for the AWS Braket client.

use qcat_hal::{BackendKind, HalError};
use thiserror::Error;

/// Result type for Braket operations.
pub type BraketResult<T> = Result<T, BraketError>;

/// Errors that can occur when using AWS Braket.
#[derive(Debug, Error)]
pub enum BraketError {
    /// No S3 bucket was configured for task results.
    #[error("S3 bucket not configured for Braket task results")]
    MissingS3Bucket,

    /// Invalid device or task ARN.
    #[error("Invalid ARN: {0}")]
    InvalidArn(String),

    /// Braket API error.
    #[error("Braket API error: {0}")]
    BraketApi(String),

    /// S3 error.
    #[error("S3 error: {0}")]
    S3Error(String),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Result parsing error.
    #[error("Failed to parse task result: {0}")]
    ResultParseError(String),
}

impl From<BraketError> for HalError {
    fn from(e: BraketError) -> Self {
        match e {
            BraketError::MissingS3Bucket => {
                HalError::missing_credentials(BackendKind::Braket, "a storage bucket")
            }
            BraketError::TaskNotFound(id) => HalError::TaskFailed {
                task_id: id,
                reason: "task not found".into(),
            },
            BraketError::InvalidArn(arn) => HalError::InvalidRequest(format!("invalid ARN {arn}")),
            BraketError::JsonError(e) => HalError::Serialization(e),
            _ => HalError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bucket_to_missing_credentials() {
        let hal: HalError = BraketError::MissingS3Bucket.into();
        assert!(matches!(
            hal,
            HalError::MissingCredentials {
                backend: BackendKind::Braket,
                ..
            }
        ));
    }

    #[test]
    fn test_task_not_found_to_task_failed() {
        let hal: HalError = BraketError::TaskNotFound("t1".into()).into();
        assert!(matches!(hal, HalError::TaskFailed { task_id, .. } if task_id == "t1"));
    }

    #[test]
    fn test_api_error_to_backend() {
        let hal: HalError = BraketError::BraketApi("throttled".into()).into();
        assert!(matches!(hal, HalError::Backend(msg) if msg.contains("throttled")));
    }
}
