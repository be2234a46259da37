//! Execution requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{HalError, HalResult};
use crate::kind::BackendKind;

/// Default repetitions per execution.
pub const DEFAULT_REPETITIONS: u32 = 1024;
/// Default simulator name.
pub const DEFAULT_SIMULATOR: &str = "default";
/// Default remote poll timeout.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(100);
/// Default remote poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Where a circuit should run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A simulator, by name. `default` selects the backend's local simulator.
    Simulator(String),
    /// A named remote device (backend name, device ARN, ...).
    Device(String),
}

impl Target {
    /// The target name.
    pub fn name(&self) -> &str {
        match self {
            Target::Simulator(name) | Target::Device(name) => name,
        }
    }

    /// Whether this is the backend's default local simulator.
    pub fn is_default_simulator(&self) -> bool {
        matches!(self, Target::Simulator(name) if name == DEFAULT_SIMULATOR)
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::Simulator(DEFAULT_SIMULATOR.to_string())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Simulator(name) => write!(f, "simulator:{name}"),
            Target::Device(name) => write!(f, "device:{name}"),
        }
    }
}

/// Opaque API credential, passed through to the backend untouched.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(String);

impl Credentials {
    /// Wrap a token or API key.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials([REDACTED])")
    }
}

/// Remote storage where a backend stages task artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    /// Bucket name.
    pub bucket: String,
    /// Key prefix inside the bucket.
    pub directory: String,
}

/// Everything needed to run one circuit on one backend.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Backend family.
    pub backend: BackendKind,
    /// Simulator or device.
    pub target: Target,
    /// Number of repetitions.
    pub repetitions: u32,
    /// API credential, if any.
    pub credentials: Option<Credentials>,
    /// Remote artifact storage, if any.
    pub storage: Option<StorageLocation>,
    /// Give up polling after this long.
    pub poll_timeout: Duration,
    /// Wait this long between status checks.
    pub poll_interval: Duration,
}

impl ExecutionRequest {
    /// Request with defaults for `backend`.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            target: Target::default(),
            repetitions: DEFAULT_REPETITIONS,
            credentials: None,
            storage: None,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Run on the named simulator.
    pub fn with_simulator(mut self, name: impl Into<String>) -> Self {
        self.target = Target::Simulator(name.into());
        self
    }

    /// Run on the named device.
    pub fn with_device(mut self, name: impl Into<String>) -> Self {
        self.target = Target::Device(name.into());
        self
    }

    /// Set the repetition count.
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Set the API credential.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the artifact storage location.
    pub fn with_storage(mut self, bucket: impl Into<String>, directory: impl Into<String>) -> Self {
        self.storage = Some(StorageLocation {
            bucket: bucket.into(),
            directory: directory.into(),
        });
        self
    }

    /// Set the poll timeout.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The credential, or [`HalError::MissingCredentials`] naming it.
    pub fn require_credentials(&self, credential: &str) -> HalResult<&Credentials> {
        self.credentials
            .as_ref()
            .filter(|c| !c.expose().is_empty())
            .ok_or_else(|| HalError::missing_credentials(self.backend, credential))
    }

    /// The storage location, or [`HalError::MissingCredentials`] naming it.
    pub fn require_storage(&self) -> HalResult<&StorageLocation> {
        self.storage
            .as_ref()
            .filter(|s| !s.bucket.is_empty())
            .ok_or_else(|| HalError::missing_credentials(self.backend, "a storage bucket"))
    }

    /// Reject zero repetitions and non-positive poll settings.
    pub fn validate(&self) -> HalResult<()> {
        if self.repetitions == 0 {
            return Err(HalError::InvalidRequest(
                "repetitions must be positive".into(),
            ));
        }
        if self.poll_interval.is_zero() || self.poll_timeout.is_zero() {
            return Err(HalError::InvalidRequest(
                "poll timeout and interval must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ExecutionRequest::new(BackendKind::Braket);
        assert_eq!(request.repetitions, 1024);
        assert!(request.target.is_default_simulator());
        assert_eq!(request.poll_timeout, Duration::from_secs(100));
        assert_eq!(request.poll_interval, Duration::from_secs(10));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_credentials_redacted() {
        let request =
            ExecutionRequest::new(BackendKind::IonQ).with_credentials(Credentials::new("sk-live"));
        let debug = format!("{request:?}");
        assert!(!debug.contains("sk-live"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_require_credentials() {
        let request = ExecutionRequest::new(BackendKind::IonQ);
        let err = request.require_credentials("an IonQ API key").unwrap_err();
        assert!(matches!(err, HalError::MissingCredentials { .. }));
        assert!(err.to_string().contains("IonQ API key"));

        let empty = request.clone().with_credentials(Credentials::new(""));
        assert!(empty.require_credentials("an IonQ API key").is_err());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let request = ExecutionRequest::new(BackendKind::Cirq).with_repetitions(0);
        assert!(matches!(
            request.validate(),
            Err(HalError::InvalidRequest(_))
        ));
        let request = ExecutionRequest::new(BackendKind::Cirq).with_poll_interval(Duration::ZERO);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::default().to_string(), "simulator:default");
        assert_eq!(Target::Device("ibm_kyiv".into()).name(), "ibm_kyiv");
    }
}
