//! Configuration for qcat.
//!
//! Supports loading configuration from:
//! 1. A YAML file (explicit path, or `<config dir>/qcat/config.yaml`)
//! 2. Environment variables with the `QCAT_` prefix
//!
//! Precedence, highest first: environment, file, defaults.
//!
//! ```yaml
//! backend: cirq
//! logging:
//!   level: info
//!   format: console
//! simulator:
//!   seed: 7
//! executions:
//!   - backend: braket
//!     device: sv1
//!     bucket: my-results
//!     directory: qcat
//!     poll_timeout_seconds: 300
//!   - backend: ionq
//!     api: "..."
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qcat_adapter_sim::DEFAULT_MAX_QUBITS;
use qcat_hal::{
    BackendKind, Credentials, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT, DEFAULT_REPETITIONS,
    DEFAULT_SIMULATOR, ExecutionRequest,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuit::DEFAULT_BACKEND;

/// Complete qcat configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcatConfig {
    /// Backend a new circuit starts on.
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Local simulator settings.
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Per-backend execution settings.
    #[serde(default)]
    pub executions: Vec<ExecutionConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Local simulator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Sampling seed; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Largest register the simulator accepts.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

/// Execution settings for one backend.
///
/// Every field except `backend` is optional and defaults independently.
/// These are also the records a comparison takes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Backend family.
    #[serde(alias = "provider")]
    pub backend: BackendKind,

    /// API credential, passed through to the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,

    /// Device name or identifier; runs on `simulator` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Result bucket for backends that stage results externally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Key prefix inside `bucket`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Simulator name.
    #[serde(default = "default_simulator")]
    pub simulator: String,

    /// Number of repetitions.
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,

    /// Polling timeout in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_seconds: u64,

    /// Polling interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl fmt::Debug for ExecutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionConfig")
            .field("backend", &self.backend)
            .field("api", &self.api.as_ref().map(|_| "[REDACTED]"))
            .field("device", &self.device)
            .field("bucket", &self.bucket)
            .field("directory", &self.directory)
            .field("simulator", &self.simulator)
            .field("repetitions", &self.repetitions)
            .field("poll_timeout_seconds", &self.poll_timeout_seconds)
            .field("poll_interval_seconds", &self.poll_interval_seconds)
            .finish()
    }
}

// Default value functions
fn default_backend() -> BackendKind {
    DEFAULT_BACKEND
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_max_qubits() -> u32 {
    DEFAULT_MAX_QUBITS
}

fn default_simulator() -> String {
    DEFAULT_SIMULATOR.to_string()
}

fn default_repetitions() -> u32 {
    DEFAULT_REPETITIONS
}

fn default_poll_timeout() -> u64 {
    DEFAULT_POLL_TIMEOUT.as_secs()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

impl Default for QcatConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            logging: LoggingConfig::default(),
            simulator: SimulatorConfig::default(),
            executions: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: default_max_qubits(),
        }
    }
}

impl ExecutionConfig {
    /// Defaults for `backend`.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            api: None,
            device: None,
            bucket: None,
            directory: None,
            simulator: default_simulator(),
            repetitions: default_repetitions(),
            poll_timeout_seconds: default_poll_timeout(),
            poll_interval_seconds: default_poll_interval(),
        }
    }

    /// Comparison key: `backend`, or `backend@device` when a device is set.
    pub fn key(&self) -> String {
        match &self.device {
            Some(device) => format!("{}@{device}", self.backend),
            None => self.backend.to_string(),
        }
    }

    /// The execution request these settings describe.
    pub fn to_request(&self) -> ExecutionRequest {
        let mut request = ExecutionRequest::new(self.backend)
            .with_repetitions(self.repetitions)
            .with_poll_timeout(Duration::from_secs(self.poll_timeout_seconds))
            .with_poll_interval(Duration::from_secs(self.poll_interval_seconds));
        request = match &self.device {
            Some(device) => request.with_device(device.clone()),
            None => request.with_simulator(self.simulator.clone()),
        };
        if let Some(api) = &self.api {
            request = request.with_credentials(Credentials::new(api.clone()));
        }
        if let Some(bucket) = &self.bucket {
            request = request.with_storage(bucket.clone(), self.directory.clone().unwrap_or_default());
        }
        request
    }
}

/// Environment variable holding the credential of `backend`, if it has one.
fn credential_var(backend: BackendKind) -> Option<&'static str> {
    match backend {
        BackendKind::Qiskit => Some("QCAT_IBM_TOKEN"),
        BackendKind::IonQ => Some("QCAT_IONQ_API_KEY"),
        BackendKind::Cirq | BackendKind::Braket | BackendKind::QSharp => None,
    }
}

impl QcatConfig {
    /// Default location: `<config dir>/qcat/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("qcat").join("config.yaml"))
    }

    /// Parse YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: QcatConfig =
            serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::IoError(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Load with the following precedence:
    /// 1. `path` if given, else the default path if that file exists
    /// 2. Environment variable overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    debug!(path = %path.display(), "Loading default configuration file");
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };

        let config = config.merge_env_with(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `QCAT_*` overrides looked up through `var`.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `QCAT_BACKEND` | `backend` |
    /// | `QCAT_LOG_LEVEL` | `logging.level` |
    /// | `QCAT_LOG_FORMAT` | `logging.format` |
    /// | `QCAT_SEED` | `simulator.seed` |
    /// | `QCAT_MAX_QUBITS` | `simulator.max_qubits` |
    /// | `QCAT_IBM_TOKEN` | `api` of qiskit executions that have none |
    /// | `QCAT_IONQ_API_KEY` | `api` of ionq executions that have none |
    /// | `QCAT_BRAKET_BUCKET` | `bucket` of braket executions that have none |
    ///
    /// Unparseable values are ignored.
    pub fn merge_env_with(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("QCAT_BACKEND") {
            if let Ok(backend) = v.parse() {
                self.backend = backend;
            }
        }
        if let Some(v) = var("QCAT_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("QCAT_LOG_FORMAT") {
            self.logging.format = v;
        }
        if let Some(v) = var("QCAT_SEED") {
            if let Ok(seed) = v.parse() {
                self.simulator.seed = Some(seed);
            }
        }
        if let Some(v) = var("QCAT_MAX_QUBITS") {
            if let Ok(max) = v.parse() {
                self.simulator.max_qubits = max;
            }
        }

        let bucket = var("QCAT_BRAKET_BUCKET");
        for exec in &mut self.executions {
            if exec.api.is_none() {
                exec.api = credential_var(exec.backend).and_then(&var);
            }
            if exec.backend == BackendKind::Braket && exec.bucket.is_none() {
                exec.bucket = bucket.clone();
            }
        }
        self
    }

    /// Execution settings for `backend`: the first configured entry, or
    /// defaults.
    pub fn execution(&self, backend: BackendKind) -> ExecutionConfig {
        self.executions
            .iter()
            .find(|e| e.backend == backend)
            .cloned()
            .unwrap_or_else(|| ExecutionConfig::new(backend))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        if self.simulator.max_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "simulator.max_qubits must be greater than 0".to_string(),
            ));
        }

        for exec in &self.executions {
            if exec.repetitions == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{}: repetitions must be greater than 0",
                    exec.key()
                )));
            }
            if exec.poll_timeout_seconds == 0 || exec.poll_interval_seconds == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{}: poll timeout and interval must be positive",
                    exec.key()
                )));
            }
            if exec.api.as_deref() == Some("") {
                return Err(ConfigError::ValidationError(format!(
                    "{}: api must not be empty; omit the field instead",
                    exec.key()
                )));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}
