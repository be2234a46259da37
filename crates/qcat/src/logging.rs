//! Tracing subscriber setup.

use std::str::FromStr;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{ConfigError, LoggingConfig};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Full lines with targets.
    #[default]
    Console,
    /// Abbreviated single lines without targets.
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ConfigError::ValidationError(format!(
                "Invalid log format: {other}"
            ))),
        }
    }
}

/// Filter directive for a `-v` count on top of the configured level.
///
/// No flags keeps `configured`; each flag raises verbosity one step from
/// `info`, capped at `trace`.
pub fn level_for(verbosity: u8, configured: &str) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` is used when the computed directive does not parse. Fails if a
/// subscriber is already installed.
pub fn init(config: &LoggingConfig, verbosity: u8) -> Result<(), ConfigError> {
    let format: LogFormat = config.format.parse()?;
    let directive = level_for(verbosity, &config.level);

    let env_filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match format {
        LogFormat::Console => fmt::layer().with_target(true).with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::LoggingError(e.to_string()))?;

    tracing::debug!(%directive, ?format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "info");
        assert_eq!(level_for(2, "warn"), "debug");
        assert_eq!(level_for(7, "warn"), "trace");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("Console".parse::<LogFormat>().unwrap(), LogFormat::Console);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("json".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_init_rejects_bad_format() {
        let config = LoggingConfig {
            level: "info".into(),
            format: "xml".into(),
        };
        assert!(matches!(
            init(&config, 0),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
