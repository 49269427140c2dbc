use avpkit_config::EncoderConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log level {level:?}: {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Filter for a `log_level` value such as `info` or `avpkit_core=trace,warn`
pub fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install JSON logging at the configured level; `RUST_LOG` takes precedence
///
/// The level is checked before anything is installed, so a bad value leaves
/// the global subscriber untouched.
pub fn init_from_config(config: &EncoderConfig) -> Result<(), LoggingError> {
    let configured = level_filter(&config.log_level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}

/// Initialize logging for tests (plain format)
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, warn};

    #[test]
    fn test_logging_init() {
        init_test();
        init_test();
        debug!(application_id = 0, avp = "Session-Id", "Encoded AVP");
        warn!(application_id = 0, avp = "Does-Not-Exist", "AVP not found in dictionary");
    }

    #[test]
    fn test_level_filter_accepts_config_values() {
        assert!(level_filter(&EncoderConfig::default().log_level).is_ok());
        assert!(level_filter("warn").is_ok());
        assert!(level_filter("avpkit_core=trace,info").is_ok());
    }

    #[test]
    fn test_bad_level_is_rejected_before_install() {
        let config = EncoderConfig {
            log_level: "avpkit_core=loud".to_string(),
            ..EncoderConfig::default()
        };
        assert!(matches!(
            init_from_config(&config),
            Err(LoggingError::InvalidLevel { .. })
        ));
    }
}
