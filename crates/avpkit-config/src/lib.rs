use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Default limit on grouped AVP nesting
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Encoder configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EncoderConfig {
    /// Deepest grouped AVP nesting accepted before `NestingTooDeep`
    #[validate(range(min = 1, max = 256))]
    pub max_nesting_depth: usize,
    #[validate(length(min = 1))]
    pub log_level: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            log_level: "info".to_string(),
        }
    }
}

impl EncoderConfig {
    /// Validate a config built in code rather than loaded from a source
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Load configuration from file, overridden by `AVPKIT_*` environment variables
pub fn load_config<T>(path: &str) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let config: T = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("AVPKIT"))
        .build()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?;

    config
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(config)
}

/// Load configuration from YAML string (for testing)
pub fn load_from_yaml<T>(yaml: &str) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let config: T =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::LoadError(e.to_string()))?;
    config
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncoderConfig::default();
        assert_eq!(config.max_nesting_depth, 32);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
max_nesting_depth: 8
log_level: debug
"#;
        let config: EncoderConfig = load_from_yaml(yaml).unwrap();
        assert_eq!(config.max_nesting_depth, 8);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EncoderConfig = load_from_yaml("log_level: warn\n").unwrap();
        assert_eq!(config.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_validation_error() {
        let yaml = r#"
max_nesting_depth: 0
log_level: info
"#;
        let result: Result<EncoderConfig, _> = load_from_yaml(yaml);
        match result {
            Err(ConfigError::ValidationError(_)) => (), // Expected
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_check_rejects_depth_out_of_range() {
        let config = EncoderConfig {
            max_nesting_depth: 1_000_000,
            ..EncoderConfig::default()
        };
        assert!(matches!(config.check(), Err(ConfigError::ValidationError(_))));
        assert!(EncoderConfig::default().check().is_ok());
    }

    #[test]
    fn test_load_error() {
        let result: Result<EncoderConfig, _> = load_from_yaml("max_nesting_depth: [1, 2]");
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result: Result<EncoderConfig, _> = load_config("/nonexistent/avpkit");
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
