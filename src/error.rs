//! Error types for the tool changer
//!
//! Centralized error handling using thiserror. Bad tool selections are not
//! errors: they are reported inline in the command response.

use thiserror::Error;

/// All error types that can occur while building or running the tool changer
#[derive(Debug, Error)]
pub enum ToolchangerError {
    /// Configuration is structurally valid YAML but semantically unusable
    #[error("Config error: {0}")]
    Config(String),

    /// A tool factory could not resolve the configured tool variant
    #[error("Loader error: {0}")]
    Loader(String),

    /// An actuator handle does not exist in the actuator table
    #[error("Unknown actuator: {0}")]
    UnknownActuator(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for tool changer operations
pub type Result<T> = std::result::Result<T, ToolchangerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = ToolchangerError::Config("need at least 3 actuators".to_string());
        assert_eq!(err.to_string(), "Config error: need at least 3 actuators");
    }

    #[test]
    fn test_loader_error() {
        let err = ToolchangerError::Loader("No valid spindle type defined".to_string());
        assert_eq!(err.to_string(), "Loader error: No valid spindle type defined");
    }

    #[test]
    fn test_unknown_actuator_error() {
        let err = ToolchangerError::UnknownActuator(7);
        assert_eq!(err.to_string(), "Unknown actuator: 7");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ToolchangerError = io_err.into();
        assert!(matches!(err, ToolchangerError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("{not: a list").unwrap_err();
        let err: ToolchangerError = yaml_err.into();
        assert!(matches!(err, ToolchangerError::Yaml(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(ToolchangerError::Config("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
