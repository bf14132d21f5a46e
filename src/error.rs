//! Error types for lazycloud

use std::time::Duration;
use thiserror::Error;

/// Result type alias for lazycloud operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Errors a fetch can resolve with.
///
/// Cancellation is not an error kind: a cancelled fetch resolves with the
/// distinct `FetchOutcome::Cancelled` terminal notification instead, so the
/// presentation layer can never render a session switch as a failure.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Fetch exceeded its {0:?} deadline")]
    Timeout(Duration),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Provider("Request timed out".to_string())
        } else if err.is_connect() {
            FetchError::Provider("Failed to connect to provider endpoint".to_string())
        } else {
            FetchError::Provider(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `lazycloud init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Account not configured. Run `lazycloud init` or pass `--account`.")]
    MissingAccount,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_timeout_message() {
        let err = FetchError::Timeout(Duration::from_secs(30));
        let msg = err.to_string();
        assert!(msg.contains("deadline"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_fetch_error_provider_message() {
        let err = FetchError::Provider("throttled".to_string());
        assert!(err.to_string().contains("throttled"));
    }

    #[test]
    fn test_fetch_error_not_found() {
        let err = FetchError::NotFound("orders-processor".to_string());
        assert!(err.to_string().contains("orders-processor"));
    }

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound;
        assert!(err.to_string().contains("lazycloud init"));
    }

    #[test]
    fn test_config_error_missing_account() {
        let err = ConfigError::MissingAccount;
        assert!(err.to_string().contains("--account"));
    }

    #[test]
    fn test_error_from_fetch_error() {
        let fetch_err = FetchError::NotFound("fn".to_string());
        let err: Error = fetch_err.into();

        match err {
            Error::Fetch(FetchError::NotFound(_)) => (),
            _ => panic!("Expected Error::Fetch(FetchError::NotFound)"),
        }
    }

    #[test]
    fn test_error_from_config_error() {
        let cfg_err = ConfigError::NotFound;
        let err: Error = cfg_err.into();

        match err {
            Error::Config(ConfigError::NotFound) => (),
            _ => panic!("Expected Error::Config(ConfigError::NotFound)"),
        }
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
