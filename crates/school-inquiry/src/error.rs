use crate::catalog::{CatalogError, FallbackError};
use crate::config::ConfigError;
use crate::notify::NotificationError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;
use crate::transport::TransportError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Fallback(FallbackError),
    Catalog(CatalogError),
    Store(StoreError),
    Notification(NotificationError),
    Transport(TransportError),
    /// A form submission that ended in an error status.
    Submission(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Fallback(err) => write!(f, "fallback data error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Store(err) => write!(f, "store error: {}", err),
            AppError::Notification(err) => write!(f, "notification error: {}", err),
            AppError::Transport(err) => write!(f, "transport error: {}", err),
            AppError::Submission(message) => write!(f, "submission failed: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Fallback(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Notification(err) => Some(err),
            AppError::Transport(err) => Some(err),
            AppError::Submission(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<FallbackError> for AppError {
    fn from(value: FallbackError) -> Self {
        Self::Fallback(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<NotificationError> for AppError {
    fn from(value: NotificationError) -> Self {
        Self::Notification(value)
    }
}

impl From<TransportError> for AppError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_failures_carry_the_status_message() {
        let err = AppError::Submission("Please fill all fields correctly.".to_string());
        assert!(std::error::Error::source(&err).is_none());
        assert_eq!(
            err.to_string(),
            "submission failed: Please fill all fields correctly."
        );
    }

    #[test]
    fn store_errors_keep_their_source() {
        let err = AppError::from(StoreError::Unavailable("offline".to_string()));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(
            err.to_string(),
            "store error: document store unavailable: offline"
        );
    }
}
