use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Cancelled")]
    Cancelled,
}

impl AppError {
    /// True when the service could not be reached at all (as opposed to
    /// answering with an error status or an unreadable body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::GatewayUnavailable(_) | AppError::Timeout(_) | AppError::Network(_)
        )
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}
