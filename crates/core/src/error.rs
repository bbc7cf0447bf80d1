//! Error types for the InterDesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all InterDesk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion endpoint errors ---
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    // --- Persistence errors ---
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    // --- Authentication errors ---
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    // --- Input validation ---
    #[error("Validation error: {message}")]
    Validation { message: String },

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures talking to the external completion endpoint.
///
/// The orchestrator surfaces these to the caller for the main reply path;
/// the engagement injector is the one place they are silently recovered.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Token is missing")]
    MissingToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_displays_correctly() {
        let err = Error::Upstream(UpstreamError::Api {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn validation_error_displays_message() {
        let err = Error::validation("message is required");
        assert!(err.to_string().contains("message is required"));
    }

    #[test]
    fn auth_error_wraps_into_top_level() {
        let err: Error = AuthError::TokenExpired.into();
        assert!(matches!(err, Error::Auth(AuthError::TokenExpired)));
    }
}
