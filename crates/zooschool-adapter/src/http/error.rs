/*
[INPUT]:  Error sources (HTTP, backend, serialization, auth, validation)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the carpool adapter
#[derive(Error, Debug)]
pub enum CarpoolError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Single-row lookup matched nothing
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Backend rejected our credentials
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Email/password pair did not match a user
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Signup for an email that is already registered
    #[error("User already exists with email {email}")]
    UserExists { email: String },

    /// Caller input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Session token is expired
    #[error("Session token expired, please log in again")]
    TokenExpired,

    /// Session token signature does not verify
    #[error("Invalid session token signature")]
    InvalidSignature,

    /// Session token is not a well-formed compact JWT
    #[error("Malformed session token: {0}")]
    MalformedToken(String),

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Blocking background work panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    /// Connection timeout
    #[error("Connection timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl CarpoolError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CarpoolError::Http(_)
                | CarpoolError::RateLimit { .. }
                | CarpoolError::Timeout { .. }
                | CarpoolError::InvalidResponse(_)
        )
    }

    /// Get retry delay in seconds (if retryable)
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            CarpoolError::RateLimit { retry_after } => Some(*retry_after),
            CarpoolError::Timeout { .. } => Some(1),
            _ => None,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            CarpoolError::Authentication { .. }
                | CarpoolError::InvalidCredentials
                | CarpoolError::TokenExpired
                | CarpoolError::InvalidSignature
                | CarpoolError::MalformedToken(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CarpoolError::NotFound { .. })
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        CarpoolError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        CarpoolError::NotFound {
            resource: resource.into(),
        }
    }
}

/// Result type alias for carpool operations
pub type Result<T> = std::result::Result<T, CarpoolError>;
