//! Client error taxonomy.

use notes_core::ValidationError;

use crate::config::ConfigError;
use crate::token_store::TokenStoreError;

/// Error returned by every session and note operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required field was empty or malformed. Never reaches the network.
    #[error("{0}")]
    InvalidInput(String),

    /// The email does not look like `local@domain.tld`.
    #[error("Invalid email address")]
    InvalidEmail,

    /// The API refused a sign-in, sign-up or user lookup.
    #[error("{0}")]
    AuthRejected(String),

    /// The API answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// A user lookup was attempted with an empty token.
    #[error("Token is required")]
    MissingToken,

    /// The API answered 401; the session has been signed out.
    #[error("session expired, please sign in again")]
    Unauthorized,

    /// A note operation was called without an active session.
    #[error("not signed in")]
    NoSession,

    /// Network failure or an unreadable response body.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a 5xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A successful envelope was missing a field the client needs.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The persisted token could not be read or written.
    #[error("token storage error: {0}")]
    TokenStore(#[from] TokenStoreError),

    /// The client could not be built from its configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::AuthRejected(_) => "AUTH_REJECTED",
            Self::Rejected(_) => "REJECTED",
            Self::MissingToken => "MISSING_TOKEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NoSession => "NO_SESSION",
            Self::Transport(_) => "TRANSPORT_FAILURE",
            Self::Server { .. } => "TRANSPORT_FAILURE",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::TokenStore(_) => "TOKEN_STORE",
            Self::Config(_) => "CONFIG",
        }
    }

    /// Whether the failure happened below the API envelope (network or 5xx).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server { .. })
    }

    /// Short text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) | Self::Server { .. } => {
                "Could not reach the server, try again later".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.message)
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
