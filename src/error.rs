//! Error types for ticket-desk
//!
//! API wrappers return [`TicketDeskError`] for every signaled failure.
//! Editor commands, notifications and focus handling never produce errors;
//! they degrade to no-ops instead.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, TicketDeskError>;

/// Main error type for ticket-desk
#[derive(Debug, Error)]
pub enum TicketDeskError {
    /// The server answered with a non-success status; displays the server's message
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    /// The server answered with `success: false` in an otherwise valid envelope
    #[error("{0}")]
    Api(String),

    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable access token and refresh was impossible
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Custom(String),
}

impl TicketDeskError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Build an HTTP error from a status code and message
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by this error, if any
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the failure means "the requested resource does not exist"
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Message suitable for showing to a person
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } | Self::Api(message) | Self::Custom(message) => {
                message.clone()
            },
            Self::NotAuthenticated => "You are not logged in or your session expired".to_string(),
            other => other.to_string(),
        }
    }

    /// Hints for fixing the error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotAuthenticated => vec![
                "Run 'ticket-desk login --access <token>' to store a fresh token".to_string(),
            ],
            Self::Network(_) => vec![
                "Check that the server is reachable".to_string(),
                "Verify 'api.base_url' in your configuration".to_string(),
            ],
            Self::Config(_) => vec![
                "Check TICKET_DESK__* environment variables and the config file".to_string(),
            ],
            Self::Http { status, .. } if *status == StatusCode::FORBIDDEN => {
                vec!["Your account lacks permission for this action".to_string()]
            },
            _ => Vec::new(),
        }
    }

    /// Whether retrying the same operation could succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<config::ConfigError> for TicketDeskError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
