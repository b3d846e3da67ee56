//! Error types and response normalization for veryfi-client.

use crate::scheme::ErrorScheme;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for all Veryfi operations in this crate.
///
/// This is a convenience type alias that defaults to using [`Error`] as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for Veryfi operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Client options are missing a required field or the transport could not be built.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// The request never produced a usable response.
    ///
    /// Covers connection, TLS and timeout failures after the transport gave up
    /// retrying, as well as bodies that could not be encoded or decoded.
    #[error("{message}: {source}")]
    Execution {
        /// Context describing the failed step
        message: String,
        /// Underlying transport or codec error
        #[source]
        source: BoxedError,
    },

    /// Veryfi answered with a structured error body.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// The request was cancelled before it completed.
    #[error("Request was cancelled")]
    Cancelled,
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an execution error with the given context
    pub fn execution(message: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self::Execution {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Get the error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config",
            Error::Execution { .. } => "execution",
            Error::Server(_) => "server",
            Error::Cancelled => "cancelled",
        }
    }

    /// Get the HTTP code reported by the server, if this is a server error.
    pub fn status_code(&self) -> Option<u16> {
        self.as_server_error()
            .and_then(|err| u16::try_from(err.http_code).ok())
    }

    /// Check if the server reported this error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Server(_))
    }

    /// Returns the structured server error, if any.
    pub fn as_server_error(&self) -> Option<&ServerError> {
        match self {
            Error::Server(err) => Some(err),
            _ => None,
        }
    }
}

/// Error reported by Veryfi in a response body.
///
/// All fields are carried over unchanged from the [`ErrorScheme`] that was
/// decoded from the response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "got a {http_code} error response from Veryfi at {timestamp}, saying {description}, \
     with context: {context}"
)]
pub struct ServerError {
    /// HTTP code reported in the body
    pub http_code: i64,
    /// Server timestamp of the failure
    pub timestamp: String,
    /// Human readable description
    pub description: String,
    /// Additional context attached by the server
    pub context: serde_json::Value,
}

impl From<ErrorScheme> for ServerError {
    fn from(scheme: ErrorScheme) -> Self {
        Self {
            http_code: scheme.http_code,
            timestamp: scheme.timestamp,
            description: scheme.description,
            context: scheme.context,
        }
    }
}

/// Reduces a transport failure and a decoded error body into one outcome.
///
/// A transport error always wins. Otherwise any error body that differs from
/// [`ErrorScheme::default`] becomes [`Error::Server`].
///
/// An error body whose fields all hold their default values cannot be told
/// apart from "no error" and is treated as success.
pub fn check<E>(transport_error: Option<E>, error_scheme: &ErrorScheme) -> Result<()>
where
    E: Into<BoxedError>,
{
    if let Some(err) = transport_error {
        return Err(Error::execution("failed to make a request to Veryfi", err));
    }

    if !error_scheme.is_zero() {
        return Err(Error::Server(ServerError::from(error_scheme.clone())));
    }

    Ok(())
}
