//! Error types for the roster engine
//!
//! Two concerns are kept apart:
//! - Remote calls, split into server rejections and transport failures
//! - Client configuration

use std::path::PathBuf;

/// Reason shown when the server rejects a call without a `detail`.
pub const GENERIC_REASON: &str = "An error occurred";

/// Failure of a single remote call
///
/// A rejection carries the server's human-readable reason. A transport
/// failure means no usable response was obtained and is never conflated
/// with a rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Non-2xx status, optionally with the server-provided `detail`
    #[error("rejected with status {status}: {}", detail.as_deref().unwrap_or(GENERIC_REASON))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-provided reason
        detail: Option<String>,
    },

    /// Request never completed or the response could not be parsed
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ServiceError {
    /// Create a rejection
    #[inline]
    pub fn rejected(status: u16, detail: Option<impl Into<String>>) -> Self {
        Self::Rejected {
            status,
            detail: detail.map(Into::into),
        }
    }

    /// Create a transport failure
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Check if no response was obtained
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Server-provided reason, falling back to [`GENERIC_REASON`].
    ///
    /// Returns `None` for transport failures, which have no server reason.
    #[must_use]
    pub fn server_reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => Some(detail.as_deref().unwrap_or(GENERIC_REASON)),
            Self::Transport(_) => None,
        }
    }

    /// Text to put in front of the user.
    ///
    /// Rejections surface the server reason verbatim; transport failures
    /// surface the caller's fixed retry message.
    #[must_use]
    pub fn user_message<'a>(&'a self, transport_message: &'a str) -> &'a str {
        self.server_reason().unwrap_or(transport_message)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid TOML for [`crate::ClientConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}
