//! Error types exposed by the GitHub aggregation layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Coarse classification of a [`DigestError`].
///
/// Per-repository outcomes carry the full error, but callers that only need
/// to report "why was this repository skipped" match on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The team or repository does not exist (or is not visible).
    NotFound,
    /// Transport failure or an unexpected response from the provider.
    RemoteUnavailable,
    /// The provider signalled backpressure.
    RateLimited,
    /// A record could not be decoded.
    MalformedRecord,
    /// Configuration was incomplete or invalid.
    InvalidConfiguration,
    /// The caller cancelled the operation or its deadline passed.
    Cancelled,
    /// Local I/O failed.
    Io,
}

impl ErrorKind {
    /// Short human-readable label used in summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::RemoteUnavailable => "remote unavailable",
            Self::RateLimited => "rate limited",
            Self::MalformedRecord => "malformed record",
            Self::InvalidConfiguration => "invalid configuration",
            Self::Cancelled => "cancelled",
            Self::Io => "I/O error",
        }
    }
}

/// Errors surfaced while listing repositories, fetching issues, or
/// assembling the digest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DigestError {
    /// The team or repository is absent.
    #[error("not found: {message}")]
    NotFound {
        /// Description of the missing resource.
        message: String,
    },

    /// Networking failed or GitHub answered with an unexpected status.
    #[error("GitHub unavailable: {message}")]
    RemoteUnavailable {
        /// Transport-level or status detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403/429 with rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Rate limit info if it could be fetched after the failure.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// A record returned by GitHub could not be decoded.
    #[error("malformed record: {message}")]
    MalformedRecord {
        /// Decoding detail.
        message: String,
    },

    /// Required configuration was absent or invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The operation was cancelled before every unit finished.
    #[error("cancelled: {message}")]
    Cancelled {
        /// What was cancelled and why.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl DigestError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RemoteUnavailable { .. } => ErrorKind::RemoteUnavailable,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Returns true when retrying the same request may succeed.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
