//! Error type definitions for the EPG grabber
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that keeps the site and channel
//! context of a failure attached to the error itself.

use thiserror::Error;

/// Top-level application error type
///
/// Any of these aborts the whole run: there is no partial-success mode, so a
/// run either writes a complete guide or nothing at all.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A channel entry references a site no adapter is registered for
    #[error("Configuration error: no adapter registered for site '{site}'")]
    UnknownSite { site: String },

    /// Two adapters claim the same site identifier
    #[error("Configuration error: an adapter for site '{site}' is already registered")]
    DuplicateSite { site: String },

    /// A fetch job failed; carries the offending site and channel
    #[error("Job failed for site '{site}' channel '{site_id}': {source}")]
    JobFailed {
        site: String,
        site_id: String,
        #[source]
        source: FetchError,
    },

    /// Fetch errors raised outside of a job (e.g. adapter construction)
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The guide document could not be written
    #[error("Output error: {path} - {message}")]
    Output { path: String, message: String },

    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors raised by site adapters and the HTTP session they own
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection failures and timeouts
    #[error("Network error: {url} - {message}")]
    Network { url: String, message: String },

    /// Non-success HTTP status codes
    #[error("HTTP error: {status} - {url}")]
    Status { url: String, status: u16 },

    /// Unexpected page structure
    #[error("Parse error: {site} - {message}")]
    Parse { site: String, message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown site error
    pub fn unknown_site<S: Into<String>>(site: S) -> Self {
        Self::UnknownSite { site: site.into() }
    }

    /// Create a duplicate adapter registration error
    pub fn duplicate_site<S: Into<String>>(site: S) -> Self {
        Self::DuplicateSite { site: site.into() }
    }

    /// Attach job context to a fetch error
    pub fn job_failed<S: Into<String>, I: Into<String>>(
        site: S,
        site_id: I,
        source: FetchError,
    ) -> Self {
        Self::JobFailed {
            site: site.into(),
            site_id: site_id.into(),
            source,
        }
    }

    /// Create an output error
    pub fn output<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Output {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error stems from configuration rather than fetching
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::UnknownSite { .. } | Self::DuplicateSite { .. }
        )
    }
}

impl FetchError {
    /// Create a network error
    pub fn network<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn status<U: Into<String>>(url: U, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Create a parse error
    pub fn parse<S: Into<String>, M: Into<String>>(site: S, message: M) -> Self {
        Self::Parse {
            site: site.into(),
            message: message.into(),
        }
    }
}
