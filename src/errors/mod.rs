//! Centralized error handling for the EPG grabber
//!
//! Errors are split into two layers:
//!
//! - **Fetch Errors**: failures raised by a site adapter or its HTTP session
//!   (network exhaustion, unexpected status codes, unexpected page structure)
//! - **Application Errors**: configuration problems, job failures carrying the
//!   offending site/channel, and output failures
//!
//! # Usage
//!
//! ```rust
//! use epg_grabber::errors::{AppError, AppResult};
//!
//! fn resolve(site: &str) -> AppResult<()> {
//!     Err(AppError::unknown_site(site))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for adapter Results
pub type FetchResult<T> = Result<T, FetchError>;
