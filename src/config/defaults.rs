//! Configuration default values
//!
//! This module contains all the default values for configuration options,
//! making them easily changeable in one central location.

// Scheduling defaults
pub const DEFAULT_POOL_SIZE: usize = 1;
pub const DEFAULT_TIMESPAN_DAYS: u32 = 1;

// Adapter defaults
pub const DEFAULT_TIMEZONE: &str = "Europe/Budapest";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

// HTTP session defaults
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_HTTP_RETRIES: u32 = 5;
pub const DEFAULT_HTTP_BACKOFF_SECONDS: u64 = 20;
pub const DEFAULT_HTTP_MAX_BACKOFF_SECONDS: u64 = 120;
pub const DEFAULT_RETRY_STATUSES: [u16; 3] = [500, 502, 504];
