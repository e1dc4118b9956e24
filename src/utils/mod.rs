//! Utility modules shared by adapters and the orchestration core

pub mod http_client;
pub mod retry;
pub mod time;

pub use http_client::HttpSession;
pub use retry::{with_retry, RetryConfig};
