//! Site adapters
//!
//! Each supported EPG website is handled by an adapter implementing
//! [`EpgSiteAdapter`]. Adapters are registered in an [`AdapterRegistry`]
//! keyed by their site identifier, which is what configuration entries
//! refer to.
//!
//! # Usage
//!
//! ```rust,no_run
//! use epg_grabber::config::Config;
//! use epg_grabber::sources::AdapterRegistry;
//!
//! fn example(config: &Config) -> epg_grabber::errors::AppResult<()> {
//!     let registry = AdapterRegistry::with_builtin_adapters(config)?;
//!     let adapter = registry.resolve("m.musor.tv")?;
//!     println!("Using adapter for {}", adapter.site_id());
//!     Ok(())
//! }
//! ```

pub mod musor_tv;
pub mod registry;
pub mod traits;

pub use musor_tv::MusorTvAdapter;
pub use registry::AdapterRegistry;
pub use traits::*;
