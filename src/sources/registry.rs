//! Adapter registry
//!
//! Maps site identifiers to adapter instances. Adapters are registered
//! explicitly, either one at a time or as the built-in set constructed from
//! configuration.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::musor_tv::MusorTvAdapter;
use super::traits::EpgSiteAdapter;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: BTreeMap<String, Arc<dyn EpgSiteAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in adapter, each with its own HTTP
    /// session configured from the site's resolved options
    pub fn with_builtin_adapters(config: &Config) -> AppResult<Self> {
        let mut registry = Self::new();

        let musor_tv = MusorTvAdapter::new(&config.site_options(MusorTvAdapter::SITE_ID)?)?;
        registry.register(Arc::new(musor_tv))?;

        Ok(registry)
    }

    /// Add an adapter under its own site identifier
    pub fn register(&mut self, adapter: Arc<dyn EpgSiteAdapter>) -> AppResult<()> {
        let site = adapter.site_id().to_string();
        if self.adapters.contains_key(&site) {
            return Err(AppError::duplicate_site(site));
        }

        debug!("Registered adapter for site '{}'", site);
        self.adapters.insert(site, adapter);
        Ok(())
    }

    pub fn resolve(&self, site: &str) -> AppResult<Arc<dyn EpgSiteAdapter>> {
        self.adapters
            .get(site)
            .cloned()
            .ok_or_else(|| AppError::unknown_site(site))
    }

    /// Registered site identifiers in sorted order
    pub fn sites(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("sites", &self.sites())
            .finish()
    }
}
