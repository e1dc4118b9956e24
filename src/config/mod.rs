use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::duration;

use crate::errors::{AppError, AppResult};
use crate::ingestor::scheduler::SchedulerSettings;
use crate::models::FetchJob;

/// Grabber configuration
///
/// Loaded from TOML, or from the XML layout used by older grabber setups:
///
/// ```xml
/// <config>
///   <filename>guide.xml</filename>
///   <pool-size>4</pool-size>
///   <timespan>3</timespan>
///   <channel site="m.musor.tv" site_id="rtl" xmltv_id="RTL.HU">RTL</channel>
/// </config>
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "config")]
pub struct Config {
    /// Output guide path
    pub filename: PathBuf,
    /// Number of channels fetched concurrently
    #[serde(default = "default_pool_size", alias = "pool-size")]
    pub pool_size: usize,
    /// Days of guide to produce, today included
    #[serde(default = "default_timespan")]
    pub timespan: u32,
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default, alias = "user-agent")]
    pub user_agent: Option<String>,
    /// IANA timezone adapters render local times in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub http: HttpConfig,
    /// Per-site overrides keyed by site identifier
    #[serde(default)]
    pub sites: HashMap<String, SiteOverrides>,
    #[serde(default, rename = "channel")]
    pub channels: Vec<ChannelEntry>,
}

/// One channel to grab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    #[serde(alias = "@site")]
    pub site: String,
    #[serde(alias = "@site_id")]
    pub site_id: String,
    #[serde(default, alias = "@xmltv_id")]
    pub xmltv_id: String,
    #[serde(default, alias = "$text")]
    pub name: String,
}

/// HTTP session settings shared by all adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout", with = "duration")]
    pub timeout: Duration,
    /// Retries after the first attempt
    #[serde(default = "default_http_retries")]
    pub retries: u32,
    /// Delay before the first retry, doubled on every further retry
    #[serde(default = "default_http_backoff", with = "duration")]
    pub backoff: Duration,
    #[serde(default = "default_http_max_backoff", with = "duration")]
    pub max_backoff: Duration,
    /// Status codes treated as transient
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

/// Settings a single site may override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteOverrides {
    pub proxy: Option<String>,
    #[serde(alias = "user-agent")]
    pub user_agent: Option<String>,
    pub timezone: Option<String>,
}

/// Fully resolved settings an adapter is constructed with
#[derive(Debug, Clone)]
pub struct SiteOptions {
    pub site: String,
    pub proxy: Option<String>,
    pub user_agent: String,
    pub timezone: chrono_tz::Tz,
    pub http: HttpConfig,
}

impl SiteOptions {
    /// Options with no proxy and default HTTP settings, mostly for tests
    pub fn new<S: Into<String>>(site: S, timezone: chrono_tz::Tz) -> Self {
        Self {
            site: site.into(),
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timezone,
            http: HttpConfig::default(),
        }
    }
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}
fn default_timespan() -> u32 {
    DEFAULT_TIMESPAN_DAYS
}
fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}
fn default_http_timeout() -> Duration {
    Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS)
}
fn default_http_retries() -> u32 {
    DEFAULT_HTTP_RETRIES
}
fn default_http_backoff() -> Duration {
    Duration::from_secs(DEFAULT_HTTP_BACKOFF_SECONDS)
}
fn default_http_max_backoff() -> Duration {
    Duration::from_secs(DEFAULT_HTTP_MAX_BACKOFF_SECONDS)
}
fn default_retry_statuses() -> Vec<u16> {
    DEFAULT_RETRY_STATUSES.to_vec()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_http_timeout(),
            retries: default_http_retries(),
            backoff: default_http_backoff(),
            max_backoff: default_http_max_backoff(),
            retry_statuses: default_retry_statuses(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> AppResult<Self> {
        let path = config_file.as_ref();
        if !path.exists() {
            return Err(AppError::configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path)?;
        let is_xml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

        let config = if is_xml {
            Self::from_xml_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
        .map_err(|e| match e {
            AppError::Configuration { message } => {
                AppError::configuration(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;

        info!(
            "Loaded configuration from {} ({} channels)",
            path.display(),
            config.channels.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::configuration(e.to_string()))
    }

    pub fn from_xml_str(contents: &str) -> AppResult<Self> {
        quick_xml::de::from_str(contents).map_err(|e| AppError::configuration(e.to_string()))
    }

    /// Check the configuration for values the grabber cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.filename.as_os_str().is_empty() {
            return Err(AppError::configuration("filename must not be empty"));
        }
        if self.pool_size == 0 {
            return Err(AppError::configuration("pool_size must be at least 1"));
        }
        if self.timespan == 0 {
            return Err(AppError::configuration("timespan must be at least 1 day"));
        }
        parse_timezone(&self.timezone)?;
        if let Some(proxy) = non_empty(&self.proxy) {
            validate_proxy(proxy)?;
        }

        for (site, overrides) in &self.sites {
            if let Some(timezone) = &overrides.timezone {
                parse_timezone(timezone)
                    .map_err(|e| AppError::configuration(format!("sites.{site}: {e}")))?;
            }
            if let Some(proxy) = non_empty(&overrides.proxy) {
                validate_proxy(proxy)
                    .map_err(|e| AppError::configuration(format!("sites.{site}: {e}")))?;
            }
        }

        let mut seen = HashSet::new();
        for (index, channel) in self.channels.iter().enumerate() {
            if channel.site.trim().is_empty() {
                return Err(AppError::configuration(format!(
                    "channel #{} has an empty site",
                    index + 1
                )));
            }
            if channel.site_id.trim().is_empty() {
                return Err(AppError::configuration(format!(
                    "channel #{} ({}) has an empty site_id",
                    index + 1,
                    channel.site
                )));
            }
            if !seen.insert((channel.site.as_str(), channel.site_id.as_str())) {
                warn!(
                    "Channel '{}' on site '{}' is configured more than once; its programs will be merged",
                    channel.site_id, channel.site
                );
            }
        }

        if self.channels.is_empty() {
            warn!("No channels configured, the guide will be empty");
        }

        Ok(())
    }

    /// One fetch job per configured channel, in configuration order
    pub fn fetch_jobs(&self) -> Vec<FetchJob> {
        self.channels
            .iter()
            .map(|c| {
                FetchJob::new(
                    c.site.trim(),
                    c.site_id.trim(),
                    c.xmltv_id.trim(),
                    c.name.trim(),
                )
            })
            .collect()
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            workers: self.pool_size,
            timespan_days: self.timespan,
        }
    }

    /// Resolve global settings and the site's overrides into adapter options
    pub fn site_options(&self, site: &str) -> AppResult<SiteOptions> {
        let overrides = self.sites.get(site).cloned().unwrap_or_default();
        let timezone = overrides.timezone.as_deref().unwrap_or(&self.timezone);

        Ok(SiteOptions {
            site: site.to_string(),
            proxy: non_empty(&overrides.proxy)
                .or_else(|| non_empty(&self.proxy))
                .map(str::to_string),
            user_agent: non_empty(&overrides.user_agent)
                .or_else(|| non_empty(&self.user_agent))
                .unwrap_or(DEFAULT_USER_AGENT)
                .to_string(),
            timezone: parse_timezone(timezone)?,
            http: self.http.clone(),
        })
    }
}

pub fn parse_timezone(timezone: &str) -> AppResult<chrono_tz::Tz> {
    timezone
        .parse::<chrono_tz::Tz>()
        .map_err(|e| AppError::configuration(format!("Invalid timezone '{timezone}': {e}")))
}

/// Empty elements in XML configurations mean "unset"
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate_proxy(proxy: &str) -> AppResult<()> {
    url::Url::parse(proxy)
        .map(|_| ())
        .map_err(|e| AppError::configuration(format!("Invalid proxy URL '{proxy}': {e}")))
}
