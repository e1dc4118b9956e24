//! Plain data records shared between adapters and the orchestration core
//!
//! Everything here is owned, serializable data. Adapters convert whatever
//! they parse into these records before returning, so nothing tied to a
//! parser or a network session ever crosses a task boundary.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod channel_key;

pub use channel_key::ChannelKey;

/// Name written into the `generator-info-name` attribute of every guide
pub const GENERATOR_NAME: &str = "epg-grabber";

/// A piece of text with an optional language tag (`lang` in XMLTV)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub value: String,
    pub lang: Option<String>,
}

impl LocalizedText {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            lang: None,
        }
    }

    pub fn with_lang<S: Into<String>, L: Into<String>>(value: S, lang: L) -> Self {
        Self {
            value: value.into(),
            lang: Some(lang.into()),
        }
    }
}

/// A channel as identified by a site adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Stable cross-run identifier, also the merge and sort key
    pub id: String,
    pub display_names: Vec<LocalizedText>,
    pub icon: Option<String>,
}

impl Channel {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            display_names: Vec::new(),
            icon: None,
        }
    }

    pub fn with_display_name<S: Into<String>>(mut self, name: S) -> Self {
        self.display_names.push(LocalizedText::new(name));
        self
    }

    pub fn with_icon<S: Into<String>>(mut self, icon: S) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Cast and crew of a program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub directors: Vec<String>,
    pub actors: Vec<String>,
}

impl Credits {
    pub fn is_empty(&self) -> bool {
        self.directors.is_empty() && self.actors.is_empty()
    }
}

/// Episode number in a named numbering system (`onscreen`, `xmltv_ns`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeNum {
    pub system: String,
    pub value: String,
}

impl EpisodeNum {
    pub fn new<S: Into<String>, V: Into<String>>(system: S, value: V) -> Self {
        Self {
            system: system.into(),
            value: value.into(),
        }
    }
}

/// A single scheduled program on one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Id of the channel this program airs on
    pub channel: String,
    pub start: DateTime<FixedOffset>,
    /// Unset until the merger stitches programs together
    pub stop: Option<DateTime<FixedOffset>>,
    pub titles: Vec<LocalizedText>,
    pub sub_titles: Vec<LocalizedText>,
    pub descriptions: Vec<LocalizedText>,
    pub credits: Option<Credits>,
    /// Production date, usually just the year
    pub date: Option<String>,
    pub episode_nums: Vec<EpisodeNum>,
    pub icons: Vec<String>,
}

impl Program {
    pub fn new<C: Into<String>>(channel: C, title: LocalizedText, start: DateTime<FixedOffset>) -> Self {
        Self {
            channel: channel.into(),
            start,
            stop: None,
            titles: vec![title],
            sub_titles: Vec::new(),
            descriptions: Vec::new(),
            credits: None,
            date: None,
            episode_nums: Vec::new(),
            icons: Vec::new(),
        }
    }

    /// The first title, which adapters use for the primary-language title
    pub fn primary_title(&self) -> Option<&str> {
        self.titles.first().map(|t| t.value.as_str())
    }
}

/// One configured channel to fetch
///
/// Built once per configuration entry and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchJob {
    /// Site identifier used to resolve the adapter
    pub site: String,
    /// Channel identifier as known by the site
    pub site_id: String,
    /// Identifier the channel is expected to have in the guide
    pub xmltv_id: String,
    pub display_name: String,
}

impl FetchJob {
    pub fn new<S, I, X, N>(site: S, site_id: I, xmltv_id: X, display_name: N) -> Self
    where
        S: Into<String>,
        I: Into<String>,
        X: Into<String>,
        N: Into<String>,
    {
        Self {
            site: site.into(),
            site_id: site_id.into(),
            xmltv_id: xmltv_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// The final, ordered guide handed to the output writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideDocument {
    pub channels: Vec<Channel>,
    pub programs: Vec<Program>,
    /// Generation time, second precision
    pub generated_at: DateTime<FixedOffset>,
    pub generator_name: String,
}

impl GuideDocument {
    pub fn new(channels: Vec<Channel>, programs: Vec<Program>, generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            channels,
            programs,
            generated_at,
            generator_name: GENERATOR_NAME.to_string(),
        }
    }
}
