use std::collections::HashMap;

use crate::models::{ChannelKey, Program};

/// Collects per-job results keyed by channel
///
/// Results for a channel id that is already present are appended, so the
/// same channel configured twice (or delivered by two sites) ends up as one
/// entry. The first inserted channel payload is kept.
#[derive(Debug, Default)]
pub struct ChannelAggregator {
    entries: HashMap<ChannelKey, Vec<Program>>,
}

impl ChannelAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ChannelKey, programs: Vec<Program>) {
        self.entries.entry(key).or_default().extend(programs);
    }

    /// Number of distinct channels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn program_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Entries in no particular order
    pub fn into_entries(self) -> Vec<(ChannelKey, Vec<Program>)> {
        self.entries.into_iter().collect()
    }
}
