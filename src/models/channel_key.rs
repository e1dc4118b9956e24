//! Channel identity used for merging and ordering

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::Channel;

/// Merge and sort identity of a channel
///
/// Equality, hashing and ordering look at `id` only. The carried `Channel`
/// is payload: two keys for the same id are equal even when their channels
/// were fetched at different times and differ in detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelKey {
    pub id: String,
    pub channel: Channel,
}

impl ChannelKey {
    pub fn new(channel: Channel) -> Self {
        Self {
            id: channel.id.clone(),
            channel,
        }
    }
}

impl PartialEq for ChannelKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ChannelKey {}

impl Hash for ChannelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ChannelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChannelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}
