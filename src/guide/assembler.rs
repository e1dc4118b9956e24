use chrono::{DateTime, FixedOffset, Local, Timelike};

use super::merger::MergedGuide;
use crate::models::GuideDocument;

/// Wraps a merged guide into the output document
pub struct GuideAssembler;

impl GuideAssembler {
    /// Stamp the guide with the current local time
    pub fn assemble(merged: MergedGuide) -> GuideDocument {
        Self::assemble_at(merged, Local::now().fixed_offset())
    }

    /// Stamp the guide with `now`, truncated to whole seconds
    pub fn assemble_at(merged: MergedGuide, now: DateTime<FixedOffset>) -> GuideDocument {
        let generated_at = now.with_nanosecond(0).unwrap_or(now);
        GuideDocument::new(merged.channels, merged.programs, generated_at)
    }
}
