use crate::ingestor::ChannelAggregator;
use crate::models::{Channel, Program};
use crate::utils::time::end_of_day;

/// Channels and programs in final guide order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedGuide {
    /// Sorted by channel id
    pub channels: Vec<Channel>,
    /// Grouped by channel in channel order, sorted by start within a channel,
    /// every program stitched
    pub programs: Vec<Program>,
}

pub struct ProgramMerger;

impl ProgramMerger {
    pub fn merge(aggregator: ChannelAggregator) -> MergedGuide {
        let mut entries = aggregator.into_entries();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut channels = Vec::with_capacity(entries.len());
        let mut programs = Vec::new();

        for (key, mut channel_programs) in entries {
            // Stable, so programs starting at the same instant keep arrival order
            channel_programs.sort_by_key(|p| p.start);
            for program in &mut channel_programs {
                program.channel.clone_from(&key.id);
            }
            programs.extend(channel_programs);
            channels.push(key.channel);
        }

        stitch(&mut programs);
        MergedGuide { channels, programs }
    }
}

/// Set every program's stop time
///
/// A program followed by one on the same channel stops when the next one
/// starts. The last program of a channel stops at 23:59:59 on its start day.
pub fn stitch(programs: &mut [Program]) {
    for i in 0..programs.len() {
        let stop = match programs.get(i + 1) {
            Some(next) if next.channel == programs[i].channel => next.start,
            _ => end_of_day(&programs[i].start),
        };
        programs[i].stop = Some(stop);
    }
}
