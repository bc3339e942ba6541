use std::collections::HashMap;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::bucket::{Granularity, WeekStart};
use crate::slicer::slice;
use crate::structs::{EventSpan, ProcessedEvent, RawEvent};

/// Accumulated seconds keyed by bucket start date.
pub type BucketMap = HashMap<NaiveDate, u64>;

/// Result of aggregating one calendar's events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub buckets: BucketMap,
    /// Malformed events that were left out.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregator {
    granularity: Granularity,
    week_start: WeekStart,
}

impl Aggregator {
    #[must_use]
    pub const fn new(granularity: Granularity, week_start: WeekStart) -> Self {
        Self {
            granularity,
            week_start,
        }
    }

    /// Sums the time spent in `events` per bucket.
    ///
    /// All-day events are excluded, malformed ones are skipped with a warning.
    /// Zero-length slices never create a bucket.
    #[must_use]
    pub fn aggregate(&self, events: &[RawEvent]) -> Aggregation {
        let mut aggregation = Aggregation::default();

        for event in events {
            let (start, end) = match event.span() {
                EventSpan::Timed { start, end } => (start, end),
                EventSpan::AllDay => {
                    debug!("Ignoring all-day event {:?}", event.title());
                    continue;
                }
                EventSpan::Malformed(defect) => {
                    warn!("Skipping event {:?}: {defect}", event.title());
                    aggregation.skipped += 1;
                    continue;
                }
            };

            for day_slice in slice(start, end).filter(|s| s.duration > 0) {
                let bucket = self.granularity.bucket_start(day_slice.day, self.week_start);
                *aggregation.buckets.entry(bucket).or_default() += day_slice.duration;
            }
        }

        aggregation
    }
}

/// Describes each event with its total duration and day slices, for inspection.
#[must_use]
pub fn process(events: &[RawEvent]) -> Vec<ProcessedEvent> {
    events
        .iter()
        .map(|event| {
            let slices = match event.span() {
                EventSpan::Timed { start, end } => slice(start, end).collect(),
                EventSpan::AllDay | EventSpan::Malformed(_) => Vec::new(),
            };

            ProcessedEvent {
                title: event.title().to_string(),
                start: event.start.clone(),
                end: event.end.clone(),
                duration: slices.iter().map(|s| s.duration).sum(),
                slices,
            }
        })
        .collect()
}
