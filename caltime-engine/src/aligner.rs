use chrono::NaiveDate;

use crate::aggregator::BucketMap;
use crate::bucket::{BucketRange, Granularity};

/// One calendar's buckets, in the order the calendar was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarBuckets {
    pub calendar_id: String,
    pub buckets: BucketMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSeries {
    pub calendar_id: String,
    pub durations: Vec<u64>,
}

/// A shared date axis with one index-aligned duration series per calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedGrid {
    pub dates: Vec<NaiveDate>,
    pub series: Vec<AlignedSeries>,
}

/// Lays every calendar's buckets out on one gap-free axis running from the
/// earliest to the latest bucket any calendar has, filling holes with zero.
#[must_use]
pub fn align(calendars: &[CalendarBuckets], granularity: Granularity) -> AlignedGrid {
    let mut keys = calendars.iter().flat_map(|calendar| calendar.buckets.keys());

    let dates: Vec<NaiveDate> = match keys.next() {
        None => Vec::new(),
        Some(&first) => {
            let (min, max) = keys.fold((first, first), |(min, max), &date| {
                (min.min(date), max.max(date))
            });
            BucketRange::new(min, max, granularity).collect()
        }
    };

    let series = calendars
        .iter()
        .map(|calendar| AlignedSeries {
            calendar_id: calendar.calendar_id.clone(),
            durations: dates
                .iter()
                .map(|date| calendar.buckets.get(date).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    AlignedGrid { dates, series }
}
