//! Aggregates time spent in calendar events into day, week or month buckets
//! and lays several calendars out as date-aligned chart series.

mod aggregator;
mod aligner;
mod bucket;
mod chart;
mod engine;
mod error;
mod palette;
mod slicer;
mod source;
mod structs;

pub use aggregator::{process, Aggregation, Aggregator, BucketMap};
pub use aligner::{align, AlignedGrid, AlignedSeries, CalendarBuckets};
pub use bucket::{BucketRange, Granularity, ParseWeekStartError, WeekStart};
pub use chart::{format, ChartPayload, ChartSeries};
pub use engine::{Analysis, CalendarEvents, Config, Engine, Request};
pub use error::{Error, Result};
pub use palette::{fnv1a, ColorRule, Palette, FALLBACK_COLOR};
pub use slicer::{slice, DaySlices};
pub use source::EventSource;
pub use structs::{
    Calendar, CalendarInfo, DateRange, DaySlice, EventDefect, EventSpan, EventTime,
    ProcessedEvent, RawEvent, UNTITLED,
};
