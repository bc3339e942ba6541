use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Title used for events that arrive without one.
pub const UNTITLED: &str = "(No title)";

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calendar {
    pub id: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "summary", skip_serializing_if = "Option::is_none")
    )]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub events: Vec<RawEvent>,
}

impl Calendar {
    /// Label shown for this calendar's series, falling back to its identifier.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }
}

/// One boundary of an event as delivered by the calendar provider.
///
/// Timed boundaries keep the offset they were given in. Timestamps without an
/// offset are read as UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "EventTimeRepr", into = "EventTimeRepr")
)]
pub enum EventTime {
    Timed(DateTime<FixedOffset>),
    AllDay(NaiveDate),
    Invalid(String),
}

impl EventTime {
    /// Parses an RFC 3339 timestamp or a naive `YYYY-MM-DDTHH:MM:SS` one.
    #[must_use]
    pub fn parse_date_time(raw: &str) -> Self {
        let raw = raw.trim();

        if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
            return Self::Timed(date_time);
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
            .map_or_else(
                |_| Self::Invalid(raw.to_string()),
                |naive| Self::Timed(naive.and_utc().fixed_offset()),
            )
    }

    #[must_use]
    pub fn parse_date(raw: &str) -> Self {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_or_else(|_| Self::Invalid(raw.to_string()), Self::AllDay)
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTimeRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[cfg(feature = "serde")]
impl From<EventTimeRepr> for EventTime {
    fn from(repr: EventTimeRepr) -> Self {
        match (repr.date_time, repr.date) {
            (Some(date_time), _) => Self::parse_date_time(&date_time),
            (None, Some(date)) => Self::parse_date(&date),
            (None, None) => Self::Invalid(String::new()),
        }
    }
}

#[cfg(feature = "serde")]
impl From<EventTime> for EventTimeRepr {
    fn from(time: EventTime) -> Self {
        match time {
            EventTime::Timed(date_time) => Self {
                date_time: Some(date_time.format(DATE_TIME_FORMAT).to_string()),
                date: None,
            },
            EventTime::AllDay(date) => Self {
                date_time: None,
                date: Some(date.format(DATE_FORMAT).to_string()),
            },
            EventTime::Invalid(raw) => Self {
                date_time: Some(raw),
                date: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawEvent {
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "summary", skip_serializing_if = "Option::is_none")
    )]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: Option<EventTime>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end: Option<EventTime>,
}

/// Why an event could not be turned into a timed span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventDefect {
    #[error("missing start")]
    MissingStart,
    #[error("missing end")]
    MissingEnd,
    #[error("unparseable timestamp")]
    Unparseable,
    #[error("timed start with an all-day end")]
    MixedBoundaries,
    #[error("end before start")]
    EndBeforeStart,
}

/// How an event participates in aggregation.
///
/// A timed span is expressed in the local time of its start: the end is moved
/// into the start's offset, so `end - start` is the elapsed time even when the
/// two boundaries were recorded on either side of a DST change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSpan {
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    AllDay,
    Malformed(EventDefect),
}

impl RawEvent {
    /// A timed event between two UTC wall-clock instants.
    #[must_use]
    pub fn timed<S: Into<String>>(title: S, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::timed_at(title, start.and_utc().fixed_offset(), end.and_utc().fixed_offset())
    }

    #[must_use]
    pub fn timed_at<S: Into<String>>(
        title: S,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            start: Some(EventTime::Timed(start)),
            end: Some(EventTime::Timed(end)),
        }
    }

    #[must_use]
    pub fn all_day<S: Into<String>>(title: S, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            title: Some(title.into()),
            start: Some(EventTime::AllDay(start)),
            end: Some(EventTime::AllDay(end)),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED)
    }

    /// Classifies the event. Whether it is all-day is decided by its start.
    #[must_use]
    pub fn span(&self) -> EventSpan {
        let start = match &self.start {
            None => return EventSpan::Malformed(EventDefect::MissingStart),
            Some(EventTime::Invalid(_)) => return EventSpan::Malformed(EventDefect::Unparseable),
            Some(EventTime::AllDay(_)) => return EventSpan::AllDay,
            Some(EventTime::Timed(start)) => *start,
        };

        let end = match &self.end {
            None => return EventSpan::Malformed(EventDefect::MissingEnd),
            Some(EventTime::Invalid(_)) => return EventSpan::Malformed(EventDefect::Unparseable),
            Some(EventTime::AllDay(_)) => {
                return EventSpan::Malformed(EventDefect::MixedBoundaries)
            }
            Some(EventTime::Timed(end)) => *end,
        };

        if end < start {
            return EventSpan::Malformed(EventDefect::EndBeforeStart);
        }

        EventSpan::Timed {
            start: start.naive_local(),
            end: end.with_timezone(start.offset()).naive_local(),
        }
    }
}

/// The part of one event falling on a single calendar day, as `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DaySlice {
    pub day: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration: u64,
}

impl DaySlice {
    pub(crate) fn new(day: NaiveDate, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let duration = u64::try_from((end - start).num_seconds()).unwrap_or(0);
        Self {
            day,
            start,
            end,
            duration,
        }
    }
}

/// An event as it looked before aggregation, kept for inspection output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessedEvent {
    pub title: String,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub duration: u64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub slices: Vec<DaySlice>,
}

/// Calendar metadata returned by the provider's calendar listing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalendarInfo {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub summary: Option<String>,
}

impl CalendarInfo {
    /// Human readable name: the summary when present, otherwise something
    /// derived from the identifier.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(summary) = self.summary.as_deref().filter(|s| !s.is_empty()) {
            return summary.to_string();
        }

        match self.id.split_once('@') {
            Some((_, "group.calendar.google.com")) => {
                format!("Calendar {}", self.id.chars().take(6).collect::<String>())
            }
            Some((local, _)) => local.to_string(),
            None => self.id.clone(),
        }
    }
}

/// Inclusive range of dates an analysis covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if start > end {
            return Err(crate::Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Pulls an end date beyond `latest` back to `latest`.
    pub fn clamp_end(self, latest: NaiveDate) -> crate::Result<Self> {
        Self::new(self.start, self.end.min(latest))
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

pub(crate) fn truncate_to_second(instant: NaiveDateTime) -> NaiveDateTime {
    instant.with_nanosecond(0).unwrap_or(instant)
}
