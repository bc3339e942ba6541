use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The bucketing unit of an aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase", from = "String")
)]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Parses a selector. Anything other than `week` or `month` means `day`.
    #[must_use]
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::Day,
        }
    }

    /// First calendar day of the bucket containing `date`.
    #[must_use]
    pub fn bucket_start(self, date: NaiveDate, week_start: WeekStart) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => week_start.first_day_of_week(date),
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Start of the bucket following the one starting at `bucket`.
    #[must_use]
    pub fn next_bucket(self, bucket: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => bucket.succ_opt(),
            Self::Week => bucket.checked_add_signed(Duration::days(7)),
            Self::Month => bucket.checked_add_months(Months::new(1)),
        }
    }

    /// Chart label for the bucket starting at `bucket`.
    #[must_use]
    pub fn label(self, bucket: NaiveDate) -> String {
        match self {
            Self::Day | Self::Week => bucket.format("%Y-%m-%d").to_string(),
            Self::Month => bucket.format("%Y-%m").to_string(),
        }
    }
}

impl From<&str> for Granularity {
    fn from(selector: &str) -> Self {
        Self::parse(selector)
    }
}

impl From<String> for Granularity {
    fn from(selector: String) -> Self {
        Self::parse(&selector)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        })
    }
}

/// Day a week bucket begins on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    #[must_use]
    pub const fn weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }

    #[must_use]
    pub fn first_day_of_week(self, date: NaiveDate) -> NaiveDate {
        let offset = (7 + date.weekday().num_days_from_monday()
            - self.weekday().num_days_from_monday())
            % 7;
        date - Duration::days(i64::from(offset))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown week start `{0}`, expected `monday` or `sunday`")]
pub struct ParseWeekStartError(String);

impl FromStr for WeekStart {
    type Err = ParseWeekStartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Self::Monday),
            "sun" | "sunday" => Ok(Self::Sunday),
            _ => Err(ParseWeekStartError(s.to_string())),
        }
    }
}

/// Every bucket start from `first` through `last`, inclusive.
#[derive(Debug, Clone)]
pub struct BucketRange {
    next: Option<NaiveDate>,
    last: NaiveDate,
    granularity: Granularity,
}

impl BucketRange {
    #[must_use]
    pub const fn new(first: NaiveDate, last: NaiveDate, granularity: Granularity) -> Self {
        Self {
            next: Some(first),
            last,
            granularity,
        }
    }
}

impl Iterator for BucketRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|date| *date <= self.last)?;
        let following = self.granularity.next_bucket(current);
        mem::replace(&mut self.next, following)
    }
}

impl FusedIterator for BucketRange {}
