use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced to the caller. Problems with individual events are never
/// errors; they are skipped and counted instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to list calendars: {source}")]
    Calendars {
        #[source]
        source: BoxError,
    },

    #[error("failed to fetch events for calendar `{calendar}`: {source}")]
    Fetch {
        calendar: String,
        #[source]
        source: BoxError,
    },

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
