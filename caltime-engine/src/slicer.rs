use std::iter::FusedIterator;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::structs::{truncate_to_second, DaySlice};

/// Splits `[start, end)` into one slice per calendar day it touches, from the
/// start date through the end date inclusive.
///
/// The start is truncated to a whole second and the span keeps the whole
/// seconds of `end - start`, so the slice durations add up to exactly
/// `max(0, floor(end - start))`. Day boundaries are exclusive midnights; an
/// event ending at midnight gets a zero-length slice on its end date. A span
/// that is empty or runs backwards yields a single zero-length slice on the
/// start day.
#[must_use]
pub fn slice(start: NaiveDateTime, end: NaiveDateTime) -> DaySlices {
    let cursor = truncate_to_second(start);
    let elapsed = TimeDelta::seconds((end - start).num_seconds());

    DaySlices {
        cursor,
        end: cursor.checked_add_signed(elapsed).unwrap_or(end),
        done: false,
    }
}

/// Lazy sequence of [`DaySlice`]s for one event. Clone it to restart.
#[derive(Debug, Clone)]
pub struct DaySlices {
    cursor: NaiveDateTime,
    end: NaiveDateTime,
    done: bool,
}

impl Iterator for DaySlices {
    type Item = DaySlice;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let day = self.cursor.date();
        let next_midnight = day.succ_opt().map(|next| next.and_time(NaiveTime::MIN));

        let slice_end = match next_midnight {
            Some(midnight) if midnight <= self.end => midnight,
            _ => {
                self.done = true;
                self.end.max(self.cursor)
            }
        };

        let slice = DaySlice::new(day, self.cursor, slice_end);
        self.cursor = slice_end;
        Some(slice)
    }
}

impl FusedIterator for DaySlices {}
