use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use caltime_engine::{Calendar, CalendarInfo, DateRange, EventSource, EventSpan, RawEvent};
use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("calendar `{0}` is not part of the export")]
    UnknownCalendar(String),
}

#[derive(Deserialize)]
struct Export {
    calendars: Vec<Calendar>,
}

/// Calendars read from a JSON export of the provider's calendar list and
/// event listings.
#[derive(Debug)]
pub struct FileSource {
    calendars: Vec<Calendar>,
}

impl FileSource {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read calendar export {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to parse calendar export {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let export: Export = serde_json::from_str(raw)?;
        Ok(Self {
            calendars: export.calendars,
        })
    }

    pub fn calendar_ids(&self) -> Vec<String> {
        self.calendars
            .iter()
            .map(|calendar| calendar.id.clone())
            .collect()
    }
}

impl EventSource for FileSource {
    type Error = SourceError;

    fn list_calendars(&self) -> Result<Vec<CalendarInfo>, Self::Error> {
        Ok(self
            .calendars
            .iter()
            .map(|calendar| CalendarInfo {
                id: calendar.id.clone(),
                summary: calendar.name.clone(),
            })
            .collect())
    }

    fn fetch_events(
        &self,
        calendar_id: &str,
        range: &DateRange,
    ) -> Result<Vec<RawEvent>, Self::Error> {
        let calendar = self
            .calendars
            .iter()
            .find(|calendar| calendar.id == calendar_id)
            .ok_or_else(|| SourceError::UnknownCalendar(calendar_id.to_string()))?;

        Ok(calendar
            .events
            .iter()
            .filter(|event| overlaps(event, range))
            .cloned()
            .collect())
    }
}

/// Whether a timed event intersects the range. Everything else is passed on
/// so the engine can account for it.
fn overlaps(event: &RawEvent, range: &DateRange) -> bool {
    let EventSpan::Timed { start, end } = event.span() else {
        return true;
    };

    let from = range.start().and_time(NaiveTime::MIN);
    let until = range.end().succ_opt().map(|day| day.and_time(NaiveTime::MIN));

    end > from && until.map_or(true, |until| start < until)
}
