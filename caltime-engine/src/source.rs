use crate::structs::{CalendarInfo, DateRange, RawEvent};

/// Where calendars and their events come from.
///
/// Implementations own pagination, retries and authentication. They are
/// expected to hand back the complete, recurrence-expanded event list for the
/// requested range.
pub trait EventSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_calendars(&self) -> Result<Vec<CalendarInfo>, Self::Error>;

    fn fetch_events(
        &self,
        calendar_id: &str,
        range: &DateRange,
    ) -> Result<Vec<RawEvent>, Self::Error>;
}
