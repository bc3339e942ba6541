use std::collections::HashMap;

use log::{debug, info};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::aggregator::{process, Aggregator};
use crate::aligner::{align, CalendarBuckets};
use crate::bucket::{Granularity, WeekStart};
use crate::chart::{format, ChartPayload};
use crate::palette::Palette;
use crate::source::EventSource;
use crate::structs::{Calendar, DateRange, ProcessedEvent};
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub week_start: WeekStart,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Calendar identifiers, in the order their series should appear.
    pub calendars: Vec<String>,
    pub range: DateRange,
    pub granularity: Granularity,
    /// Attach the per-event breakdown to the result.
    pub debug: bool,
}

/// Events of one calendar before aggregation, for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CalendarEvents {
    pub calendar: String,
    pub label: String,
    pub events: Vec<ProcessedEvent>,
}

/// A chart payload plus what it took to build it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Analysis {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub chart: ChartPayload,
    /// Malformed events dropped across all calendars.
    pub skipped_events: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub raw_events: Option<Vec<CalendarEvents>>,
}

/// Runs the slicing, aggregation, alignment and formatting pipeline.
///
/// Holds only immutable configuration; every call works on its own inputs.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the chart for already fetched calendars.
    #[must_use]
    pub fn chart(&self, calendars: &[Calendar], granularity: Granularity) -> ChartPayload {
        self.report(calendars, granularity, false).chart
    }

    /// Builds the chart and, with `debug`, the per-event breakdown.
    #[must_use]
    pub fn report(&self, calendars: &[Calendar], granularity: Granularity, debug: bool) -> Analysis {
        let aggregator = Aggregator::new(granularity, self.config.week_start);

        let mut skipped_events = 0;
        let mut buckets = Vec::with_capacity(calendars.len());
        for calendar in calendars {
            let aggregation = aggregator.aggregate(&calendar.events);
            debug!(
                "Calendar {:?}: {} events, {} buckets, {} skipped",
                calendar.id,
                calendar.events.len(),
                aggregation.buckets.len(),
                aggregation.skipped
            );

            skipped_events += aggregation.skipped;
            buckets.push(CalendarBuckets {
                calendar_id: calendar.id.clone(),
                buckets: aggregation.buckets,
            });
        }

        let names: HashMap<String, String> = calendars
            .iter()
            .map(|calendar| (calendar.id.clone(), calendar.label().to_string()))
            .collect();

        let grid = align(&buckets, granularity);
        let chart = format(grid, &names, granularity, &self.config.palette);

        let raw_events = debug.then(|| {
            calendars
                .iter()
                .map(|calendar| CalendarEvents {
                    calendar: calendar.id.clone(),
                    label: calendar.label().to_string(),
                    events: process(&calendar.events),
                })
                .collect()
        });

        Analysis {
            chart,
            skipped_events,
            raw_events,
        }
    }

    /// Fetches the requested calendars from `source` and reports on them.
    ///
    /// Display names come from the source's calendar listing. The first fetch
    /// failure aborts the analysis.
    pub fn analyze<S: EventSource>(&self, source: &S, request: &Request) -> Result<Analysis> {
        let names: HashMap<String, String> = source
            .list_calendars()
            .map_err(|err| Error::Calendars {
                source: Box::new(err),
            })?
            .into_iter()
            .map(|info| {
                let name = info.display_name();
                (info.id, name)
            })
            .collect();

        info!(
            "Analyzing {} calendars from {} to {} by {}",
            request.calendars.len(),
            request.range.start(),
            request.range.end(),
            request.granularity
        );

        let mut calendars = Vec::with_capacity(request.calendars.len());
        for id in &request.calendars {
            let events = source
                .fetch_events(id, &request.range)
                .map_err(|err| Error::Fetch {
                    calendar: id.clone(),
                    source: Box::new(err),
                })?;

            info!("Fetched {} events for calendar {id:?}", events.len());

            calendars.push(Calendar {
                id: id.clone(),
                name: names.get(id).cloned(),
                events,
            });
        }

        Ok(self.report(&calendars, request.granularity, request.debug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;

    use crate::structs::RawEvent;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    fn calendar(id: &str, name: Option<&str>, events: Vec<RawEvent>) -> Calendar {
        Calendar {
            id: id.into(),
            name: name.map(Into::into),
            events,
        }
    }

    #[test]
    fn no_calendars_yields_empty_payload() {
        let analysis = Engine::default().report(&[], Granularity::Week, false);

        assert!(analysis.chart.labels.is_empty());
        assert!(analysis.chart.datasets.is_empty());
        assert_eq!(analysis.skipped_events, 0);
    }

    #[test]
    fn eventless_calendars_keep_empty_series() {
        let payload = Engine::default().chart(
            &[calendar("a", Some("Work"), Vec::new())],
            Granularity::Day,
        );

        assert!(payload.labels.is_empty());
        assert_eq!(payload.datasets.len(), 1);
        assert!(payload.datasets[0].data.is_empty());
    }

    #[test]
    fn week_start_comes_from_config() {
        // 2024-01-07 is a Sunday.
        let events = vec![RawEvent::timed("e", at("2024-01-07T09:00"), at("2024-01-07T10:00"))];
        let calendars = [calendar("a", None, events)];

        let monday = Engine::default().chart(&calendars, Granularity::Week);
        assert_eq!(monday.labels, vec!["2024-01-01"]);

        let sunday = Engine::new(Config {
            week_start: WeekStart::Sunday,
            ..Config::default()
        })
        .chart(&calendars, Granularity::Week);
        assert_eq!(sunday.labels, vec!["2024-01-07"]);
    }

    #[test]
    fn debug_attaches_raw_events_without_touching_the_chart() {
        let events = vec![
            RawEvent::timed("late", at("2024-01-01T22:00"), at("2024-01-02T02:00")),
            RawEvent {
                title: None,
                start: None,
                end: None,
            },
        ];
        let calendars = [calendar("a", Some("Family"), events)];
        let engine = Engine::default();

        let plain = engine.report(&calendars, Granularity::Day, false);
        let debug = engine.report(&calendars, Granularity::Day, true);

        assert_eq!(plain.chart, debug.chart);
        assert!(plain.raw_events.is_none());
        assert_eq!(debug.skipped_events, 1);

        let raw = debug.raw_events.unwrap();
        assert_eq!(raw[0].label, "Family");
        assert_eq!(raw[0].events.len(), 2);
        assert_eq!(raw[0].events[1].title, crate::structs::UNTITLED);
    }
}
