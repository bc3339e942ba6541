use std::collections::HashMap;

use caltime_engine::{
    Calendar, CalendarInfo, DateRange, Engine, Error, EventSource, EventTime, Granularity,
    RawEvent, Request,
};
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("calendar `{0}` is unavailable")]
struct Unavailable(String);

#[derive(Default)]
struct MemorySource {
    calendars: Vec<CalendarInfo>,
    events: HashMap<String, Vec<RawEvent>>,
}

impl MemorySource {
    fn with(mut self, id: &str, summary: Option<&str>, events: Vec<RawEvent>) -> Self {
        self.calendars.push(CalendarInfo {
            id: id.into(),
            summary: summary.map(Into::into),
        });
        self.events.insert(id.into(), events);
        self
    }
}

impl EventSource for MemorySource {
    type Error = Unavailable;

    fn list_calendars(&self) -> Result<Vec<CalendarInfo>, Self::Error> {
        Ok(self.calendars.clone())
    }

    fn fetch_events(&self, calendar_id: &str, _: &DateRange) -> Result<Vec<RawEvent>, Self::Error> {
        self.events
            .get(calendar_id)
            .cloned()
            .ok_or_else(|| Unavailable(calendar_id.into()))
    }
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn request(calendars: &[&str], granularity: &str) -> Request {
    Request {
        calendars: calendars.iter().map(|c| c.to_string()).collect(),
        range: DateRange::new(day("2024-01-01"), day("2024-12-31")).unwrap(),
        granularity: Granularity::parse(granularity),
        debug: false,
    }
}

fn source() -> MemorySource {
    MemorySource::default()
        .with(
            "work@example.com",
            Some("Work"),
            vec![RawEvent::timed("deploy", at("2024-03-01T22:00"), at("2024-03-02T02:00"))],
        )
        .with(
            "abc123xyz@group.calendar.google.com",
            None,
            vec![
                RawEvent::timed("run", at("2024-03-04T07:00"), at("2024-03-04T08:00")),
                RawEvent::all_day("trip", day("2024-03-05"), day("2024-03-07")),
                RawEvent {
                    title: None,
                    start: Some(EventTime::parse_date_time("2024-03-04T09:00:00")),
                    end: None,
                },
            ],
        )
}

#[test]
fn daily_chart_is_aligned_and_zero_filled() {
    let analysis = Engine::default()
        .analyze(
            &source(),
            &request(&["work@example.com", "abc123xyz@group.calendar.google.com"], "day"),
        )
        .unwrap();
    let chart = analysis.chart;

    assert_eq!(
        chart.labels,
        vec!["2024-03-01", "2024-03-02", "2024-03-03", "2024-03-04"]
    );

    assert_eq!(chart.datasets[0].label, "Work");
    assert_eq!(chart.datasets[0].data, vec![7200, 7200, 0, 0]);

    assert_eq!(chart.datasets[1].label, "Calendar abc123");
    assert_eq!(chart.datasets[1].data, vec![0, 0, 0, 3600]);

    assert_eq!(analysis.skipped_events, 1);
    assert!(analysis.raw_events.is_none());
}

#[test]
fn unknown_granularity_behaves_like_day() {
    let engine = Engine::default();
    let ids = ["work@example.com", "abc123xyz@group.calendar.google.com"];

    let quarter = engine.analyze(&source(), &request(&ids, "quarter")).unwrap();
    let daily = engine.analyze(&source(), &request(&ids, "day")).unwrap();

    assert_eq!(quarter, daily);
}

#[test]
fn weekly_chart_groups_by_monday() {
    let analysis = Engine::default()
        .analyze(
            &source(),
            &request(&["work@example.com", "abc123xyz@group.calendar.google.com"], "week"),
        )
        .unwrap();
    let chart = analysis.chart;

    // 2024-03-01 is a Friday, 2024-03-04 the following Monday.
    assert_eq!(chart.labels, vec!["2024-02-26", "2024-03-04"]);
    assert_eq!(chart.datasets[0].data, vec![14_400, 0]);
    assert_eq!(chart.datasets[1].data, vec![0, 3600]);
}

#[test]
fn monthly_labels_drop_the_day() {
    let chart = Engine::default()
        .analyze(&source(), &request(&["work@example.com"], "month"))
        .unwrap()
        .chart;

    assert_eq!(chart.labels, vec!["2024-03"]);
    assert_eq!(chart.datasets[0].data, vec![14_400]);
}

#[test]
fn no_selected_calendars_is_not_an_error() {
    let analysis = Engine::default().analyze(&source(), &request(&[], "week")).unwrap();

    assert!(analysis.chart.labels.is_empty());
    assert!(analysis.chart.datasets.is_empty());
}

#[test]
fn fetch_failures_name_the_calendar() {
    let err = Engine::default()
        .analyze(&source(), &request(&["missing"], "day"))
        .unwrap_err();

    match err {
        Error::Fetch { calendar, .. } => assert_eq!(calendar, "missing"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn debug_mode_serializes_alongside_the_chart() {
    let mut req = request(&["work@example.com"], "day");
    req.debug = true;

    let analysis = Engine::default().analyze(&source(), &req).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["labels"][0], "2024-03-01");
    assert_eq!(json["datasets"][0]["borderColor"], "#71b199");
    assert_eq!(json["skipped_events"], 0);

    let raw = &json["raw_events"][0];
    assert_eq!(raw["label"], "Work");
    assert_eq!(raw["events"][0]["title"], "deploy");
    assert_eq!(raw["events"][0]["duration"], 14_400);
    assert_eq!(raw["events"][0]["start"]["dateTime"], "2024-03-01T22:00:00+00:00");
    assert_eq!(raw["events"][0]["slices"].as_array().unwrap().len(), 2);
}

#[test]
fn offset_changes_count_elapsed_time() {
    let calendar: Calendar = serde_json::from_str(
        r#"{
            "id": "night@example.com",
            "summary": "Night",
            "events": [
                {
                    "summary": "spring forward",
                    "start": { "dateTime": "2024-03-31T01:30:00+01:00" },
                    "end": { "dateTime": "2024-03-31T03:30:00+02:00" }
                }
            ]
        }"#,
    )
    .unwrap();

    let chart = Engine::default().chart(&[calendar], Granularity::Day);

    assert_eq!(chart.labels, vec!["2024-03-31"]);
    assert_eq!(chart.datasets[0].data, vec![3600]);
}
