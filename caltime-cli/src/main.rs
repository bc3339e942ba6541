use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};
use caltime_engine::{Config, DateRange, Engine, Request};
use chrono::Local;
use log::info;

use crate::file_source::FileSource;

mod cli;
mod file_source;

const LOG_ENV: &str = "CALTIME_LOG";
const DEBUG_ENV: &str = "CALTIME_DEBUG";

fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    let source = FileSource::load(&args.input)?;

    let today = Local::now().date_naive();
    let range = DateRange::new(args.from, args.to.unwrap_or(today))?.clamp_end(today)?;

    let calendars = if args.calendars.is_empty() {
        source.calendar_ids()
    } else {
        args.calendars
    };

    let request = Request {
        calendars,
        range,
        granularity: args.granularity,
        debug: args.debug || env::var(DEBUG_ENV).is_ok_and(|value| value == "true"),
    };

    let engine = Engine::new(Config {
        week_start: args.week_start,
        ..Config::default()
    });
    let analysis = engine.analyze(&source, &request)?;

    info!(
        "Built {} series over {} buckets, {} events skipped",
        analysis.chart.datasets.len(),
        analysis.chart.labels.len(),
        analysis.skipped_events
    );

    let mut stdout = io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut stdout, &analysis)
    } else {
        serde_json::to_writer(&mut stdout, &analysis)
    }
    .context("Failed to write chart data")?;
    writeln!(stdout)?;

    Ok(())
}

fn setup_logging() {
    let filters = env::var(LOG_ENV).unwrap_or_else(|_| "caltime=info".to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}
