use std::env;
use std::path::PathBuf;
use std::process;

use caltime_engine::{Granularity, WeekStart};
use chrono::NaiveDate;
use getopts::{Matches, Options};

pub struct Args {
    pub input: PathBuf,
    pub calendars: Vec<String>,
    pub granularity: Granularity,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub week_start: WeekStart,
    pub debug: bool,
    pub pretty: bool,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optmulti(
        "c",
        "calendar",
        "Calendar to include, repeatable [Default: every calendar in the export]",
        "ID",
    );
    opts.optopt(
        "g",
        "group-by",
        "Bucket size: day, week or month; anything else means day [Default: week]",
        "UNIT",
    );
    opts.optopt("f", "from", "First date to analyze", "YYYY-MM-DD");
    opts.optopt(
        "t",
        "to",
        "Last date to analyze, capped at today [Default: today]",
        "YYYY-MM-DD",
    );
    opts.optopt(
        "w",
        "week-start",
        "First day of a week bucket: monday or sunday [Default: monday]",
        "DAY",
    );
    opts.optflag(
        "d",
        "debug",
        "Attach the per-event breakdown to the output [Default: false]",
    );
    opts.optflag("p", "pretty", "Pretty-print the JSON output");
    opts
}

fn usage(opts: &Options) -> String {
    let brief = format!("Usage: {} [options] EXPORT.json", env!("CARGO_PKG_NAME"));
    opts.usage(&brief)
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", usage(&opts));
        process::exit(0);
    }

    match build(&matches) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", usage(&opts));
            process::exit(1);
        }
    }
}

fn build(matches: &Matches) -> Result<Args, String> {
    let input = matches
        .free
        .first()
        .map(PathBuf::from)
        .ok_or("Missing path to a calendar export")?;

    let granularity = matches
        .opt_str("group-by")
        .map_or(Granularity::Week, |unit| Granularity::parse(&unit));

    let from = matches
        .opt_get::<NaiveDate>("from")
        .map_err(|err| format!("Provided value for option 'from' is invalid: {err}"))?
        .ok_or("Missing required option 'from'")?;

    let to = matches
        .opt_get::<NaiveDate>("to")
        .map_err(|err| format!("Provided value for option 'to' is invalid: {err}"))?;

    let week_start = matches
        .opt_get_default("week-start", WeekStart::Monday)
        .map_err(|err| format!("Provided value for option 'week-start' is invalid: {err}"))?;

    Ok(Args {
        input,
        calendars: matches.opt_strs("calendar"),
        granularity,
        from,
        to,
        week_start,
        debug: matches.opt_present("debug"),
        pretty: matches.opt_present("pretty"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_from(args: &[&str]) -> Result<Args, String> {
        let matches = opts().parse(args).map_err(|err| err.to_string())?;
        build(&matches)
    }

    #[test]
    fn defaults() {
        let args = build_from(&["export.json", "--from", "2024-01-01"]).unwrap();

        assert_eq!(args.input, PathBuf::from("export.json"));
        assert!(args.calendars.is_empty());
        assert_eq!(args.granularity, Granularity::Week);
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(args.to, None);
        assert_eq!(args.week_start, WeekStart::Monday);
        assert!(!args.debug);
        assert!(!args.pretty);
    }

    #[test]
    fn all_options() {
        let args = build_from(&[
            "-c", "a", "--calendar", "b", "-g", "month", "-f", "2024-01-01", "-t", "2024-02-01",
            "-w", "sunday", "-d", "-p", "export.json",
        ])
        .unwrap();

        assert_eq!(args.calendars, vec!["a", "b"]);
        assert_eq!(args.granularity, Granularity::Month);
        assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(args.week_start, WeekStart::Sunday);
        assert!(args.debug);
        assert!(args.pretty);
    }

    #[test]
    fn unknown_group_by_means_day() {
        let args = build_from(&["x.json", "-f", "2024-01-01", "-g", "quarter"]).unwrap();
        assert_eq!(args.granularity, Granularity::Day);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(build_from(&["--from", "2024-01-01"]).is_err());
        assert!(build_from(&["x.json"]).is_err());
        assert!(build_from(&["x.json", "-f", "01/02/2024"]).is_err());
        assert!(build_from(&["x.json", "-f", "2024-01-01", "-w", "friday"]).is_err());
    }
}
