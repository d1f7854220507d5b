use std::path::PathBuf;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Parser;
use serde::Serialize;

use night_sky::config::parse_timezone;
use night_sky::report::{curve, render_curve, render_json, render_table, CurvePoint, ReportRow};
use night_sky::resolver::{
    resolve_zone_or_default, Gazetteer, NominalZoneResolver, RequestCache, TimezoneResolver,
};
use night_sky::{
    load_ephemeris, Catalog, ObservationWindow, ObserverLocation, Result, VisibilityConfig,
    VisibilityError, VisibilityPlanner,
};

#[derive(Parser)]
#[command(name = "night-sky", about = "Which constellations are up between sunset and sunrise")]
struct Cli {
    /// Place name (looked up in the gazetteer); defaults to Tel Aviv
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    place: Option<String>,
    /// Latitude in degrees, north positive
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude in degrees, east positive
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Calendar date of the evening (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// IANA timezone, overriding lookup
    #[arg(long)]
    tz: Option<String>,
    /// Grid step in minutes
    #[arg(long)]
    step: Option<i64>,
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// TOML catalog replacing the built-in constellations
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// TOML gazetteer replacing the built-in places
    #[arg(long)]
    gazetteer: Option<PathBuf>,
    /// Sample a fixed span of HOURS starting at the current clock time
    #[arg(long, value_name = "HOURS")]
    from_now: Option<f64>,
    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Also print the altitude curve of one object
    #[arg(long, value_name = "NAME")]
    curve: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    address: &'a str,
    latitude: f64,
    longitude: f64,
    timezone: &'a str,
    window_start: String,
    window_end: String,
    rows: &'a [ReportRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    curve: Option<Vec<CurvePoint>>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => VisibilityConfig::from_path(path)?,
        None => VisibilityConfig::default(),
    };
    if let Some(step) = cli.step {
        config.step_minutes = step;
        config.validate()?;
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    let gazetteer = match &cli.gazetteer {
        Some(path) => Gazetteer::from_path(path)?,
        None => Gazetteer::builtin()?,
    };

    let mut cache = RequestCache::new();
    let (location, address, known_zone) = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => {
            let location = ObserverLocation::new(lat, lon)?;
            (location, format!("{lat:.4}, {lon:.4}"), None)
        }
        _ => {
            let place = cli.place.as_deref().unwrap_or("Tel Aviv");
            let resolved = cache.resolve_location(&gazetteer, place)?;
            (resolved.location, resolved.address, resolved.timezone)
        }
    };

    let tz: Tz = match cli.tz.as_deref().or(known_zone.as_deref()) {
        Some(name) => parse_timezone(name)?,
        None => match gazetteer.resolve_zone(location.latitude, location.longitude) {
            Some(tz) => tz,
            None => resolve_zone_or_default(
                &NominalZoneResolver,
                location.latitude,
                location.longitude,
                config.default_tz()?,
            ),
        },
    };

    let now = Utc::now().with_timezone(&tz);
    let date = cli.date.unwrap_or_else(|| now.date_naive());

    let window = match cli.from_now {
        Some(hours) => {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(VisibilityError::Config(format!(
                    "--from-now must be a positive number of hours, got {hours}"
                )));
            }
            let span = Duration::try_minutes((hours * 60.0).round() as i64).ok_or_else(|| {
                VisibilityError::Config(format!("--from-now {hours} hours is out of range"))
            })?;
            let start = tz
                .from_local_datetime(&date.and_time(now.time()))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| now.with_timezone(&Utc));
            ObservationWindow::FromInstant { start, span }
        }
        None => ObservationWindow::Night { date },
    };

    let ephemeris = load_ephemeris(&config.ephemeris)?;
    let planner = VisibilityPlanner::new(&ephemeris, &catalog, &config);
    let plan = planner.plan(&location, window, tz, &mut cache)?;

    let rows: Vec<ReportRow> = plan
        .reports
        .iter()
        .map(|r| ReportRow::from_report(r, &tz))
        .collect();

    let selected = match &cli.curve {
        Some(name) => {
            let object = catalog
                .find(name)
                .ok_or_else(|| VisibilityError::Catalog(format!("no object named '{name}'")))?;
            plan.reports.iter().find(|r| r.object.name == object.name)
        }
        None => None,
    };

    let fmt_local = |t: chrono::DateTime<Utc>| {
        t.with_timezone(&tz)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    };
    let window_start = plan.grid.start().map(fmt_local).unwrap_or_default();
    let window_end = plan.grid.end().map(fmt_local).unwrap_or_default();

    if cli.json {
        let out = JsonOutput {
            address: &address,
            latitude: location.latitude,
            longitude: location.longitude,
            timezone: tz.name(),
            window_start,
            window_end,
            rows: &rows,
            curve: selected.map(|r| curve(r, &tz)),
        };
        println!("{}", render_json(&out)?);
        return Ok(());
    }

    let header = format!(
        "Constellations for {} ({:.2}, {:.2})\n{} -> {} ({})",
        address,
        location.latitude,
        location.longitude,
        window_start,
        window_end,
        tz.name()
    );
    print!("{}", render_table(&header, &rows));

    if let Some(report) = selected {
        println!();
        let title = format!(
            "Altitude curve for {} ({})",
            report.object.name, report.object.label
        );
        print!("{}", render_curve(&title, &curve(report, &tz)));
    }

    Ok(())
}
