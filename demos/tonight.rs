use chrono::NaiveDate;
use chrono_tz::Asia::Jerusalem;

use night_sky::report::ReportRow;
use night_sky::{
    load_ephemeris, Catalog, ObservationWindow, ObserverLocation, RequestCache, VisibilityConfig,
    VisibilityPlanner,
};

fn main() -> night_sky::Result<()> {
    let location = ObserverLocation::new(32.08, 34.78)?;
    let date = NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date");

    let config = VisibilityConfig::default();
    let catalog = Catalog::builtin()?;
    let ephemeris = load_ephemeris(&config.ephemeris)?;
    let planner = VisibilityPlanner::new(&ephemeris, &catalog, &config);
    let mut cache = RequestCache::new();

    let plan = planner.plan(&location, ObservationWindow::Night { date }, Jerusalem, &mut cache)?;

    println!("=== Night Sky Visibility Example ===");
    println!(
        "Location: Tel Aviv ({:.2}°N, {:.2}°E)",
        location.latitude, location.longitude
    );
    if let Some(solar) = plan.solar {
        println!("Sunset:  {}", solar.sunset.with_timezone(&Jerusalem));
        println!("Sunrise: {}", solar.sunrise.with_timezone(&Jerusalem));
    }
    println!("Samples: {} every {} minutes", plan.grid.len(), config.step_minutes);
    println!();

    for report in plan.reports.iter().filter(|r| r.visible_now()) {
        let row = ReportRow::from_report(report, &Jerusalem);
        println!(
            "{:<20} {:<16} best {}  now {:>5.1}°  rise {:>9}  set {:>9}",
            row.name, row.label, row.best_time, row.altitude_now, row.rise, row.set
        );
    }

    Ok(())
}
