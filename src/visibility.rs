//! Per-request orchestration: window → grid → frames → one report per object.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rayon::prelude::*;

use crate::catalog::Catalog;
use crate::config::{VisibilityConfig, WindowPolicy};
use crate::ephemeris::Ephemeris;
use crate::error::{Result, VisibilityError};
use crate::resolver::RequestCache;
use crate::riseset::{detect_rise_set, peak_index};
use crate::time_grid::build_time_grid;
use crate::transform::{build_frames, SkyFrame};
use crate::types::{
    AltitudeSeries, CelestialObject, ObserverLocation, SolarWindow, TimeGrid, VisibilityReport,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservationWindow {
    /// Sunset on `date` to the following sunrise.
    Night { date: NaiveDate },
    /// A fixed span beginning at `start`.
    FromInstant { start: DateTime<Utc>, span: Duration },
}

/// Everything computed for one (location, window) request.
#[derive(Debug, Clone, PartialEq)]
pub struct NightPlan {
    pub location: ObserverLocation,
    pub timezone: Tz,
    /// Set when the window came from actual sunset/sunrise.
    pub solar: Option<SolarWindow>,
    pub grid: Arc<TimeGrid>,
    pub reports: Vec<VisibilityReport>,
}

/// Local clock hours on `date` (and the next day when `end_hour <= start_hour`).
pub fn fixed_hours_window<T: TimeZone>(
    date: NaiveDate,
    tz: &T,
    start_hour: u32,
    end_hour: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let end_date = if end_hour <= start_hour {
        date.succ_opt()
            .ok_or_else(|| VisibilityError::Config(format!("no calendar date after {date}")))?
    } else {
        date
    };
    let at = |d: NaiveDate, hour: u32| {
        let naive = d.and_time(
            NaiveTime::from_hms_opt(hour, 0, 0)
                .ok_or_else(|| VisibilityError::Config(format!("invalid hour {hour}")))?,
        );
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| VisibilityError::Config(format!("{naive} does not exist locally")))
    };
    Ok((at(date, start_hour)?, at(end_date, end_hour)?))
}

/// Build one report from precomputed frames.
pub fn summarize_object(
    object: &CelestialObject,
    frames: &[SkyFrame],
    grid: &Arc<TimeGrid>,
) -> VisibilityReport {
    let mut series = AltitudeSeries::with_capacity(frames.len());
    for frame in frames {
        series.push(frame.horizontal(&object.coord));
    }
    let events = detect_rise_set(&series.altitudes);
    let peak_index = peak_index(&series.altitudes).unwrap_or(0);

    VisibilityReport {
        object: object.clone(),
        grid: Arc::clone(grid),
        series,
        peak_index,
        events,
    }
}

pub struct VisibilityPlanner<'a, E: Ephemeris + ?Sized> {
    ephemeris: &'a E,
    catalog: &'a Catalog,
    config: &'a VisibilityConfig,
}

impl<'a, E: Ephemeris + ?Sized> VisibilityPlanner<'a, E> {
    pub fn new(ephemeris: &'a E, catalog: &'a Catalog, config: &'a VisibilityConfig) -> Self {
        Self {
            ephemeris,
            catalog,
            config,
        }
    }

    /// Reports for every catalog object over `grid`, in catalog order.
    ///
    /// Fails as a whole if any sample cannot be evaluated.
    pub fn summarize(
        &self,
        location: &ObserverLocation,
        grid: &Arc<TimeGrid>,
    ) -> Result<Vec<VisibilityReport>> {
        if grid.is_empty() {
            return Err(VisibilityError::Config("time grid has no samples".to_string()));
        }
        let frames = build_frames(self.ephemeris, location, grid, self.config.parallel)?;

        let reports: Vec<VisibilityReport> = if self.config.parallel {
            self.catalog
                .objects()
                .par_iter()
                .map(|obj| summarize_object(obj, &frames, grid))
                .collect()
        } else {
            self.catalog
                .iter()
                .map(|obj| summarize_object(obj, &frames, grid))
                .collect()
        };
        Ok(reports)
    }

    fn resolve_window(
        &self,
        location: &ObserverLocation,
        window: ObservationWindow,
        tz: Tz,
        cache: &mut RequestCache,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>, Option<SolarWindow>)> {
        match window {
            ObservationWindow::FromInstant { start, span } => {
                let end = start.checked_add_signed(span).ok_or_else(|| {
                    VisibilityError::Config(format!("span {span} from {start} is out of range"))
                })?;
                Ok((start, end, None))
            }
            ObservationWindow::Night { date } => {
                match cache.solar_window(
                    self.ephemeris,
                    location,
                    date,
                    tz,
                    self.config.sun_altitude_deg,
                ) {
                    Ok(solar) => Ok((solar.sunset, solar.sunrise, Some(solar))),
                    Err(err @ VisibilityError::NoSolarEvent { .. }) => match self.config.window {
                        WindowPolicy::Strict => Err(err),
                        WindowPolicy::FixedHours {
                            start_hour,
                            end_hour,
                        } => {
                            log::warn!(
                                "{err}; using fixed hours {start_hour:02}:00-{end_hour:02}:00"
                            );
                            let (start, end) = fixed_hours_window(date, &tz, start_hour, end_hour)?;
                            Ok((start, end, None))
                        }
                    },
                    Err(err) => Err(err),
                }
            }
        }
    }

    pub fn plan(
        &self,
        location: &ObserverLocation,
        window: ObservationWindow,
        tz: Tz,
        cache: &mut RequestCache,
    ) -> Result<NightPlan> {
        let (start, end, solar) = self.resolve_window(location, window, tz, cache)?;
        let grid = Arc::new(build_time_grid(start, end, self.config.step()?)?);
        let reports = self.summarize(location, &grid)?;

        log::info!(
            "{} objects over {} samples from {} to {}",
            reports.len(),
            grid.len(),
            start.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
            end.with_timezone(&tz).format("%Y-%m-%d %H:%M")
        );

        Ok(NightPlan {
            location: *location,
            timezone: tz,
            solar,
            grid,
            reports,
        })
    }
}
