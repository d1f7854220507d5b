//! Sunset of a calendar date and the sunrise that ends the same night.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::angles::{deg_to_rad, hour_angle, rad_to_deg, wrap_angle_180};
use crate::ephemeris::Ephemeris;
use crate::error::{PolarCondition, Result, VisibilityError};
use crate::transform::SkyFrame;
use crate::types::{ObserverLocation, SolarWindow};

/// Standard altitude of the Sun's centre at rise/set: 34′ refraction plus 16′
/// semidiameter below the geometric horizon.
pub const SUN_RISE_SET_ALTITUDE_DEG: f64 = -50.0 / 60.0;

/// Sidereal degrees per solar day; converts hour-angle offsets to time.
const SIDEREAL_DEG_PER_DAY: f64 = 360.985_647_366_29;

const MAX_ITERATIONS: usize = 8;

/// Convergence threshold in days (~0.09 s).
const CONVERGENCE_DAYS: f64 = 1.0e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SunEvent {
    Sunrise,
    Sunset,
}

/// Noon on `date` in `tz`, as UTC. Falls back to mean solar noon at the
/// observer's longitude when local noon does not exist in the zone.
pub fn local_noon<Tz: TimeZone>(date: NaiveDate, tz: &Tz, longitude: f64) -> DateTime<Utc> {
    let naive_noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    match tz.from_local_datetime(&naive_noon).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            naive_noon.and_utc() - Duration::milliseconds((longitude / 15.0 * 3_600_000.0) as i64)
        }
    }
}

/// Hour angle (degrees, positive) at which the Sun reaches `altitude_deg`.
fn event_hour_angle(
    latitude: f64,
    declination: f64,
    altitude_deg: f64,
    date: NaiveDate,
) -> Result<f64> {
    let phi = deg_to_rad(latitude);
    let dec = deg_to_rad(declination);
    let h0 = deg_to_rad(altitude_deg);

    let polar = |condition| VisibilityError::NoSolarEvent {
        date,
        latitude,
        condition,
    };

    let denom = phi.cos() * dec.cos();
    if denom.abs() < 1e-12 {
        // At a pole the Sun's altitude equals its declination (signed by hemisphere).
        let altitude = rad_to_deg(dec) * latitude.signum();
        return Err(polar(if altitude > altitude_deg {
            PolarCondition::PolarDay
        } else {
            PolarCondition::PolarNight
        }));
    }

    let cos_h0 = (h0.sin() - phi.sin() * dec.sin()) / denom;
    if cos_h0 > 1.0 {
        return Err(polar(PolarCondition::PolarNight));
    }
    if cos_h0 < -1.0 {
        return Err(polar(PolarCondition::PolarDay));
    }
    Ok(rad_to_deg(cos_h0.acos()))
}

/// Refine a sunrise or sunset starting from `guess` (normally local noon).
///
/// The estimate is first moved to the solar transit nearest `guess`. Each
/// step then moves it by the hour-angle error, so a sunset converges to the
/// first one after that transit and a sunrise to the last one before it,
/// even when the sunset falls after local midnight.
pub fn sun_event<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &ObserverLocation,
    date: NaiveDate,
    guess: DateTime<Utc>,
    event: SunEvent,
    altitude_deg: f64,
) -> Result<DateTime<Utc>> {
    let frame = SkyFrame::new(ephemeris, location, guess)?;
    let (ra, _) = frame.sun_apparent_ra_dec();
    let to_transit = -hour_angle(frame.local_sidereal_deg, ra) / SIDEREAL_DEG_PER_DAY;
    let mut t = guess + Duration::milliseconds((to_transit * 86_400_000.0).round() as i64);

    for _ in 0..MAX_ITERATIONS {
        let frame = SkyFrame::new(ephemeris, location, t)?;
        let (ra, dec) = frame.sun_apparent_ra_dec();
        let h0 = event_hour_angle(location.latitude, dec, altitude_deg, date)?;
        let target = match event {
            SunEvent::Sunset => h0,
            SunEvent::Sunrise => -h0,
        };
        let current = hour_angle(frame.local_sidereal_deg, ra);
        let delta_days = wrap_angle_180(target - current) / SIDEREAL_DEG_PER_DAY;

        t += Duration::milliseconds((delta_days * 86_400_000.0).round() as i64);
        if delta_days.abs() < CONVERGENCE_DAYS {
            break;
        }
    }
    Ok(t)
}

/// Sunset on `date` and the first sunrise after it.
///
/// The same-day sunrise is computed first; when it does not fall strictly
/// after the sunset (the usual case: it was that morning), the sunrise of the
/// following calendar date is used instead.
pub fn resolve_solar_window<E: Ephemeris + ?Sized, Tz: TimeZone>(
    ephemeris: &E,
    location: &ObserverLocation,
    date: NaiveDate,
    tz: &Tz,
    altitude_deg: f64,
) -> Result<SolarWindow> {
    let noon = local_noon(date, tz, location.longitude);
    let sunset = sun_event(ephemeris, location, date, noon, SunEvent::Sunset, altitude_deg)?;
    let mut sunrise = sun_event(ephemeris, location, date, noon, SunEvent::Sunrise, altitude_deg)?;

    if sunrise <= sunset {
        let next = date.succ_opt().ok_or_else(|| {
            VisibilityError::InvalidCoordinate(format!("no calendar date after {date}"))
        })?;
        let next_noon = local_noon(next, tz, location.longitude);
        sunrise = sun_event(ephemeris, location, next, next_noon, SunEvent::Sunrise, altitude_deg)?;
    }

    if sunrise <= sunset {
        return Err(VisibilityError::InvalidWindow {
            start: sunset,
            end: sunrise,
        });
    }

    log::debug!(
        "solar window for {} at ({:.4}, {:.4}): {} -> {}",
        date,
        location.latitude,
        location.longitude,
        sunset,
        sunrise
    );
    Ok(SolarWindow { sunset, sunrise })
}
