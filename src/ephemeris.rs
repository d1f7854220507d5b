//! Earth position/velocity providers.
//!
//! The visibility pipeline only needs the Earth's heliocentric state in the
//! J2000 equatorial frame: its velocity drives annual aberration and its
//! position gives the geocentric direction of the Sun for the solar window.
//! [`AnalyticEphemeris`] is a closed-form solar theory (Meeus ch. 25) valid
//! over a configurable span of years; outside that span it reports
//! [`VisibilityError::EphemerisUnavailable`].

use chrono::{NaiveDate, NaiveTime};

use crate::angles::{deg_to_rad, normalize_angle};
use crate::config::EphemerisSpan;
use crate::error::{Result, VisibilityError};
use crate::frames::{
    self, centuries_since_j2000, general_precession_deg, Vec3, OBLIQUITY_J2000_DEG,
};

/// Speed of light in AU per day.
pub const SPEED_OF_LIGHT_AU_PER_DAY: f64 = 173.144_632_674;

/// Heliocentric Earth state, J2000 mean equator and equinox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthState {
    pub position_au: Vec3,
    pub velocity_au_per_day: Vec3,
}

impl EarthState {
    /// Geocentric position of the Sun.
    pub fn sun_geocentric(&self) -> Vec3 {
        let p = self.position_au;
        [-p[0], -p[1], -p[2]]
    }
}

/// Source of the Earth's state as a function of time.
///
/// Implementations are read-only after loading and shared across requests.
pub trait Ephemeris: Send + Sync {
    fn name(&self) -> &str;

    /// Earth state at a Julian date on the TT scale.
    fn earth_state(&self, jd_tt: f64) -> Result<EarthState>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticEphemeris {
    name: String,
    first_jd: f64,
    last_jd: f64,
}

/// Load the built-in analytic model for the configured span of years.
pub fn load_ephemeris(span: &EphemerisSpan) -> Result<AnalyticEphemeris> {
    AnalyticEphemeris::new(span.start_year, span.end_year)
}

impl AnalyticEphemeris {
    /// Covers 1 January of `start_year` to 1 January of `end_year`.
    pub fn new(start_year: i32, end_year: i32) -> Result<Self> {
        if start_year >= end_year {
            return Err(VisibilityError::Config(format!(
                "ephemeris span {start_year}..{end_year} is empty"
            )));
        }
        let jd_of = |year: i32| {
            NaiveDate::from_ymd_opt(year, 1, 1)
                .map(|d| frames::julian_date(&d.and_time(NaiveTime::MIN).and_utc()))
                .ok_or_else(|| VisibilityError::Config(format!("invalid ephemeris year {year}")))
        };
        let first_jd = jd_of(start_year)?;
        let last_jd = jd_of(end_year)?;
        log::debug!("analytic ephemeris loaded for {start_year}..{end_year}");
        Ok(Self {
            name: format!("meeus-solar-{start_year}-{end_year}"),
            first_jd,
            last_jd,
        })
    }

    pub fn covers(&self, jd_tt: f64) -> bool {
        jd_tt >= self.first_jd && jd_tt < self.last_jd
    }

    /// Sun's geometric geocentric position, J2000 equatorial, AU.
    fn sun_position(jd_tt: f64) -> Vec3 {
        let t = centuries_since_j2000(jd_tt);
        let mean_longitude = 280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t;
        let mean_anomaly = 357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t;
        let e = 0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t * t;

        let m = deg_to_rad(mean_anomaly);
        let center = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
            + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
            + 0.000_289 * (3.0 * m).sin();

        let true_longitude = mean_longitude + center;
        let true_anomaly = deg_to_rad(mean_anomaly + center);
        let radius = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * true_anomaly.cos());

        // Referred to the J2000 equinox.
        let lambda = deg_to_rad(normalize_angle(true_longitude - general_precession_deg(t)));
        let (s_eps, c_eps) = deg_to_rad(OBLIQUITY_J2000_DEG).sin_cos();
        [
            radius * lambda.cos(),
            radius * lambda.sin() * c_eps,
            radius * lambda.sin() * s_eps,
        ]
    }
}

impl Ephemeris for AnalyticEphemeris {
    fn name(&self) -> &str {
        &self.name
    }

    fn earth_state(&self, jd_tt: f64) -> Result<EarthState> {
        if !jd_tt.is_finite() || !self.covers(jd_tt) {
            return Err(VisibilityError::EphemerisUnavailable {
                model: self.name.clone(),
                jd_tt,
            });
        }

        const HALF_STEP_DAYS: f64 = 0.05;
        let sun = Self::sun_position(jd_tt);
        let ahead = Self::sun_position(jd_tt + HALF_STEP_DAYS);
        let behind = Self::sun_position(jd_tt - HALF_STEP_DAYS);

        let mut velocity = [0.0; 3];
        for (k, v) in velocity.iter_mut().enumerate() {
            // Earth velocity is the negated rate of the Sun's geocentric position.
            *v = -(ahead[k] - behind[k]) / (2.0 * HALF_STEP_DAYS);
        }

        Ok(EarthState {
            position_au: [-sun[0], -sun[1], -sun[2]],
            velocity_au_per_day: velocity,
        })
    }
}
