//! Equatorial → horizontal transform for fixed catalog positions.
//!
//! Everything that depends only on the instant (Earth velocity, precession,
//! nutation, sidereal time) is gathered in a [`SkyFrame`]. A request builds
//! one frame per grid sample and evaluates every catalog object against it.

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::angles::{deg_to_rad, horizontal_from_hour_angle, hour_angle, normalize_angle};
use crate::ephemeris::{Ephemeris, SPEED_OF_LIGHT_AU_PER_DAY};
use crate::error::Result;
use crate::frames::{
    self, centuries_since_j2000, gmst_deg, mat_mul, mat_vec, mean_obliquity_deg, norm,
    nutation_deg, nutation_matrix, precession_matrix, ra_dec_deg, unit_vector, Mat3, Vec3,
};
use crate::types::{EquatorialCoord, HorizontalCoord, ObserverLocation, TimeGrid};

#[derive(Debug, Clone, PartialEq)]
pub struct SkyFrame {
    pub instant: DateTime<Utc>,
    pub latitude: f64,
    /// Local apparent sidereal time, degrees in [0, 360).
    pub local_sidereal_deg: f64,
    /// Mean J2000 equator → true equator of date.
    rotation: Mat3,
    /// Earth velocity in units of c, J2000 frame.
    beta: Vec3,
    /// Geometric geocentric Sun direction, J2000 frame, AU.
    sun: Vec3,
}

impl SkyFrame {
    pub fn new<E: Ephemeris + ?Sized>(
        ephemeris: &E,
        location: &ObserverLocation,
        instant: DateTime<Utc>,
    ) -> Result<Self> {
        let jd_ut = frames::julian_date(&instant);
        let jd_tt = frames::julian_date_tt(&instant);
        let earth = ephemeris.earth_state(jd_tt)?;

        let t = centuries_since_j2000(jd_tt);
        let eps0 = mean_obliquity_deg(t);
        let (dpsi, deps) = nutation_deg(t);
        let rotation = mat_mul(&nutation_matrix(eps0, dpsi, deps), &precession_matrix(t));

        let equation_of_equinoxes = dpsi * deg_to_rad(eps0 + deps).cos();
        let local_sidereal_deg =
            normalize_angle(gmst_deg(jd_ut) + equation_of_equinoxes + location.longitude);

        let v = earth.velocity_au_per_day;
        Ok(Self {
            instant,
            latitude: location.latitude,
            local_sidereal_deg,
            rotation,
            beta: [
                v[0] / SPEED_OF_LIGHT_AU_PER_DAY,
                v[1] / SPEED_OF_LIGHT_AU_PER_DAY,
                v[2] / SPEED_OF_LIGHT_AU_PER_DAY,
            ],
            sun: earth.sun_geocentric(),
        })
    }

    /// Apparent right ascension and declination of date, degrees, for a
    /// J2000 direction (any length).
    pub fn apparent_ra_dec(&self, direction: &Vec3) -> (f64, f64) {
        let r = norm(direction);
        let mut u = [
            direction[0] / r + self.beta[0],
            direction[1] / r + self.beta[1],
            direction[2] / r + self.beta[2],
        ];
        let n = norm(&u);
        for c in u.iter_mut() {
            *c /= n;
        }
        ra_dec_deg(&mat_vec(&self.rotation, &u))
    }

    fn horizontal_of(&self, direction: &Vec3) -> HorizontalCoord {
        let (ra, dec) = self.apparent_ra_dec(direction);
        horizontal_from_hour_angle(self.latitude, dec, hour_angle(self.local_sidereal_deg, ra))
    }

    pub fn horizontal(&self, coord: &EquatorialCoord) -> HorizontalCoord {
        self.horizontal_of(&unit_vector(coord.ra_degrees(), coord.dec_deg))
    }

    /// Apparent Sun, no refraction.
    pub fn sun_horizontal(&self) -> HorizontalCoord {
        self.horizontal_of(&self.sun)
    }

    pub fn sun_apparent_ra_dec(&self) -> (f64, f64) {
        self.apparent_ra_dec(&self.sun)
    }
}

/// One-shot transform of a single object at a single instant.
pub fn horizontal_coordinates<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &ObserverLocation,
    instant: DateTime<Utc>,
    coord: &EquatorialCoord,
) -> Result<HorizontalCoord> {
    Ok(SkyFrame::new(ephemeris, location, instant)?.horizontal(coord))
}

/// One frame per grid sample, in grid order.
pub fn build_frames<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &ObserverLocation,
    grid: &TimeGrid,
    parallel: bool,
) -> Result<Vec<SkyFrame>> {
    let frames = if parallel {
        grid.instants
            .par_iter()
            .map(|&t| SkyFrame::new(ephemeris, location, t))
            .collect::<Result<Vec<_>>>()?
    } else {
        grid.instants
            .iter()
            .map(|&t| SkyFrame::new(ephemeris, location, t))
            .collect::<Result<Vec<_>>>()?
    };
    log::debug!(
        "built {} sky frames for ({:.4}, {:.4})",
        frames.len(),
        location.latitude,
        location.longitude
    );
    Ok(frames)
}
