//! Time scales and Earth-orientation rotations.
//!
//! Julian dates, ΔT, IAU 1976 precession, the low-accuracy nutation series
//! and Greenwich sidereal time. Sources: Meeus, _Astronomical Algorithms_
//! (2nd ed.) chapters 7, 12, 21 and 22; Espenak & Meeus ΔT polynomials.

use chrono::{DateTime, Datelike, Utc};

use crate::angles::{deg_to_rad, normalize_angle};

pub type Vec3 = [f64; 3];
pub type Mat3 = [[f64; 3]; 3];

/// JD of the Unix epoch, 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// JD of the J2000.0 epoch.
pub const J2000_JD: f64 = 2_451_545.0;

pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Arcseconds to degrees.
const ARCSEC: f64 = 1.0 / 3600.0;

/// Mean obliquity of the ecliptic at J2000.0, degrees.
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_291_1;

/// Julian date (UTC scale) of an instant.
pub fn julian_date(instant: &DateTime<Utc>) -> f64 {
    let secs = instant.timestamp() as f64 + instant.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + secs / 86_400.0
}

/// Inverse of [`julian_date`], to the nearest millisecond.
pub fn instant_from_julian_date(jd: f64) -> Option<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round();
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// TT − UT in seconds for a decimal year.
///
/// Espenak & Meeus polynomials for 1900–2150, parabolic long-term fit outside.
pub fn delta_t_seconds(year: f64) -> f64 {
    if (1900.0..1920.0).contains(&year) {
        let t = year - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
            - 0.000197 * t.powi(4)
    } else if (1920.0..1941.0).contains(&year) {
        let t = year - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
    } else if (1941.0..1961.0).contains(&year) {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
    } else if (1961.0..1986.0).contains(&year) {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    } else if (1986.0..2005.0).contains(&year) {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if (2005.0..2050.0).contains(&year) {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t.powi(2)
    } else if (2050.0..2150.0).contains(&year) {
        -20.0 + 32.0 * ((year - 1820.0) / 100.0).powi(2) - 0.5628 * (2150.0 - year)
    } else {
        -20.0 + 32.0 * ((year - 1820.0) / 100.0).powi(2)
    }
}

/// Terrestrial-time Julian date for a UTC instant.
pub fn julian_date_tt(instant: &DateTime<Utc>) -> f64 {
    let year = instant.year() as f64 + (instant.ordinal0() as f64 + 0.5) / 365.25;
    julian_date(instant) + delta_t_seconds(year) / 86_400.0
}

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Greenwich mean sidereal time in degrees, [0, 360).
///
/// Meeus eq. 12.4, UT1 approximated by UTC.
pub fn gmst_deg(jd_ut: f64) -> f64 {
    let t = centuries_since_j2000(jd_ut);
    normalize_angle(
        280.460_618_37 + 360.985_647_366_29 * (jd_ut - J2000_JD) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Mean obliquity of the ecliptic in degrees (Meeus eq. 22.2).
pub fn mean_obliquity_deg(t: f64) -> f64 {
    OBLIQUITY_J2000_DEG - (46.8150 * t + 0.00059 * t * t - 0.001813 * t * t * t) * ARCSEC
}

/// Nutation in longitude and obliquity, degrees.
///
/// Four-term series good to about 0.5″ in Δψ and 0.1″ in Δε (Meeus ch. 22).
pub fn nutation_deg(t: f64) -> (f64, f64) {
    let omega = deg_to_rad(125.044_52 - 1_934.136_261 * t);
    let l_sun = deg_to_rad(280.4665 + 36_000.7698 * t);
    let l_moon = deg_to_rad(218.3165 + 481_267.8813 * t);

    let dpsi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let deps = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    (dpsi * ARCSEC, deps * ARCSEC)
}

/// IAU 2006 general precession in ecliptic longitude, degrees.
pub fn general_precession_deg(t: f64) -> f64 {
    let t2 = t * t;
    (5028.796195 * t + 1.1054348 * t2 + 0.00007964 * t2 * t) * ARCSEC
}

/// Rotation of coordinates by `angle_deg` about the x axis.
pub fn rot_x(angle_deg: f64) -> Mat3 {
    let (s, c) = deg_to_rad(angle_deg).sin_cos();
    [[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]]
}

/// Rotation of coordinates by `angle_deg` about the z axis.
pub fn rot_z(angle_deg: f64) -> Mat3 {
    let (s, c) = deg_to_rad(angle_deg).sin_cos();
    [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]]
}

pub fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

pub fn mat_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// IAU 1976 precession matrix, mean J2000 equator → mean equator of date.
///
/// `t` is Julian centuries of TT since J2000.0.
pub fn precession_matrix(t: f64) -> Mat3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = (2306.2181 * t + 0.30188 * t2 + 0.017998 * t3) * ARCSEC;
    let z = (2306.2181 * t + 1.09468 * t2 + 0.018203 * t3) * ARCSEC;
    let theta = (2004.3109 * t - 0.42665 * t2 - 0.041833 * t3) * ARCSEC;

    // P = R3(-z) · R2(θ) · R3(-ζ)
    let (s_zeta, c_zeta) = deg_to_rad(zeta).sin_cos();
    let (s_z, c_z) = deg_to_rad(z).sin_cos();
    let (s_th, c_th) = deg_to_rad(theta).sin_cos();

    [
        [
            c_zeta * c_th * c_z - s_zeta * s_z,
            -s_zeta * c_th * c_z - c_zeta * s_z,
            -s_th * c_z,
        ],
        [
            c_zeta * c_th * s_z + s_zeta * c_z,
            -s_zeta * c_th * s_z + c_zeta * c_z,
            -s_th * s_z,
        ],
        [c_zeta * s_th, -s_zeta * s_th, c_th],
    ]
}

/// Nutation matrix, mean equator of date → true equator of date.
pub fn nutation_matrix(mean_obliquity: f64, dpsi: f64, deps: f64) -> Mat3 {
    let true_obliquity = mean_obliquity + deps;
    mat_mul(
        &rot_x(-true_obliquity),
        &mat_mul(&rot_z(-dpsi), &rot_x(mean_obliquity)),
    )
}

pub fn unit_vector(ra_deg: f64, dec_deg: f64) -> Vec3 {
    let (sr, cr) = deg_to_rad(ra_deg).sin_cos();
    let (sd, cd) = deg_to_rad(dec_deg).sin_cos();
    [cd * cr, cd * sr, sd]
}

pub fn norm(v: &Vec3) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Right ascension and declination in degrees of a (not necessarily unit) vector.
pub fn ra_dec_deg(v: &Vec3) -> (f64, f64) {
    let r = norm(v);
    let ra = normalize_angle(v[1].atan2(v[0]).to_degrees());
    let dec = (v[2] / r).clamp(-1.0, 1.0).asin().to_degrees();
    (ra, dec)
}
