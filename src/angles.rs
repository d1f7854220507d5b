use crate::error::{Result, VisibilityError};
use crate::types::HorizontalCoord;

/// Exact: one hour of right ascension or hour angle is fifteen degrees.
pub const DEGREES_PER_HOUR: f64 = 15.0;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Wrap into (-180, 180].
pub fn wrap_angle_180(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

pub fn ra_hours_to_degrees(ra_hours: f64) -> f64 {
    ra_hours * DEGREES_PER_HOUR
}

/// Local hour angle in degrees, west-positive, in (-180, 180].
pub fn hour_angle(local_sidereal_deg: f64, ra_deg: f64) -> f64 {
    wrap_angle_180(local_sidereal_deg - ra_deg)
}

pub fn zenith_angle(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);
    let cos_zenith =
        lat_rad.sin() * dec_rad.sin() + lat_rad.cos() * dec_rad.cos() * ha_rad.cos();
    rad_to_deg(cos_zenith.clamp(-1.0, 1.0).acos())
}

pub fn altitude_from_zenith(zenith_angle: f64) -> f64 {
    90.0 - zenith_angle
}

/// Azimuth measured from north through east.
pub fn azimuth(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = deg_to_rad(latitude);
    let dec_rad = deg_to_rad(declination);
    let ha_rad = deg_to_rad(hour_angle);
    let sin_az = -dec_rad.cos() * ha_rad.sin();
    let cos_az = dec_rad.sin() * lat_rad.cos() - dec_rad.cos() * lat_rad.sin() * ha_rad.cos();
    let az_rad = sin_az.atan2(cos_az);
    normalize_angle(rad_to_deg(az_rad))
}

pub fn horizontal_from_hour_angle(
    latitude: f64,
    declination: f64,
    hour_angle: f64,
) -> HorizontalCoord {
    HorizontalCoord {
        altitude: altitude_from_zenith(zenith_angle(latitude, declination, hour_angle)),
        azimuth: azimuth(latitude, declination, hour_angle),
    }
}

/// Parse `"5:55"`, `"05:55:10.2"`, `"-26:26"` or a plain decimal into a
/// signed decimal value. The sign of the leading field applies to the whole
/// value, so `"-00:22"` is `-0.3667`.
pub fn parse_sexagesimal(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let invalid = || VisibilityError::InvalidCoordinate(format!("cannot parse '{text}'"));
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let (negative, body) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value = 0.0;
    let mut scale = 1.0;
    let mut fields = 0;
    for part in body.split(':') {
        fields += 1;
        if fields > 3 {
            return Err(invalid());
        }
        let v: f64 = part.trim().parse().map_err(|_| invalid())?;
        if v < 0.0 || (fields > 1 && v >= 60.0) {
            return Err(invalid());
        }
        value += v / scale;
        scale *= 60.0;
    }

    Ok(if negative { -value } else { value })
}

pub fn format_sexagesimal(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "+" };
    let total_minutes = (value.abs() * 60.0).round() as i64;
    format!("{}{:02}:{:02}", sign, total_minutes / 60, total_minutes % 60)
}
