use night_sky::angles::*;

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

// ── NormalizeAngle ──

#[test]
fn test_normalize_angle_basic() {
    let cases: &[(f64, f64)] = &[
        (0.0, 0.0),
        (360.0, 0.0),
        (-90.0, 270.0),
        (450.0, 90.0),
        (720.5, 0.5),
        (-720.0, 0.0),
    ];
    for &(input, expected) in cases {
        assert_approx!(normalize_angle(input), expected, 1e-10);
    }
}

#[test]
fn test_wrap_angle_180() {
    assert_approx!(wrap_angle_180(190.0), -170.0, 1e-10);
    assert_approx!(wrap_angle_180(-190.0), 170.0, 1e-10);
    assert_approx!(wrap_angle_180(180.0), 180.0, 1e-10);
    assert_approx!(wrap_angle_180(-180.0), 180.0, 1e-10);
    assert_approx!(wrap_angle_180(45.0), 45.0, 1e-10);
}

#[test]
fn test_deg_rad_roundtrip() {
    for deg in [-270.0, -45.0, 0.0, 30.0, 123.456, 359.9] {
        assert_approx!(rad_to_deg(deg_to_rad(deg)), deg, 1e-10);
    }
    assert_approx!(deg_to_rad(180.0), std::f64::consts::PI, 1e-15);
}

// ── HourAngle ──

#[test]
fn test_hour_angle_wraps_across_zero() {
    assert_approx!(hour_angle(10.0, 350.0), 20.0, 1e-10);
    assert_approx!(hour_angle(350.0, 10.0), -20.0, 1e-10);
    assert_approx!(hour_angle(100.0, 100.0), 0.0, 1e-10);
}

#[test]
fn test_ra_hours_to_degrees() {
    assert_approx!(ra_hours_to_degrees(0.0), 0.0, 1e-12);
    assert_approx!(ra_hours_to_degrees(6.0), 90.0, 1e-12);
    assert_approx!(ra_hours_to_degrees(23.5), 352.5, 1e-12);
}

// ── Horizontal ──

#[test]
fn test_meridian_transit_south_of_zenith() {
    // Betelgeuse on the meridian from Tel Aviv.
    let hz = horizontal_from_hour_angle(32.0, 7.4, 0.0);
    assert_approx!(hz.altitude, 90.0 - (32.0 - 7.4), 1e-9);
    assert_approx!(hz.azimuth, 180.0, 1e-9);
}

#[test]
fn test_meridian_transit_north_of_zenith() {
    let hz = horizontal_from_hour_angle(32.0, 60.0, 0.0);
    assert_approx!(hz.altitude, 62.0, 1e-9);
    assert_approx!(hz.azimuth, 0.0, 1e-9);
}

#[test]
fn test_zenith_when_declination_equals_latitude() {
    let hz = horizontal_from_hour_angle(45.0, 45.0, 0.0);
    assert_approx!(hz.altitude, 90.0, 1e-6);
}

#[test]
fn test_equator_object_rises_due_east() {
    let hz = horizontal_from_hour_angle(32.0, 0.0, -90.0);
    assert_approx!(hz.altitude, 0.0, 1e-9);
    assert_approx!(hz.azimuth, 90.0, 1e-9);

    let hz = horizontal_from_hour_angle(32.0, 0.0, 90.0);
    assert_approx!(hz.altitude, 0.0, 1e-9);
    assert_approx!(hz.azimuth, 270.0, 1e-9);
}

#[test]
fn test_altitude_is_complement_of_zenith() {
    for (lat, dec, ha) in [(32.0, 10.0, 30.0), (-33.9, -60.0, 120.0), (78.2, 20.0, -170.0)] {
        let z = zenith_angle(lat, dec, ha);
        let hz = horizontal_from_hour_angle(lat, dec, ha);
        assert_approx!(hz.altitude, altitude_from_zenith(z), 1e-12);
        assert!((0.0..360.0).contains(&hz.azimuth));
        assert!((-90.0..=90.0).contains(&hz.altitude));
    }
}

// ── Sexagesimal ──

#[test]
fn test_parse_sexagesimal_hours_and_degrees() {
    assert_approx!(parse_sexagesimal("05:55").unwrap(), 5.0 + 55.0 / 60.0, 1e-12);
    assert_approx!(parse_sexagesimal("+89:16").unwrap(), 89.0 + 16.0 / 60.0, 1e-12);
    assert_approx!(parse_sexagesimal("-26:26").unwrap(), -(26.0 + 26.0 / 60.0), 1e-12);
    assert_approx!(parse_sexagesimal("05:55:30").unwrap(), 5.925, 1e-12);
    assert_approx!(parse_sexagesimal(" 12.5 ").unwrap(), 12.5, 1e-12);
}

#[test]
fn test_parse_sexagesimal_negative_zero_degrees() {
    // The sign must survive a zero leading field.
    assert_approx!(parse_sexagesimal("-00:22").unwrap(), -22.0 / 60.0, 1e-12);
}

#[test]
fn test_parse_sexagesimal_rejects_garbage() {
    for bad in ["", "ab", "05:61", "1:2:3:4", "5:-3", "-"] {
        assert!(parse_sexagesimal(bad).is_err(), "accepted '{}'", bad);
    }
}

#[test]
fn test_format_sexagesimal() {
    assert_eq!(format_sexagesimal(7.4), "+07:24");
    assert_eq!(format_sexagesimal(-22.0 / 60.0), "-00:22");
    assert_eq!(format_sexagesimal(-26.0 - 26.0 / 60.0), "-26:26");
}
