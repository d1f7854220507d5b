use chrono::{Duration, TimeZone, Utc};

use night_sky::frames::{julian_date_tt, norm, unit_vector};
use night_sky::*;

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

fn ephemeris() -> AnalyticEphemeris {
    AnalyticEphemeris::new(1900, 2100).unwrap()
}

fn tel_aviv() -> ObserverLocation {
    ObserverLocation::new(32.08, 34.78).unwrap()
}

// ── Ephemeris ──

#[test]
fn test_earth_near_perihelion_in_january() {
    let eph = ephemeris();
    let state = eph.earth_state(2_451_545.0).unwrap();
    assert_approx!(norm(&state.position_au), 0.9833, 0.0005);
    // ~30.3 km/s
    assert_approx!(norm(&state.velocity_au_per_day), 0.01749, 0.0002);
}

#[test]
fn test_sun_is_opposite_earth() {
    let state = ephemeris().earth_state(2_460_000.5).unwrap();
    let sun = state.sun_geocentric();
    for k in 0..3 {
        assert_approx!(sun[k], -state.position_au[k], 1e-15);
    }
}

#[test]
fn test_ephemeris_coverage() {
    let eph = ephemeris();
    assert!(eph.name().starts_with("meeus"));
    assert!(eph.covers(2_451_545.0));

    let late = Utc.with_ymd_and_hms(2150, 6, 1, 0, 0, 0).unwrap();
    let err = eph.earth_state(julian_date_tt(&late)).unwrap_err();
    assert!(matches!(err, VisibilityError::EphemerisUnavailable { .. }));

    let early = Utc.with_ymd_and_hms(1850, 6, 1, 0, 0, 0).unwrap();
    assert!(eph.earth_state(julian_date_tt(&early)).is_err());
    assert!(eph.earth_state(f64::NAN).is_err());
}

#[test]
fn test_empty_ephemeris_span_rejected() {
    assert!(matches!(
        AnalyticEphemeris::new(2000, 2000),
        Err(VisibilityError::Config(_))
    ));
}

#[test]
fn test_load_ephemeris_uses_span() {
    let eph = load_ephemeris(&EphemerisSpan {
        start_year: 2000,
        end_year: 2010,
    })
    .unwrap();
    let t = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
    assert!(!eph.covers(julian_date_tt(&t)));
}

// ── Apparent places ──

#[test]
fn test_apparent_sun_new_year_2025() {
    let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let frame = SkyFrame::new(&ephemeris(), &tel_aviv(), t).unwrap();
    let (ra, dec) = frame.sun_apparent_ra_dec();
    // 18h47m, −23°00′
    assert_approx!(ra / 15.0, 18.784, 0.01);
    assert_approx!(dec, -23.0, 0.05);
}

#[test]
fn test_apparent_polaris_2025() {
    let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let frame = SkyFrame::new(&ephemeris(), &tel_aviv(), t).unwrap();
    let (ra, dec) = frame.apparent_ra_dec(&unit_vector(37.95, 89.264));
    // Precession carries Polaris about 0.1° closer to the pole since J2000.
    assert_approx!(dec, 89.37, 0.03);
    assert_approx!(ra / 15.0, 3.08, 0.05);
}

#[test]
fn test_local_sidereal_time_includes_longitude() {
    let t = Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap();
    let eph = ephemeris();
    let greenwich = SkyFrame::new(&eph, &ObserverLocation::new(51.48, 0.0).unwrap(), t).unwrap();
    let east = SkyFrame::new(&eph, &ObserverLocation::new(51.48, 30.0).unwrap(), t).unwrap();
    assert_approx!(
        normalize_angle(east.local_sidereal_deg - greenwich.local_sidereal_deg),
        30.0,
        1e-9
    );
}

// ── Horizontal ──

#[test]
fn test_betelgeuse_at_tel_aviv_sunset() {
    let t = Utc.with_ymd_and_hms(2026, 1, 15, 14, 58, 50).unwrap();
    let coord = EquatorialCoord::new(5.0 + 55.0 / 60.0, 7.4).unwrap();
    let hz = horizontal_coordinates(&ephemeris(), &tel_aviv(), t, &coord).unwrap();
    assert_approx!(hz.altitude, 17.0, 0.3);
    assert_approx!(hz.azimuth, 91.9, 0.5);
}

#[test]
fn test_polaris_altitude_tracks_latitude() {
    let eph = ephemeris();
    let polaris = EquatorialCoord::new(2.0 + 32.0 / 60.0, 89.0 + 16.0 / 60.0).unwrap();
    let start = Utc.with_ymd_and_hms(2026, 1, 15, 15, 0, 0).unwrap();
    for lat in [10.0, 32.08, 60.0] {
        let loc = ObserverLocation::new(lat, 34.78).unwrap();
        for h in 0..24 {
            let hz =
                horizontal_coordinates(&eph, &loc, start + Duration::hours(h), &polaris).unwrap();
            assert_approx!(hz.altitude, lat, 0.8);
        }
    }
}

#[test]
fn test_frame_reuse_matches_one_shot() {
    let eph = ephemeris();
    let loc = tel_aviv();
    let t = Utc.with_ymd_and_hms(2026, 1, 15, 20, 0, 0).unwrap();
    let frame = SkyFrame::new(&eph, &loc, t).unwrap();
    for (ra, dec) in [(5.9, 7.4), (18.6, 38.8), (12.4, -63.1), (0.0, 0.0)] {
        let coord = EquatorialCoord::new(ra, dec).unwrap();
        assert_eq!(
            frame.horizontal(&coord),
            horizontal_coordinates(&eph, &loc, t, &coord).unwrap()
        );
    }
}

#[test]
fn test_transform_outside_ephemeris_fails() {
    let t = Utc.with_ymd_and_hms(2150, 1, 1, 0, 0, 0).unwrap();
    let coord = EquatorialCoord::new(5.9, 7.4).unwrap();
    let err = horizontal_coordinates(&ephemeris(), &tel_aviv(), t, &coord).unwrap_err();
    assert!(matches!(err, VisibilityError::EphemerisUnavailable { .. }));
}

#[test]
fn test_build_frames_parallel_matches_sequential() {
    let eph = ephemeris();
    let start = Utc.with_ymd_and_hms(2026, 1, 15, 15, 0, 0).unwrap();
    let grid = build_time_grid(start, start + Duration::hours(12), Duration::minutes(30)).unwrap();
    let seq = build_frames(&eph, &tel_aviv(), &grid, false).unwrap();
    let par = build_frames(&eph, &tel_aviv(), &grid, true).unwrap();
    assert_eq!(seq.len(), grid.len());
    assert_eq!(seq, par);
    for (frame, &t) in seq.iter().zip(grid.instants.iter()) {
        assert_eq!(frame.instant, t);
    }
}

#[test]
fn test_invalid_coordinates_rejected() {
    assert!(ObserverLocation::new(91.0, 0.0).is_err());
    assert!(ObserverLocation::new(0.0, 181.0).is_err());
    assert!(EquatorialCoord::new(24.0, 0.0).is_err());
    assert!(EquatorialCoord::new(-0.1, 0.0).is_err());
    assert!(EquatorialCoord::new(1.0, 90.5).is_err());
}
