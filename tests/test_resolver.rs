use std::cell::Cell;

use chrono::NaiveDate;
use chrono_tz::Tz;

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

/// Counts calls so memoization can be observed.
struct CountingResolver {
    inner: Gazetteer,
    calls: Cell<usize>,
}

impl LocationResolver for CountingResolver {
    fn resolve(&self, place: &str) -> Result<ResolvedLocation> {
        self.calls.set(self.calls.get() + 1);
        self.inner.resolve(place)
    }
}

fn counting() -> CountingResolver {
    CountingResolver {
        inner: Gazetteer::builtin().unwrap(),
        calls: Cell::new(0),
    }
}

// ── Gazetteer ──

#[test]
fn test_builtin_gazetteer() {
    let g = Gazetteer::builtin().unwrap();
    assert_eq!(g.len(), 14);
    assert!(!g.is_empty());

    let tlv = g.resolve("Tel Aviv").unwrap();
    assert_approx!(tlv.location.latitude, 32.0853, 1e-9);
    assert_approx!(tlv.location.longitude, 34.7818, 1e-9);
    assert_eq!(tlv.address, "Tel Aviv-Yafo, Tel Aviv District, Israel");
    assert_eq!(tlv.timezone.as_deref(), Some("Asia/Jerusalem"));
}

#[test]
fn test_place_names_are_normalized() {
    let g = Gazetteer::builtin().unwrap();
    let expected = g.resolve("Tel Aviv").unwrap();
    for query in ["tel aviv", "  TEL   AVIV ", "Tel Aviv, Israel", "TLV", "tel aviv-yafo"] {
        assert_eq!(g.resolve(query).unwrap(), expected, "query '{}'", query);
    }
    assert_eq!(g.resolve("nyc").unwrap().location, g.resolve("New York").unwrap().location);
    assert_eq!(g.resolve("Tromsø").unwrap().location, g.resolve("tromso").unwrap().location);
}

#[test]
fn test_unknown_place() {
    let g = Gazetteer::builtin().unwrap();
    match g.resolve("  Atlantis ") {
        Err(VisibilityError::LocationNotFound(name)) => assert_eq!(name, "Atlantis"),
        other => panic!("expected LocationNotFound, got {other:?}"),
    }
}

#[test]
fn test_gazetteer_zone_lookup() {
    let g = Gazetteer::builtin().unwrap();
    assert_eq!(g.resolve_zone(32.08, 34.78), Some(chrono_tz::Asia::Jerusalem));
    assert_eq!(g.resolve_zone(-33.9, 151.2), Some(chrono_tz::Australia::Sydney));
    assert_eq!(g.resolve_zone(0.0, -30.0), None);
}

#[test]
fn test_custom_gazetteer() {
    let g = Gazetteer::from_toml_str(
        r#"
[[place]]
name = "Mauna Kea"
latitude = 19.8207
longitude = -155.4681
"#,
    )
    .unwrap();
    let resolved = g.resolve("mauna kea").unwrap();
    assert_eq!(resolved.address, "Mauna Kea");
    assert_eq!(resolved.timezone, None);
    assert_eq!(g.resolve_zone(19.82, -155.47), None);
}

#[test]
fn test_custom_gazetteer_validation() {
    let bad_zone =
        "[[place]]\nname = \"X\"\nlatitude = 0.0\nlongitude = 0.0\ntimezone = \"Mars/Base\"\n";
    assert!(matches!(
        Gazetteer::from_toml_str(bad_zone),
        Err(VisibilityError::UnknownTimezone(_))
    ));
    let bad_lat = "[[place]]\nname = \"X\"\nlatitude = 95.0\nlongitude = 0.0\n";
    assert!(matches!(
        Gazetteer::from_toml_str(bad_lat),
        Err(VisibilityError::InvalidCoordinate(_))
    ));
}

// ── Timezones ──

#[test]
fn test_nominal_zone_resolver() {
    let r = NominalZoneResolver;
    let name = |lon: f64| r.resolve_zone(0.0, lon).map(|tz: Tz| tz.name().to_string());
    assert_eq!(name(34.78).as_deref(), Some("Etc/GMT-2"));
    assert_eq!(name(-74.0).as_deref(), Some("Etc/GMT+5"));
    assert_eq!(name(3.0).as_deref(), Some("Etc/GMT"));
    assert_eq!(name(180.0).as_deref(), Some("Etc/GMT-12"));
    assert_eq!(name(200.0), None);
}

#[test]
fn test_zone_fallback_to_default() {
    let tz = resolve_zone_or_default(&NominalZoneResolver, 0.0, 500.0, chrono_tz::UTC);
    assert_eq!(tz, chrono_tz::UTC);
    let tz = resolve_zone_or_default(&NominalZoneResolver, 0.0, 34.78, chrono_tz::UTC);
    assert_eq!(tz.name(), "Etc/GMT-2");
}

// ── Request cache ──

#[test]
fn test_location_lookups_are_memoized() {
    let resolver = counting();
    let mut cache = RequestCache::new();

    let first = cache.resolve_location(&resolver, "Tel Aviv").unwrap();
    let second = cache.resolve_location(&resolver, "tel aviv, Israel").unwrap();
    assert_eq!(first, second);
    assert_eq!(resolver.calls.get(), 1);
    assert_eq!(cache.cached_locations(), 1);

    cache.resolve_location(&resolver, "Haifa").unwrap();
    assert_eq!(resolver.calls.get(), 2);
    assert_eq!(cache.cached_locations(), 2);
}

#[test]
fn test_failed_lookups_are_retried() {
    let resolver = counting();
    let mut cache = RequestCache::new();
    assert!(cache.resolve_location(&resolver, "Atlantis").is_err());
    assert!(cache.resolve_location(&resolver, "Atlantis").is_err());
    assert_eq!(resolver.calls.get(), 2);
    assert_eq!(cache.cached_locations(), 0);
}

#[test]
fn test_solar_windows_are_memoized() {
    let eph = AnalyticEphemeris::new(1900, 2100).unwrap();
    let loc = ObserverLocation::new(32.08, 34.78).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let tz = chrono_tz::Asia::Jerusalem;
    let mut cache = RequestCache::new();

    let a = cache
        .solar_window(&eph, &loc, date, tz, SUN_RISE_SET_ALTITUDE_DEG)
        .unwrap();
    let b = cache
        .solar_window(&eph, &loc, date, tz, SUN_RISE_SET_ALTITUDE_DEG)
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(cache.cached_windows(), 1);
    assert_eq!(
        a,
        resolve_solar_window(&eph, &loc, date, &tz, SUN_RISE_SET_ALTITUDE_DEG).unwrap()
    );

    let next = date.succ_opt().unwrap();
    cache
        .solar_window(&eph, &loc, next, tz, SUN_RISE_SET_ALTITUDE_DEG)
        .unwrap();
    assert_eq!(cache.cached_windows(), 2);
}

#[test]
fn test_polar_failures_not_cached() {
    let eph = AnalyticEphemeris::new(1900, 2100).unwrap();
    let loc = ObserverLocation::new(78.2232, 15.6267).unwrap();
    let date = NaiveDate::from_ymd_opt(2026, 12, 21).unwrap();
    let mut cache = RequestCache::new();
    let tz = chrono_tz::Arctic::Longyearbyen;
    assert!(cache
        .solar_window(&eph, &loc, date, tz, SUN_RISE_SET_ALTITUDE_DEG)
        .is_err());
    assert_eq!(cache.cached_windows(), 0);
}
