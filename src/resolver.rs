//! Place-name and timezone lookups, plus the per-request memo table.
//!
//! Geocoding and timezone lookup are external services; the traits here are
//! the seam. The crate ships an offline [`Gazetteer`] and a longitude-based
//! [`NominalZoneResolver`] so the pipeline runs without network access.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::config::parse_timezone;
use crate::ephemeris::Ephemeris;
use crate::error::{Result, VisibilityError};
use crate::solar_window::resolve_solar_window;
use crate::types::{ObserverLocation, SolarWindow};

const BUILTIN_PLACES: &str = include_str!("../data/places.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub location: ObserverLocation,
    pub address: String,
    /// IANA zone when the source knows it.
    pub timezone: Option<String>,
}

pub trait LocationResolver {
    /// Fails with [`VisibilityError::LocationNotFound`] for unknown places.
    fn resolve(&self, place: &str) -> Result<ResolvedLocation>;
}

pub trait TimezoneResolver {
    fn resolve_zone(&self, latitude: f64, longitude: f64) -> Option<Tz>;
}

/// Zone from `resolver`, or `default` when it has no answer.
pub fn resolve_zone_or_default(
    resolver: &dyn TimezoneResolver,
    latitude: f64,
    longitude: f64,
    default: Tz,
) -> Tz {
    match resolver.resolve_zone(latitude, longitude) {
        Some(tz) => tz,
        None => {
            log::warn!(
                "no timezone for ({latitude:.4}, {longitude:.4}), falling back to {}",
                default.name()
            );
            default
        }
    }
}

/// Fixed-offset `Etc/GMT±N` zone nearest the observer's meridian.
#[derive(Debug, Clone, Copy, Default)]
pub struct NominalZoneResolver;

impl TimezoneResolver for NominalZoneResolver {
    fn resolve_zone(&self, _latitude: f64, longitude: f64) -> Option<Tz> {
        if !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        let hours = (longitude / 15.0).round() as i32;
        // Etc/GMT names carry the POSIX sign: Etc/GMT-2 is UTC+2.
        let name = match hours {
            0 => "Etc/GMT".to_string(),
            h if h > 0 => format!("Etc/GMT-{h}"),
            h => format!("Etc/GMT+{}", -h),
        };
        name.parse().ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PlaceEntry {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    address: Option<String>,
    latitude: f64,
    longitude: f64,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlacesFile {
    #[serde(default)]
    place: Vec<PlaceEntry>,
}

/// Offline name → coordinates table.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    places: Vec<PlaceEntry>,
}

impl Gazetteer {
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_PLACES)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: PlacesFile =
            toml::from_str(text).map_err(|e| VisibilityError::Config(e.to_string()))?;
        for p in &file.place {
            ObserverLocation::new(p.latitude, p.longitude)?;
            if let Some(zone) = &p.timezone {
                parse_timezone(zone)?;
            }
        }
        Ok(Self { places: file.place })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn lookup(&self, place: &str) -> Option<&PlaceEntry> {
        let wanted = normalize_place(place);
        self.places.iter().find(|p| {
            normalize_place(&p.name) == wanted
                || p.aliases.iter().any(|a| normalize_place(a) == wanted)
        })
    }
}

/// Case-folded, whitespace-collapsed, without a trailing ", country" part.
fn normalize_place(place: &str) -> String {
    let head = place.split(',').next().unwrap_or(place);
    head.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl LocationResolver for Gazetteer {
    fn resolve(&self, place: &str) -> Result<ResolvedLocation> {
        let entry = self
            .lookup(place)
            .ok_or_else(|| VisibilityError::LocationNotFound(place.trim().to_string()))?;
        Ok(ResolvedLocation {
            location: ObserverLocation::new(entry.latitude, entry.longitude)?,
            address: entry.address.clone().unwrap_or_else(|| entry.name.clone()),
            timezone: entry.timezone.clone(),
        })
    }
}

impl TimezoneResolver for Gazetteer {
    /// Zone of a listed place within half a degree of the query.
    fn resolve_zone(&self, latitude: f64, longitude: f64) -> Option<Tz> {
        self.places
            .iter()
            .filter(|p| {
                (p.latitude - latitude).abs() <= 0.5 && (p.longitude - longitude).abs() <= 0.5
            })
            .find_map(|p| p.timezone.as_deref().and_then(|z| z.parse().ok()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WindowKey {
    latitude_bits: u64,
    longitude_bits: u64,
    date: NaiveDate,
    zone: &'static str,
    altitude_bits: u64,
}

/// Memo table for one request (or one interactive session).
///
/// Only successful lookups are remembered; failures are re-attempted.
#[derive(Debug, Default)]
pub struct RequestCache {
    locations: HashMap<String, ResolvedLocation>,
    windows: HashMap<WindowKey, SolarWindow>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_location(
        &mut self,
        resolver: &dyn LocationResolver,
        place: &str,
    ) -> Result<ResolvedLocation> {
        let key = normalize_place(place);
        if let Some(hit) = self.locations.get(&key) {
            return Ok(hit.clone());
        }
        let resolved = resolver.resolve(place)?;
        log::debug!("resolved '{place}' to {}", resolved.address);
        self.locations.insert(key, resolved.clone());
        Ok(resolved)
    }

    pub fn solar_window<E: Ephemeris + ?Sized>(
        &mut self,
        ephemeris: &E,
        location: &ObserverLocation,
        date: NaiveDate,
        tz: Tz,
        altitude_deg: f64,
    ) -> Result<SolarWindow> {
        let key = WindowKey {
            latitude_bits: location.latitude.to_bits(),
            longitude_bits: location.longitude.to_bits(),
            date,
            zone: tz.name(),
            altitude_bits: altitude_deg.to_bits(),
        };
        if let Some(hit) = self.windows.get(&key) {
            return Ok(*hit);
        }
        let window = resolve_solar_window(ephemeris, location, date, &tz, altitude_deg)?;
        self.windows.insert(key, window);
        Ok(window)
    }

    pub fn cached_locations(&self) -> usize {
        self.locations.len()
    }

    pub fn cached_windows(&self) -> usize {
        self.windows.len()
    }
}
