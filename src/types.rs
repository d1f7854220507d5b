use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::angles::DEGREES_PER_HOUR;
use crate::error::{Result, VisibilityError};

/// Geodetic position of the observer, degrees (east-positive longitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl ObserverLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(VisibilityError::InvalidCoordinate(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(VisibilityError::InvalidCoordinate(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Fixed J2000 sky position: right ascension in hours, declination in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoord {
    pub ra_hours: f64,
    pub dec_deg: f64,
}

impl EquatorialCoord {
    pub fn new(ra_hours: f64, dec_deg: f64) -> Result<Self> {
        if !(0.0..24.0).contains(&ra_hours) {
            return Err(VisibilityError::InvalidCoordinate(format!(
                "right ascension {ra_hours}h outside [0, 24)"
            )));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(VisibilityError::InvalidCoordinate(format!(
                "declination {dec_deg}° outside [-90, 90]"
            )));
        }
        Ok(Self { ra_hours, dec_deg })
    }

    pub fn ra_degrees(&self) -> f64 {
        self.ra_hours * DEGREES_PER_HOUR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalCoord {
    /// Degrees above the horizon; negative below.
    pub altitude: f64,
    /// Degrees east of north, in [0, 360).
    pub azimuth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CelestialObject {
    pub name: String,
    pub label: String,
    pub coord: EquatorialCoord,
}

/// Evenly spaced, strictly increasing sample instants.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    pub step: Duration,
    pub instants: Vec<DateTime<Utc>>,
}

impl TimeGrid {
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.instants.first().copied()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.instants.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<DateTime<Utc>> {
        self.instants.get(index).copied()
    }
}

/// Altitude (and azimuth) per grid sample, co-indexed with the [`TimeGrid`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AltitudeSeries {
    pub altitudes: Vec<f64>,
    pub azimuths: Vec<f64>,
}

impl AltitudeSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            altitudes: Vec::with_capacity(capacity),
            azimuths: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, hz: HorizontalCoord) {
        self.altitudes.push(hz.altitude);
        self.azimuths.push(hz.azimuth);
    }

    pub fn len(&self) -> usize {
        self.altitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.altitudes.is_empty()
    }
}

/// One night: sunset of the requested date to the sunrise that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolarWindow {
    pub sunset: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiseSetRegime {
    AlwaysUp,
    NeverUp,
    Transiting,
}

/// Grid indices of the first rise and first set inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RiseSetEvents {
    pub regime: RiseSetRegime,
    pub rise: Option<usize>,
    pub set: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityReport {
    pub object: CelestialObject,
    pub grid: Arc<TimeGrid>,
    pub series: AltitudeSeries,
    pub peak_index: usize,
    pub events: RiseSetEvents,
}

impl VisibilityReport {
    /// Altitude at grid index 0.
    pub fn altitude_now(&self) -> f64 {
        self.series.altitudes[0]
    }

    pub fn visible_now(&self) -> bool {
        self.altitude_now() > 0.0
    }

    pub fn peak_altitude(&self) -> f64 {
        self.series.altitudes[self.peak_index]
    }

    pub fn peak_time(&self) -> DateTime<Utc> {
        self.grid.instants[self.peak_index]
    }

    pub fn rise_time(&self) -> Option<DateTime<Utc>> {
        self.events.rise.and_then(|i| self.grid.get(i))
    }

    pub fn set_time(&self) -> Option<DateTime<Utc>> {
        self.events.set.and_then(|i| self.grid.get(i))
    }

    /// (instant, altitude) pairs for charting.
    pub fn points(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.grid
            .instants
            .iter()
            .copied()
            .zip(self.series.altitudes.iter().copied())
    }
}
