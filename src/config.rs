use std::path::Path;

use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VisibilityError};
use crate::solar_window::SUN_RISE_SET_ALTITUDE_DEG;
use crate::time_grid::step_from_minutes;

/// What to do when the Sun does not set or rise on the requested date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Report `NoSolarEvent` to the caller.
    #[default]
    Strict,
    /// Use fixed local clock hours instead; `end_hour <= start_hour` ends on
    /// the following day.
    FixedHours { start_hour: u32, end_hour: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisSpan {
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for EphemerisSpan {
    fn default() -> Self {
        Self {
            start_year: 1900,
            end_year: 2100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub step_minutes: i64,
    pub default_timezone: String,
    pub sun_altitude_deg: f64,
    pub window: WindowPolicy,
    pub parallel: bool,
    pub ephemeris: EphemerisSpan,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            step_minutes: 30,
            default_timezone: "UTC".to_string(),
            sun_altitude_deg: SUN_RISE_SET_ALTITUDE_DEG,
            window: WindowPolicy::Strict,
            parallel: true,
            ephemeris: EphemerisSpan::default(),
        }
    }
}

impl VisibilityConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| VisibilityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        log::info!("loading configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        step_from_minutes(self.step_minutes)?;
        self.default_tz()?;
        if !(-90.0..=90.0).contains(&self.sun_altitude_deg) {
            return Err(VisibilityError::Config(format!(
                "sun_altitude_deg {} outside [-90, 90]",
                self.sun_altitude_deg
            )));
        }
        if let WindowPolicy::FixedHours {
            start_hour,
            end_hour,
        } = self.window
        {
            if start_hour > 23 || end_hour > 23 {
                return Err(VisibilityError::Config(format!(
                    "fixed window hours {start_hour}..{end_hour} must be 0-23"
                )));
            }
        }
        if self.ephemeris.start_year >= self.ephemeris.end_year {
            return Err(VisibilityError::Config(format!(
                "ephemeris span {}..{} is empty",
                self.ephemeris.start_year, self.ephemeris.end_year
            )));
        }
        Ok(())
    }

    pub fn step(&self) -> Result<Duration> {
        step_from_minutes(self.step_minutes)
    }

    pub fn default_tz(&self) -> Result<Tz> {
        parse_timezone(&self.default_timezone)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| VisibilityError::UnknownTimezone(name.to_string()))
}
