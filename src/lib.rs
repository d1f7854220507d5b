pub mod angles;
pub mod catalog;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod frames;
pub mod report;
pub mod resolver;
pub mod riseset;
pub mod solar_window;
pub mod time_grid;
pub mod transform;
pub mod types;
pub mod visibility;

pub use angles::{
    azimuth, deg_to_rad, horizontal_from_hour_angle, hour_angle, normalize_angle,
    parse_sexagesimal, ra_hours_to_degrees, rad_to_deg, wrap_angle_180, DEGREES_PER_HOUR,
};

pub use catalog::Catalog;

pub use config::{parse_timezone, EphemerisSpan, VisibilityConfig, WindowPolicy};

pub use ephemeris::{load_ephemeris, AnalyticEphemeris, EarthState, Ephemeris};

pub use error::{PolarCondition, Result, VisibilityError};

pub use report::{curve, render_table, CurvePoint, ReportRow, ALWAYS_UP, NEVER_UP, NO_EVENT};

pub use resolver::{
    resolve_zone_or_default, Gazetteer, LocationResolver, NominalZoneResolver, RequestCache,
    ResolvedLocation, TimezoneResolver,
};

pub use riseset::{detect_rise_set, peak_index};

pub use solar_window::{resolve_solar_window, sun_event, SunEvent, SUN_RISE_SET_ALTITUDE_DEG};

pub use time_grid::{build_time_grid, step_from_minutes};

pub use transform::{build_frames, horizontal_coordinates, SkyFrame};

pub use types::{
    AltitudeSeries, CelestialObject, EquatorialCoord, HorizontalCoord, ObserverLocation,
    RiseSetEvents, RiseSetRegime, SolarWindow, TimeGrid, VisibilityReport,
};

pub use visibility::{
    fixed_hours_window, summarize_object, NightPlan, ObservationWindow, VisibilityPlanner,
};
