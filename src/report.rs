//! Presentation rows: what a table or chart needs from a report, as strings.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::{Result, VisibilityError};
use crate::types::{RiseSetRegime, VisibilityReport};

/// Shown when a rise or set does not happen inside the window.
pub const NO_EVENT: &str = "–";
pub const ALWAYS_UP: &str = "Always up";
pub const NEVER_UP: &str = "Never up";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub label: String,
    pub best_time: String,
    pub altitude_now: f64,
    pub peak_altitude: f64,
    pub visible_now: bool,
    pub rise: String,
    pub set: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePoint {
    pub time: String,
    pub altitude: f64,
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn format_clock<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%H:%M").to_string()
}

impl ReportRow {
    pub fn from_report<Tz: TimeZone>(report: &VisibilityReport, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let event = |t: Option<DateTime<Utc>>| match report.events.regime {
            RiseSetRegime::AlwaysUp => ALWAYS_UP.to_string(),
            RiseSetRegime::NeverUp => NEVER_UP.to_string(),
            RiseSetRegime::Transiting => t
                .map(|t| format_clock(t, tz))
                .unwrap_or_else(|| NO_EVENT.to_string()),
        };

        Self {
            name: report.object.name.clone(),
            label: report.object.label.clone(),
            best_time: format_clock(report.peak_time(), tz),
            altitude_now: round_to_tenth(report.altitude_now()),
            peak_altitude: round_to_tenth(report.peak_altitude()),
            visible_now: report.visible_now(),
            rise: event(report.rise_time()),
            set: event(report.set_time()),
        }
    }
}

pub fn curve<Tz: TimeZone>(report: &VisibilityReport, tz: &Tz) -> Vec<CurvePoint>
where
    Tz::Offset: std::fmt::Display,
{
    report
        .points()
        .map(|(t, altitude)| CurvePoint {
            time: format_clock(t, tz),
            altitude,
        })
        .collect()
}

pub fn render_table(header: &str, rows: &[ReportRow]) -> String {
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Constellation".len());
    let label_width = rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Star".len());

    let mut out = String::new();
    let _ = writeln!(out, "{header}");
    let _ = writeln!(
        out,
        "{:<nw$}  {:<lw$}  {:>9}  {:>8}  {:>7}  {:>9}  {:>9}",
        "Constellation",
        "Star",
        "Best Hour",
        "Alt Now",
        "Visible",
        "Rise",
        "Set",
        nw = name_width,
        lw = label_width
    );
    for r in rows {
        let _ = writeln!(
            out,
            "{:<nw$}  {:<lw$}  {:>9}  {:>8.1}  {:>7}  {:>9}  {:>9}",
            r.name,
            r.label,
            r.best_time,
            r.altitude_now,
            if r.visible_now { "Yes" } else { "No" },
            r.rise,
            r.set,
            nw = name_width,
            lw = label_width
        );
    }
    out
}

/// Altitude curve as text, one line per sample.
pub fn render_curve(title: &str, points: &[CurvePoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    for p in points {
        let bar = "#".repeat(p.altitude.max(0.0).round() as usize / 2);
        let _ = writeln!(out, "{}  {:>6.1}°  {}", p.time, p.altitude, bar);
    }
    out
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| VisibilityError::Config(e.to_string()))
}
