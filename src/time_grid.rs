use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, VisibilityError};
use crate::types::TimeGrid;

pub fn step_from_minutes(minutes: i64) -> Result<Duration> {
    if minutes <= 0 {
        return Err(VisibilityError::InvalidStep(minutes));
    }
    Ok(Duration::minutes(minutes))
}

/// Number of samples from `start` to `end` inclusive at `step`.
pub fn sample_count(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> usize {
    let span_ms = (end - start).num_milliseconds();
    let step_ms = step.num_milliseconds();
    if span_ms <= 0 || step_ms <= 0 {
        return 1;
    }
    (span_ms / step_ms) as usize + 1
}

/// Samples `start, start + step, ...` up to and including `end` when it lands
/// on the grid, otherwise up to the last sample before `end`.
///
/// `start == end` yields the single sample `[start]`.
pub fn build_time_grid(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Result<TimeGrid> {
    if start > end {
        return Err(VisibilityError::InvalidWindow { start, end });
    }
    if step <= Duration::zero() {
        return Err(VisibilityError::InvalidStep(step.num_minutes()));
    }
    if start == end {
        log::debug!("degenerate observation window at {start}, using one sample");
    }

    let n = sample_count(start, end, step);
    let mut instants = Vec::with_capacity(n);
    let mut t = start;
    for _ in 0..n {
        instants.push(t);
        t += step;
    }

    Ok(TimeGrid { step, instants })
}
