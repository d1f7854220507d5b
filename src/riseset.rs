//! Rise/set classification of a sampled altitude series.
//!
//! Transitions are reported at the first sample on the new side of the
//! horizon, never interpolated. Only the first rise is kept, and the set is the
//! first one after it. A set is reported without a rise only when the object
//! never rises in the window; later cycles in the same night are dropped.

use crate::types::{RiseSetEvents, RiseSetRegime};

fn is_up(altitude: f64) -> bool {
    altitude > 0.0
}

pub fn detect_rise_set(altitudes: &[f64]) -> RiseSetEvents {
    if altitudes.is_empty() || altitudes.iter().all(|&a| !is_up(a)) {
        return RiseSetEvents {
            regime: RiseSetRegime::NeverUp,
            rise: None,
            set: None,
        };
    }
    if altitudes.iter().all(|&a| is_up(a)) {
        return RiseSetEvents {
            regime: RiseSetRegime::AlwaysUp,
            rise: None,
            set: None,
        };
    }

    let mut rise = None;
    let mut set = None;
    for (i, pair) in altitudes.windows(2).enumerate() {
        match (is_up(pair[0]), is_up(pair[1])) {
            (false, true) if rise.is_none() => {
                rise = Some(i + 1);
                // a set seen before the rise belongs to the previous cycle
                set = None;
            }
            (true, false) if set.is_none() => set = Some(i + 1),
            _ => {}
        }
        if rise.is_some() && set.is_some() {
            break;
        }
    }

    RiseSetEvents {
        regime: RiseSetRegime::Transiting,
        rise,
        set,
    }
}

/// Index of the highest altitude; the earliest index wins ties. NaN samples
/// are skipped. `None` only when no sample is a number.
pub fn peak_index(altitudes: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &a) in altitudes.iter().enumerate() {
        if a.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if a <= max => {}
            _ => best = Some((i, a)),
        }
    }
    best.map(|(i, _)| i)
}
