//! Least-squares drift of one parameter over the recent reading window.

use crate::error::DoseError;
use chrono::{DateTime, TimeDelta, Utc};
use reefdose_schemas::{parameter::Parameter, reading::Reading};
use serde::Serialize;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Default threshold under which the regression denominator counts as zero.
pub const DEGENERATE_DENOMINATOR: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    /// Units per day. Zero when there is not enough spread in time to fit.
    pub slope_per_day: f64,
    pub sample_count: usize,
}

impl Trend {
    pub fn flat(sample_count: usize) -> Self {
        Self {
            slope_per_day: 0.0,
            sample_count,
        }
    }

    /// A trend is only evidence of drift when it was fitted on two or more points.
    pub fn is_available(&self) -> bool {
        self.sample_count >= 2 && self.slope_per_day != 0.0
    }
}

pub fn estimate_slope(readings: &[Reading]) -> Trend {
    estimate_slope_with(readings, DEGENERATE_DENOMINATOR)
}

/// Ordinary least squares of value against days since the earliest reading.
///
/// Input order does not matter: readings are sorted by time (then by value,
/// so the summation order is canonical) before fitting.
pub fn estimate_slope_with(readings: &[Reading], degenerate_denominator: f64) -> Trend {
    let sample_count = readings.len();
    if sample_count < 2 {
        return Trend::flat(sample_count);
    }

    let mut sorted: Vec<&Reading> = readings.iter().collect();
    sorted.sort_by(|a, b| {
        a.measured_at
            .cmp(&b.measured_at)
            .then_with(|| a.value.total_cmp(&b.value))
    });

    let origin = sorted[0].measured_at;
    let points: Vec<(f64, f64)> = sorted
        .iter()
        .map(|r| (days_between(origin, r.measured_at), r.value))
        .collect();

    let n = sample_count as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in &points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    if sxx.abs() < degenerate_denominator {
        tracing::warn!(
            sample_count,
            denominator = sxx,
            "readings share one timestamp, trend treated as flat"
        );
        return Trend::flat(sample_count);
    }

    let slope_per_day = sxy / sxx;
    tracing::debug!(sample_count, slope_per_day, "fitted trend");
    Trend {
        slope_per_day,
        sample_count,
    }
}

/// Readings of `parameter` taken in `[now - window_days, now]`, oldest first.
/// Readings sharing a timestamp keep the order they were supplied in.
pub fn window(
    readings: &[Reading],
    parameter: Parameter,
    now: DateTime<Utc>,
    window_days: f64,
) -> Result<Vec<Reading>, DoseError> {
    let span = window_span(window_days)?;
    // A window reaching past the earliest representable instant covers everything.
    let start = now
        .checked_sub_signed(span)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut selected: Vec<Reading> = readings
        .iter()
        .filter(|r| r.parameter == parameter)
        .filter(|r| r.measured_at >= start && r.measured_at <= now)
        .cloned()
        .collect();
    selected.sort_by_key(|r| r.measured_at);
    Ok(selected)
}

/// Converts a window length in days to a duration, rejecting lengths that
/// are not positive or do not fit chrono's range.
pub fn window_span(window_days: f64) -> Result<TimeDelta, DoseError> {
    let millis = window_days * MILLIS_PER_DAY;
    if !(millis.is_finite() && millis > 0.0 && millis < i64::MAX as f64) {
        return Err(DoseError::WindowOutOfRange(window_days));
    }
    TimeDelta::try_milliseconds(millis as i64).ok_or(DoseError::WindowOutOfRange(window_days))
}

/// The most recent reading of a window produced by [`window`].
pub fn latest(window: &[Reading]) -> Option<&Reading> {
    window.last()
}

fn days_between(origin: DateTime<Utc>, at: DateTime<Utc>) -> f64 {
    (at - origin).num_milliseconds() as f64 / MILLIS_PER_DAY
}
