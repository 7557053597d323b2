//! One-time correction and sustaining daily dose for a single parameter.

use crate::trend::Trend;
use reefdose_schemas::parameter::Parameter;
use serde::Serialize;

/// Everything the corrector needs for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionInput {
    pub parameter: Parameter,
    pub current: f64,
    pub target: f64,
    /// Half-width of the on-target band, `>= 0`. Negative or NaN bands are
    /// treated as 0 and logged.
    pub tolerance: f64,
    /// Units per ml in this tank, see [`crate::potency::tank_rate`].
    pub tank_rate: f64,
    /// Declared ml/day, if the user told us.
    pub existing_daily_ml: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoseCorrection {
    /// Negative means the parameter has to come down; liquid dosing cannot do that.
    pub onetime_ml: f64,
    /// `None` when no daily dose was declared, so there is no baseline to adjust.
    /// May be negative when drift outpaces the current dose.
    pub new_daily_ml: Option<f64>,
    /// The part of `new_daily_ml` that offsets observed drift.
    pub daily_adjustment_ml: f64,
    pub within_tolerance: bool,
}

/// Where the parameter has to move: +1 up, -1 down, 0 hold.
fn needed_direction(delta: f64, tolerance: f64) -> f64 {
    if delta.abs() <= tolerance {
        0.0
    } else {
        delta.signum()
    }
}

pub fn correct(input: &CorrectionInput) -> DoseCorrection {
    let tolerance = if input.tolerance >= 0.0 {
        input.tolerance
    } else {
        tracing::warn!(
            parameter = input.parameter.key(),
            tolerance = input.tolerance,
            "tolerance band out of domain, using 0"
        );
        0.0
    };
    let delta = input.target - input.current;
    let direction = needed_direction(delta, tolerance);
    let within_tolerance = direction == 0.0;

    let onetime_ml = if within_tolerance {
        0.0
    } else {
        delta / input.tank_rate
    };

    // Drift counts only when it moves away from where we need to be. While on
    // target any drift at all is away.
    let slope = input.trend.slope_per_day;
    let drifting_away = input.trend.is_available() && (within_tolerance || slope * direction < 0.0);

    let daily_adjustment_ml = match input.existing_daily_ml {
        Some(_) if drifting_away => -slope / input.tank_rate,
        _ => 0.0,
    };
    let new_daily_ml = input
        .existing_daily_ml
        .map(|existing| existing + daily_adjustment_ml);

    tracing::debug!(
        parameter = input.parameter.key(),
        delta,
        onetime_ml,
        ?new_daily_ml,
        drifting_away,
        "computed correction"
    );

    DoseCorrection {
        onetime_ml,
        new_daily_ml,
        daily_adjustment_ml,
        within_tolerance,
    }
}
