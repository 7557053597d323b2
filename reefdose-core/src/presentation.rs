//! Display-side helpers. Rounding happens here and only here.

use crate::assembler::Recommendation;
use serde::Serialize;

/// Rounds `value` to the nearest multiple of `increment`. Non-positive or
/// non-finite increments leave the value untouched.
pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    if !(increment.is_finite() && increment > 0.0) {
        return value;
    }
    // `+ 0.0` folds -0.0 into 0.0.
    (value / increment).round() * increment + 0.0
}

/// What the user should actually do with a (possibly negative) ml figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DoseAction {
    Dose { ml: f64 },
    /// Liquid dosing cannot subtract; lower the level by other means.
    Reduce { ml_equivalent: f64 },
    Hold,
}

impl DoseAction {
    pub fn classify(ml: f64, increment: f64) -> Self {
        let rounded = round_to_increment(ml, increment);
        if rounded > 0.0 {
            DoseAction::Dose { ml: rounded }
        } else if rounded < 0.0 {
            DoseAction::Reduce {
                ml_equivalent: -rounded,
            }
        } else {
            DoseAction::Hold
        }
    }
}

fn decimals(increment: f64) -> usize {
    let text = format!("{}", increment);
    text.split_once('.').map_or(0, |(_, frac)| frac.len())
}

fn ml(value: f64, increment: f64) -> String {
    format!(
        "{:.*}",
        decimals(increment),
        round_to_increment(value, increment)
    )
}

fn signed_ml(value: f64, increment: f64) -> String {
    format!(
        "{:+.*}",
        decimals(increment),
        round_to_increment(value, increment)
    )
}

/// The daily-dose counterpart of [`DoseAction::classify`]. `None` means there
/// was no declared dose to start from, which is not the same as "dose 0".
pub fn daily_action(rec: &Recommendation, increment: f64) -> Option<DoseAction> {
    rec.new_daily_dose_ml
        .map(|ml| DoseAction::classify(ml, increment))
}

/// "Show the math": a short natural-language account of one recommendation.
pub fn narrate(rec: &Recommendation, increment: f64) -> Vec<String> {
    let ex = &rec.explanation;
    let unit = rec.unit;
    let name = rec.parameter.display_name();
    let mut lines = Vec::new();

    lines.push(format!(
        "{}: latest reading {:.2} {} (taken {}), target {:.2} ± {:.2} {}.",
        name,
        ex.current_value,
        unit,
        ex.measured_at.format("%Y-%m-%d %H:%M UTC"),
        ex.target_value,
        ex.tolerance,
        unit
    ));
    lines.push(format!(
        "'{}' changes {} by {:.4} {} per ml in {:.0} L.",
        rec.product_name, name, ex.tank_rate_units_per_ml, unit, ex.tank_volume_liters
    ));

    if ex.sample_count >= 2 {
        lines.push(format!(
            "Trend over {} readings: {:+.3} {}/day.",
            ex.sample_count, ex.slope_per_day, unit
        ));
    } else {
        lines.push(format!(
            "Only {} reading(s) in the window; no trend estimated.",
            ex.sample_count
        ));
    }

    let gap = ex.target_value - ex.current_value;
    match DoseAction::classify(rec.onetime_correction_ml, increment) {
        DoseAction::Dose { .. } => lines.push(format!(
            "Dose {} ml once to raise {} by {:.2} {}.",
            ml(rec.onetime_correction_ml, increment),
            name,
            gap,
            unit
        )),
        DoseAction::Reduce { ml_equivalent } => lines.push(format!(
            "{} is {:.2} {} above target. Reduce it (e.g. with a water change) instead of dosing; this equals {} ml of product.",
            name,
            -gap,
            unit,
            ml(ml_equivalent, increment)
        )),
        DoseAction::Hold if ex.within_tolerance => {
            lines.push("Within tolerance; no one-time correction needed.".to_string())
        }
        DoseAction::Hold => lines.push(format!(
            "Correction rounds to less than {} ml; nothing to dose now.",
            ml(increment, increment)
        )),
    }

    match (ex.existing_daily_ml, rec.new_daily_dose_ml) {
        (Some(existing), Some(_)) if ex.daily_adjustment_ml == 0.0 => lines.push(format!(
            "Keep the daily dose at {} ml/day.",
            ml(existing, increment)
        )),
        (Some(existing), Some(new_daily)) if new_daily < 0.0 => lines.push(format!(
            "Drift exceeds the current {} ml/day; stop dosing and reduce {} by other means.",
            ml(existing, increment),
            name
        )),
        (Some(existing), Some(new_daily)) => lines.push(format!(
            "Change the daily dose from {} to {} ml/day ({} ml/day to offset drift).",
            ml(existing, increment),
            ml(new_daily, increment),
            signed_ml(ex.daily_adjustment_ml, increment)
        )),
        _ => lines.push(format!(
            "No daily dose declared for {}; daily recommendation not adjusted.",
            name
        )),
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::Explanation;
    use chrono::{TimeZone, Utc};
    use reefdose_schemas::parameter::Parameter;

    fn recommendation(onetime: f64, new_daily: Option<f64>, adjustment: f64) -> Recommendation {
        Recommendation {
            parameter: Parameter::Alk,
            unit: "dKH",
            product_id: "alk-a".to_string(),
            product_name: "Alk Part A".to_string(),
            onetime_correction_ml: onetime,
            new_daily_dose_ml: new_daily,
            explanation: Explanation {
                current_value: 7.0,
                measured_at: Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap(),
                target_value: 8.0,
                tolerance: 0.1,
                tank_volume_liters: 70.0,
                tank_rate_units_per_ml: 1.0,
                slope_per_day: -0.25,
                sample_count: 4,
                existing_daily_ml: Some(10.0),
                daily_adjustment_ml: adjustment,
                within_tolerance: false,
            },
        }
    }

    #[test]
    fn rounds_to_increment() {
        assert!((round_to_increment(1.234, 0.1) - 1.2).abs() < 1e-12);
        assert!((round_to_increment(1.26, 0.25) - 1.25).abs() < 1e-12);
        assert_eq!(round_to_increment(-0.01, 0.1), 0.0);
        assert!(round_to_increment(-0.01, 0.1).is_sign_positive());
        assert_eq!(round_to_increment(3.3, 0.0), 3.3);
    }

    #[test]
    fn classifies_actions() {
        assert!(matches!(
            DoseAction::classify(2.04, 0.1),
            DoseAction::Dose { ml } if (ml - 2.0).abs() < 1e-12
        ));
        assert!(matches!(
            DoseAction::classify(-1.96, 0.1),
            DoseAction::Reduce { ml_equivalent } if (ml_equivalent - 2.0).abs() < 1e-12
        ));
        assert_eq!(DoseAction::classify(0.03, 0.1), DoseAction::Hold);
    }

    #[test]
    fn narrates_dose_and_drift() {
        let lines = narrate(&recommendation(1.0, Some(10.26), 0.26), 0.1);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("alkalinity: latest reading 7.00 dKH"));
        assert_eq!(lines[2], "Trend over 4 readings: -0.250 dKH/day.");
        assert_eq!(lines[3], "Dose 1.0 ml once to raise alkalinity by 1.00 dKH.");
        assert_eq!(
            lines[4],
            "Change the daily dose from 10.0 to 10.3 ml/day (+0.3 ml/day to offset drift)."
        );
    }

    #[test]
    fn narrates_reduction() {
        let mut rec = recommendation(-1.5, Some(10.0), 0.0);
        rec.explanation.current_value = 9.5;
        let lines = narrate(&rec, 0.1);
        assert!(lines[3].contains("1.50 dKH above target"));
        assert!(lines[3].ends_with("this equals 1.5 ml of product."));
        assert_eq!(lines[4], "Keep the daily dose at 10.0 ml/day.");
    }

    #[test]
    fn daily_action_distinguishes_missing_baseline_from_reduction() {
        let mut rec = recommendation(0.0, None, 0.0);
        rec.explanation.existing_daily_ml = None;
        assert_eq!(daily_action(&rec, 0.1), None);
        assert_eq!(
            narrate(&rec, 0.1)[4],
            "No daily dose declared for alkalinity; daily recommendation not adjusted."
        );

        let rec = recommendation(0.0, Some(-3.0), -13.0);
        assert!(matches!(
            daily_action(&rec, 0.1),
            Some(DoseAction::Reduce { ml_equivalent }) if (ml_equivalent - 3.0).abs() < 1e-9
        ));
        assert!(narrate(&rec, 0.1)[4].starts_with("Drift exceeds the current 10.0 ml/day"));
    }
}
