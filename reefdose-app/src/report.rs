//! Turns an assessment into something a person (or another program) reads.

use anyhow::{Context, Result};
use csv::Writer;
use reefdose_core::{
    assembler::{Assessment, Recommendation, SkipReason},
    gate::FollowUpQuestion,
    presentation::{self, DoseAction},
};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct RecommendationRow<'a> {
    parameter: &'a str,
    unit: &'a str,
    product_id: &'a str,
    action: &'static str,
    onetime_ml: f64,
    /// `unknown` when no daily dose was declared.
    daily_action: &'static str,
    new_daily_ml: Option<f64>,
    current_value: f64,
    target_value: f64,
    tolerance: f64,
    tank_rate_units_per_ml: f64,
    slope_per_day: f64,
    sample_count: usize,
}

impl<'a> RecommendationRow<'a> {
    fn from_recommendation(rec: &'a Recommendation, increment: f64) -> Self {
        let (action, onetime_ml) =
            action_columns(DoseAction::classify(rec.onetime_correction_ml, increment));
        let (daily_action, new_daily_ml) = match presentation::daily_action(rec, increment) {
            Some(daily) => {
                let (label, ml) = action_columns(daily);
                (label, Some(ml))
            }
            None => ("unknown", None),
        };
        let ex = &rec.explanation;
        Self {
            parameter: rec.parameter.key(),
            unit: rec.unit,
            product_id: &rec.product_id,
            action,
            onetime_ml,
            daily_action,
            new_daily_ml,
            current_value: ex.current_value,
            target_value: ex.target_value,
            tolerance: ex.tolerance,
            tank_rate_units_per_ml: ex.tank_rate_units_per_ml,
            slope_per_day: ex.slope_per_day,
            sample_count: ex.sample_count,
        }
    }
}

/// Action label and the (non-negative) ml figure that goes with it.
fn action_columns(action: DoseAction) -> (&'static str, f64) {
    match action {
        DoseAction::Dose { ml } => ("dose", ml),
        DoseAction::Reduce { ml_equivalent } => ("reduce", ml_equivalent),
        DoseAction::Hold => ("hold", 0.0),
    }
}

pub fn print_questions(questions: &[FollowUpQuestion]) {
    println!("Before any dose can be recommended, please answer:");
    for (i, question) in questions.iter().enumerate() {
        println!("  {}. {}", i + 1, question);
    }
}

fn skip_message(reason: &SkipReason) -> String {
    match reason {
        SkipReason::NoRecentReading => "no reading inside the window".to_string(),
        SkipReason::NoPreferredProduct => "no preferred product selected".to_string(),
        SkipReason::UnusablePotency { detail } => detail.to_string(),
    }
}

pub fn print_text(assessment: &Assessment, increment: f64) {
    match assessment {
        Assessment::Blocked { questions } => print_questions(questions),
        Assessment::Ready {
            recommendations,
            skipped,
        } => {
            if recommendations.is_empty() {
                println!("No parameter has a target to correct toward.");
            }
            for rec in recommendations {
                println!("\n--- {} ({}) ---", rec.parameter.display_name(), rec.product_name);
                for line in presentation::narrate(rec, increment) {
                    println!("{}", line);
                }
            }
            for skip in skipped {
                println!("\nSkipped {}: {}", skip.parameter, skip_message(&skip.reason));
            }
        }
    }
}

/// Questions are rendered with their human-readable text alongside the
/// structured fields.
pub fn to_json(assessment: &Assessment) -> Result<String> {
    let mut value = serde_json::to_value(assessment)?;
    if let Some(questions) = value.get_mut("questions").and_then(|q| q.as_array_mut()) {
        for (json, question) in questions.iter_mut().zip(assessment.questions()) {
            if let Some(obj) = json.as_object_mut() {
                obj.insert("text".to_string(), question.to_string().into());
            }
        }
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn export_csv(path: &Path, recommendations: &[Recommendation], increment: f64) -> Result<()> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {:?}", path))?;
    for rec in recommendations {
        writer.serialize(RecommendationRow::from_recommendation(rec, increment))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reefdose_core::assembler::Explanation;
    use reefdose_schemas::parameter::Parameter;

    fn recommendation() -> Recommendation {
        Recommendation {
            parameter: Parameter::Ca,
            unit: "ppm",
            product_id: "ca-b".to_string(),
            product_name: "Calcium Part B".to_string(),
            onetime_correction_ml: -12.34,
            new_daily_dose_ml: Some(20.06),
            explanation: Explanation {
                current_value: 450.0,
                measured_at: Utc.with_ymd_and_hms(2024, 6, 14, 9, 0, 0).unwrap(),
                target_value: 430.0,
                tolerance: 10.0,
                tank_volume_liters: 300.0,
                tank_rate_units_per_ml: 1.62,
                slope_per_day: 0.0,
                sample_count: 1,
                existing_daily_ml: Some(20.0),
                daily_adjustment_ml: 0.0,
                within_tolerance: false,
            },
        }
    }

    #[test]
    fn exports_rounded_rows() {
        let file = tempfile::NamedTempFile::new().unwrap();
        export_csv(file.path(), &[recommendation()], 0.1).unwrap();

        let mut reader = csv::Reader::from_path(file.path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "parameter");
        assert_eq!(&headers[3], "action");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "ca");
        assert_eq!(&rows[0][3], "reduce");
        let onetime: f64 = rows[0][4].parse().unwrap();
        assert!((onetime - 12.3).abs() < 1e-9);
    }

    #[test]
    fn exports_daily_reduction_and_unknown_baseline() {
        let mut reducing = recommendation();
        reducing.new_daily_dose_ml = Some(-3.0);
        let mut undeclared = recommendation();
        undeclared.new_daily_dose_ml = None;
        undeclared.explanation.existing_daily_ml = None;

        let file = tempfile::NamedTempFile::new().unwrap();
        export_csv(file.path(), &[recommendation(), reducing, undeclared], 0.1).unwrap();

        let mut reader = csv::Reader::from_path(file.path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[5], "daily_action");
        assert_eq!(&headers[6], "new_daily_ml");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][5], "dose");
        assert!((rows[0][6].parse::<f64>().unwrap() - 20.1).abs() < 1e-9);
        assert_eq!(&rows[1][5], "reduce");
        assert!((rows[1][6].parse::<f64>().unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(&rows[2][5], "unknown");
        assert_eq!(&rows[2][6], "");
    }

    #[test]
    fn json_questions_carry_text() {
        let assessment = Assessment::Blocked {
            questions: vec![
                FollowUpQuestion::TankVolume,
                FollowUpQuestion::CurrentDailyDose {
                    parameter: Parameter::Mg,
                },
            ],
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&assessment).unwrap()).unwrap();
        assert_eq!(json["status"], "blocked");
        assert_eq!(json["questions"][0]["kind"], "tank_volume");
        assert_eq!(json["questions"][0]["text"], "What is your tank volume?");
        assert_eq!(json["questions"][1]["parameter"], "mg");
    }
}
