//! Runs the gate, then the per-parameter pipeline, and packages the figures
//! behind each recommendation.

use crate::{
    config::EngineConfig,
    corrector::{self, CorrectionInput},
    error::DoseError,
    gate::{self, FollowUpQuestion},
    potency::{self, Unusable},
    trend,
};
use chrono::{DateTime, Utc};
use reefdose_schemas::{
    dosing::{CurrentDose, TargetRow, ToleranceRow},
    file_formats::SnapshotFile,
    parameter::Parameter,
    product::Product,
    reading::Reading,
    tank::Tank,
};
use serde::Serialize;

/// One immutable bundle of caller-fetched input. The engine never looks
/// anything up on its own.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DosingSnapshot {
    pub tank: Tank,
    pub targets: TargetRow,
    pub tolerances: ToleranceRow,
    pub preferred_products: Vec<Product>,
    pub current_doses: Vec<CurrentDose>,
    pub readings: Vec<Reading>,
}

impl From<SnapshotFile> for DosingSnapshot {
    fn from(file: SnapshotFile) -> Self {
        Self {
            tank: file.tank,
            targets: file.targets,
            tolerances: file.tolerances,
            preferred_products: file.preferred_products,
            current_doses: file.current_doses,
            readings: file.readings,
        }
    }
}

impl DosingSnapshot {
    /// The product selected for a parameter. The first selection wins.
    pub fn preferred_product(&self, parameter: Parameter) -> Option<&Product> {
        self.preferred_products
            .iter()
            .find(|p| p.parameter == parameter)
    }
}

/// The raw figures a recommendation was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub current_value: f64,
    pub measured_at: DateTime<Utc>,
    pub target_value: f64,
    pub tolerance: f64,
    pub tank_volume_liters: f64,
    pub tank_rate_units_per_ml: f64,
    pub slope_per_day: f64,
    pub sample_count: usize,
    pub existing_daily_ml: Option<f64>,
    pub daily_adjustment_ml: f64,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub parameter: Parameter,
    pub unit: &'static str,
    pub product_id: String,
    pub product_name: String,
    /// Unrounded. Negative values call for a reduction, not a dose.
    pub onetime_correction_ml: f64,
    /// Unrounded. `None` when no daily dose was declared; may be negative when
    /// drift outpaces the current dose.
    pub new_daily_dose_ml: Option<f64>,
    pub explanation: Explanation,
}

/// Why a parameter with a target produced no recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NoRecentReading,
    NoPreferredProduct,
    UnusablePotency { detail: Unusable },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub parameter: Parameter,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assessment {
    Blocked {
        questions: Vec<FollowUpQuestion>,
    },
    Ready {
        recommendations: Vec<Recommendation>,
        skipped: Vec<Skipped>,
    },
}

impl Assessment {
    pub fn questions(&self) -> &[FollowUpQuestion] {
        match self {
            Assessment::Blocked { questions } => questions,
            Assessment::Ready { .. } => &[],
        }
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            Assessment::Blocked { .. } => &[],
            Assessment::Ready {
                recommendations, ..
            } => recommendations,
        }
    }
}

/// Gate first; when anything is missing nothing at all is computed.
/// `now` anchors the reading window and is the only notion of time used.
pub fn assemble(
    parameters: &[Parameter],
    snapshot: &DosingSnapshot,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<Assessment, DoseError> {
    let questions = gate::check_readiness(
        &snapshot.tank,
        &snapshot.current_doses,
        &snapshot.preferred_products,
        &config.sustaining_parameters,
    );
    if !questions.is_empty() {
        return Ok(Assessment::Blocked { questions });
    }
    let Some(tank_volume) = snapshot.tank.usable_volume() else {
        return Ok(Assessment::Blocked {
            questions: vec![FollowUpQuestion::TankVolume],
        });
    };

    let mut recommendations = Vec::new();
    let mut skipped = Vec::new();

    for &parameter in parameters {
        let Some(target) = snapshot.targets.get(parameter) else {
            continue;
        };

        let Some(product) = snapshot.preferred_product(parameter) else {
            skipped.push(Skipped {
                parameter,
                reason: SkipReason::NoPreferredProduct,
            });
            continue;
        };

        let tank_rate = match potency::tank_rate(&product.potency, tank_volume) {
            Ok(rate) => rate,
            Err(detail) => {
                skipped.push(Skipped {
                    parameter,
                    reason: SkipReason::UnusablePotency { detail },
                });
                continue;
            }
        };

        let window = trend::window(&snapshot.readings, parameter, now, config.window_days)?;
        let Some(current) = trend::latest(&window).cloned() else {
            tracing::debug!(parameter = parameter.key(), "no reading in window");
            skipped.push(Skipped {
                parameter,
                reason: SkipReason::NoRecentReading,
            });
            continue;
        };
        let fitted = trend::estimate_slope_with(&window, config.degenerate_denominator);

        let tolerance = snapshot.tolerances.get(parameter).unwrap_or(0.0);
        let existing_daily_ml = gate::declared_daily_dose(&snapshot.current_doses, parameter);

        let correction = corrector::correct(&CorrectionInput {
            parameter,
            current: current.value,
            target,
            tolerance,
            tank_rate,
            existing_daily_ml,
            trend: fitted,
        });

        recommendations.push(Recommendation {
            parameter,
            unit: parameter.unit(),
            product_id: product.product_id.clone(),
            product_name: product.product_name.clone(),
            onetime_correction_ml: correction.onetime_ml,
            new_daily_dose_ml: correction.new_daily_ml,
            explanation: Explanation {
                current_value: current.value,
                measured_at: current.measured_at,
                target_value: target,
                tolerance,
                tank_volume_liters: tank_volume,
                tank_rate_units_per_ml: tank_rate,
                slope_per_day: fitted.slope_per_day,
                sample_count: fitted.sample_count,
                existing_daily_ml,
                daily_adjustment_ml: correction.daily_adjustment_ml,
                within_tolerance: correction.within_tolerance,
            },
        });
    }

    Ok(Assessment::Ready {
        recommendations,
        skipped,
    })
}
