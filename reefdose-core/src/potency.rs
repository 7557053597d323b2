//! Converts a product's reference test into a rate for the user's tank.

use reefdose_schemas::product::Potency;
use serde::Serialize;
use std::fmt;

/// Why a potency record cannot be used for automatic corrections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unusable {
    MissingField { field: &'static str },
    NonPositiveField { field: &'static str, value: f64 },
    InvalidTankVolume { volume: f64 },
    RateOutOfRange { rate: f64 },
}

impl fmt::Display for Unusable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unusable::MissingField { field } => write!(f, "potency field '{}' is missing", field),
            Unusable::NonPositiveField { field, value } => {
                write!(f, "potency field '{}' must be positive, got {}", field, value)
            }
            Unusable::InvalidTankVolume { volume } => {
                write!(f, "tank volume must be positive, got {} L", volume)
            }
            Unusable::RateOutOfRange { rate } => {
                write!(f, "tank rate of {} units/ml is not representable", rate)
            }
        }
    }
}

/// Units of change per ml dosed into the given tank volume.
///
/// `delta_ref / (dose_ref * volume_ref) * tank_volume`. The result is always
/// strictly positive and finite; anything else is reported as `Unusable`.
pub fn tank_rate(potency: &Potency, tank_volume_liters: f64) -> Result<f64, Unusable> {
    let dose_ref_ml = positive_field("dose_ref_ml", potency.dose_ref_ml)?;
    let delta_ref_value = positive_field("delta_ref_value", potency.delta_ref_value)?;
    let volume_ref_liters = positive_field("volume_ref_liters", potency.volume_ref_liters)?;

    if !(tank_volume_liters.is_finite() && tank_volume_liters > 0.0) {
        return Err(Unusable::InvalidTankVolume {
            volume: tank_volume_liters,
        });
    }

    let units_per_ml_per_liter = delta_ref_value / (dose_ref_ml * volume_ref_liters);
    let rate = units_per_ml_per_liter * tank_volume_liters;

    // Extreme but individually valid inputs can still under/overflow.
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(Unusable::RateOutOfRange { rate })
    }
}

/// Whether the record can drive automatic corrections, independent of any tank.
pub fn check_usable(potency: &Potency) -> Result<(), Unusable> {
    positive_field("dose_ref_ml", potency.dose_ref_ml)?;
    positive_field("delta_ref_value", potency.delta_ref_value)?;
    positive_field("volume_ref_liters", potency.volume_ref_liters)?;
    Ok(())
}

fn positive_field(field: &'static str, value: Option<f64>) -> Result<f64, Unusable> {
    match value {
        None => Err(Unusable::MissingField { field }),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(Unusable::NonPositiveField { field, value: v }),
    }
}
