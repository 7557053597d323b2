//! Dosing products and the reference test that calibrates them.

use crate::parameter::Parameter;
use serde::{Deserialize, Serialize};

/// The manufacturer's (or user's) reference test: `dose_ref_ml` of product
/// raised the parameter by `delta_ref_value` units in `volume_ref_liters` of water.
///
/// Fields are optional because a partially entered test is common; any absent
/// or non-positive field makes the record unusable for automatic corrections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Potency {
    pub dose_ref_ml: Option<f64>,
    pub delta_ref_value: Option<f64>,
    pub volume_ref_liters: Option<f64>,
}

impl Potency {
    pub fn new(dose_ref_ml: f64, delta_ref_value: f64, volume_ref_liters: f64) -> Self {
        Self {
            dose_ref_ml: Some(dose_ref_ml),
            delta_ref_value: Some(delta_ref_value),
            volume_ref_liters: Some(volume_ref_liters),
        }
    }
}

/// A product the user selected as preferred for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub parameter: Parameter,
    #[serde(default)]
    pub potency: Potency,
}
