use crate::parameter::Parameter;
use serde::{Deserialize, Serialize};

/// One row per user, one nullable column per parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterRow {
    pub alk: Option<f64>,
    pub ca: Option<f64>,
    pub mg: Option<f64>,
    pub po4: Option<f64>,
    pub no3: Option<f64>,
    pub salinity: Option<f64>,
}

impl ParameterRow {
    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::Alk => self.alk,
            Parameter::Ca => self.ca,
            Parameter::Mg => self.mg,
            Parameter::Po4 => self.po4,
            Parameter::No3 => self.no3,
            Parameter::Salinity => self.salinity,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: Option<f64>) {
        let slot = match parameter {
            Parameter::Alk => &mut self.alk,
            Parameter::Ca => &mut self.ca,
            Parameter::Mg => &mut self.mg,
            Parameter::Po4 => &mut self.po4,
            Parameter::No3 => &mut self.no3,
            Parameter::Salinity => &mut self.salinity,
        };
        *slot = value;
    }
}

/// Desired value per parameter. An empty column means "do not correct".
pub type TargetRow = ParameterRow;

/// Acceptable deviation (`±band`) per parameter. An empty column is a band of 0.
pub type ToleranceRow = ParameterRow;

/// A user-declared daily dose. It cannot be inferred from readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentDose {
    pub parameter: Parameter,
    pub ml_per_day: f64,
}

impl CurrentDose {
    pub fn is_valid(&self) -> bool {
        self.ml_per_day.is_finite() && self.ml_per_day >= 0.0
    }
}
