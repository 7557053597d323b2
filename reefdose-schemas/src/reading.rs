use crate::parameter::Parameter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single test result. Readings are never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub parameter: Parameter,
    pub value: f64,
    pub measured_at: DateTime<Utc>,
}

impl Reading {
    pub fn new(parameter: Parameter, value: f64, measured_at: DateTime<Utc>) -> Self {
        Self {
            parameter,
            value,
            measured_at,
        }
    }
}
