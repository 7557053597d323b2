use crate::{
    dosing::{CurrentDose, TargetRow, ToleranceRow},
    parameter::Parameter,
    product::Product,
    reading::Reading,
    tank::Tank,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the engine needs for one request, as stored on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotFile {
    pub schema_version: String,
    pub tank: Tank,
    #[serde(default)]
    pub targets: TargetRow,
    #[serde(default)]
    pub tolerances: ToleranceRow,
    #[serde(default)]
    pub preferred_products: Vec<Product>,
    #[serde(default)]
    pub current_doses: Vec<CurrentDose>,
    #[serde(default)]
    pub readings: Vec<Reading>,
}

/// One row of a readings CSV export.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadingRecord {
    pub measured_at: DateTime<Utc>,
    pub parameter: Parameter,
    pub value: f64,
}

impl From<ReadingRecord> for Reading {
    fn from(record: ReadingRecord) -> Self {
        Reading::new(record.parameter, record.value, record.measured_at)
    }
}
