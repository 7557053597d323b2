use anyhow::{bail, Context, Result};
use reefdose_core::{assembler::DosingSnapshot, config::EngineConfig};
use reefdose_schemas::{
    file_formats::{ReadingRecord, SnapshotFile},
    reading::Reading,
};
use std::{fs, path::Path};

pub const SUPPORTED_SCHEMA_VERSION: &str = "1";

/// Loads the snapshot, appends any CSV readings, and reads the engine settings.
pub fn load_inputs(
    snapshot_path: &Path,
    readings_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<(DosingSnapshot, EngineConfig)> {
    let mut snapshot = load_snapshot(snapshot_path)?;
    if let Some(path) = readings_path {
        let extra = load_readings_csv(path)?;
        tracing::info!(count = extra.len(), path = %path.display(), "loaded readings");
        snapshot.readings.extend(extra);
    }
    let engine_config = match config_path {
        Some(path) => load_engine_config(path)?,
        None => EngineConfig::default(),
    };
    Ok((snapshot, engine_config))
}

pub fn load_snapshot(path: &Path) -> Result<DosingSnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {:?}", path))?;
    parse_snapshot(&content).with_context(|| format!("Failed to parse YAML from {:?}", path))
}

pub fn parse_snapshot(content: &str) -> Result<DosingSnapshot> {
    let file: SnapshotFile = serde_yaml::from_str(content)?;
    if file.schema_version != SUPPORTED_SCHEMA_VERSION {
        bail!(
            "unsupported schema_version '{}', expected '{}'",
            file.schema_version,
            SUPPORTED_SCHEMA_VERSION
        );
    }
    Ok(file.into())
}

pub fn load_readings_csv(path: &Path) -> Result<Vec<Reading>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open readings CSV: {:?}", path))?;
    let mut readings = Vec::new();
    for (row, result) in reader.deserialize::<ReadingRecord>().enumerate() {
        let record: ReadingRecord = result
            .with_context(|| format!("Bad reading on row {} of {:?}", row + 1, path))?;
        readings.push(record.into());
    }
    Ok(readings)
}

pub fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    let config: EngineConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    Ok(config)
}
