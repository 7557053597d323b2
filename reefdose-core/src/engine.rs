use crate::{
    assembler::{self, Assessment, DosingSnapshot},
    config::EngineConfig,
    error::DoseError,
    gate::{self, Readiness},
};
use chrono::{DateTime, Utc};
use reefdose_schemas::parameter::Parameter;

/// A fluent builder for constructing a `RecommendationEngine`.
///
/// Starts from [`EngineConfig::default`]; every setter overrides one field and
/// `build` validates the result.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration, e.g. one loaded from YAML.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_window_days(mut self, days: f64) -> Self {
        self.config.window_days = days;
        self
    }

    pub fn with_rounding_increment_ml(mut self, increment: f64) -> Self {
        self.config.rounding_increment_ml = increment;
        self
    }

    pub fn with_sustaining_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.config.sustaining_parameters = parameters;
        self
    }

    /// # Errors
    ///
    /// Returns `DoseError::InvalidConfig` when a numeric setting is not a
    /// positive finite number.
    pub fn build(self) -> Result<RecommendationEngine, DoseError> {
        self.config.validate()?;
        Ok(RecommendationEngine {
            config: self.config,
        })
    }
}

/// Stateless entry point. Safe to share across threads and call concurrently.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Only the readiness gate, without any dose math.
    pub fn check(&self, snapshot: &DosingSnapshot) -> Readiness {
        Readiness::from_questions(gate::check_readiness(
            &snapshot.tank,
            &snapshot.current_doses,
            &snapshot.preferred_products,
            &self.config.sustaining_parameters,
        ))
    }

    /// Recommendations for every parameter that has a target.
    pub fn assess(
        &self,
        snapshot: &DosingSnapshot,
        now: DateTime<Utc>,
    ) -> Result<Assessment, DoseError> {
        self.assess_parameters(&Parameter::ALL, snapshot, now)
    }

    pub fn assess_parameters(
        &self,
        parameters: &[Parameter],
        snapshot: &DosingSnapshot,
        now: DateTime<Utc>,
    ) -> Result<Assessment, DoseError> {
        assembler::assemble(parameters, snapshot, &self.config, now)
    }
}
