use crate::{error::DoseError, trend};
use reefdose_schemas::parameter::Parameter;
use serde::{Deserialize, Serialize};

/// Tunables for the dosing engine. Every field has a default so a partial
/// YAML file (or none at all) is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How far back from "now" readings are considered, in days.
    pub window_days: f64,
    /// Display rounding for ml figures. Never applied inside the math.
    pub rounding_increment_ml: f64,
    /// Parameters that need a declared daily dose before anything is computed.
    pub sustaining_parameters: Vec<Parameter>,
    /// Below this magnitude the regression denominator is treated as zero.
    pub degenerate_denominator: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: 7.0,
            rounding_increment_ml: 0.1,
            sustaining_parameters: vec![Parameter::Alk, Parameter::Ca, Parameter::Mg],
            degenerate_denominator: trend::DEGENERATE_DENOMINATOR,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), DoseError> {
        check_positive("window_days", self.window_days)?;
        trend::window_span(self.window_days).map_err(|_| {
            DoseError::InvalidConfig(format!(
                "'window_days' of {} does not fit the supported time range",
                self.window_days
            ))
        })?;
        check_positive("rounding_increment_ml", self.rounding_increment_ml)?;
        check_positive("degenerate_denominator", self.degenerate_denominator)?;
        Ok(())
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), DoseError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DoseError::InvalidConfig(format!(
            "'{}' must be a positive number, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_days, 7.0);
        assert_eq!(config.degenerate_denominator, trend::DEGENERATE_DENOMINATOR);
        assert_eq!(
            config.sustaining_parameters,
            vec![Parameter::Alk, Parameter::Ca, Parameter::Mg]
        );
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config: EngineConfig = serde_yaml::from_str("window_days: 14.0\n").unwrap();
        assert_eq!(config.window_days, 14.0);
        assert_eq!(config.rounding_increment_ml, 0.1);
        assert_eq!(config.degenerate_denominator, 1e-9);
    }

    #[test]
    fn rejects_non_positive_window() {
        let config = EngineConfig {
            window_days: 0.0,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("window_days"));
    }

    #[test]
    fn rejects_nan_rounding_increment() {
        let config = EngineConfig {
            rounding_increment_ml: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(DoseError::InvalidConfig(_))));
    }
}
