//! The fixed set of water-chemistry parameters the dosing engine understands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked water parameter. Each carries its own canonical unit and an
/// independent target/tolerance pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Alk,
    Ca,
    Mg,
    Po4,
    No3,
    Salinity,
}

impl Parameter {
    /// Every parameter, in presentation order.
    pub const ALL: [Parameter; 6] = [
        Parameter::Alk,
        Parameter::Ca,
        Parameter::Mg,
        Parameter::Po4,
        Parameter::No3,
        Parameter::Salinity,
    ];

    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Alk => "dKH",
            Parameter::Ca | Parameter::Mg | Parameter::Po4 | Parameter::No3 => "ppm",
            Parameter::Salinity => "ppt",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Parameter::Alk => "alk",
            Parameter::Ca => "ca",
            Parameter::Mg => "mg",
            Parameter::Po4 => "po4",
            Parameter::No3 => "no3",
            Parameter::Salinity => "salinity",
        }
    }

    /// A human-readable name for questions and explanations.
    pub fn display_name(self) -> &'static str {
        match self {
            Parameter::Alk => "alkalinity",
            Parameter::Ca => "calcium",
            Parameter::Mg => "magnesium",
            Parameter::Po4 => "phosphate",
            Parameter::No3 => "nitrate",
            Parameter::Salinity => "salinity",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
