use serde::{Deserialize, Serialize};

/// The aquarium being dosed. The volume is optional because it is often the
/// first fact a new user has not supplied yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tank {
    pub tank_id: String,
    pub display_name: Option<String>,
    pub volume_liters: Option<f64>,
}

impl Tank {
    /// Returns the volume only when it can be used for dose math.
    pub fn usable_volume(&self) -> Option<f64> {
        self.volume_liters.filter(|v| v.is_finite() && *v > 0.0)
    }
}
