use crate::config::{DriftMode, SandConfig};

/// Preset of the behaviour switches that distinguish the historical variants
/// of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ruleset {
    pub drift: DriftMode,
    pub wind: bool,
    pub unlock_propagation: bool,
}

impl Ruleset {
    /// Fans, wind-only drift and unlock cascades. The default.
    pub const WINDSWEPT: Self = Self {
        drift: DriftMode::Wind,
        wind: true,
        unlock_propagation: true,
    };

    /// No fans; horizontal velocity drives drift and moved grains still
    /// release the stack above them.
    pub const DRIFTING: Self = Self {
        drift: DriftMode::Coupled,
        wind: false,
        unlock_propagation: true,
    };

    /// Plain piling: no wind, no cascades, horizontal velocity integrated
    /// with gravity and clamped at the edges.
    pub const CLASSIC: Self = Self {
        drift: DriftMode::Coupled,
        wind: false,
        unlock_propagation: false,
    };

    /// Numeric id used by hosts that cannot pass structs: 0 = windswept,
    /// 1 = drifting, anything else = classic.
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => Self::WINDSWEPT,
            1 => Self::DRIFTING,
            _ => Self::CLASSIC,
        }
    }

    /// Apply this preset to a config.
    pub fn apply_to(&self, config: &mut SandConfig) {
        config.drift = self.drift;
        config.wind_enabled = self.wind;
        config.unlock_propagation = self.unlock_propagation;
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::WINDSWEPT
    }
}
