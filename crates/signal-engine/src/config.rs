//! Engine configuration (ambient stack addition, project's full
//! specification §4.15).
//!
//! The host binary owns scene selection and file I/O (spec.md §6); this
//! struct collects the tunables the core itself needs at startup, loadable
//! from JSON via `serde_json` the same way the teacher engine's tick
//! configuration is constructed from a plain struct literal.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::InputShapingConfig;
use crate::physics::VelocityLimits;

/// Top-level engine configuration (spec.md §4.8/§4.9 tunables plus the
/// physics and input sub-configs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-frame wall-clock budget in milliseconds (spec.md §4.8 default 20 ms).
    pub frame_budget_ms: u64,
    pub max_linear_speed: f32,
    pub max_angular_speed: f32,
    /// If `true`, run with no renderer/host loop attached (headless replay
    /// or CI determinism testing).
    pub headless: bool,
}

impl EngineConfig {
    pub fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }

    pub fn velocity_limits(&self) -> VelocityLimits {
        VelocityLimits {
            max_linear_speed: self.max_linear_speed,
            max_angular_speed: self.max_angular_speed,
        }
    }

    /// Parse configuration from a JSON document (spec.md §6: the host binary
    /// selects a startup scene; this is the analogous entry point for
    /// engine-level tunables).
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: 20,
            max_linear_speed: 10_000.0,
            max_angular_speed: 100.0,
            headless: false,
        }
    }
}

/// Input shaping is configured separately since it is per-device in a full
/// deployment; kept outside [`EngineConfig`]'s `Serialize`/`Deserialize`
/// derive because curve/deadzone tuning is typically a runtime UI concern,
/// not a startup file.
#[derive(Debug, Clone, Default)]
pub struct InputConfig {
    pub shaping: InputShapingConfig,
}
