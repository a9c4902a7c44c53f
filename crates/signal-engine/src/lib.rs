//! SIGNAL engine core -- the fixed-frequency system scheduler and the
//! 6-DOF flight-control pipeline (input → control → thrusters → physics →
//! transform-refresh) built on top of [`signal_ecs`]'s World.
//!
//! # Quick start
//!
//! ```
//! use signal_engine::prelude::*;
//!
//! let mut engine = Engine::default();
//! let id = engine.world.entity_create().unwrap();
//! engine
//!     .world
//!     .entity_add_component(id, ComponentBits::PHYSICS | ComponentBits::TRANSFORM)
//!     .unwrap();
//! engine.tick(1.0 / 60.0);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod engine;
pub mod input;
pub mod perf;
pub mod physics;
pub mod render_interface;
pub mod scheduler;
pub mod thrusters;
pub mod transform;

/// Errors originating in `signal-engine` that extend the ECS crate's
/// taxonomy (spec.md §7): numerical instability and frame-budget events.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// NaN/Inf detected in a physics accumulator (spec.md §7
    /// `NumericInstability`). Non-fatal: the offending entity's accumulator
    /// is reset and its integration is skipped for the tick.
    #[error("numeric instability detected in physics accumulator")]
    NumericInstability,

    /// Frame wall-clock time exceeded the configured budget (spec.md §7
    /// `BudgetExceeded`). Non-fatal: low-priority systems are throttled.
    #[error("frame time exceeded configured budget")]
    BudgetExceeded,
}

pub mod prelude {
    pub use signal_ecs::prelude::*;

    pub use crate::config::EngineConfig;
    pub use crate::engine::Engine;
    pub use crate::input::{InputShapingConfig, InputState, RawInputSample};
    pub use crate::perf::PerformanceMonitor;
    pub use crate::scheduler::{Scheduler, SystemKind};
    pub use crate::EngineError;
}
