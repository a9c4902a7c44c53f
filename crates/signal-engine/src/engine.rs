//! The `Engine` context (spec.md §9 "Global mutable singletons → explicit
//! context"): a single struct bundling the world, input snapshot,
//! scheduler, performance monitor, and configuration that the source's
//! process-wide statics become in this rewrite.

use std::time::Duration;

use tracing::{info, warn};

use signal_ecs::prelude::*;

use crate::config::{EngineConfig, InputConfig};
use crate::control::run_control;
use crate::input::{materialize_input, InputState, RawInputSample};
use crate::perf::PerformanceMonitor;
use crate::physics::run_physics;
use crate::scheduler::{Scheduler, SystemKind, TickDiagnostics};
use crate::thrusters::run_thrusters;
use crate::transform::run_transform_refresh;

/// Owns everything one simulation needs: the ECS world, the current input
/// snapshot, the fixed-rate scheduler, the performance monitor, and
/// configuration (spec.md §9). No system outside this struct retains a
/// reference into pool memory across ticks (spec.md §5).
pub struct Engine {
    pub world: World,
    pub input: InputState,
    input_config: InputConfig,
    scheduler: Scheduler,
    perf: PerformanceMonitor,
    config: EngineConfig,
    running: bool,
    tick_count: u64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let frame_budget = config.frame_budget();
        Self {
            world: World::new(),
            input: InputState::default(),
            input_config: InputConfig::default(),
            scheduler: Scheduler::with_default_roster(),
            perf: PerformanceMonitor::new(frame_budget),
            config,
            running: true,
            tick_count: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn perf(&self) -> &PerformanceMonitor {
        &self.perf
    }

    /// Raise a clean-shutdown request (spec.md §5 "Cancellation"). The
    /// in-progress frame still completes; the next `tick` call becomes a
    /// no-op.
    pub fn request_shutdown(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Materialise a raw input sample into this tick's [`InputState`]
    /// (spec.md §4.4). Call before `tick` each frame; if omitted, `tick`
    /// reuses the previous snapshot.
    pub fn submit_input(&mut self, raw: &RawInputSample) {
        self.input = materialize_input(raw, &self.input_config.shaping);
    }

    /// Drive one host frame: advance every enabled system's accumulator by
    /// `dt_frame` and dispatch elapsed periods in declared roster order
    /// (spec.md §4.8). No-op if a shutdown has been requested.
    pub fn tick(&mut self, dt_frame: f32) -> TickDiagnostics {
        if !self.running {
            return TickDiagnostics::default();
        }
        self.tick_count += 1;

        let world = &mut self.world;
        let input = &self.input;
        let limits = self.config.velocity_limits();

        let diagnostics = self.scheduler.tick(dt_frame, |kind, dt| match kind {
            SystemKind::Input => {}
            SystemKind::Control => run_control(world, input, dt),
            SystemKind::Thrusters => run_thrusters(world, dt),
            SystemKind::Physics => run_physics(world, dt, limits),
            SystemKind::Collision => {}
            SystemKind::TransformRefresh => run_transform_refresh(world),
            SystemKind::Camera => {}
            SystemKind::Lod => {}
            SystemKind::Ai => {}
            SystemKind::Performance => {}
            SystemKind::Memory => {}
        });

        for timing in &diagnostics.timings {
            self.perf.record(timing.kind, timing.elapsed);
        }

        if self.perf.frame_over_budget(diagnostics.total_time) {
            warn!(
                tick = self.tick_count,
                elapsed_us = diagnostics.total_time.as_micros(),
                budget_us = self.perf.frame_budget().as_micros(),
                "frame over budget; throttling low-priority systems"
            );
            self.scheduler.throttle_low_priority();
        } else {
            self.scheduler.restore_low_priority();
        }

        diagnostics
    }

    /// BLAKE3 hex digest of the world's canonicalized component state, for
    /// determinism/replay verification (spec.md §5 "Determinism": identical
    /// initial state plus identical input sequence implies bit-identical
    /// subsequent ticks). A test/debug hook only -- nothing here is ever
    /// written to disk by the core.
    pub fn state_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.tick_count.to_le_bytes());
        for id in self.world.entities_matching(ComponentBits::PHYSICS | ComponentBits::TRANSFORM) {
            let transform = self.world.get_transform(id).unwrap();
            let physics = self.world.get_physics(id).unwrap();
            hasher.update(&id.index().to_le_bytes());
            hasher.update(&id.generation().to_le_bytes());
            hasher.update(&transform.position.to_array().map(f32::to_le_bytes).concat());
            hasher.update(&transform.rotation.to_array().map(f32::to_le_bytes).concat());
            hasher.update(&physics.velocity.to_array().map(f32::to_le_bytes).concat());
            hasher.update(&physics.angular_velocity.to_array().map(f32::to_le_bytes).concat());
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
