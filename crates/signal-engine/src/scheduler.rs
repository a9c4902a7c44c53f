//! Fixed-frequency system scheduler (C8, spec.md §4.8).
//!
//! Decouples logical system rates from the host's render rate: each system
//! carries its own wall-clock accumulator and is called zero or more times
//! per frame so that, e.g., physics always runs at exactly 60 Hz regardless
//! of whether the host renders at 30, 60, or 144 fps.

use std::time::{Duration, Instant};

use tracing::{info, trace, warn};

/// Identifies one roster slot. The roster is fixed (spec.md §4.8 "declared
/// order"); this is not meant to be end-user extensible, so it is a closed
/// enum rather than a string-keyed registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    Input,
    Control,
    Thrusters,
    Physics,
    Collision,
    TransformRefresh,
    Camera,
    Lod,
    Ai,
    Performance,
    Memory,
}

impl SystemKind {
    pub fn name(self) -> &'static str {
        match self {
            SystemKind::Input => "input",
            SystemKind::Control => "control",
            SystemKind::Thrusters => "thrusters",
            SystemKind::Physics => "physics",
            SystemKind::Collision => "collision",
            SystemKind::TransformRefresh => "transform_refresh",
            SystemKind::Camera => "camera",
            SystemKind::Lod => "lod",
            SystemKind::Ai => "ai",
            SystemKind::Performance => "performance",
            SystemKind::Memory => "memory",
        }
    }

    /// Declared order (spec.md §4.8): `Input → Control → Thrusters →
    /// Physics → Collision → Transform-refresh → Camera → LOD → AI →
    /// Performance → Memory`. Also the data-flow DAG of §2.
    pub const ROSTER_ORDER: [SystemKind; 11] = [
        SystemKind::Input,
        SystemKind::Control,
        SystemKind::Thrusters,
        SystemKind::Physics,
        SystemKind::Collision,
        SystemKind::TransformRefresh,
        SystemKind::Camera,
        SystemKind::Lod,
        SystemKind::Ai,
        SystemKind::Performance,
        SystemKind::Memory,
    ];

    /// Low-priority systems eligible for throttling under budget pressure
    /// (spec.md §4.8 "Budget enforcement").
    pub fn is_low_priority(self) -> bool {
        matches!(self, SystemKind::Ai | SystemKind::Lod | SystemKind::Memory)
    }
}

/// One roster entry: declared frequency, enabled flag, and the running
/// wall-clock accumulator.
#[derive(Debug, Clone, Copy)]
struct SystemSlot {
    kind: SystemKind,
    hz: f32,
    enabled: bool,
    accumulator: f32,
    call_count: u64,
}

impl SystemSlot {
    fn period(&self) -> f32 {
        1.0 / self.hz
    }
}

/// Per-system timing recorded for one call, handed to [`crate::perf::PerformanceMonitor`].
#[derive(Debug, Clone, Copy)]
pub struct SystemTiming {
    pub kind: SystemKind,
    pub elapsed: Duration,
}

/// Diagnostics for one `Scheduler::tick` call.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    pub timings: Vec<SystemTiming>,
    pub total_time: Duration,
}

/// Fixed-hz multi-rate dispatcher (spec.md §4.8).
///
/// Generic over the call closure so that the dispatch loop itself -- the
/// accumulator arithmetic and ordering -- is testable in isolation from
/// `Engine` and the ten concrete system implementations.
pub struct Scheduler {
    systems: Vec<SystemSlot>,
}

impl Scheduler {
    /// Build the roster with the default frequencies from spec.md §4.8 and
    /// ambient additions (input/transform-refresh/performance not given
    /// explicit Hz by the spec; chosen to match their upstream/downstream
    /// neighbors).
    pub fn with_default_roster() -> Self {
        let defaults: [(SystemKind, f32); 11] = [
            (SystemKind::Input, 60.0),
            (SystemKind::Control, 60.0),
            (SystemKind::Thrusters, 60.0),
            (SystemKind::Physics, 60.0),
            (SystemKind::Collision, 20.0),
            (SystemKind::TransformRefresh, 60.0),
            (SystemKind::Camera, 60.0),
            (SystemKind::Lod, 30.0),
            (SystemKind::Ai, 5.0),
            (SystemKind::Performance, 10.0),
            (SystemKind::Memory, 2.0),
        ];
        let systems = defaults
            .into_iter()
            .map(|(kind, hz)| {
                info!(system = kind.name(), hz, "system registered");
                SystemSlot {
                    kind,
                    hz,
                    enabled: true,
                    accumulator: 0.0,
                    call_count: 0,
                }
            })
            .collect();
        Self { systems }
    }

    /// Enable or disable a roster entry. No-op (and no log) if `enabled`
    /// already matches the current state.
    pub fn set_enabled(&mut self, kind: SystemKind, enabled: bool) {
        if let Some(slot) = self.systems.iter_mut().find(|s| s.kind == kind) {
            if slot.enabled != enabled {
                info!(
                    system = kind.name(),
                    enabled,
                    "system {}",
                    if enabled { "enabled" } else { "disabled" }
                );
                slot.enabled = enabled;
            }
        }
    }

    pub fn is_enabled(&self, kind: SystemKind) -> bool {
        self.systems
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.enabled)
            .unwrap_or(false)
    }

    pub fn call_count(&self, kind: SystemKind) -> u64 {
        self.systems
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.call_count)
            .unwrap_or(0)
    }

    pub fn hz(&self, kind: SystemKind) -> f32 {
        self.systems
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.hz)
            .unwrap_or(0.0)
    }

    /// Roster order, for tests asserting dispatch order (spec.md §8
    /// property 4).
    pub fn system_kinds(&self) -> Vec<SystemKind> {
        self.systems.iter().map(|s| s.kind).collect()
    }

    /// Advance every enabled system's accumulator by `dt_frame` and invoke
    /// `run` once per elapsed period, in declared roster order (spec.md
    /// §4.8 execution contract). `run` receives the system kind and its
    /// fixed per-call `dt` (`1/hz`, not `dt_frame`).
    ///
    /// This method takes no `World`/`Engine` reference: it is pure
    /// dispatch-timing logic, independently testable from the concrete
    /// system bodies (spec.md §8 property 8, Scenario D).
    pub fn tick<F: FnMut(SystemKind, f32)>(&mut self, dt_frame: f32, mut run: F) -> TickDiagnostics {
        let frame_start = Instant::now();
        let mut timings = Vec::new();

        for slot in &mut self.systems {
            if !slot.enabled {
                continue;
            }
            slot.accumulator += dt_frame;
            let period = slot.period();
            while slot.accumulator >= period {
                let call_start = Instant::now();
                run(slot.kind, period);
                let elapsed = call_start.elapsed();
                slot.accumulator -= period;
                slot.call_count += 1;
                timings.push(SystemTiming {
                    kind: slot.kind,
                    elapsed,
                });
                trace!(system = slot.kind.name(), ?elapsed, "system tick");
            }
        }

        TickDiagnostics {
            timings,
            total_time: frame_start.elapsed(),
        }
    }

    /// Disable every low-priority system (spec.md §4.8 "Budget
    /// enforcement": throttle AI/LOD/Memory on the next frame).
    pub fn throttle_low_priority(&mut self) {
        for slot in &mut self.systems {
            if slot.kind.is_low_priority() && slot.enabled {
                warn!(system = slot.kind.name(), "throttling low-priority system over budget");
                slot.enabled = false;
            }
        }
    }

    pub fn restore_low_priority(&mut self) {
        for slot in &mut self.systems {
            if slot.kind.is_low_priority() {
                slot.enabled = true;
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::with_default_roster()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_order_matches_spec() {
        let scheduler = Scheduler::with_default_roster();
        assert_eq!(scheduler.system_kinds(), SystemKind::ROSTER_ORDER.to_vec());
    }

    #[test]
    fn disabled_system_never_fires() {
        let mut scheduler = Scheduler::with_default_roster();
        scheduler.set_enabled(SystemKind::Ai, false);
        let mut calls = 0;
        for _ in 0..120 {
            scheduler.tick(1.0 / 60.0, |kind, _| {
                if kind == SystemKind::Ai {
                    calls += 1;
                }
            });
        }
        assert_eq!(calls, 0);
    }

    /// Scenario D (spec.md §8): run for 2 simulated seconds at host dt =
    /// 1/144; physics called 120±1, AI called 10±1, memory called 4±1.
    #[test]
    fn scenario_d_scheduler_rates_over_two_seconds() {
        let mut scheduler = Scheduler::with_default_roster();
        let dt_frame: f32 = 1.0 / 144.0;
        let frames = (2.0 / dt_frame).round() as usize;
        for _ in 0..frames {
            scheduler.tick(dt_frame, |_, _| {});
        }
        let physics = scheduler.call_count(SystemKind::Physics);
        let ai = scheduler.call_count(SystemKind::Ai);
        let memory = scheduler.call_count(SystemKind::Memory);
        assert!((119..=121).contains(&physics), "physics calls: {physics}");
        assert!((9..=11).contains(&ai), "ai calls: {ai}");
        assert!((3..=5).contains(&memory), "memory calls: {memory}");
    }

    #[test]
    fn dispatch_order_is_stable_across_ticks() {
        let mut scheduler = Scheduler::with_default_roster();
        let mut order = Vec::new();
        scheduler.tick(1.0, |kind, _| order.push(kind));
        let expected: Vec<SystemKind> = SystemKind::ROSTER_ORDER
            .iter()
            .copied()
            .flat_map(|k| {
                let hz = scheduler.hz(k);
                std::iter::repeat(k).take(hz as usize)
            })
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn throttle_disables_only_low_priority() {
        let mut scheduler = Scheduler::with_default_roster();
        scheduler.throttle_low_priority();
        assert!(!scheduler.is_enabled(SystemKind::Ai));
        assert!(!scheduler.is_enabled(SystemKind::Lod));
        assert!(!scheduler.is_enabled(SystemKind::Memory));
        assert!(scheduler.is_enabled(SystemKind::Physics));
        scheduler.restore_low_priority();
        assert!(scheduler.is_enabled(SystemKind::Ai));
    }

    #[test]
    fn fractional_accumulator_carries_over() {
        let mut scheduler = Scheduler::with_default_roster();
        let mut calls = 0;
        // 59 frames of 1/60 dt should fire physics 59 times total, not
        // drop or double-fire due to float accumulation.
        for _ in 0..59 {
            scheduler.tick(1.0 / 60.0, |kind, _| {
                if kind == SystemKind::Physics {
                    calls += 1;
                }
            });
        }
        assert_eq!(calls, 59);
    }
}
