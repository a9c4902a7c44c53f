//! Performance monitor (C9, spec.md §4.9).
//!
//! Tracks per-system call count, cumulative time, min/max, and a rolling
//! average over the last 120 frames. Performs no I/O; exposes query
//! operations only, and triggers warnings (via `tracing`) when a system's
//! rolling average exceeds its declared budget.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

use crate::scheduler::SystemKind;

const ROLLING_WINDOW: usize = 120;

/// Timing history for one system kind.
#[derive(Debug, Clone)]
struct SystemStats {
    call_count: u64,
    cumulative: Duration,
    min: Duration,
    max: Duration,
    /// Ring buffer of the last [`ROLLING_WINDOW`] sample durations.
    recent: Vec<Duration>,
    next_slot: usize,
}

impl Default for SystemStats {
    fn default() -> Self {
        Self {
            call_count: 0,
            cumulative: Duration::ZERO,
            min: Duration::MAX,
            max: Duration::ZERO,
            recent: Vec::with_capacity(ROLLING_WINDOW),
            next_slot: 0,
        }
    }
}

impl SystemStats {
    fn record(&mut self, elapsed: Duration) {
        self.call_count += 1;
        self.cumulative += elapsed;
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
        if self.recent.len() < ROLLING_WINDOW {
            self.recent.push(elapsed);
        } else {
            self.recent[self.next_slot] = elapsed;
        }
        self.next_slot = (self.next_slot + 1) % ROLLING_WINDOW;
    }

    fn rolling_average(&self) -> Duration {
        if self.recent.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.recent.iter().sum();
        total / self.recent.len() as u32
    }
}

/// Queryable timing snapshot for one system (spec.md §4.9).
#[derive(Debug, Clone, Copy)]
pub struct SystemReport {
    pub call_count: u64,
    pub cumulative: Duration,
    pub min: Duration,
    pub max: Duration,
    pub rolling_average: Duration,
}

/// Per-system timing histogram and frame-time budget enforcement (C9).
pub struct PerformanceMonitor {
    stats: HashMap<SystemKind, SystemStats>,
    budgets: HashMap<SystemKind, Duration>,
    frame_budget: Duration,
}

impl PerformanceMonitor {
    /// `frame_budget` is the total per-frame wall-clock budget (spec.md
    /// §4.8 default 20 ms).
    pub fn new(frame_budget: Duration) -> Self {
        Self {
            stats: HashMap::new(),
            budgets: HashMap::new(),
            frame_budget,
        }
    }

    pub fn set_system_budget(&mut self, kind: SystemKind, budget: Duration) {
        self.budgets.insert(kind, budget);
    }

    /// Record one system call's elapsed time and warn if its rolling
    /// average now exceeds its declared budget.
    pub fn record(&mut self, kind: SystemKind, elapsed: Duration) {
        let stats = self.stats.entry(kind).or_default();
        stats.record(elapsed);
        if let Some(&budget) = self.budgets.get(&kind) {
            if stats.rolling_average() > budget {
                warn!(
                    system = kind.name(),
                    average_us = stats.rolling_average().as_micros(),
                    budget_us = budget.as_micros(),
                    "system rolling average exceeds declared budget"
                );
            }
        }
    }

    /// `true` if `total_frame_time` exceeds the configured frame budget
    /// (spec.md §4.8 "Budget enforcement").
    pub fn frame_over_budget(&self, total_frame_time: Duration) -> bool {
        total_frame_time > self.frame_budget
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    pub fn report(&self, kind: SystemKind) -> Option<SystemReport> {
        self.stats.get(&kind).map(|s| SystemReport {
            call_count: s.call_count,
            cumulative: s.cumulative,
            min: if s.call_count == 0 { Duration::ZERO } else { s.min },
            max: s.max,
            rolling_average: s.rolling_average(),
        })
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(Duration::from_millis(20))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_none() {
        let monitor = PerformanceMonitor::default();
        assert!(monitor.report(SystemKind::Physics).is_none());
    }

    #[test]
    fn records_accumulate_min_max_count() {
        let mut monitor = PerformanceMonitor::default();
        monitor.record(SystemKind::Physics, Duration::from_micros(100));
        monitor.record(SystemKind::Physics, Duration::from_micros(300));
        monitor.record(SystemKind::Physics, Duration::from_micros(200));
        let report = monitor.report(SystemKind::Physics).unwrap();
        assert_eq!(report.call_count, 3);
        assert_eq!(report.min, Duration::from_micros(100));
        assert_eq!(report.max, Duration::from_micros(300));
        assert_eq!(report.cumulative, Duration::from_micros(600));
    }

    #[test]
    fn rolling_window_caps_at_120_samples() {
        let mut monitor = PerformanceMonitor::default();
        for i in 0..200u64 {
            monitor.record(SystemKind::Physics, Duration::from_micros(i));
        }
        let report = monitor.report(SystemKind::Physics).unwrap();
        assert_eq!(report.call_count, 200);
        // Rolling average should reflect only the most recent 120 samples
        // (i.e. values 80..200), not the full history.
        let expected_avg_us = (80..200).sum::<u64>() / 120;
        assert_eq!(report.rolling_average.as_micros() as u64, expected_avg_us);
    }

    #[test]
    fn frame_over_budget_detection() {
        let monitor = PerformanceMonitor::new(Duration::from_millis(20));
        assert!(!monitor.frame_over_budget(Duration::from_millis(10)));
        assert!(monitor.frame_over_budget(Duration::from_millis(25)));
    }
}
