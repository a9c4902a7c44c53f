//! Scheduler dispatch and full-tick benchmarks.
//!
//! Run with: `cargo bench --bench scheduler_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use signal_engine::prelude::*;
use signal_engine::scheduler::Scheduler;

fn bench_scheduler_dispatch(c: &mut Criterion) {
    c.bench_function("scheduler_tick_dispatch_overhead", |b| {
        let mut scheduler = Scheduler::with_default_roster();
        b.iter(|| {
            let diagnostics = scheduler.tick(1.0 / 144.0, |_, _| {});
            black_box(diagnostics.timings.len())
        })
    });
}

fn bench_engine_tick_populated(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");
    for &count in &[16usize, 256] {
        let mut engine = Engine::default();
        for _ in 0..count {
            let id = engine.world.entity_create().unwrap();
            engine
                .world
                .entity_add_component(
                    id,
                    ComponentBits::PHYSICS
                        | ComponentBits::TRANSFORM
                        | ComponentBits::THRUSTER_SYSTEM
                        | ComponentBits::CONTROL_AUTHORITY,
                )
                .unwrap();
        }
        group.bench_function(format!("entities_{count}"), |b| {
            b.iter(|| black_box(engine.tick(1.0 / 60.0)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scheduler_dispatch, bench_engine_tick_populated);
criterion_main!(benches);
