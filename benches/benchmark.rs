//! Benchmark for the adaptive integration of the double pendulum, which
//! dominates the runtime of a render ahead of the PNG encoding.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector4;
use pendulum_renderer::core::ode_solvers::StepSizeControl;
use pendulum_renderer::pendulum::dynamics::PhysicalParams;
use pendulum_renderer::pendulum::simulation::{simulate, TimeGridParams};

fn simulate_two_seconds() {
    let physics = PhysicalParams::default();
    let time_grid = TimeGridParams {
        t_begin: 0.0,
        t_final: 2.0,
        sample_count: 121,
    };
    let initial_state = Vector4::new(120.0_f64.to_radians(), 0.0, -10.0_f64.to_radians(), 0.0);
    let trajectory = simulate(
        &physics,
        &time_grid,
        initial_state,
        &StepSizeControl::default(),
    )
    .unwrap();
    black_box(trajectory);
}

fn benchmark(c: &mut Criterion) {
    c.bench_function("simulate_two_seconds", |b| {
        b.iter(simulate_two_seconds);
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
