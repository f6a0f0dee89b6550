use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trainrx::config::CriticalPowerSettings;
use trainrx::{
    generate_program, generate_programs, vdot, CalendarConstraints, ExperienceLevel, Methodology,
    PhysiologicalProfile, PowerAnalyzer, ProgramRequest, RaceDistance, SchedulingParams,
};

/// Plan generation and estimator benchmarks
///
/// Plan length and batch size are varied to check that generation stays
/// linear in weeks and scales across threads.

fn benchmark_profile() -> PhysiologicalProfile {
    PhysiologicalProfile::new(ExperienceLevel::Intermediate)
        .with_race_result(RaceDistance::HalfMarathon, 6_300.0)
        .with_weekly_volume(50.0)
}

fn benchmark_params(weeks: u32) -> SchedulingParams {
    SchedulingParams::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), weeks)
        .with_goal(RaceDistance::HalfMarathon, 6_000.0)
        .with_supplementary(2, 2, false)
}

fn bench_plan_generation(c: &mut Criterion) {
    let profile = benchmark_profile();
    let calendar = CalendarConstraints::default();

    let mut group = c.benchmark_group("Plan Generation");
    for &weeks in &[4u32, 12, 24, 52] {
        let params = benchmark_params(weeks);
        group.throughput(Throughput::Elements(weeks as u64));
        for methodology in [Methodology::Polarized, Methodology::NorwegianDouble, Methodology::Canova] {
            group.bench_with_input(
                BenchmarkId::new(methodology.name(), weeks),
                &params,
                |b, params| {
                    b.iter(|| generate_program(black_box(&profile), methodology, black_box(params), &calendar));
                },
            );
        }
    }
    group.finish();
}

fn bench_batch_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Generation");
    for &size in &[5usize, 50] {
        let requests: Vec<ProgramRequest> = (0..size)
            .map(|i| ProgramRequest {
                profile: benchmark_profile(),
                methodology: Methodology::ALL[i % Methodology::ALL.len()],
                params: benchmark_params(16),
                constraints: CalendarConstraints::default(),
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("generate_programs", size), &requests, |b, requests| {
            b.iter(|| generate_programs(black_box(requests)));
        });
    }
    group.finish();
}

fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("Estimators");

    group.bench_function("vdot_predict_marathon", |b| {
        b.iter(|| vdot::predict_time(black_box(52.0), black_box(42_195.0)));
    });

    let mut samples: Vec<f64> = (0..150).map(|i| 420.0 - i as f64).collect();
    samples.extend(std::iter::repeat(270.0).take(30));
    let settings = CriticalPowerSettings::default();
    group.bench_function("three_minute_test", |b| {
        b.iter(|| PowerAnalyzer::three_minute_test(black_box(&samples), &settings));
    });

    group.finish();
}

criterion_group!(benches, bench_plan_generation, bench_batch_generation, bench_estimators);
criterion_main!(benches);
