//! Performance benchmarks for rating calculations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use race_rank::rating::{expand_race, Glicko2Engine, RatingEngine};
use race_rank::types::{Outcome, OpponentResult, Race, RatingParameters};
use race_rank::Period;

fn create_race(entrants: usize, offset: usize) -> Race {
    Race::from_ratings((0..entrants).map(|place| {
        (
            format!("racer_{}", (place + offset) % 64),
            1400.0 + (place as f64 * 37.0) % 300.0,
        )
    }))
}

fn bench_engine_rate(c: &mut Criterion) {
    let engine = Glicko2Engine::default();
    let prior = RatingParameters::new(1500.0, 200.0, 0.06);

    // Opponents spread around the prior with a mix of outcomes
    let results: Vec<OpponentResult> = (0..10)
        .map(|i| OpponentResult {
            opponent: RatingParameters::new(1350.0 + i as f64 * 30.0, 80.0 + i as f64 * 20.0, 0.06),
            outcome: if i % 3 == 0 {
                Outcome::Loss
            } else {
                Outcome::Win
            },
        })
        .collect();

    c.bench_function("glicko2_rate_10_games", |b| {
        b.iter(|| {
            let updated = engine
                .rate(black_box("racer"), black_box(&prior), black_box(&results))
                .unwrap();
            black_box(updated);
        })
    });
}

fn bench_race_expansion(c: &mut Criterion) {
    let race = create_race(32, 0);

    c.bench_function("expand_race_32_entrants", |b| {
        b.iter(|| {
            let games = expand_race(black_box(&race));
            black_box(games);
        })
    });
}

fn bench_period_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("period_rank");

    for races in [1usize, 10, 50] {
        let batch: Vec<Race> = (0..races).map(|i| create_race(10, i * 7)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(races), &batch, |b, batch| {
            b.iter(|| {
                let mut period = Period::new();
                period.add_races(batch.clone()).unwrap();
                let snapshot = period.rank().unwrap();
                black_box(snapshot);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_engine_rate,
    bench_race_expansion,
    bench_period_rank
);
criterion_main!(benches);
