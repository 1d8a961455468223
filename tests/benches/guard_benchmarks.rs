//! # Referral-Guard Hot-Path Benchmarks
//!
//! | Component | Operation | Target |
//! |-----------|-----------|--------|
//! | rg-01 Challenge | latency → score | < 100ns |
//! | rg-02 Risk Scoring | profile heuristics + combine | < 5µs |
//! | rg-04 Engagement | tally of a full reply scan | < 1ms for 5000 replies |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use rg_01_challenge::challenge_score;
use rg_02_risk_scoring::{
    account_age_score, combine, profile_score, subscribe_timing_score, SignalScores,
    SignalWeights, ACTIVITY_NEUTRAL_SCORE,
};
use rg_04_engagement_verification::EngagementTally;
use shared_types::{AccountProfile, UnitScore};

fn bench_challenge_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("rg-01-challenge");
    for latency in [0.5, 18.0, 75.0, 600.0] {
        group.bench_with_input(
            BenchmarkId::new("challenge_score", latency),
            &latency,
            |b, &latency| b.iter(|| black_box(challenge_score(black_box(latency), 3.0, 120.0))),
        );
    }
    group.finish();
}

fn bench_risk_assessment(c: &mut Criterion) {
    let mut group = c.benchmark_group("rg-02-risk-scoring");
    let profiles = [
        AccountProfile::new(Some("Marta"), Some("marta_k")),
        AccountProfile::new(Some("test user 123"), Some("bot_123456")),
        AccountProfile::default(),
    ];

    group.bench_function("profile_score", |b| {
        b.iter(|| {
            for profile in &profiles {
                black_box(profile_score(black_box(profile)));
            }
        })
    });

    group.bench_function("full_assessment", |b| {
        b.iter(|| {
            let signals = SignalScores {
                account_age: account_age_score(black_box(6_100_000_000)),
                challenge: UnitScore::clamped(0.1),
                subscribe_timing: subscribe_timing_score(black_box(10.0)),
                profile: profile_score(&profiles[1]),
                activity: ACTIVITY_NEUTRAL_SCORE,
            };
            black_box(combine(&signals, &SignalWeights::DEFAULT, 0.7))
        })
    });
    group.finish();
}

fn bench_engagement_tally(c: &mut Criterion) {
    let mut group = c.benchmark_group("rg-04-engagement-verification");
    group.measurement_time(Duration::from_secs(5));

    for posts in [50u32, 500, 5_000] {
        group.throughput(Throughput::Elements(posts as u64));
        group.bench_with_input(BenchmarkId::new("tally", posts), &posts, |b, &posts| {
            b.iter(|| {
                let mut tally = EngagementTally::new(u32::MAX, u32::MAX);
                for post in 0..posts {
                    tally.record(post as i64, post % 3);
                }
                black_box(tally.satisfied())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_challenge_score,
    bench_risk_assessment,
    bench_engagement_tally
);
criterion_main!(benches);
