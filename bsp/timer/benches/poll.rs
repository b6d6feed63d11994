//! Cost of the expiry check a main loop pays on every pass

use std::hint::black_box;

use bsp_tick::{AtomicTicks32, SplitTicks64, TickDriver};
use bsp_timer::PollTimer;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_has_expired(c: &mut Criterion) {
    let ticks = AtomicTicks32::new(u32::MAX - 10);
    let timer = PollTimer::started(&ticks, 1_000);
    c.bench_function("has_expired/atomic32", |b| {
        b.iter(|| black_box(&timer).has_expired(black_box(&ticks)))
    });

    let split = SplitTicks64::new(u64::from(u32::MAX) - 10);
    let timer = PollTimer::started(&split, 1_000);
    c.bench_function("has_expired/split64", |b| {
        b.iter(|| black_box(&timer).has_expired(black_box(&split)))
    });
}

fn bench_advance(c: &mut Criterion) {
    let ticks = SplitTicks64::new(0);
    c.bench_function("advance/split64", |b| b.iter(|| black_box(&ticks).advance()));
}

criterion_group!(benches, bench_has_expired, bench_advance);
criterion_main!(benches);
