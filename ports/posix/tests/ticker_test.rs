//! Ticker thread tests for bsp-port-posix
//! Real threads and real sleeps, so tick counts are checked with tolerance.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bsp_core::TickRate;
use bsp_port_posix::{Ticker, TickerConfig};
use bsp_tick::{AtomicTicks32, AtomicTicks64, SplitTicks64, TickSource};
use bsp_timer::PollTimer;

#[test]
fn test_ticker_delivers_ticks_at_rate() {
    let ticks = Arc::new(AtomicTicks64::new(0));
    let config = TickerConfig::from_hz(100).unwrap().with_name("rate-test");
    let ticker = Ticker::spawn(Arc::clone(&ticks), config).unwrap();
    assert!(ticker.is_running());
    assert_eq!(ticker.rate(), TickRate::per_second(100));

    // Let it run for ~200ms
    thread::sleep(Duration::from_millis(200));
    let delivered = ticker.stop();

    // Should have approximately 20 ticks; allow for scheduling jitter
    assert!((15..=30).contains(&delivered), "Expected ~20 ticks, got {delivered}");
    assert_eq!(ticks.now(), delivered);
}

#[test]
fn test_drop_stops_ticker() {
    let ticks = Arc::new(AtomicTicks64::new(0));
    {
        let _ticker = Ticker::spawn(Arc::clone(&ticks), TickerConfig::from_hz(1000).unwrap()).unwrap();
        thread::sleep(Duration::from_millis(20));
    }
    let after_drop = ticks.now();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(ticks.now(), after_drop);
}

#[test]
fn test_static_source_and_polled_timer() {
    static TICKS: AtomicTicks32 = AtomicTicks32::new(u32::MAX - 5);

    let rate = TickRate::per_second(1000);
    let ticker = Ticker::spawn(&TICKS, TickerConfig::new(rate).unwrap()).unwrap();

    // Counter wraps a few ticks in; the timer must not care.
    let mut timer = PollTimer::new();
    timer.start_span(&TICKS, rate.span_from_millis(50).unwrap());

    let begin = Instant::now();
    let mut polls = 0u64;
    while !timer.has_expired(&TICKS) {
        polls += 1;
        assert!(begin.elapsed() < Duration::from_secs(5), "timer never expired");
        thread::yield_now();
    }
    ticker.stop();

    assert!(begin.elapsed() >= Duration::from_millis(40));
    assert!(polls > 0);
    assert!(timer.has_expired(&TICKS));
}

#[test]
fn test_split_source_across_word_carry() {
    // Ticker thread writes both halves while this thread polls a 64-bit timer.
    let start = 0xFFFF_FFFFu64 - 10;
    let ticks = Arc::new(SplitTicks64::new(start));
    let rate = TickRate::per_second(1000);
    let ticker = Ticker::spawn(Arc::clone(&ticks), TickerConfig::new(rate).unwrap()).unwrap();

    let mut timer = PollTimer::<u64>::new();
    timer.start_span(&*ticks, rate.span_from_millis(40).unwrap());

    let begin = Instant::now();
    let mut last = timer.start_tick();
    while !timer.has_expired(&*ticks) {
        let now = ticks.now();
        assert!(now >= last && now - last < 1_000, "torn read {now:#x} after {last:#x}");
        last = now;
        assert!(begin.elapsed() < Duration::from_secs(5), "timer never expired");
        thread::yield_now();
    }
    let delivered = ticker.stop();

    assert!(ticks.now() > 0xFFFF_FFFF);
    assert_eq!(ticks.now(), start + delivered);
}
