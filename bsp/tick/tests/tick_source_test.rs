//! Tick source tests for bsp-tick
//! These run on the host; `advance` is called directly instead of from an interrupt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use bsp_tick::{
    AtomicTicks16, AtomicTicks32, AtomicTicks8, ManualTicks, ReadPhase, SplitTicks64, TickCount,
    TickDriver, TickSource,
};

fn advance_n<D: TickDriver>(driver: &D, n: u32) {
    for _ in 0..n {
        driver.advance();
    }
}

fn expected<T: TickCount>(initial: T, n: u32) -> T {
    let mut value = initial;
    for _ in 0..n {
        value = value.wrapping_add(T::ONE);
    }
    value
}

#[test]
fn test_advance_n_times_8bit() {
    for &(initial, n) in &[(0u8, 0u32), (0, 255), (0, 256), (250, 10), (200, 1_000), (1, 513)] {
        let ticks = AtomicTicks8::new(initial);
        advance_n(&ticks, n);
        assert_eq!(ticks.now(), ((initial as u32 + n) % 256) as u8);
    }
}

#[test]
fn test_advance_n_times_16bit() {
    let ticks = AtomicTicks16::new(u16::MAX - 5);
    advance_n(&ticks, 70_000);
    assert_eq!(ticks.now(), expected(u16::MAX - 5, 70_000));
}

#[test]
fn test_advance_n_times_32bit() {
    let ticks = AtomicTicks32::new(u32::MAX - 2);
    advance_n(&ticks, 10);
    assert_eq!(ticks.now(), 7);
}

#[test]
fn test_manual_ticks_match_atomic() {
    let manual = ManualTicks::new(240u8);
    let atomic = AtomicTicks8::new(240);
    advance_n(&manual, 300);
    advance_n(&atomic, 300);
    assert_eq!(manual.now(), atomic.now());

    manual.set(3);
    assert_eq!(manual.now(), 3);
    manual.advance_by(u8::MAX);
    assert_eq!(manual.now(), 2);
}

#[test]
fn test_reference_is_a_source() {
    let ticks = AtomicTicks32::new(41);
    let by_ref = &ticks;
    by_ref.advance();
    assert_eq!(TickSource::now(&by_ref), 42);
}

#[test]
fn test_split_counter_crosses_word_boundary() {
    let ticks = SplitTicks64::new(0xFFFF_FFF0);
    advance_n(&ticks, 0x20);
    assert_eq!(ticks.now(), 0x1_0000_0010);
}

#[test]
fn test_split_read_retries_on_carry_after_high() {
    let ticks = SplitTicks64::new(0xFFFF_FFFF);
    let mut injected = false;
    let value = ticks.read_with(|phase| {
        if phase == ReadPhase::AfterHigh && !injected {
            injected = true;
            ticks.advance();
        }
    });
    assert!(injected);
    assert_eq!(value, 0x1_0000_0000);
}

#[test]
fn test_split_read_retries_on_carry_after_low() {
    let ticks = SplitTicks64::new(0x7_FFFF_FFFF);
    let mut attempts = 0;
    let value = ticks.read_with(|phase| {
        if phase == ReadPhase::AfterLow {
            attempts += 1;
            if attempts == 1 {
                ticks.advance();
            }
        }
    });
    assert_eq!(attempts, 2);
    assert_eq!(value, 0x8_0000_0000);
}

#[test]
fn test_split_read_never_torn_under_interleaving() {
    // Inject a tick at every possible point of the first read attempt and check
    // the result is either the value before or after that tick.
    for start in [0xFFFF_FFFEu64, 0xFFFF_FFFF, 0x1_FFFF_FFFF, u64::MAX] {
        for inject_at in [ReadPhase::AfterHigh, ReadPhase::AfterLow] {
            let ticks = SplitTicks64::new(start);
            let mut done = false;
            let value = ticks.read_with(|phase| {
                if phase == inject_at && !done {
                    done = true;
                    ticks.advance();
                }
            });
            let after = start.wrapping_add(1);
            assert!(
                value == start || value == after,
                "start {start:#x}, injected {inject_at:?}: read {value:#x}"
            );
            assert_eq!(ticks.now(), after);
        }
    }
}

#[test]
fn test_split_masked_read() {
    let ticks = SplitTicks64::new(0xFFFF_FFFF);
    ticks.advance();
    assert_eq!(ticks.now_masked(), 0x1_0000_0000);
    assert_eq!(ticks.now_masked(), ticks.now());
}

#[test]
fn test_atomic_reader_sees_monotonic_values() {
    // One writer thread standing in for the interrupt, one polling reader.
    let ticks = Arc::new(AtomicTicks32::new(u32::MAX - 1_000));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let ticks = Arc::clone(&ticks);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for _ in 0..10_000 {
                ticks.advance();
            }
            done.store(true, Ordering::Release);
        })
    };

    let start = u32::MAX - 1_000;
    let mut last = 0u32;
    while !done.load(Ordering::Acquire) {
        let elapsed = ticks.now().wrapping_sub(start);
        assert!(elapsed >= last, "counter went backwards: {elapsed} < {last}");
        last = elapsed;
    }
    writer.join().unwrap();
    assert_eq!(ticks.now(), start.wrapping_add(10_000));
}

#[test]
fn test_split_reader_against_writer_thread() {
    // A host thread drives the split counter across several 32-bit carries
    // while this thread polls. Every read must lie between the start value and
    // the final one, and never go backwards. A torn read on a carry would
    // jump ahead by 2^32.
    const TICKS: u64 = 200_000;
    let start = 0xFFFF_FFFFu64 - 50_000;
    let ticks = Arc::new(SplitTicks64::new(start));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let ticks = Arc::clone(&ticks);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for _ in 0..TICKS {
                ticks.advance();
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut last = start;
    while !done.load(Ordering::Acquire) {
        let value = ticks.now();
        assert!(value >= last, "counter went backwards: {value:#x} < {last:#x}");
        assert!(value <= start + TICKS, "torn read {value:#x}");
        last = value;
    }
    writer.join().unwrap();
    assert_eq!(ticks.now(), start + TICKS);
}
