//! 64-bit tick counter from two 32-bit atomic halves
//!
//! Targets such as ARMv7-M load and store 32 bits atomically but not 64.
//! A 64-bit counter there is two words, and a reader racing the writer could
//! combine a stale high word with a fresh low word.
//!
//! The writer brackets its stores with a generation word: odd while an
//! update is in flight, even once both halves are written. The reader samples
//! the generation, the high word, the low word, then the generation again,
//! and retries when the generation was odd or changed. This holds for a
//! single writer running anywhere: the tick interrupt on the same core,
//! another core, or a host thread. `advance` stays lock-free.
//!
//! [`SplitTicks64::now_masked`] skips the retry and relies on the critical
//! section instead. It is only consistent when that critical section also
//! excludes the writer, i.e. a single core with `advance` called from an
//! interrupt. With a writer on another core or host thread use `now`.

use core::hint;
use core::sync::atomic::{fence, AtomicU32, Ordering};

use crate::{TickDriver, TickSource};

/// Point in a split read where an observer may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPhase {
    /// The high word has been taken
    AfterHigh,
    /// The low word has been taken, the confirming generation sample has not
    AfterLow,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReadPhase {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::AfterHigh => defmt::write!(fmt, "AfterHigh"),
            Self::AfterLow => defmt::write!(fmt, "AfterLow"),
        }
    }
}

/// 64-bit wrapping tick counter stored as two `AtomicU32`
#[derive(Debug, Default)]
pub struct SplitTicks64 {
    generation: AtomicU32,
    high: AtomicU32,
    low: AtomicU32,
}

impl SplitTicks64 {
    /// Create a counter starting at `initial`
    pub const fn new(initial: u64) -> Self {
        Self {
            generation: AtomicU32::new(0),
            high: AtomicU32::new((initial >> 32) as u32),
            low: AtomicU32::new(initial as u32),
        }
    }

    /// Consistent snapshot, calling `observer` between the partial reads
    ///
    /// [`TickSource::now`] is this with a no-op observer. Tests and
    /// instrumentation use the observer to inject ticks mid-read.
    pub fn read_with<F>(&self, mut observer: F) -> u64
    where
        F: FnMut(ReadPhase),
    {
        loop {
            let before = self.generation.load(Ordering::Acquire);
            if before & 1 == 1 {
                // Writer on another core or thread is mid-update.
                hint::spin_loop();
                continue;
            }
            let high = self.high.load(Ordering::Relaxed);
            observer(ReadPhase::AfterHigh);
            let low = self.low.load(Ordering::Relaxed);
            observer(ReadPhase::AfterLow);
            fence(Ordering::Acquire);
            if self.generation.load(Ordering::Relaxed) == before {
                return join(high, low);
            }
        }
    }

    /// Snapshot taken inside a critical section, no retry
    ///
    /// Only consistent when the critical section also keeps `advance` out:
    /// single core, `advance` in an interrupt. Only the reader takes the
    /// critical section; `advance` stays lock-free.
    pub fn now_masked(&self) -> u64 {
        critical_section::with(|_| {
            join(
                self.high.load(Ordering::Acquire),
                self.low.load(Ordering::Acquire),
            )
        })
    }
}

impl TickSource for SplitTicks64 {
    type Count = u64;

    #[inline]
    fn now(&self) -> u64 {
        self.read_with(|_| {})
    }
}

impl TickDriver for SplitTicks64 {
    /// Single writer: the generation is bumped with plain stores.
    fn advance(&self) {
        let generation = self.generation.load(Ordering::Relaxed);
        self.generation
            .store(generation.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        let low = self.low.load(Ordering::Relaxed).wrapping_add(1);
        if low == 0 {
            let high = self.high.load(Ordering::Relaxed).wrapping_add(1);
            self.high.store(high, Ordering::Relaxed);
        }
        self.low.store(low, Ordering::Relaxed);

        self.generation
            .store(generation.wrapping_add(2), Ordering::Release);
    }
}

#[inline]
fn join(high: u32, low: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}
