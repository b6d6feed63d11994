//! Tick rate configuration and real-time conversions
//!
//! Conversion policy, fixed for the whole crate:
//! - real time to ticks rounds **up**, so a timer never covers less real time
//!   than requested (apart from the phase of the first, partial tick);
//! - ticks to real time rounds **down**.

use core::fmt;
use core::num::NonZeroU32;

use crate::{BspError, BspResult, TickCount, TickSpan};

const MILLIS_PER_SEC: u64 = 1_000;
const MICROS_PER_SEC: u64 = 1_000_000;

/// Frequency of the tick interrupt, in ticks per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickRate {
    hz: NonZeroU32,
}

impl TickRate {
    /// Default rate: 100 Hz, one tick every 10 ms
    pub const DEFAULT: Self = Self::per_second(100);

    /// 1 kHz, one tick per millisecond
    pub const KILOHERTZ: Self = Self::per_second(1_000);

    /// Create a tick rate, rejecting zero
    pub const fn new(hz: u32) -> BspResult<Self> {
        match NonZeroU32::new(hz) {
            Some(hz) => Ok(Self { hz }),
            None => Err(BspError::InvalidTickRate),
        }
    }

    /// Create a tick rate from a non-zero frequency
    pub const fn from_hz(hz: NonZeroU32) -> Self {
        Self { hz }
    }

    /// Create a tick rate for use in `const` items
    ///
    /// # Panics
    ///
    /// Panics if `hz` is zero, which is a compile error in const context.
    pub const fn per_second(hz: u32) -> Self {
        match NonZeroU32::new(hz) {
            Some(hz) => Self { hz },
            None => panic!("tick rate must be non-zero"),
        }
    }

    /// Ticks per second
    pub const fn hz(self) -> u32 {
        self.hz.get()
    }

    /// Length of one tick in microseconds, rounded down
    pub const fn period_micros(self) -> u32 {
        (MICROS_PER_SEC / self.hz.get() as u64) as u32
    }

    /// Convert milliseconds to ticks, rounding up
    pub const fn millis_to_ticks(self, millis: u32) -> u64 {
        div_ceil(millis as u64 * self.hz.get() as u64, MILLIS_PER_SEC)
    }

    /// Convert microseconds to ticks, rounding up
    pub const fn micros_to_ticks(self, micros: u32) -> u64 {
        div_ceil(micros as u64 * self.hz.get() as u64, MICROS_PER_SEC)
    }

    /// Convert seconds to ticks
    pub const fn secs_to_ticks(self, secs: u32) -> u64 {
        secs as u64 * self.hz.get() as u64
    }

    /// Convert ticks to milliseconds, rounding down and saturating at `u64::MAX`
    pub const fn ticks_to_millis(self, ticks: u64) -> u64 {
        let millis = ticks as u128 * MILLIS_PER_SEC as u128 / self.hz.get() as u128;
        if millis > u64::MAX as u128 {
            u64::MAX
        } else {
            millis as u64
        }
    }

    /// Bounded span for a duration in milliseconds
    pub fn span_from_millis<T: TickCount>(self, millis: u32) -> BspResult<TickSpan<T>> {
        TickSpan::from_u64(self.millis_to_ticks(millis))
    }

    /// Bounded span for a duration in microseconds
    pub fn span_from_micros<T: TickCount>(self, micros: u32) -> BspResult<TickSpan<T>> {
        TickSpan::from_u64(self.micros_to_ticks(micros))
    }

    /// Bounded span for a duration in seconds
    pub fn span_from_secs<T: TickCount>(self, secs: u32) -> BspResult<TickSpan<T>> {
        TickSpan::from_u64(self.secs_to_ticks(secs))
    }

    /// Longest safe timer duration for counter width `T`, in milliseconds
    ///
    /// Example: a `u16` counter at 1 kHz gives 32_767 ms.
    pub fn max_span_millis<T: TickCount>(self) -> u64 {
        self.ticks_to_millis(T::MAX_SPAN.to_u64())
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TickRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.hz)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickRate {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}Hz", self.hz.get());
    }
}

const fn div_ceil(n: u64, d: u64) -> u64 {
    (n + d - 1) / d
}

/// Tick count for a literal duration at a given rate, usable in `const` items
///
/// ```
/// use bsp_core::{ticks, TickRate};
///
/// const RATE: TickRate = TickRate::per_second(100);
/// const BLINK: u64 = ticks!(RATE, 500 ms);
/// assert_eq!(BLINK, 50);
/// ```
#[macro_export]
macro_rules! ticks {
    ($rate:expr, $value:literal ms) => {
        $crate::TickRate::millis_to_ticks($rate, $value)
    };
    ($rate:expr, $value:literal us) => {
        $crate::TickRate::micros_to_ticks($rate, $value)
    };
    ($rate:expr, $value:literal s) => {
        $crate::TickRate::secs_to_ticks($rate, $value)
    };
}
