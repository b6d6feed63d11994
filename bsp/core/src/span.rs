//! Durations bounded to the safely comparable range

use core::fmt;

use crate::{BspError, BspResult, TickCount};

/// Duration in ticks, guaranteed to be at most [`TickCount::MAX_SPAN`]
///
/// Timers accept raw tick counts too; going through a `TickSpan` moves the
/// range check to the point where the duration is built, usually in a
/// `const` or at start-up, instead of leaving it as a caller contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TickSpan<T: TickCount> {
    ticks: T,
}

impl<T: TickCount> TickSpan<T> {
    /// Zero duration, due at the tick it was started on
    pub const ZERO: Self = Self { ticks: T::ZERO };

    /// Longest safe duration for this counter width
    pub const MAX: Self = Self { ticks: T::MAX_SPAN };

    /// Create a span, rejecting counts above [`TickCount::MAX_SPAN`]
    pub fn new(ticks: T) -> BspResult<Self> {
        if ticks > T::MAX_SPAN {
            return Err(BspError::SpanTooLong {
                requested: ticks.to_u64(),
                max: T::MAX_SPAN.to_u64(),
            });
        }
        Ok(Self { ticks })
    }

    /// Create a span from a wide tick count, as produced by rate conversions
    pub fn from_u64(ticks: u64) -> BspResult<Self> {
        match T::from_u64(ticks) {
            Some(ticks) => Self::new(ticks),
            None => Err(BspError::SpanTooLong {
                requested: ticks,
                max: T::MAX_SPAN.to_u64(),
            }),
        }
    }

    /// Get the tick count
    pub fn ticks(self) -> T {
        self.ticks
    }

    /// Check if the span is zero
    pub fn is_zero(self) -> bool {
        self.ticks == T::ZERO
    }
}

impl<T: TickCount> TryFrom<u64> for TickSpan<T> {
    type Error = BspError;

    fn try_from(ticks: u64) -> BspResult<Self> {
        Self::from_u64(ticks)
    }
}

impl<T: TickCount> fmt::Display for TickSpan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ticks", self.ticks)
    }
}

#[cfg(feature = "defmt")]
impl<T: TickCount + defmt::Format> defmt::Format for TickSpan<T> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}ticks", self.ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_up_to_half_range() {
        assert_eq!(TickSpan::<u8>::new(127).unwrap().ticks(), 127);
        assert_eq!(TickSpan::<u8>::MAX.ticks(), 127);
    }

    #[test]
    fn rejects_past_half_range() {
        assert_eq!(
            TickSpan::<u8>::new(128),
            Err(BspError::SpanTooLong { requested: 128, max: 127 })
        );
        assert!(TickSpan::<u16>::from_u64(70_000).is_err());
    }

    #[test]
    fn zero_span() {
        assert!(TickSpan::<u32>::ZERO.is_zero());
        assert!(TickSpan::<u32>::new(0).unwrap().is_zero());
    }
}
