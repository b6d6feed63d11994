//! Fixed-width tick counter values

use core::fmt;

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer usable as a wrapping tick counter
///
/// The counter wraps modulo `2^BITS`. Elapsed time is always computed with
/// [`TickCount::wrapping_sub`], which stays correct across overflow as long
/// as the true elapsed time is at most [`TickCount::MAX_SPAN`].
///
/// Implemented for `u8`, `u16`, `u32` and `u64`.
pub trait TickCount:
    Copy + Eq + Ord + Default + fmt::Debug + fmt::Display + sealed::Sealed
{
    /// Counter width in bits
    const BITS: u32;

    /// Zero ticks
    const ZERO: Self;

    /// A single tick
    const ONE: Self;

    /// Largest counter value, the one that wraps back to zero
    const MAX: Self;

    /// Longest duration that can be compared safely: `2^(BITS - 1) - 1`
    ///
    /// Past this point the modular difference can no longer tell "elapsed
    /// just past the limit" from "wrapped almost all the way around".
    const MAX_SPAN: Self;

    /// Addition modulo `2^BITS`
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Subtraction modulo `2^BITS`
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Subtraction clamped at zero
    fn saturating_sub(self, rhs: Self) -> Self;

    /// Widen to `u64`
    fn to_u64(self) -> u64;

    /// Narrow from `u64`, `None` if the value does not fit
    fn from_u64(value: u64) -> Option<Self>;

    /// Ticks elapsed from `earlier` to `self`, modulo `2^BITS`
    #[inline]
    fn elapsed_since(self, earlier: Self) -> Self {
        self.wrapping_sub(earlier)
    }
}

macro_rules! impl_tick_count {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl TickCount for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$ty>::MAX;
                const MAX_SPAN: Self = <$ty>::MAX >> 1;

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }

                #[inline]
                fn saturating_sub(self, rhs: Self) -> Self {
                    <$ty>::saturating_sub(self, rhs)
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(value: u64) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }
            }
        )*
    };
}

impl_tick_count!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_span_is_half_range_minus_one() {
        assert_eq!(<u8 as TickCount>::MAX_SPAN, 127);
        assert_eq!(<u16 as TickCount>::MAX_SPAN, 0x7FFF);
        assert_eq!(<u32 as TickCount>::MAX_SPAN, 0x7FFF_FFFF);
        assert_eq!(<u64 as TickCount>::MAX_SPAN, (1u64 << 63) - 1);
    }

    #[test]
    fn elapsed_across_wrap() {
        assert_eq!(4u8.elapsed_since(250), 10);
        assert_eq!(3u8.elapsed_since(250), 9);
        assert_eq!(0u32.elapsed_since(u32::MAX), 1);
    }

    #[test]
    fn narrowing_rejects_out_of_range() {
        assert_eq!(<u8 as TickCount>::from_u64(255), Some(255));
        assert_eq!(<u8 as TickCount>::from_u64(256), None);
        assert_eq!(<u64 as TickCount>::from_u64(u64::MAX), Some(u64::MAX));
    }
}
