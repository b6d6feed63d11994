//! Single-word atomic tick counters

use core::sync::atomic::Ordering;

use crate::{TickDriver, TickSource};

macro_rules! atomic_ticks {
    ($(#[$meta:meta])* $name:ident, $atomic:ident, $ty:ty, $width:tt) => {
        $(#[$meta])*
        #[cfg(target_has_atomic = $width)]
        #[derive(Debug, Default)]
        pub struct $name {
            count: core::sync::atomic::$atomic,
        }

        #[cfg(target_has_atomic = $width)]
        impl $name {
            /// Create a counter starting at `initial`
            pub const fn new(initial: $ty) -> Self {
                Self {
                    count: core::sync::atomic::$atomic::new(initial),
                }
            }
        }

        #[cfg(target_has_atomic = $width)]
        impl TickSource for $name {
            type Count = $ty;

            #[inline]
            fn now(&self) -> $ty {
                self.count.load(Ordering::Acquire)
            }
        }

        #[cfg(target_has_atomic = $width)]
        impl TickDriver for $name {
            /// Single writer: plain load and store, no read-modify-write.
            #[inline]
            fn advance(&self) {
                let next = self.count.load(Ordering::Relaxed).wrapping_add(1);
                self.count.store(next, Ordering::Release);
            }
        }
    };
}

atomic_ticks!(
    /// 8-bit tick counter, wraps every 256 ticks
    AtomicTicks8, AtomicU8, u8, "8"
);

atomic_ticks!(
    /// 16-bit tick counter
    AtomicTicks16, AtomicU16, u16, "16"
);

atomic_ticks!(
    /// 32-bit tick counter, the usual choice on 32-bit microcontrollers
    ///
    /// At 1 kHz it wraps after about 49.7 days; timers stay correct across
    /// the wrap for durations up to about 24.8 days.
    AtomicTicks32, AtomicU32, u32, "32"
);

atomic_ticks!(
    /// 64-bit tick counter for targets with native 64-bit atomics
    ///
    /// Elsewhere use [`SplitTicks64`](crate::SplitTicks64).
    AtomicTicks64, AtomicU64, u64, "64"
);
