//! Tick source traits

use bsp_core::TickCount;

/// Read side of a tick counter
///
/// `now` must never return a torn value, even while the interrupt handler
/// is advancing the counter.
pub trait TickSource {
    /// Counter width
    type Count: TickCount;

    /// Current counter value
    fn now(&self) -> Self::Count;
}

/// Write side of a tick counter, called once per tick interrupt
///
/// `advance` increments by exactly one and wraps silently. Implementations
/// run in constant time and never take a lock.
pub trait TickDriver: TickSource {
    /// Count one tick
    fn advance(&self);
}

impl<S: TickSource + ?Sized> TickSource for &S {
    type Count = S::Count;

    #[inline]
    fn now(&self) -> Self::Count {
        (**self).now()
    }
}

impl<S: TickDriver + ?Sized> TickDriver for &S {
    #[inline]
    fn advance(&self) {
        (**self).advance()
    }
}

#[cfg(feature = "std")]
impl<S: TickSource + ?Sized> TickSource for std::sync::Arc<S> {
    type Count = S::Count;

    #[inline]
    fn now(&self) -> Self::Count {
        (**self).now()
    }
}

#[cfg(feature = "std")]
impl<S: TickDriver + ?Sized> TickDriver for std::sync::Arc<S> {
    #[inline]
    fn advance(&self) {
        (**self).advance()
    }
}
