//! Hand-driven tick source for host tests and simulation

use core::cell::Cell;

use bsp_core::TickCount;

use crate::{TickDriver, TickSource};

/// Tick counter advanced by the caller instead of an interrupt
///
/// Not `Sync`: meant for a single test or simulation context that plays the
/// role of the tick interrupt itself.
#[derive(Debug, Default)]
pub struct ManualTicks<T: TickCount> {
    count: Cell<T>,
}

impl<T: TickCount> ManualTicks<T> {
    /// Create a counter starting at `initial`
    pub const fn new(initial: T) -> Self {
        Self {
            count: Cell::new(initial),
        }
    }

    /// Jump the counter to `value`
    pub fn set(&self, value: T) {
        self.count.set(value);
    }

    /// Advance by `ticks` at once, wrapping
    pub fn advance_by(&self, ticks: T) {
        self.count.set(self.count.get().wrapping_add(ticks));
    }
}

impl<T: TickCount> TickSource for ManualTicks<T> {
    type Count = T;

    fn now(&self) -> T {
        self.count.get()
    }
}

impl<T: TickCount> TickDriver for ManualTicks<T> {
    fn advance(&self) {
        self.advance_by(T::ONE);
    }
}
