//! Polled timer object and its start/stop/expiry operations

use core::convert::Infallible;
use core::fmt;

use bsp_core::{TickCount, TickSpan};
use bsp_tick::TickSource;

use crate::TimerState;

/// Deadline relative to a tick snapshot
///
/// Plain value, owned by whoever embeds it: there is no registry and the timer
/// keeps no reference to its tick source. Every query takes the source (or an
/// explicit tick value) as an argument.
///
/// # Duration contract
///
/// Durations must not exceed [`TickCount::MAX_SPAN`] (`2^(W-1) - 1` ticks for
/// a `W`-bit counter). Longer durations are accepted but expire too early or
/// not at all, because modular subtraction cannot tell them apart from a
/// wrapped counter. Use [`TickSpan`] to have the bound checked where the
/// duration is built.
///
/// A timer that was never started behaves exactly like a stopped one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollTimer<T: TickCount> {
    start: T,
    duration: T,
    running: bool,
}

impl<T: TickCount> PollTimer<T> {
    /// Create a stopped timer
    pub const fn new() -> Self {
        Self {
            start: T::ZERO,
            duration: T::ZERO,
            running: false,
        }
    }

    /// Create a timer already started at the source's current tick
    pub fn started<S>(source: &S, duration: T) -> Self
    where
        S: TickSource<Count = T> + ?Sized,
    {
        let mut timer = Self::new();
        timer.start(source, duration);
        timer
    }

    /// Start (or restart) the timer for `duration` ticks from now
    ///
    /// A zero duration is due immediately.
    pub fn start<S>(&mut self, source: &S, duration: T)
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.start_at(source.now(), duration);
    }

    /// Start the timer with a range-checked duration
    pub fn start_span<S>(&mut self, source: &S, span: TickSpan<T>)
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.start(source, span.ticks());
    }

    /// Start the timer as if the counter read `now`
    pub fn start_at(&mut self, now: T, duration: T) {
        self.start = now;
        self.duration = duration;
        self.running = true;
    }

    /// Start again from now with the previous duration
    ///
    /// On a timer that was never started the duration is zero.
    pub fn restart<S>(&mut self, source: &S)
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.start_at(source.now(), self.duration);
    }

    /// Stop the timer; stopping a stopped timer does nothing
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Check if the timer has been started and not stopped since
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick captured by the last start
    pub fn start_tick(&self) -> T {
        self.start
    }

    /// Duration requested by the last start
    pub fn duration(&self) -> T {
        self.duration
    }

    /// Check if the deadline has passed
    ///
    /// Always false for a stopped timer. Stays true on repeated calls until
    /// the timer is started again or stopped. Never modifies anything.
    #[inline]
    pub fn has_expired<S>(&self, source: &S) -> bool
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.has_expired_at(source.now())
    }

    /// Check expiry as if the counter read `now`
    #[inline]
    pub fn has_expired_at(&self, now: T) -> bool {
        self.running && now.wrapping_sub(self.start) >= self.duration
    }

    /// Ticks since the last start, `None` if stopped
    pub fn elapsed<S>(&self, source: &S) -> Option<T>
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.elapsed_at(source.now())
    }

    /// Ticks since the last start as if the counter read `now`
    pub fn elapsed_at(&self, now: T) -> Option<T> {
        self.running.then(|| now.wrapping_sub(self.start))
    }

    /// Ticks left until expiry, zero once expired, `None` if stopped
    pub fn remaining<S>(&self, source: &S) -> Option<T>
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.remaining_at(source.now())
    }

    /// Ticks left until expiry as if the counter read `now`
    pub fn remaining_at(&self, now: T) -> Option<T> {
        self.elapsed_at(now)
            .map(|elapsed| self.duration.saturating_sub(elapsed))
    }

    /// Current state of the timer
    pub fn state<S>(&self, source: &S) -> TimerState
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.state_at(source.now())
    }

    /// State as if the counter read `now`
    pub fn state_at(&self, now: T) -> TimerState {
        if !self.running {
            TimerState::Stopped
        } else if self.has_expired_at(now) {
            TimerState::Expired
        } else {
            TimerState::Running
        }
    }

    /// On expiry, move the deadline one period forward and return true
    ///
    /// The new start is the old deadline, not the current tick, so a periodic
    /// loop does not drift by however late it polled. If polling fell more
    /// than one period behind, the following calls return true until the
    /// timer has caught up.
    pub fn rearm_if_expired<S>(&mut self, source: &S) -> bool
    where
        S: TickSource<Count = T> + ?Sized,
    {
        self.rearm_if_expired_at(source.now())
    }

    /// Periodic re-arm as if the counter read `now`
    pub fn rearm_if_expired_at(&mut self, now: T) -> bool {
        if !self.has_expired_at(now) {
            return false;
        }
        self.start = self.start.wrapping_add(self.duration);
        true
    }

    /// Non-blocking wait in the `nb` style
    ///
    /// `Ok(())` once expired, `WouldBlock` while running or stopped. Blocking,
    /// if wanted, is up to the caller with `nb::block!`.
    pub fn wait<S>(&self, source: &S) -> nb::Result<(), Infallible>
    where
        S: TickSource<Count = T> + ?Sized,
    {
        if self.has_expired(source) {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<T: TickCount> fmt::Display for PollTimer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.running {
            write!(f, "timer[{}+{}]", self.start, self.duration)
        } else {
            write!(f, "timer[stopped]")
        }
    }
}

#[cfg(feature = "defmt")]
impl<T: TickCount + defmt::Format> defmt::Format for PollTimer<T> {
    fn format(&self, fmt: defmt::Formatter) {
        if self.running {
            defmt::write!(fmt, "timer[{}+{}]", self.start, self.duration);
        } else {
            defmt::write!(fmt, "timer[stopped]");
        }
    }
}
