//! Timer state as seen by a poll

use core::fmt;

/// Observable state of a [`PollTimer`](crate::PollTimer)
///
/// `Expired` is not an event: a running timer becomes expired simply by
/// time passing, and stays expired until it is started again or stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerState {
    /// Never started, or stopped
    Stopped,
    /// Started, deadline not reached
    Running,
    /// Started, deadline reached
    Expired,
}

impl TimerState {
    /// Check if the timer is started, expired or not
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Stopped)
    }

    /// Check if the deadline has been reached
    pub const fn is_expired(self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Running => write!(f, "running"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Stopped => defmt::write!(fmt, "Stopped"),
            Self::Running => defmt::write!(fmt, "Running"),
            Self::Expired => defmt::write!(fmt, "Expired"),
        }
    }
}
