#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # BSP Core
//!
//! Shared vocabulary for the polled software timer: the fixed-width tick
//! counter types, the tick-rate configuration used to turn real time into
//! ticks, and a duration type bounded to the range that wraparound-safe
//! comparison can resolve.
//!
//! Nothing in this crate touches hardware. The counter itself lives in
//! `bsp-tick`, the timers in `bsp-timer`.

use core::fmt;

pub mod count;
pub mod rate;
pub mod span;

pub use count::*;
pub use rate::*;
pub use span::*;

/// BSP crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used by the fallible construction and conversion paths
pub type BspResult<T> = Result<T, BspError>;

/// Errors reported while building tick rates and durations
///
/// Timer queries never fail; only the configuration-time helpers return these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BspError {
    /// Tick rate of zero ticks per second
    InvalidTickRate,
    /// Duration exceeds half the counter range and cannot be compared safely
    SpanTooLong {
        /// Requested duration in ticks
        requested: u64,
        /// Largest duration the counter width supports
        max: u64,
    },
}

impl fmt::Display for BspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BspError::InvalidTickRate => write!(f, "Tick rate must be non-zero"),
            BspError::SpanTooLong { requested, max } => {
                write!(f, "Duration of {} ticks exceeds maximum of {} ticks", requested, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BspError {}

#[cfg(feature = "defmt")]
impl defmt::Format for BspError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            BspError::InvalidTickRate => defmt::write!(fmt, "InvalidTickRate"),
            BspError::SpanTooLong { requested, max } => {
                defmt::write!(fmt, "SpanTooLong({}>{})", requested, max)
            }
        }
    }
}
