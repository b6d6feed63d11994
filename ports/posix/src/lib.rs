//! # BSP POSIX port
//!
//! Drives a tick source from a host thread instead of a timer interrupt, so
//! firmware main loops built on `bsp-timer` can run and be tested on
//! Linux/Unix. Uses monotonic absolute deadlines, so the tick rate does not
//! drift with scheduling jitter.

pub mod ticker;

pub use ticker::{Ticker, TickerConfig, TickerError, DEFAULT_TICKS_PER_SEC, MAX_TICKS_PER_SEC};
