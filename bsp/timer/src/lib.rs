#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # BSP Timer
//!
//! Polled software timers for cooperative, non-preemptive main loops.
//!
//! A [`PollTimer`] records the tick at which it was started and how many
//! ticks it should run. Nothing fires on its own: the main loop asks
//! [`PollTimer::has_expired`] as often as it likes and acts on the answer.
//! Elapsed time is the modular difference between the current tick and the
//! start tick, so timers keep working when the counter wraps, provided no
//! duration exceeds [`TickCount::MAX_SPAN`].
//!
//! ```
//! use bsp_core::TickRate;
//! use bsp_tick::{AtomicTicks32, TickDriver};
//! use bsp_timer::PollTimer;
//!
//! const RATE: TickRate = TickRate::per_second(100);
//! static TICKS: AtomicTicks32 = AtomicTicks32::new(0);
//!
//! let mut blink = PollTimer::new();
//! blink.start_span(&TICKS, RATE.span_from_millis(500).unwrap());
//!
//! for _ in 0..49 {
//!     TICKS.advance(); // normally the tick interrupt
//! }
//! assert!(!blink.has_expired(&TICKS));
//! TICKS.advance();
//! assert!(blink.has_expired(&TICKS));
//! ```

pub mod state;
pub mod timer;

pub use state::TimerState;
pub use timer::PollTimer;

pub use bsp_core::{TickCount, TickSpan};
pub use bsp_tick::TickSource;
