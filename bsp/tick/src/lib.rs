#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

//! # BSP Tick
//!
//! The tick source: a free-running counter advanced by one on every periodic
//! interrupt and read, without locks, by any number of polling callers.
//!
//! - [`AtomicTicks8`], [`AtomicTicks16`], [`AtomicTicks32`] and
//!   [`AtomicTicks64`] keep the counter in a single atomic word, for
//!   widths the target can load and store natively.
//! - [`SplitTicks64`] builds a 64-bit counter from two 32-bit halves for
//!   targets without 64-bit atomics, read through a generation word that
//!   retries on a concurrent update.
//! - [`ManualTicks`] is advanced by hand, for host tests and simulation.
//!
//! Wire a source to hardware by calling [`TickDriver::advance`] from the
//! tick interrupt handler, e.g. SysTick on Cortex-M:
//!
//! ```ignore
//! static TICKS: AtomicTicks32 = AtomicTicks32::new(0);
//!
//! #[exception]
//! fn SysTick() {
//!     TICKS.advance();
//! }
//! ```

pub mod atomic;
pub mod manual;
pub mod source;
pub mod split;

pub use atomic::*;
pub use manual::ManualTicks;
pub use source::{TickDriver, TickSource};
pub use split::{ReadPhase, SplitTicks64};

pub use bsp_core::TickCount;
