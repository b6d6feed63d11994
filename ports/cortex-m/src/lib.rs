#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

//! # Cortex-M SysTick port
//!
//! Programs the SysTick timer to interrupt at the configured tick rate. The
//! application owns both the tick source and the exception handler:
//!
//! ```ignore
//! use bsp_core::TickRate;
//! use bsp_port_cortex_m::SysTickBinding;
//! use bsp_tick::{AtomicTicks32, TickDriver};
//! use cortex_m_rt::exception;
//!
//! const RATE: TickRate = TickRate::per_second(1_000);
//! static TICKS: AtomicTicks32 = AtomicTicks32::new(0);
//!
//! let binding = SysTickBinding::new(16_000_000, RATE)?;
//! binding.configure(&mut core_peripherals.SYST);
//!
//! #[exception]
//! fn SysTick() {
//!     TICKS.advance();
//! }
//! ```

use core::fmt;

use bsp_core::TickRate;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

/// Largest value the 24-bit SysTick reload register holds
pub const SYST_RELOAD_MAX: u32 = 0x00FF_FFFF;

/// Errors raised while deriving a SysTick configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// Core clock too slow or too fast for the tick rate to fit in 24 bits
    ReloadOutOfRange {
        /// Core clock cycles per tick
        cycles: u32,
    },
    /// Core clock is not a whole multiple of the tick rate; ticks would drift
    Inexact {
        /// Core clock in hertz
        core_hz: u32,
        /// Requested tick rate in hertz
        tick_hz: u32,
    },
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReloadOutOfRange { cycles } => {
                write!(f, "{} cycles per tick does not fit the SysTick reload register", cycles)
            }
            Self::Inexact { core_hz, tick_hz } => {
                write!(f, "{}Hz core clock is not a multiple of {}Hz tick rate", core_hz, tick_hz)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PortError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ReloadOutOfRange { cycles } => defmt::write!(fmt, "ReloadOutOfRange({})", cycles),
            Self::Inexact { core_hz, tick_hz } => {
                defmt::write!(fmt, "Inexact({}/{})", core_hz, tick_hz)
            }
        }
    }
}

/// SysTick reload value giving exactly `rate` interrupts per second
pub const fn systick_reload(core_hz: u32, rate: TickRate) -> Result<u32, PortError> {
    let tick_hz = rate.hz();
    if core_hz % tick_hz != 0 {
        return Err(PortError::Inexact { core_hz, tick_hz });
    }
    reload_for_cycles(core_hz / tick_hz)
}

/// SysTick reload value for `rate`, rounded to the nearest whole cycle count
///
/// For clocks that do not divide evenly; the tick rate is then off by at
/// most half a cycle per tick.
pub const fn systick_reload_rounded(core_hz: u32, rate: TickRate) -> Result<u32, PortError> {
    let tick_hz = rate.hz() as u64;
    let cycles = (core_hz as u64 + tick_hz / 2) / tick_hz;
    reload_for_cycles(cycles as u32)
}

const fn reload_for_cycles(cycles: u32) -> Result<u32, PortError> {
    // A reload of zero never fires, so one tick needs at least two cycles.
    if cycles < 2 || cycles - 1 > SYST_RELOAD_MAX {
        return Err(PortError::ReloadOutOfRange { cycles });
    }
    Ok(cycles - 1)
}

/// SysTick settings for one core clock and tick rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysTickBinding {
    rate: TickRate,
    reload: u32,
}

impl SysTickBinding {
    /// Binding for an exact tick rate
    pub const fn new(core_hz: u32, rate: TickRate) -> Result<Self, PortError> {
        match systick_reload(core_hz, rate) {
            Ok(reload) => Ok(Self { rate, reload }),
            Err(err) => Err(err),
        }
    }

    /// Binding that accepts a rounded reload value
    pub const fn new_rounded(core_hz: u32, rate: TickRate) -> Result<Self, PortError> {
        match systick_reload_rounded(core_hz, rate) {
            Ok(reload) => Ok(Self { rate, reload }),
            Err(err) => Err(err),
        }
    }

    /// Configured tick rate
    pub const fn rate(&self) -> TickRate {
        self.rate
    }

    /// Value written to the reload register
    pub const fn reload(&self) -> u32 {
        self.reload
    }

    /// Start SysTick from the core clock with its interrupt enabled
    ///
    /// The exception handler must call `TickDriver::advance` on the
    /// application's tick source.
    pub fn configure(&self, syst: &mut SYST) {
        syst.disable_counter();
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(self.reload);
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();
    }

    /// Stop SysTick and its interrupt; the tick source stops advancing
    pub fn halt(syst: &mut SYST) {
        syst.disable_interrupt();
        syst.disable_counter();
    }
}
