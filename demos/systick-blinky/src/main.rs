//! SysTick Blinky - polled timers on a Cortex-M tick interrupt
//!
//! SysTick fires at 1 kHz and advances a 32-bit tick counter. The main loop
//! toggles a pretend LED every 500 ms and gives up after 5 s, polling both
//! timers without ever blocking. Runs on QEMU's lm3s6965evb (12 MHz core).

#![no_std]
#![no_main]

use bsp_core::TickRate;
use bsp_port_cortex_m::SysTickBinding;
use bsp_tick::{AtomicTicks32, TickDriver};
use bsp_timer::PollTimer;
use cortex_m::peripheral::Peripherals;
use cortex_m_rt::{entry, exception};
use cortex_m_semihosting::{debug, hprintln};
use panic_halt as _;

const CORE_HZ: u32 = 12_000_000;
const RATE: TickRate = TickRate::per_second(1_000);

static TICKS: AtomicTicks32 = AtomicTicks32::new(0);

#[entry]
fn main() -> ! {
    let Some(mut core) = Peripherals::take() else {
        debug::exit(debug::EXIT_FAILURE);
        loop {}
    };

    let binding = match SysTickBinding::new(CORE_HZ, RATE) {
        Ok(binding) => binding,
        Err(err) => {
            hprintln!("SysTick setup failed: {}", err);
            debug::exit(debug::EXIT_FAILURE);
            loop {}
        }
    };
    binding.configure(&mut core.SYST);
    hprintln!("SysTick reload {} for {}", binding.reload(), binding.rate());

    let (Ok(blink_span), Ok(run_span)) = (
        RATE.span_from_millis::<u32>(500),
        RATE.span_from_secs::<u32>(5),
    ) else {
        debug::exit(debug::EXIT_FAILURE);
        loop {}
    };

    let mut blink = PollTimer::new();
    let mut run = PollTimer::new();
    blink.start_span(&TICKS, blink_span);
    run.start_span(&TICKS, run_span);

    let mut led = false;
    loop {
        if blink.rearm_if_expired(&TICKS) {
            led = !led;
            hprintln!("led {}", if led { "on" } else { "off" });
        }

        if run.has_expired(&TICKS) {
            SysTickBinding::halt(&mut core.SYST);
            hprintln!("done after {} ticks", run.elapsed(&TICKS).unwrap_or(0));
            debug::exit(debug::EXIT_SUCCESS);
            loop {}
        }

        cortex_m::asm::wfi();
    }
}

#[exception]
fn SysTick() {
    TICKS.advance();
}
