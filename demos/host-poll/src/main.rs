//! Host Poll Example - a cooperative main loop on the POSIX ticker
//!
//! A host thread plays the tick interrupt. The main loop polls a periodic
//! blink timer and an overall timeout, the same way firmware would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use bsp_core::TickRate;
use bsp_port_posix::{Ticker, TickerConfig};
use bsp_tick::AtomicTicks32;
use bsp_timer::PollTimer;
use clap::Parser;
use log::{info, LevelFilter, Log, Metadata, Record};

#[derive(Parser, Debug)]
#[command(name = "host-poll", about = "Poll BSP timers against a host tick thread")]
struct Args {
    /// Tick rate in Hz
    #[arg(long, default_value_t = 1_000)]
    hz: u32,

    /// Blink period in milliseconds
    #[arg(long, default_value_t = 250)]
    blink_ms: u32,

    /// Stop after this many milliseconds
    #[arg(long, default_value_t = 2_000)]
    timeout_ms: u32,

    /// Log ticker internals
    #[arg(short, long)]
    verbose: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;
static TICKS: AtomicTicks32 = AtomicTicks32::new(0);

fn main() -> Result<()> {
    let args = Args::parse();
    log::set_logger(&LOGGER).context("logger already installed")?;
    log::set_max_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info });

    let rate = TickRate::new(args.hz)?;
    let blink_span = rate
        .span_from_millis::<u32>(args.blink_ms)
        .context("blink period too long for a 32-bit counter")?;
    let run_span = rate
        .span_from_millis::<u32>(args.timeout_ms)
        .context("timeout too long for a 32-bit counter")?;
    info!(
        "{} ticks, longest safe timer {} ms",
        rate,
        rate.max_span_millis::<u32>()
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::Release))
            .context("failed to install Ctrl-C handler")?;
    }

    let ticker = Ticker::spawn(&TICKS, TickerConfig::new(rate)?.with_name("host-poll-tick"))?;

    let mut blink = PollTimer::new();
    let mut run = PollTimer::new();
    blink.start_span(&TICKS, blink_span);
    run.start_span(&TICKS, run_span);

    let mut led = false;
    let mut toggles = 0u32;
    while !run.has_expired(&TICKS) {
        if interrupted.load(Ordering::Acquire) {
            info!("interrupted");
            run.stop();
            break;
        }
        if blink.rearm_if_expired(&TICKS) {
            led = !led;
            toggles += 1;
            info!("led {}", if led { "on" } else { "off" });
        }
        thread::yield_now();
    }

    let elapsed = run.elapsed(&TICKS);
    let delivered = ticker.stop();
    match elapsed {
        Some(ticks) => info!(
            "timeout after {} ticks ({} ms), {} toggles",
            ticks,
            rate.ticks_to_millis(u64::from(ticks)),
            toggles
        ),
        None => info!("stopped early, {} toggles", toggles),
    }
    info!("ticker delivered {} ticks", delivered);
    Ok(())
}
