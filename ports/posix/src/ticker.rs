//! Host ticker thread
//!
//! Stands in for the periodic tick interrupt: a dedicated thread calls
//! `TickDriver::advance` at the configured rate. Sleeps until the next
//! absolute tick time rather than for a relative period, so latency on one
//! tick does not push back all later ones.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bsp_core::{BspError, TickRate};
use bsp_tick::TickDriver;
use log::{debug, info, warn};
use thiserror::Error;

/// Default tick rate in Hz
pub const DEFAULT_TICKS_PER_SEC: u32 = 100;

/// Highest tick rate a host thread is expected to keep up with
pub const MAX_TICKS_PER_SEC: u32 = 10_000;

const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Errors raised while configuring or starting the ticker
#[derive(Debug, Error)]
pub enum TickerError {
    /// Tick rate rejected by `TickRate`
    #[error("invalid tick rate: {0}")]
    Rate(#[from] BspError),

    /// Faster than a sleeping host thread can keep up with
    #[error("tick rate {0}Hz exceeds the host limit of {max}Hz", max = MAX_TICKS_PER_SEC)]
    RateTooHigh(u32),

    /// The OS refused to start the ticker thread
    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Ticker thread configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerConfig {
    rate: TickRate,
    name: String,
}

impl TickerConfig {
    /// Configuration for `rate`, rejecting rates above [`MAX_TICKS_PER_SEC`]
    pub fn new(rate: TickRate) -> Result<Self, TickerError> {
        if rate.hz() > MAX_TICKS_PER_SEC {
            return Err(TickerError::RateTooHigh(rate.hz()));
        }
        Ok(Self {
            rate,
            name: String::from("bsp-ticker"),
        })
    }

    /// Configuration from a raw frequency in Hz
    pub fn from_hz(hz: u32) -> Result<Self, TickerError> {
        Self::new(TickRate::new(hz)?)
    }

    /// Name the ticker thread
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Configured tick rate
    pub fn rate(&self) -> TickRate {
        self.rate
    }

    /// Tick period
    pub fn period(&self) -> Duration {
        Duration::from_nanos(NSEC_PER_SEC / u64::from(self.rate.hz()))
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            rate: TickRate::per_second(DEFAULT_TICKS_PER_SEC),
            name: String::from("bsp-ticker"),
        }
    }
}

/// Running ticker thread; stops when dropped
#[derive(Debug)]
pub struct Ticker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
    rate: TickRate,
}

impl Ticker {
    /// Spawn a thread calling `driver.advance()` at the configured rate
    ///
    /// `driver` is typically `&'static` to a static tick source or an `Arc`
    /// shared with the polling side. Any `bsp_tick` counter works, including
    /// `SplitTicks64` read through `now()`.
    pub fn spawn<D>(driver: D, config: TickerConfig) -> Result<Self, TickerError>
    where
        D: TickDriver + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let period = config.period();
        debug!("ticker '{}': rate {}, period {:?}", config.name, config.rate, period);

        let handle = {
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name(config.name.clone())
                .spawn(move || ticker_thread(&driver, period, &running))
                .map_err(TickerError::Spawn)?
        };

        info!("ticker '{}' started at {}", config.name, config.rate);
        Ok(Self {
            running,
            handle: Some(handle),
            rate: config.rate,
        })
    }

    /// Configured tick rate
    pub fn rate(&self) -> TickRate {
        self.rate
    }

    /// Check if the thread is still delivering ticks
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the thread and return how many ticks it delivered
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        self.running.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return 0;
        };
        match handle.join() {
            Ok(delivered) => {
                info!("ticker stopped after {} ticks", delivered);
                delivered
            }
            Err(_) => {
                warn!("ticker thread panicked");
                0
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn ticker_thread<D: TickDriver>(driver: &D, period: Duration, running: &AtomicBool) -> u64 {
    let mut next_tick = Instant::now();
    let mut delivered = 0u64;
    let mut lagging = false;

    while running.load(Ordering::Acquire) {
        next_tick += period;

        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
            lagging = false;
        } else if now - next_tick > period && !lagging {
            // Missed ticks are still delivered, back to back, to keep the count exact.
            warn!("ticker behind schedule by {:?}", now - next_tick);
            lagging = true;
        }

        driver.advance();
        delivered += 1;
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_period() {
        let config = TickerConfig::from_hz(100).unwrap();
        assert_eq!(config.period(), Duration::from_millis(10));

        let config = TickerConfig::from_hz(1000).unwrap();
        assert_eq!(config.period(), Duration::from_micros(1000));
    }

    #[test]
    fn test_config_limits() {
        assert!(matches!(
            TickerConfig::from_hz(0),
            Err(TickerError::Rate(BspError::InvalidTickRate))
        ));
        assert!(matches!(
            TickerConfig::from_hz(MAX_TICKS_PER_SEC + 1),
            Err(TickerError::RateTooHigh(10_001))
        ));
        assert!(TickerConfig::from_hz(MAX_TICKS_PER_SEC).is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TickerError::RateTooHigh(10_001).to_string(),
            "tick rate 10001Hz exceeds the host limit of 10000Hz"
        );
        let err = TickerError::from(BspError::InvalidTickRate);
        assert_eq!(err.to_string(), "invalid tick rate: Tick rate must be non-zero");
    }

    #[test]
    fn test_default_config() {
        let config = TickerConfig::default().with_name("main-tick");
        assert_eq!(config.rate().hz(), DEFAULT_TICKS_PER_SEC);
        assert_eq!(config.name, "main-tick");
    }
}
