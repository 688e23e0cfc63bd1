//! One chime run on a Linux board, started from cron:
//!
//! ```text
//! 14,29,44,59 7-22 * * * /usr/local/bin/chime_cron
//! ```
//!
//! Takes no arguments. Exits non-zero if a line could not be claimed, a line
//! faulted, or a signal stopped the run; the lines are released first.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time;

use anyhow::{Context, Result};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use sysfs_gpio::{Direction, Pin};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chimer::{
  ChimeTiming, ClockSource, Dispatcher, Performance, Solenoids, SystemTimebase, WallClockSample,
  N_CHANNELS,
};

/// BCM line numbers: quarter bells low to high, then the hour gong.
const CHANNEL_LINES: [u64; N_CHANNELS] = [17, 18, 27, 22, 23];

/// A sysfs GPIO line exported as an output for the life of the value.
struct SysfsLine {
  pin: Pin,
}

impl SysfsLine {
  fn claim(number: u64) -> sysfs_gpio::Result<Self> {
    let pin = Pin::new(number);
    pin.export()?;
    pin.set_direction(Direction::Low)?;
    Ok(Self { pin })
  }
}

impl OutputPin for SysfsLine {
  type Error = sysfs_gpio::Error;

  fn set_high(&mut self) -> Result<(), Self::Error> {
    self.pin.set_value(1)
  }

  fn set_low(&mut self) -> Result<(), Self::Error> {
    self.pin.set_value(0)
  }
}

impl Drop for SysfsLine {
  fn drop(&mut self) {
    let _ = self.pin.set_value(0);
    if let Err(e) = self.pin.unexport() {
      error!("unexport gpio{}: {}", self.pin.get_pin_num(), e);
    }
  }
}

struct StdDelay;

impl DelayMs<u32> for StdDelay {
  fn delay_ms(&mut self, ms: u32) {
    std::thread::sleep(time::Duration::from_millis(ms as u64));
  }
}

struct LocalClock;

impl ClockSource for LocalClock {
  fn sample(&mut self) -> WallClockSample {
    WallClockSample::from_time(&chrono::Local::now())
  }
}

fn claim_lines() -> Result<[SysfsLine; N_CHANNELS]> {
  let mut lines = Vec::with_capacity(N_CHANNELS);
  for number in CHANNEL_LINES {
    lines.push(SysfsLine::claim(number).with_context(|| format!("claim gpio{}", number))?);
  }
  lines
    .try_into()
    .map_err(|_| anyhow::anyhow!("expected {} lines", N_CHANNELS))
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let stop = Arc::new(AtomicBool::new(false));
  for signal in signal_hook::consts::TERM_SIGNALS {
    signal_hook::flag::register(*signal, Arc::clone(&stop))
      .with_context(|| format!("register handler for signal {}", signal))?;
  }

  let timing = ChimeTiming::default();
  let lines = claim_lines()?;
  let mut solenoids = Solenoids::new(lines, StdDelay, timing.pulse);

  let mut clock = LocalClock;
  let mut timebase = SystemTimebase::new(stop, timing.poll);

  let outcome = {
    let mut engaged = solenoids.engage().context("drive lines low")?;
    Dispatcher::new(timing).run(&mut clock, &mut timebase, &mut engaged)
  };

  let performance = match outcome {
    Ok(performance) => performance,
    Err(e) if e.is_interrupted() => {
      info!("stopped by signal, lines released");
      return Err(e.into());
    }
    Err(e) => return Err(e).context("chime run"),
  };
  match performance {
    Performance::Quarter(song) => info!("played {}", song.name()),
    Performance::Hour { strikes } => info!("struck {} o'clock", strikes),
    Performance::Silent => info!("nothing due"),
  }
  Ok(())
}
