//! Timebase for hosted builds, stoppable from a signal handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time;

use crate::error::Interrupted;
use crate::timebase::{Duration, Instant, Timebase};

/// Process-relative monotonic time. Sleeps in short slices so a set `stop`
/// flag is noticed within one slice.
pub struct SystemTimebase {
  origin: time::Instant,
  stop: Arc<AtomicBool>,
  slice: time::Duration,
}

impl SystemTimebase {
  pub fn new(stop: Arc<AtomicBool>, slice: Duration) -> Self {
    Self {
      origin: time::Instant::now(),
      stop,
      slice: time::Duration::from_micros(slice.ticks().max(1)),
    }
  }

  fn stopped(&self) -> bool {
    self.stop.load(Ordering::Relaxed)
  }
}

impl Timebase for SystemTimebase {
  fn now(&mut self) -> Instant {
    Instant::from_ticks(self.origin.elapsed().as_micros() as u64)
  }

  fn sleep(&mut self, duration: Duration) -> Result<(), Interrupted> {
    let mut left = time::Duration::from_micros(duration.ticks());
    while !left.is_zero() {
      if self.stopped() {
        return Err(Interrupted);
      }
      let step = left.min(self.slice);
      std::thread::sleep(step);
      left -= step;
    }
    if self.stopped() {
      return Err(Interrupted);
    }
    Ok(())
  }
}
