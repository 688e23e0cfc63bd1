//! Waiting for the wall clock to reach a given second.
//!
//! The clock only has whole-second resolution, so the wait sleeps to one
//! second short of the target and then polls in short slices until the
//! reported second flips over.

use crate::clock::{ClockSource, WallClockSample};
use crate::config::ChimeTiming;
use crate::error::Interrupted;
use crate::timebase::{Duration, Timebase};

/// Whole seconds to sleep from `current` so that the next sample lands just
/// before `target`: `(target - current - 1) mod 60`.
pub const fn seconds_until(current: u8, target: u8) -> u8 {
  let delta = target as i16 - (current as i16 + 1);
  if delta < 0 {
    (delta + 60) as u8
  } else {
    delta as u8
  }
}

/// Block until the sampled second equals `target` and return that sample.
///
/// A target below the current second is reached in the next minute.
pub fn wait_until_second<C, T>(
  clock: &mut C,
  timebase: &mut T,
  target: u8,
  timing: &ChimeTiming,
) -> Result<WallClockSample, Interrupted>
where
  C: ClockSource,
  T: Timebase,
{
  let mut announced = false;
  loop {
    let now = clock.sample();
    if now.second == target {
      return Ok(now);
    }
    let wait = match seconds_until(now.second, target) {
      0 => timing.poll,
      secs => Duration::secs(secs as u64),
    };
    if !announced {
      debug!("align {:02}:{:02} -> second {:02}", now.minute, now.second, target);
      announced = true;
    }
    timebase.sleep(wait)?;
  }
}
