//! Striking the hour on the gong.

use crate::actuator::{Actuator, Channel};
use crate::clock::ClockSource;
use crate::config::ChimeTiming;
use crate::error::ChimeError;
use crate::timebase::{times, Instant, Timebase};

struct Striking {
  start: Instant,
  count: u8,
}

/// Strike the gong once per hour on the 12-hour dial, one strike every
/// `strike_interval`. Returns the number of strikes fired.
///
/// The hour is sampled again after every strike, so a run that starts at
/// 11 and crosses midnight finishes at 12.
pub fn strike_hour<A, C, T>(
  actuator: &mut A,
  clock: &mut C,
  timebase: &mut T,
  timing: &ChimeTiming,
) -> Result<u8, ChimeError<A::Error>>
where
  A: Actuator,
  C: ClockSource,
  T: Timebase,
{
  let mut session = Striking { start: timebase.now(), count: 0 };
  loop {
    let due = times(timing.strike_interval, session.count as usize);
    if timebase.elapsed_since(session.start) < due {
      timebase.sleep(timing.poll)?;
      continue;
    }
    actuator.pulse(Channel::GONG).map_err(ChimeError::Actuator)?;
    session.count += 1;

    let hour_12 = clock.sample().hour_12();
    trace!("strike {} of {}", session.count, hour_12);
    if session.count >= hour_12 {
      info!("struck {} o'clock", session.count);
      return Ok(session.count);
    }
  }
}
