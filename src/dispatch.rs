//! Picking what to play for the minute the run was started in.

use crate::actuator::Actuator;
use crate::align::wait_until_second;
use crate::clock::ClockSource;
use crate::config::{ChimeHours, ChimeTiming};
use crate::error::ChimeError;
use crate::song::{play, Song, FIRST_SONG, HOUR_SONG, SECOND_SONG, THIRD_SONG};
use crate::strike::strike_hour;
use crate::timebase::{whole_seconds, Timebase};

/// The four minutes a run is expected to start in. Each chime is due at
/// the top of the following minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mark {
  QuarterPast,
  HalfPast,
  QuarterTo,
  Hour,
}

impl Mark {
  pub const fn for_minute(minute: u8) -> Option<Mark> {
    match minute {
      14 => Some(Mark::QuarterPast),
      29 => Some(Mark::HalfPast),
      44 => Some(Mark::QuarterTo),
      59 => Some(Mark::Hour),
      _ => None,
    }
  }

  pub const fn song(self) -> &'static Song {
    match self {
      Mark::QuarterPast => &FIRST_SONG,
      Mark::HalfPast => &SECOND_SONG,
      Mark::QuarterTo => &THIRD_SONG,
      Mark::Hour => &HOUR_SONG,
    }
  }
}

/// What a run ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
  Quarter(&'static Song),
  Hour { strikes: u8 },
  Silent,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
  timing: ChimeTiming,
  hours: Option<ChimeHours>,
}

impl Dispatcher {
  pub const fn new(timing: ChimeTiming) -> Self {
    Self { timing, hours: None }
  }

  /// Only chime inside `hours`.
  pub const fn with_hours(self, hours: ChimeHours) -> Self {
    Self { hours: Some(hours), ..self }
  }

  pub const fn timing(&self) -> &ChimeTiming {
    &self.timing
  }

  /// Second of minute 59 at which the hour song must start so that its
  /// last slot ends on the hour.
  pub const fn hour_song_start(&self) -> u8 {
    let lead = whole_seconds(HOUR_SONG.duration(self.timing.note_spacing)) % 60;
    ((60 - lead) % 60) as u8
  }

  /// One invocation: sample the clock once and perform whatever is due.
  pub fn run<A, C, T>(
    &self,
    clock: &mut C,
    timebase: &mut T,
    actuator: &mut A,
  ) -> Result<Performance, ChimeError<A::Error>>
  where
    A: Actuator,
    C: ClockSource,
    T: Timebase,
  {
    let now = clock.sample();
    let Some(mark) = Mark::for_minute(now.minute) else {
      debug!("nothing due at minute {}", now.minute);
      return Ok(Performance::Silent);
    };
    if let Some(hours) = self.hours {
      if !hours.allows(&now) {
        info!("{:02}:{:02} outside chime hours", now.hour, now.minute);
        return Ok(Performance::Silent);
      }
    }

    let timing = &self.timing;
    match mark {
      Mark::Hour => {
        wait_until_second(clock, timebase, self.hour_song_start(), timing)?;
        play(mark.song(), actuator, timebase, timing)?;

        if clock.sample().second != 0 {
          wait_until_second(clock, timebase, 0, timing)?;
        }
        let strikes = strike_hour(actuator, clock, timebase, timing)?;
        Ok(Performance::Hour { strikes })
      }
      quarter => {
        wait_until_second(clock, timebase, 0, timing)?;
        play(quarter.song(), actuator, timebase, timing)?;
        Ok(Performance::Quarter(quarter.song()))
      }
    }
  }
}
