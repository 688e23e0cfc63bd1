//! The Westminster quarters and the player that strikes them.

use crate::actuator::{Actuator, Channel};
use crate::config::ChimeTiming;
use crate::error::ChimeError;
use crate::timebase::{times, Duration, Instant, Timebase};

/// One slot of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Note {
  Strike(Channel),
  /// Hold the slot silent.
  Rest,
}

/// A fixed score: one note per time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Song {
  name: &'static str,
  notes: &'static [Note],
}

impl Song {
  pub const fn new(name: &'static str, notes: &'static [Note]) -> Self {
    Self { name, notes }
  }

  pub const fn name(&self) -> &'static str {
    self.name
  }

  pub const fn notes(&self) -> &'static [Note] {
    self.notes
  }

  pub const fn len(&self) -> usize {
    self.notes.len()
  }

  pub const fn is_empty(&self) -> bool {
    self.notes.is_empty()
  }

  /// Time from the first slot to the end of the last one.
  pub const fn duration(&self, note_spacing: Duration) -> Duration {
    times(note_spacing, self.notes.len())
  }
}

const fn n(index: u8) -> Note {
  Note::Strike(Channel::new(index))
}

const R: Note = Note::Rest;

// Channels 0-3 are the quarter bells, lowest to highest.
pub const FIRST_SONG: Song = Song::new("first quarter", &[n(3), n(2), n(1), n(0)]);

pub const SECOND_SONG: Song = Song::new(
  "half hour",
  &[n(1), n(3), n(2), n(0), R, n(1), n(2), n(3), n(1)],
);

pub const THIRD_SONG: Song = Song::new(
  "third quarter",
  &[n(3), n(1), n(2), n(0), R, n(0), n(2), n(3), n(1), R, n(3), n(2), n(1), n(0)],
);

// Padded with rests so it ends on the hour.
pub const HOUR_SONG: Song = Song::new(
  "hour",
  &[
    n(1), n(3), n(2), n(0), R,
    n(1), n(2), n(3), n(1), R,
    n(3), n(1), n(2), n(0), R,
    n(0), n(2), n(3), n(1), R,
    R, R,
  ],
);

/// Where one playback has got to.
struct Playback {
  start: Instant,
  position: usize,
}

/// Strike `song`, each entry at `position * note_spacing` after the call.
///
/// Offsets are taken from the start of playback rather than from the previous
/// note, so pulse length and poll granularity never accumulate.
pub fn play<A, T>(
  song: &Song,
  actuator: &mut A,
  timebase: &mut T,
  timing: &ChimeTiming,
) -> Result<(), ChimeError<A::Error>>
where
  A: Actuator,
  T: Timebase,
{
  info!("play {} ({} slots)", song.name(), song.len());
  let mut session = Playback { start: timebase.now(), position: 0 };

  while session.position < song.len() {
    let due = times(timing.note_spacing, session.position);
    if timebase.elapsed_since(session.start) < due {
      timebase.sleep(timing.poll)?;
      continue;
    }
    match song.notes()[session.position] {
      Note::Strike(channel) => {
        trace!("note {} -> channel {}", session.position, channel.index());
        actuator.pulse(channel).map_err(ChimeError::Actuator)?;
      }
      Note::Rest => trace!("note {} rest", session.position),
    }
    session.position += 1;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sim::{Recorder, Sim};
  use std::vec::Vec;

  fn channels(song: &Song) -> Vec<usize> {
    song
      .notes()
      .iter()
      .filter_map(|note| match note {
        Note::Strike(ch) => Some(ch.index()),
        Note::Rest => None,
      })
      .collect()
  }

  fn run(song: &Song) -> Sim {
    let sim = Sim::at(10, 0, 0);
    let timing = ChimeTiming::default();
    let mut actuator = Recorder::new(&sim, timing.pulse);
    let mut timebase = sim.clone();
    play(song, &mut actuator, &mut timebase, &timing).unwrap();
    sim
  }

  #[test]
  fn scores_have_expected_lengths() {
    assert_eq!(FIRST_SONG.len(), 4);
    assert_eq!(SECOND_SONG.len(), 9);
    assert_eq!(THIRD_SONG.len(), 14);
    assert_eq!(HOUR_SONG.len(), 22);
  }

  #[test]
  fn scores_only_use_quarter_bells() {
    for song in [FIRST_SONG, SECOND_SONG, THIRD_SONG, HOUR_SONG] {
      assert!(channels(&song).iter().all(|&ch| ch < 4), "{}", song.name());
    }
  }

  #[test]
  fn fires_every_strike_in_order() {
    for song in [FIRST_SONG, SECOND_SONG, THIRD_SONG, HOUR_SONG] {
      let sim = run(&song);
      assert_eq!(sim.fired_channels(), channels(&song), "{}", song.name());
    }
  }

  #[test]
  fn no_note_fires_before_its_slot() {
    let timing = ChimeTiming::default();
    for song in [FIRST_SONG, SECOND_SONG, THIRD_SONG, HOUR_SONG] {
      let sim = run(&song);
      let slots = song
        .notes()
        .iter()
        .enumerate()
        .filter(|(_, note)| **note != Note::Rest)
        .map(|(slot, _)| slot);
      for (fired, slot) in sim.fired().iter().zip(slots) {
        let due = times(timing.note_spacing, slot);
        assert!(fired.at >= due, "{} slot {} early", song.name(), slot);
        // late by at most one poll plus the pulse that was in progress
        assert!(fired.at < due + timing.poll + timing.pulse, "{} slot {} late", song.name(), slot);
      }
    }
  }

  #[test]
  fn rest_holds_its_slot_silently() {
    static WITH_REST: Song = Song::new("gap", &[n(0), R, n(1)]);
    let sim = run(&WITH_REST);
    let fired = sim.fired();
    assert_eq!(sim.fired_channels(), [0usize, 1]);
    assert!(fired[1].at >= Duration::secs(2));
  }

  #[test]
  fn all_rest_song_strikes_nothing() {
    static SILENT: Song = Song::new("silent", &[R, R, R]);
    let sim = run(&SILENT);
    assert!(sim.fired().is_empty());
    assert!(sim.elapsed() >= Duration::secs(2));
  }

  #[test]
  fn empty_song_returns_at_once() {
    static EMPTY: Song = Song::new("empty", &[]);
    let sim = run(&EMPTY);
    assert!(sim.fired().is_empty());
    assert_eq!(sim.elapsed(), Duration::from_ticks(0));
  }

  #[test]
  fn hour_song_lasts_twenty_two_seconds() {
    assert_eq!(HOUR_SONG.duration(ChimeTiming::NOTE_SPACING), Duration::secs(22));
  }
}
