use crate::clock::WallClockSample;
use crate::timebase::Duration;

/// Hardware timing. The defaults were tuned on the real hammers; change them
/// only after retesting on the mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChimeTiming {
  /// How long a solenoid stays energized per strike.
  pub pulse: Duration,
  /// Time slot of one song entry, measured from playback start.
  pub note_spacing: Duration,
  /// Gap between hour gong strikes.
  pub strike_interval: Duration,
  /// Sleep granularity of every poll loop.
  pub poll: Duration,
}

impl ChimeTiming {
  pub const PULSE: Duration = Duration::millis(20);
  pub const NOTE_SPACING: Duration = Duration::secs(1);
  pub const STRIKE_INTERVAL: Duration = Duration::secs(3);
  pub const POLL: Duration = Duration::millis(100);

  pub const fn new() -> Self {
    Self {
      pulse: Self::PULSE,
      note_spacing: Self::NOTE_SPACING,
      strike_interval: Self::STRIKE_INTERVAL,
      poll: Self::POLL,
    }
  }
}

impl Default for ChimeTiming {
  fn default() -> Self {
    Self::new()
  }
}

/// Inclusive range of hours (24h) during which the chime may sound.
///
/// `start > end` wraps past midnight, e.g. `22..=6` for a night-only chime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChimeHours {
  pub start: u8,
  pub end: u8,
}

impl ChimeHours {
  pub const fn new(start: u8, end: u8) -> Self {
    Self { start, end }
  }

  pub const fn contains(&self, hour: u8) -> bool {
    if self.start <= self.end {
      hour >= self.start && hour <= self.end
    } else {
      hour >= self.start || hour <= self.end
    }
  }

  /// Whether the chime due near `now` should sound. Late in the hour the
  /// chime belongs to the hour about to start, so that one is checked.
  pub const fn allows(&self, now: &WallClockSample) -> bool {
    let hour = if now.minute < 50 { now.hour } else { (now.hour + 1) % 24 };
    self.contains(hour)
  }
}

impl Default for ChimeHours {
  fn default() -> Self {
    Self::new(7, 22)
  }
}
