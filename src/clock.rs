use chrono::Timelike;

/// Hour, minute and second read at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClockSample {
  pub hour: u8,
  pub minute: u8,
  pub second: u8,
}

impl WallClockSample {
  pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
    Self { hour, minute, second }
  }

  /// Snapshot of any chrono time value (`NaiveDateTime` from the RTC,
  /// `DateTime<Local>` on Linux). Leap seconds fold into second 59.
  pub fn from_time<T: Timelike>(dt: &T) -> Self {
    Self {
      hour: dt.hour() as u8,
      minute: dt.minute() as u8,
      second: dt.second().min(59) as u8,
    }
  }

  /// Hour on a 12-hour dial: midnight and noon are both 12.
  pub const fn hour_12(&self) -> u8 {
    match self.hour {
      0 => 12,
      h if h > 12 => h - 12,
      h => h,
    }
  }
}

/// Where wall-clock time comes from.
///
/// Called from tight poll loops, so implementations should be cheap. A source
/// that can fail (an I2C RTC) is expected to recover on its own, for instance
/// by returning its last good reading.
pub trait ClockSource {
  fn sample(&mut self) -> WallClockSample;
}

impl<C: ClockSource + ?Sized> ClockSource for &mut C {
  fn sample(&mut self) -> WallClockSample {
    (**self).sample()
  }
}
