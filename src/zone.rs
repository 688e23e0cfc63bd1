//! UTC to local civil time: a fixed standard offset plus a daylight-saving rule.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DstRule {
  Off,
  /// Second Sunday of March 02:00 to first Sunday of November 02:00 daylight.
  UnitedStates,
  /// Last Sunday of March to last Sunday of October, 01:00 UTC both ways.
  Europe,
  /// First Sunday of October 02:00 to first Sunday of April 03:00 daylight.
  Australia,
  /// Last Sunday of September 02:00 to first Sunday of April 03:00 daylight.
  NewZealand,
}

#[derive(Debug, Clone, Copy)]
enum Sunday {
  Nth(u8),
  Last,
}

/// A switch day and hour, in local standard time unless noted.
#[derive(Debug, Clone, Copy)]
struct Change {
  month: u32,
  sunday: Sunday,
  hour: u32,
}

const fn change(month: u32, sunday: Sunday, hour: u32) -> Change {
  Change { month, sunday, hour }
}

impl Change {
  fn in_year(self, year: i32) -> Option<NaiveDateTime> {
    let date = match self.sunday {
      Sunday::Nth(n) => NaiveDate::from_weekday_of_month_opt(year, self.month, Weekday::Sun, n),
      Sunday::Last => NaiveDate::from_weekday_of_month_opt(year, self.month, Weekday::Sun, 5)
        .or_else(|| NaiveDate::from_weekday_of_month_opt(year, self.month, Weekday::Sun, 4)),
    }?;
    date.and_hms_opt(self.hour, 0, 0)
  }
}

/// Whether `t` falls in `[from, until)` of its own year.
fn within(t: &NaiveDateTime, from: Change, until: Change) -> Option<bool> {
  let from = from.in_year(t.year())?;
  let until = until.in_year(t.year())?;
  Some(from <= *t && *t < until)
}

impl DstRule {
  /// `standard` is `utc` shifted by the zone's standard offset.
  pub fn in_effect(self, utc: &NaiveDateTime, standard: &NaiveDateTime) -> bool {
    let summer = match self {
      DstRule::Off => return false,
      DstRule::UnitedStates => {
        within(standard, change(3, Sunday::Nth(2), 2), change(11, Sunday::Nth(1), 1))
      }
      DstRule::Europe => within(utc, change(3, Sunday::Last, 1), change(10, Sunday::Last, 1)),
      // southern hemisphere: summer straddles the new year
      DstRule::Australia => {
        within(standard, change(4, Sunday::Nth(1), 2), change(10, Sunday::Nth(1), 2))
          .map(|winter| !winter)
      }
      DstRule::NewZealand => {
        within(standard, change(4, Sunday::Nth(1), 2), change(9, Sunday::Last, 2))
          .map(|winter| !winter)
      }
    };
    summer.unwrap_or(false)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZone {
  utc_offset_hours: i8,
  dst: DstRule,
}

impl TimeZone {
  pub const UTC: TimeZone = TimeZone::new(0, DstRule::Off);

  pub const fn new(utc_offset_hours: i8, dst: DstRule) -> Self {
    Self { utc_offset_hours, dst }
  }

  pub fn to_local(&self, utc: &NaiveDateTime) -> NaiveDateTime {
    let standard = *utc + Duration::hours(self.utc_offset_hours as i64);
    if self.dst.in_effect(utc, &standard) {
      standard + Duration::hours(1)
    }
    else {
      standard
    }
  }
}
