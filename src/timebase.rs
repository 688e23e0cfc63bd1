//! Monotonic time and blocking waits.
//!
//! Every phase measures elapsed time against an [`Instant`] captured when it
//! starts and sleeps in short slices in between. The instant type is the one
//! the rp2040 `Timer` counter returns, a microsecond tick count.

use crate::error::Interrupted;

pub type Instant = fugit::TimerInstantU64<1_000_000>;
pub type Duration = fugit::MicrosDurationU64;

pub trait Timebase {
  /// Current monotonic instant. Never goes backwards.
  fn now(&mut self) -> Instant;

  /// Block for `duration`. Returns `Err(Interrupted)` if the host wants the
  /// run to stop; the caller must unwind without firing anything else.
  fn sleep(&mut self, duration: Duration) -> Result<(), Interrupted>;

  /// Time since `start`.
  fn elapsed_since(&mut self, start: Instant) -> Duration {
    let now = self.now();
    now.checked_duration_since(start).unwrap_or(Duration::from_ticks(0))
  }
}

/// `unit * count`, kept in microsecond ticks.
pub(crate) const fn times(unit: Duration, count: usize) -> Duration {
  Duration::from_ticks(unit.ticks() * count as u64)
}

/// Whole seconds needed to cover `span`, rounding up.
pub(crate) const fn whole_seconds(span: Duration) -> u64 {
  span.ticks().div_ceil(1_000_000)
}

impl<T: Timebase + ?Sized> Timebase for &mut T {
  fn now(&mut self) -> Instant {
    (**self).now()
  }

  fn sleep(&mut self, duration: Duration) -> Result<(), Interrupted> {
    (**self).sleep(duration)
  }
}
