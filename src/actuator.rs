//! Solenoid output lines.
//!
//! [`Solenoids`] owns one `OutputPin` per hammer. Pulses can only be fired
//! through an [`Engaged`] guard, which drives every line low when it is
//! created and again when it goes out of scope, whichever way that happens.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::timebase::Duration;

/// Four quarter-note hammers, low to high, plus the hour gong.
pub const N_CHANNELS: usize = 5;

/// One hammer, by index into the output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
  pub const GONG: Channel = Channel(4);

  pub const fn new(index: u8) -> Self {
    Channel(index)
  }

  pub const fn index(self) -> usize {
    self.0 as usize
  }
}

/// Something that can strike a hammer.
pub trait Actuator {
  type Error;

  /// Energize `channel` for the pulse duration, then release it.
  /// Channels the actuator does not have are ignored.
  fn pulse(&mut self, channel: Channel) -> Result<(), Self::Error>;
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
  type Error = A::Error;

  fn pulse(&mut self, channel: Channel) -> Result<(), Self::Error> {
    (**self).pulse(channel)
  }
}

pub struct Solenoids<P, D, const N: usize> {
  pins: [P; N],
  delay: D,
  pulse: Duration,
}

impl<P, D, const N: usize> Solenoids<P, D, N>
where
  P: OutputPin,
  D: DelayMs<u32>,
{
  pub fn new(pins: [P; N], delay: D, pulse: Duration) -> Self {
    Self { pins, delay, pulse }
  }

  /// Claim the lines for one run: all inactive before anything fires.
  pub fn engage(&mut self) -> Result<Engaged<'_, P, D, N>, P::Error> {
    for pin in self.pins.iter_mut() {
      pin.set_low()?;
    }
    debug!("{} solenoid lines engaged", N);
    Ok(Engaged { bank: self })
  }

  /// Drive every line low. Keeps going past a failing line so one bad
  /// output cannot leave the others energized.
  pub fn release_all(&mut self) {
    for (index, pin) in self.pins.iter_mut().enumerate() {
      if pin.set_low().is_err() {
        warn!("solenoid {} did not release", index);
      }
    }
  }
}

/// Scoped claim on the solenoid lines. Dropping it releases every line.
pub struct Engaged<'a, P, D, const N: usize>
where
  P: OutputPin,
  D: DelayMs<u32>,
{
  bank: &'a mut Solenoids<P, D, N>,
}

impl<P, D, const N: usize> Actuator for Engaged<'_, P, D, N>
where
  P: OutputPin,
  D: DelayMs<u32>,
{
  type Error = P::Error;

  fn pulse(&mut self, channel: Channel) -> Result<(), P::Error> {
    let bank = &mut *self.bank;
    let Some(pin) = bank.pins.get_mut(channel.index()) else {
      trace!("no solenoid on channel {}", channel.index());
      return Ok(());
    };
    pin.set_high()?;
    bank.delay.delay_ms(bank.pulse.to_millis() as u32);
    pin.set_low()
  }
}

impl<P, D, const N: usize> Drop for Engaged<'_, P, D, N>
where
  P: OutputPin,
  D: DelayMs<u32>,
{
  fn drop(&mut self) {
    self.bank.release_all();
    debug!("solenoid lines released");
  }
}
