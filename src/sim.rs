//! Deterministic stand-in for the clock, the timer and the output lines.
//!
//! Everything shares one microsecond counter: sleeping or holding a pulse
//! advances it, and wall-clock samples are derived from it.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::actuator::N_CHANNELS;
use crate::clock::{ClockSource, WallClockSample};
use crate::error::Interrupted;
use crate::timebase::{Duration, Instant, Timebase};

const MICROS_PER_SEC: u64 = 1_000_000;
const MICROS_PER_DAY: u64 = 24 * 60 * 60 * MICROS_PER_SEC;

/// A solenoid activation: channel and time since the simulation began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
  pub channel: usize,
  pub at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimFault;

#[derive(Default)]
struct World {
  micros: u64,
  wall_origin: u64,
  levels: [bool; N_CHANNELS],
  fired: Vec<Fired>,
  activations: usize,
  fail_on: Option<usize>,
  panic_on: Option<usize>,
  stop_at: Option<u64>,
  samples: usize,
  sleeps: Vec<Duration>,
}

#[derive(Clone)]
pub struct Sim(Rc<RefCell<World>>);

impl Sim {
  /// Simulation whose wall clock starts exactly on `hour:minute:second`.
  pub fn at(hour: u8, minute: u8, second: u8) -> Self {
    Self::at_millis(hour, minute, second, 0)
  }

  pub fn at_millis(hour: u8, minute: u8, second: u8, millis: u16) -> Self {
    let origin = ((hour as u64 * 60 + minute as u64) * 60 + second as u64) * MICROS_PER_SEC
      + millis as u64 * 1_000;
    Sim(Rc::new(RefCell::new(World { wall_origin: origin, ..World::default() })))
  }

  pub fn pins(&self) -> [SimPin; N_CHANNELS] {
    core::array::from_fn(|index| SimPin { sim: self.clone(), index })
  }

  pub fn delay(&self) -> SimDelay {
    SimDelay(self.clone())
  }

  pub fn elapsed(&self) -> Duration {
    Duration::from_ticks(self.0.borrow().micros)
  }

  pub fn wall(&self) -> WallClockSample {
    let world = self.0.borrow();
    wall_at(world.wall_origin + world.micros)
  }

  pub fn fired(&self) -> Vec<Fired> {
    self.0.borrow().fired.clone()
  }

  pub fn fired_channels(&self) -> Vec<usize> {
    self.0.borrow().fired.iter().map(|f| f.channel).collect()
  }

  pub fn levels(&self) -> [bool; N_CHANNELS] {
    self.0.borrow().levels
  }

  pub fn force_levels(&self, levels: [bool; N_CHANNELS]) {
    self.0.borrow_mut().levels = levels;
  }

  pub fn samples(&self) -> usize {
    self.0.borrow().samples
  }

  pub fn sleeps(&self) -> Vec<Duration> {
    self.0.borrow().sleeps.clone()
  }

  /// The `nth` activation (0-based) drives its line high and then reports a
  /// fault, leaving the line stuck on.
  pub fn fail_on_activation(&self, nth: usize) {
    self.0.borrow_mut().fail_on = Some(nth);
  }

  /// The `nth` activation drives its line high and then panics.
  pub fn panic_on_activation(&self, nth: usize) {
    self.0.borrow_mut().panic_on = Some(nth);
  }

  /// Sleeps that reach `at` (time since start) report an interruption.
  pub fn stop_after(&self, at: Duration) {
    self.0.borrow_mut().stop_at = Some(at.ticks());
  }

  fn advance(&self, micros: u64) {
    self.0.borrow_mut().micros += micros;
  }
}

fn wall_at(micros: u64) -> WallClockSample {
  let secs = (micros % MICROS_PER_DAY) / MICROS_PER_SEC;
  WallClockSample::new((secs / 3600) as u8, (secs / 60 % 60) as u8, (secs % 60) as u8)
}

impl ClockSource for Sim {
  fn sample(&mut self) -> WallClockSample {
    self.0.borrow_mut().samples += 1;
    self.wall()
  }
}

impl Timebase for Sim {
  fn now(&mut self) -> Instant {
    Instant::from_ticks(self.0.borrow().micros)
  }

  fn sleep(&mut self, duration: Duration) -> Result<(), Interrupted> {
    let mut world = self.0.borrow_mut();
    world.sleeps.push(duration);
    world.micros += duration.ticks();
    match world.stop_at {
      Some(at) if world.micros >= at => Err(Interrupted),
      _ => Ok(()),
    }
  }
}

pub struct SimPin {
  sim: Sim,
  index: usize,
}

impl OutputPin for SimPin {
  type Error = SimFault;

  fn set_high(&mut self) -> Result<(), SimFault> {
    let (nth, fail, panic) = {
      let mut world = self.sim.0.borrow_mut();
      let nth = world.activations;
      world.activations += 1;
      world.levels[self.index] = true;
      let at = Duration::from_ticks(world.micros);
      world.fired.push(Fired { channel: self.index, at });
      (nth, world.fail_on == Some(nth), world.panic_on == Some(nth))
    };
    if panic {
      panic!("solenoid {} jammed on activation {}", self.index, nth);
    }
    if fail {
      return Err(SimFault);
    }
    Ok(())
  }

  fn set_low(&mut self) -> Result<(), SimFault> {
    self.sim.0.borrow_mut().levels[self.index] = false;
    Ok(())
  }
}

pub struct SimDelay(Sim);

impl DelayMs<u32> for SimDelay {
  fn delay_ms(&mut self, ms: u32) {
    self.0.advance(ms as u64 * 1_000);
  }
}

/// Actuator that only records, for phase tests that do not care about lines.
pub struct Recorder {
  sim: Sim,
  pulse: Duration,
}

impl Recorder {
  pub fn new(sim: &Sim, pulse: Duration) -> Self {
    Self { sim: sim.clone(), pulse }
  }
}

impl crate::actuator::Actuator for Recorder {
  type Error = Infallible;

  fn pulse(&mut self, channel: crate::actuator::Channel) -> Result<(), Infallible> {
    {
      let mut world = self.sim.0.borrow_mut();
      let at = Duration::from_ticks(world.micros);
      world.fired.push(Fired { channel: channel.index(), at });
    }
    self.sim.advance(self.pulse.ticks());
    Ok(())
  }
}
