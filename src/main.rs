
#![no_std]
#![no_main]

use rp_pico::entry;
use defmt::*;
use defmt_rtt as _;
use panic_probe as _;

use fugit::{RateExtU32};

use rp_pico as bsp;
use embedded_hal::{
  digital::v2::{OutputPin},
  blocking::delay::DelayMs,
};
use bsp::hal as p_hal;

use rv3028c7_rtc::{RV3028, DateTimeAccess};

use p_hal::{
  Clock,
  clocks::{init_clocks_and_plls},
  pac,
  sio::Sio,
  watchdog::Watchdog,
  gpio::{DynPinId, FunctionI2C, FunctionSioOutput, Pin, PullDown, PullUp},
  Timer,
};
use cortex_m::delay::Delay;

use chimer::{
  ChimeHours, ChimeTiming, ClockSource, Dispatcher, DstRule, Interrupted, Mark, Performance,
  Solenoids, TimeZone, Timebase, WallClockSample, N_CHANNELS,
};

const EXTERNAL_XTAL_FREQ_HZ: u32 = 12_000_000u32;

// The RV3028 keeps UTC. Local time is US Pacific.
const LOCAL_ZONE: TimeZone = TimeZone::new(-8, DstRule::UnitedStates);

// Keep quiet overnight
const CHIME_HOURS: ChimeHours = ChimeHours::new(7, 22);

type SolenoidPin = Pin<DynPinId, FunctionSioOutput, PullDown>;


/// Wall clock read from the external RTC, shifted to local time.
struct RtcClock<I2C> {
  rtc: RV3028<I2C>,
  last: WallClockSample,
}

impl<I2C> RtcClock<I2C> {
  fn new(rtc: RV3028<I2C>) -> Self {
    Self { rtc, last: WallClockSample::new(0, 0, 0) }
  }
}

impl<I2C> ClockSource for RtcClock<I2C>
where
  RV3028<I2C>: DateTimeAccess,
{
  fn sample(&mut self) -> WallClockSample {
    // A failed I2C read keeps the previous reading; the next poll retries.
    if let Ok(utc) = self.rtc.datetime() {
      self.last = WallClockSample::from_time(&LOCAL_ZONE.to_local(&utc));
    }
    else {
      println!("ext rtc fail");
    }
    self.last
  }
}

/// Monotonic microsecond counter and blocking waits from the rp2040 timer.
struct PicoTimebase {
  timer: Timer,
}

impl Timebase for PicoTimebase {
  fn now(&mut self) -> chimer::Instant {
    self.timer.get_counter()
  }

  fn sleep(&mut self, duration: chimer::Duration) -> Result<(), Interrupted> {
    self.timer.delay_ms(duration.to_millis() as u32);
    Ok(())
  }
}

#[entry]
fn main() -> ! {

  info!("Program start");
  let mut pac = pac::Peripherals::take().unwrap();
  let core = pac::CorePeripherals::take().unwrap();
  let mut watchdog = Watchdog::new(pac.WATCHDOG);
  let sio = Sio::new(pac.SIO);

  // External high-speed crystal on the pico board is 12Mhz
  let clocks = init_clocks_and_plls(
    EXTERNAL_XTAL_FREQ_HZ,
    pac.XOSC,
    pac.CLOCKS,
    pac.PLL_SYS,
    pac.PLL_USB,
    &mut pac.RESETS,
    &mut watchdog,
  )
    .ok()
    .unwrap();

  let delay = Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());
  let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

  let pins = bsp::Pins::new(
    pac.IO_BANK0,
    pac.PADS_BANK0,
    sio.gpio_bank0,
    &mut pac.RESETS,
  );

  // Solenoid drivers: GP16-GP19 are the quarter bells low to high, GP20 the hour gong
  let hammer_pins: [SolenoidPin; N_CHANNELS] = [
    pins.gpio16.into_push_pull_output().into_dyn_pin(),
    pins.gpio17.into_push_pull_output().into_dyn_pin(),
    pins.gpio18.into_push_pull_output().into_dyn_pin(),
    pins.gpio19.into_push_pull_output().into_dyn_pin(),
    pins.gpio20.into_push_pull_output().into_dyn_pin(),
  ];
  let timing = ChimeTiming::default();
  let mut solenoids = Solenoids::new(hammer_pins, delay, timing.pulse);
  solenoids.release_all();

  // Configure two pins as being I²C, not GPIO
  let sda_pin: Pin<_, FunctionI2C, PullUp> = pins.gpio2.reconfigure();
  let scl_pin: Pin<_, FunctionI2C, PullUp> = pins.gpio3.reconfigure();

  let i2c = p_hal::I2C::i2c1(
    pac.I2C1,
    sda_pin,
    scl_pin,
    400.kHz(),
    &mut pac.RESETS,
    &clocks.system_clock,
  );

  // Create a new instance of the RV3028 driver
  let mut clock = RtcClock::new(RV3028::new(i2c));
  let mut timebase = PicoTimebase { timer };
  let dispatcher = Dispatcher::new(timing).with_hours(CHIME_HOURS);

  let mut led_pin = pins.led.into_push_pull_output();

  println!("enter loop...");
  let mut last_minute = 99;
  loop {
    let now = clock.sample();
    if now.minute == last_minute {
      // don't check again until the next minute
      timebase.timer.delay_ms(250u32);
      continue;
    }
    last_minute = now.minute;
    println!("check: {:02}:{:02}:{:02}", now.hour, now.minute, now.second);

    if Mark::for_minute(now.minute).is_none() {
      continue;
    }

    let _ = led_pin.set_high();
    let outcome = {
      // lines are released when `engaged` drops, whatever the outcome
      let mut engaged = solenoids.engage().unwrap();
      dispatcher.run(&mut clock, &mut timebase, &mut engaged)
    };
    match outcome {
      Ok(Performance::Quarter(song)) => println!("played {}", song.name()),
      Ok(Performance::Hour { strikes }) => println!("struck {}", strikes),
      Ok(Performance::Silent) => println!("silent"),
      Err(_) => println!("chime run failed"),
    }
    let _ = led_pin.set_low();
  }

}
