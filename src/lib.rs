//! Drives a set of solenoid chime hammers from wall-clock time.
//!
//! Each quarter hour plays one of the Westminster scores, and the top of the
//! hour is preceded by the full score and followed by one gong strike per
//! 12-hour clock hour. Every wait is a coarse poll against a [`ClockSource`]
//! and a [`Timebase`], so the same code runs on a Pico and on a Linux board.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[macro_use]
mod fmt;

pub mod actuator;
pub mod align;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod song;
pub mod strike;
pub mod timebase;
pub mod zone;

#[cfg(any(test, feature = "std"))]
pub mod host;

#[cfg(test)]
mod sim;

pub use actuator::{Actuator, Channel, Engaged, Solenoids, N_CHANNELS};
pub use align::{seconds_until, wait_until_second};
pub use clock::{ClockSource, WallClockSample};
pub use config::{ChimeHours, ChimeTiming};
pub use dispatch::{Dispatcher, Mark, Performance};
pub use error::{ChimeError, Interrupted};
pub use song::{play, Note, Song, FIRST_SONG, HOUR_SONG, SECOND_SONG, THIRD_SONG};
pub use strike::strike_hour;
pub use timebase::{Duration, Instant, Timebase};
pub use zone::{DstRule, TimeZone};

#[cfg(any(test, feature = "std"))]
pub use host::SystemTimebase;
