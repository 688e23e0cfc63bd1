// Log forwarding: defmt on the Pico, tracing on Linux, nothing otherwise.
// defmt wins if both are enabled.
#![allow(unused_macros)]

macro_rules! info {
  ($s:literal $(, $x:expr)* $(,)?) => {
    {
      #[cfg(feature = "defmt")]
      ::defmt::info!($s $(, $x)*);
      #[cfg(all(feature = "tracing", not(feature = "defmt")))]
      ::tracing::info!($s $(, $x)*);
      #[cfg(not(any(feature = "defmt", feature = "tracing")))]
      let _ = ($( & $x ),*);
    }
  };
}

macro_rules! debug {
  ($s:literal $(, $x:expr)* $(,)?) => {
    {
      #[cfg(feature = "defmt")]
      ::defmt::debug!($s $(, $x)*);
      #[cfg(all(feature = "tracing", not(feature = "defmt")))]
      ::tracing::debug!($s $(, $x)*);
      #[cfg(not(any(feature = "defmt", feature = "tracing")))]
      let _ = ($( & $x ),*);
    }
  };
}

macro_rules! trace {
  ($s:literal $(, $x:expr)* $(,)?) => {
    {
      #[cfg(feature = "defmt")]
      ::defmt::trace!($s $(, $x)*);
      #[cfg(all(feature = "tracing", not(feature = "defmt")))]
      ::tracing::trace!($s $(, $x)*);
      #[cfg(not(any(feature = "defmt", feature = "tracing")))]
      let _ = ($( & $x ),*);
    }
  };
}

macro_rules! warn {
  ($s:literal $(, $x:expr)* $(,)?) => {
    {
      #[cfg(feature = "defmt")]
      ::defmt::warn!($s $(, $x)*);
      #[cfg(all(feature = "tracing", not(feature = "defmt")))]
      ::tracing::warn!($s $(, $x)*);
      #[cfg(not(any(feature = "defmt", feature = "tracing")))]
      let _ = ($( & $x ),*);
    }
  };
}
