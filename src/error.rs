use thiserror::Error;

/// The host asked the run to stop while it was waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("interrupted while waiting")]
pub struct Interrupted;

/// Why a chime run ended early.
///
/// `E` is the error type of the output lines, `Infallible` for the rp2040
/// GPIOs and an I/O error for sysfs lines.
#[derive(Debug, Error)]
pub enum ChimeError<E> {
  #[error("output line fault: {0:?}")]
  Actuator(E),
  #[error("interrupted")]
  Interrupted,
}

impl<E> From<Interrupted> for ChimeError<E> {
  fn from(_: Interrupted) -> Self {
    ChimeError::Interrupted
  }
}

impl<E> ChimeError<E> {
  pub fn is_interrupted(&self) -> bool {
    matches!(self, ChimeError::Interrupted)
  }
}
