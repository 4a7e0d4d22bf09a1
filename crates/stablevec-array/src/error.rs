use thiserror::Error;

use stablevec_region::RegionError;
use stablevec_sys::system::SysError;

/// Capacity exhaustion. Every variant means the request could not be backed
/// by memory; the sequence is left exactly as it was.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StableError {
  /// The request needs more bytes than were reserved at construction.
  #[error("out of memory: {requested} bytes requested from a {limit} byte reservation")]
  LimitExceeded { requested: usize, limit: usize },
  /// The operating system refused to reserve or commit pages.
  #[error("out of memory: {0}")]
  System(#[from] SysError),
}

impl From<RegionError> for StableError {
  fn from(error: RegionError) -> Self {
    match error {
      RegionError::System(error) => StableError::System(error),
      RegionError::OutOfBounds {
        requested,
        reserved,
      } => StableError::LimitExceeded {
        requested,
        limit: reserved,
      },
    }
  }
}

pub type StableResult<T> = Result<T, StableError>;
