#![cfg_attr(not(test), no_std)]

//! An owned virtual address reservation whose prefix is committed.
//!
//! A [`Region`] reserves its whole range once and then only moves the
//! boundary between committed and reserved pages. The base address never
//! changes until the region is dropped.

use core::ptr::NonNull;

use getset::CopyGetters;
use thiserror::Error;

use stablevec_sys::{
  GLOBAL_SYSTEM,
  prim::is_page_aligned,
  system::SysError,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
  #[error(transparent)]
  System(#[from] SysError),
  #[error("{requested} bytes do not fit in a {reserved} byte reservation")]
  OutOfBounds { requested: usize, reserved: usize },
}

pub type RegionResult<T> = Result<T, RegionError>;

#[derive(Debug, CopyGetters)]
pub struct Region {
  #[getset(get_copy = "pub")]
  base: NonNull<u8>,
  #[getset(get_copy = "pub")]
  reserved: usize,
  #[getset(get_copy = "pub")]
  committed: usize,
}

impl Region {
  /// Reserves `limit` bytes without committing any of them.
  pub fn reserve(limit: usize) -> RegionResult<Region> {
    let base = unsafe { GLOBAL_SYSTEM.reserve(limit) }?;

    Ok(Region {
      base,
      reserved: limit,
      committed: 0,
    })
  }

  /// Grows the committed prefix to `bytes`. Shrinking requests are ignored.
  ///
  /// Only the pages past the current boundary are touched, so committed
  /// contents survive. `committed` moves only once the system call succeeded.
  pub fn commit_to(&mut self, bytes: usize) -> RegionResult<()> {
    assert!(is_page_aligned(bytes) == Ok(true), "commit boundary must be page aligned");

    if bytes <= self.committed {
      return Ok(());
    }
    if bytes > self.reserved {
      return Err(RegionError::OutOfBounds {
        requested: bytes,
        reserved: self.reserved,
      });
    }

    let delta = bytes - self.committed;
    unsafe { GLOBAL_SYSTEM.commit(self.base, self.committed, delta) }?;
    self.committed = bytes;
    Ok(())
  }

  /// Shrinks the committed prefix to `bytes`. Growing requests are ignored.
  ///
  /// Decommit is a hint on some platforms, so a failing call is logged and the
  /// pages are treated as gone either way.
  pub fn decommit_to(&mut self, bytes: usize) {
    assert!(is_page_aligned(bytes) == Ok(true), "decommit boundary must be page aligned");

    if bytes >= self.committed {
      return;
    }

    let delta = self.committed - bytes;
    if let Err(error) = unsafe { GLOBAL_SYSTEM.decommit(self.base, bytes, delta) } {
      tracing::warn!(%error, offset = bytes, size = delta, "decommit failed");
    }
    self.committed = bytes;
  }

  /// Bytes that are reserved but not committed.
  pub fn uncommitted(&self) -> usize {
    self.reserved - self.committed
  }

  pub fn as_ptr<T>(&self) -> NonNull<T> {
    self.base.cast()
  }

  /// The committed prefix as bytes.
  pub fn as_bytes(&self) -> &[u8] {
    unsafe { core::slice::from_raw_parts(self.base.as_ptr(), self.committed) }
  }

  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    unsafe { core::slice::from_raw_parts_mut(self.base.as_ptr(), self.committed) }
  }
}

impl Drop for Region {
  fn drop(&mut self) {
    if let Err(error) = unsafe { GLOBAL_SYSTEM.release(self.base, self.reserved) } {
      tracing::warn!(%error, size = self.reserved, "release failed");
    }
  }
}

// The region owns its pages outright; shared access is read-only.
unsafe impl Send for Region {}
unsafe impl Sync for Region {}
