use core::ptr::NonNull;

use thiserror::Error;

use crate::prim::is_page_aligned;

#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::unix::UNIX_SYSTEM;
#[cfg(target_os = "windows")]
use crate::windows::WINDOWS_SYSTEM;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SysError {
  #[error("virtual memory is not supported on this platform")]
  Unsupported,
  #[error("the operating system refused to reserve or commit memory")]
  OutOfMemory,
  #[error("size or offset is zero, not page aligned, or outside the reservation")]
  InvalidArgument,
}

/// Page state a backend call moves a range into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysOption {
  Reserve,
  Commit,
  Reclaim,
}

pub type SysResult<T> = Result<T, SysError>;

/// Reserve/commit/decommit/release over one contiguous address range.
///
/// # Safety
///
/// Implementors must ensure that:
/// - `reserve` returns a page-aligned base that stays valid until `release`
/// - `commit` makes exactly `[base + offset, base + offset + size)` readable and
///   writable without moving `base` or touching bytes outside that range
/// - `decommit` keeps the address range reserved
/// - `release` returns the whole range to the operating system
pub unsafe trait System
where
  Self: Send + Sync,
{
  /// Reserves `size` bytes of address space with no access and no backing.
  ///
  /// # Safety
  ///
  /// The returned range must be handed back through `release` exactly once.
  unsafe fn reserve(&self, size: usize) -> SysResult<NonNull<u8>> {
    _ = size;
    Err(SysError::Unsupported)
  }

  /// Grants read/write backing to `[offset, offset + size)` of a reservation.
  ///
  /// # Safety
  ///
  /// `base` must come from `reserve` on this system, and the range must lie
  /// inside that reservation with page-aligned `offset` and `size`.
  unsafe fn commit(&self, base: NonNull<u8>, offset: usize, size: usize) -> SysResult<()> {
    _ = (base, offset, size);
    Err(SysError::Unsupported)
  }

  /// Drops the backing of `[offset, offset + size)` but keeps it reserved.
  ///
  /// # Safety
  ///
  /// Same range requirements as `commit`. The bytes must not be read again
  /// before a later `commit` covers them.
  unsafe fn decommit(&self, base: NonNull<u8>, offset: usize, size: usize) -> SysResult<()> {
    _ = (base, offset, size);
    Err(SysError::Unsupported)
  }

  /// Releases a whole reservation.
  ///
  /// # Safety
  ///
  /// `base` and `size` must be exactly what `reserve` handed out, and no byte
  /// of the range may be accessed afterwards.
  unsafe fn release(&self, base: NonNull<u8>, size: usize) -> SysResult<()> {
    _ = (base, size);
    Err(SysError::Unsupported)
  }
}

/// Validates a sub-range request against the page size.
#[cfg_attr(
  not(any(target_os = "linux", target_os = "macos", target_os = "windows")),
  allow(dead_code)
)]
pub(crate) fn check_range(offset: usize, size: usize) -> SysResult<()> {
  let aligned = |value| is_page_aligned(value) == Ok(true);
  if size == 0 || !aligned(offset) || !aligned(size) {
    return Err(SysError::InvalidArgument);
  }
  offset.checked_add(size).ok_or(SysError::InvalidArgument)?;
  Ok(())
}

pub struct UnsupportedSystem {}
unsafe impl System for UnsupportedSystem {}

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub static GLOBAL_SYSTEM: &dyn System = &UNIX_SYSTEM;

#[cfg(target_os = "windows")]
pub static GLOBAL_SYSTEM: &dyn System = &WINDOWS_SYSTEM;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub static GLOBAL_SYSTEM: &dyn System = &UnsupportedSystem {};
