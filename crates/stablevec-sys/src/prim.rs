use spin::Once;
use thiserror::Error;

use crate::math::{
  align_up,
  is_aligned,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PrimError {
  #[error("page size is not a power of two")]
  InvalidAlignment,
  #[error("byte count overflows when rounded to a page")]
  Overflow,
}

pub type PrimResult<T> = Result<T, PrimError>;

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const COMMON_PAGE_SIZE: usize = 4096;

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn page_size_helper() -> usize {
  unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

#[cfg(target_os = "windows")]
fn page_size_helper() -> usize {
  use windows_sys::Win32::System::SystemInformation::{
    GetSystemInfo,
    SYSTEM_INFO,
  };

  let mut info: SYSTEM_INFO = unsafe { core::mem::zeroed() };
  unsafe { GetSystemInfo(&mut info) };
  info.dwPageSize as usize
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn page_size_helper() -> usize {
  COMMON_PAGE_SIZE
}

/// Size of a virtual memory page, queried once per process.
pub fn page_size() -> usize {
  static PAGE_SIZE: Once<usize> = Once::new();
  *PAGE_SIZE.call_once(page_size_helper)
}

pub fn page_align(value: usize) -> PrimResult<usize> {
  align_up(value, page_size()).ok_or(PrimError::Overflow)
}

pub fn is_page_aligned(value: usize) -> PrimResult<bool> {
  is_aligned(value, page_size()).ok_or(PrimError::InvalidAlignment)
}

/// Number of whole pages needed to hold `bytes`.
pub fn pages_for(bytes: usize) -> PrimResult<usize> {
  Ok(page_align(bytes)? / page_size())
}
