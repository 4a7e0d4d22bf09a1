#[cfg(any(target_os = "linux", target_os = "macos"))]
use core::ptr::NonNull;

#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::{
  prim::is_page_aligned,
  system::{
    SysError,
    SysOption,
    SysResult,
    System,
    check_range,
  },
};

pub struct UnixSystem {}

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub static UNIX_SYSTEM: UnixSystem = UnixSystem {};

#[cfg(any(target_os = "linux", target_os = "macos"))]
impl UnixSystem {
  const fn prot_as(options: SysOption) -> i32 {
    match options {
      SysOption::Commit => libc::PROT_READ | libc::PROT_WRITE,
      _ => libc::PROT_NONE,
    }
  }

  const fn flags(options: SysOption) -> i32 {
    match options {
      SysOption::Commit => libc::MAP_PRIVATE | libc::MAP_ANONYMOUS | libc::MAP_FIXED,
      _ => libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
    }
  }

  const fn reclaim_flags() -> i32 {
    libc::MADV_DONTNEED
  }

  fn at(base: NonNull<u8>, offset: usize) -> *mut libc::c_void {
    base.as_ptr().wrapping_add(offset) as *mut libc::c_void
  }

  #[cfg(target_os = "linux")]
  fn errno() -> i32 {
    unsafe { *libc::__errno_location() }
  }

  #[cfg(target_os = "macos")]
  fn errno() -> i32 {
    unsafe { *libc::__error() }
  }

  fn map(addr: *mut libc::c_void, size: usize, options: SysOption) -> SysResult<NonNull<u8>> {
    let prot = Self::prot_as(options);
    let ptr = unsafe { libc::mmap(addr, size, prot, Self::flags(options), -1, 0) };
    if ptr == libc::MAP_FAILED {
      return Err(SysError::OutOfMemory);
    }

    NonNull::new(ptr as *mut u8).ok_or(SysError::OutOfMemory)
  }

  fn advise(addr: *mut libc::c_void, size: usize, options: SysOption) -> SysResult<()> {
    let flags = match options {
      SysOption::Reclaim => Self::reclaim_flags(),
      _ => return Err(SysError::InvalidArgument), // only reclaim uses madvise
    };

    let result = unsafe { libc::madvise(addr, size, flags) };
    if result == 0 {
      return Ok(());
    }

    // Both codes mean the pages already have no backing.
    match Self::errno() {
      libc::EINVAL | libc::ENOMEM => {
        tracing::trace!(?addr, size, "madvise reported unbacked pages");
        Ok(())
      }
      _ => Err(SysError::InvalidArgument),
    }
  }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
unsafe impl System for UnixSystem {
  unsafe fn reserve(&self, size: usize) -> SysResult<NonNull<u8>> {
    if size == 0 || is_page_aligned(size) != Ok(true) {
      return Err(SysError::InvalidArgument);
    }

    let base = Self::map(core::ptr::null_mut(), size, SysOption::Reserve)?;
    tracing::trace!(?base, size, "reserved address range");
    Ok(base)
  }

  unsafe fn commit(&self, base: NonNull<u8>, offset: usize, size: usize) -> SysResult<()> {
    check_range(offset, size)?;

    let addr = Self::at(base, offset);
    let mapped = Self::map(addr, size, SysOption::Commit)?;
    if mapped.as_ptr() as *mut libc::c_void != addr {
      return Err(SysError::OutOfMemory);
    }

    tracing::trace!(?base, offset, size, "committed pages");
    Ok(())
  }

  unsafe fn decommit(&self, base: NonNull<u8>, offset: usize, size: usize) -> SysResult<()> {
    check_range(offset, size)?;

    Self::advise(Self::at(base, offset), size, SysOption::Reclaim)?;
    tracing::trace!(?base, offset, size, "decommitted pages");
    Ok(())
  }

  unsafe fn release(&self, base: NonNull<u8>, size: usize) -> SysResult<()> {
    let result = unsafe { libc::munmap(Self::at(base, 0), size) };
    if result == 0 {
      tracing::trace!(?base, size, "released address range");
      return Ok(());
    }

    Err(SysError::InvalidArgument)
  }
}
