#[cfg(target_os = "windows")]
use core::{
  ffi::c_void,
  ptr::NonNull,
};

#[cfg(target_os = "windows")]
use windows_sys::Win32::System::Memory::{
  MEM_COMMIT,
  MEM_DECOMMIT,
  MEM_RELEASE,
  MEM_RESERVE,
  PAGE_NOACCESS,
  PAGE_PROTECTION_FLAGS,
  PAGE_READWRITE,
  VIRTUAL_ALLOCATION_TYPE,
  VIRTUAL_FREE_TYPE,
  VirtualAlloc,
  VirtualFree,
};

#[cfg(target_os = "windows")]
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

pub struct WindowsSystem {}

#[cfg(target_os = "windows")]
pub static WINDOWS_SYSTEM: WindowsSystem = WindowsSystem {};

#[cfg(target_os = "windows")]
impl WindowsSystem {
  const fn prot_as(options: SysOption) -> PAGE_PROTECTION_FLAGS {
    match options {
      SysOption::Commit => PAGE_READWRITE,
      _ => PAGE_NOACCESS,
    }
  }

  const fn alloc_type(options: SysOption) -> VIRTUAL_ALLOCATION_TYPE {
    match options {
      SysOption::Commit => MEM_COMMIT,
      _ => MEM_RESERVE,
    }
  }

  const fn free_type(options: SysOption) -> VIRTUAL_FREE_TYPE {
    match options {
      SysOption::Reclaim => MEM_DECOMMIT,
      _ => MEM_RELEASE,
    }
  }

  fn at(base: NonNull<u8>, offset: usize) -> *mut c_void {
    base.as_ptr().wrapping_add(offset) as *mut c_void
  }

  fn alloc(addr: *const c_void, size: usize, options: SysOption) -> SysResult<NonNull<u8>> {
    let (kind, prot) = (Self::alloc_type(options), Self::prot_as(options));
    let ptr = unsafe { VirtualAlloc(addr, size, kind, prot) };
    NonNull::new(ptr as *mut u8).ok_or(SysError::OutOfMemory)
  }

  fn free(addr: *mut c_void, size: usize, options: SysOption) -> SysResult<()> {
    let result = unsafe { VirtualFree(addr, size, Self::free_type(options)) };
    if result == 0 {
      return Err(SysError::InvalidArgument);
    }
    Ok(())
  }
}

#[cfg(target_os = "windows")]
unsafe impl System for WindowsSystem {
  unsafe fn reserve(&self, size: usize) -> SysResult<NonNull<u8>> {
    if size == 0 || is_page_aligned(size) != Ok(true) {
      return Err(SysError::InvalidArgument);
    }

    let base = Self::alloc(core::ptr::null(), size, SysOption::Reserve)?;
    tracing::trace!(?base, size, "reserved address range");
    Ok(base)
  }

  unsafe fn commit(&self, base: NonNull<u8>, offset: usize, size: usize) -> SysResult<()> {
    check_range(offset, size)?;

    let addr = Self::at(base, offset);
    let committed = Self::alloc(addr, size, SysOption::Commit)?;
    if committed.as_ptr() as *mut c_void != addr {
      return Err(SysError::OutOfMemory);
    }

    tracing::trace!(?base, offset, size, "committed pages");
    Ok(())
  }

  unsafe fn decommit(&self, base: NonNull<u8>, offset: usize, size: usize) -> SysResult<()> {
    check_range(offset, size)?;

    Self::free(Self::at(base, offset), size, SysOption::Reclaim)?;
    tracing::trace!(?base, offset, size, "decommitted pages");
    Ok(())
  }

  unsafe fn release(&self, base: NonNull<u8>, size: usize) -> SysResult<()> {
    // MEM_RELEASE requires a zero size and frees the whole reservation.
    Self::free(Self::at(base, 0), 0, SysOption::Reserve)?;
    tracing::trace!(?base, size, "released address range");
    Ok(())
  }
}
