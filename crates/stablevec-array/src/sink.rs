use core::fmt;

use crate::{
  StableResult,
  StableVec,
};

impl<const ALIGN: usize> StableVec<u8, ALIGN> {
  /// Appends `bytes` whole or not at all, returning how many were written.
  pub fn write_bytes(&mut self, bytes: &[u8]) -> StableResult<usize> {
    self.ensure_unused_capacity(bytes.len())?;

    let start = self.len;
    unsafe {
      core::ptr::copy_nonoverlapping(bytes.as_ptr(), self.as_mut_ptr().add(start), bytes.len());
    }
    self.len += bytes.len();
    Ok(bytes.len())
  }
}

impl<const ALIGN: usize> fmt::Write for StableVec<u8, ALIGN> {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    self.write_bytes(s.as_bytes()).map(drop).map_err(|_| fmt::Error)
  }
}

#[cfg(feature = "std")]
impl<const ALIGN: usize> std::io::Write for StableVec<u8, ALIGN> {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self
      .write_bytes(buf)
      .map_err(|error| std::io::Error::new(std::io::ErrorKind::OutOfMemory, error))
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}
