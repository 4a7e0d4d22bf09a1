//! Reservation sizing.

use getset::CopyGetters;

use stablevec_sys::prim::{
  is_page_aligned,
  page_align,
  page_size,
};

/// Size of the address range a [`StableVec`](crate::StableVec) reserves.
///
/// Always a non-zero multiple of the page size. The reservation is fixed for
/// the lifetime of the sequence, so size it for the largest length the
/// workload will ever reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
pub struct Reservation {
  #[getset(get_copy = "pub")]
  bytes: usize,
}

impl Reservation {
  /// Reservation used by `Default`, in MiB.
  pub const DEFAULT_MIB: usize = 64;

  /// Panics unless `bytes` is a non-zero multiple of the page size.
  pub fn from_bytes(bytes: usize) -> Self {
    assert!(
      bytes > 0 && is_page_aligned(bytes) == Ok(true),
      "reservation of {bytes} bytes is not a non-zero multiple of the page size"
    );
    Self { bytes }
  }

  pub fn from_pages(pages: usize) -> Self {
    let bytes = pages
      .checked_mul(page_size())
      .unwrap_or_else(|| panic!("reservation of {pages} pages overflows"));
    Self::from_bytes(bytes)
  }

  pub fn from_mib(mib: usize) -> Self {
    let bytes = mib
      .checked_mul(1024 * 1024)
      .unwrap_or_else(|| panic!("reservation of {mib} MiB overflows"));
    Self::round_up(bytes)
  }

  /// Smallest valid reservation holding at least `bytes`.
  pub fn round_up(bytes: usize) -> Self {
    let bytes = page_align(bytes.max(1))
      .unwrap_or_else(|_| panic!("reservation of {bytes} bytes overflows"));
    Self { bytes }
  }

  pub fn pages(&self) -> usize {
    self.bytes / page_size()
  }
}

impl Default for Reservation {
  fn default() -> Self {
    Self::from_mib(Self::DEFAULT_MIB)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_pages() {
    let reservation = Reservation::from_pages(3);
    assert_eq!(reservation.bytes(), page_size() * 3);
    assert_eq!(reservation.pages(), 3);
  }

  #[test]
  fn test_from_mib() {
    assert_eq!(Reservation::from_mib(2).bytes(), 2 * 1024 * 1024);
  }

  #[test]
  fn test_round_up() {
    let ps = page_size();
    assert_eq!(Reservation::round_up(0).bytes(), ps);
    assert_eq!(Reservation::round_up(1).bytes(), ps);
    assert_eq!(Reservation::round_up(ps + 1).bytes(), ps * 2);
  }

  #[test]
  fn test_default() {
    assert_eq!(
      Reservation::default().bytes(),
      Reservation::DEFAULT_MIB * 1024 * 1024
    );
  }

  #[test]
  #[should_panic(expected = "multiple of the page size")]
  fn test_from_bytes_misaligned() {
    let _ = Reservation::from_bytes(page_size() + 1);
  }
}
