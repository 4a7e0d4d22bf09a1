#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! A growable sequence whose elements never move.
//!
//! [`StableVec`] reserves its whole address range up front and commits pages
//! as it grows, so a reference or pointer to an element stays valid for as
//! long as the element is live. Growing past the reservation fails with
//! [`StableError`] instead of relocating.
//!
//! ```
//! use stablevec_array::StableVec;
//!
//! let mut bytes = StableVec::<u8>::new(2 * 1024 * 1024);
//! bytes.append_slice(&[1, 2, 3]).unwrap();
//! let first = bytes.as_ptr();
//!
//! bytes.append_n_times(0, 100_000).unwrap();
//! assert_eq!(bytes.as_ptr(), first);
//! assert_eq!(&bytes[..3], &[1, 2, 3]);
//! ```

pub mod config;
pub mod error;
mod growth;
mod ops;
mod sink;

use core::{
  fmt,
  marker::PhantomData,
  mem::{
    self,
    MaybeUninit,
  },
  ops::{
    Deref,
    DerefMut,
  },
  ptr::{
    self,
    NonNull,
  },
  slice,
};

use stablevec_region::Region;
use stablevec_sys::{
  math::max,
  prim::{
    is_page_aligned,
    page_size,
  },
};

pub use config::Reservation;
pub use error::{
  StableError,
  StableResult,
};

/// Contiguous sequence of `T` backed by a fixed virtual reservation.
///
/// Elements are laid out `size_of::<T>()` apart from a base aligned to
/// [`alignment`](Self::alignment). Commit accounting charges
/// [`stride`](Self::stride) bytes per element of capacity, so raising `ALIGN`
/// above the element size reserves that much room per element.
pub struct StableVec<T, const ALIGN: usize = 1> {
  region: Option<Region>,
  limit: usize,
  len: usize,
  capacity: usize,
  _marker: PhantomData<T>,
}

impl<T, const ALIGN: usize> StableVec<T, ALIGN> {
  const ALIGNMENT: usize = {
    assert!(
      mem::size_of::<T>() != 0,
      "zero-sized element types are not supported"
    );
    assert!(ALIGN.is_power_of_two(), "ALIGN must be a power of two");
    max(ALIGN, mem::align_of::<T>())
  };

  const STRIDE: usize = max(Self::ALIGNMENT, mem::size_of::<T>());

  /// Creates an empty sequence that may grow to `reservation_limit` bytes.
  ///
  /// Nothing is reserved until the first capacity request.
  ///
  /// # Panics
  ///
  /// If `reservation_limit` is zero or not a multiple of the page size, or the
  /// alignment exceeds the page size.
  pub fn new(reservation_limit: usize) -> Self {
    assert!(
      reservation_limit > 0 && is_page_aligned(reservation_limit) == Ok(true),
      "reservation limit of {reservation_limit} bytes is not a non-zero multiple of the page size"
    );
    assert!(
      Self::ALIGNMENT <= page_size(),
      "alignment of {} bytes exceeds the page size",
      Self::ALIGNMENT
    );

    Self {
      region: None,
      limit: reservation_limit,
      len: 0,
      capacity: 0,
      _marker: PhantomData,
    }
  }

  pub fn with_reservation(reservation: Reservation) -> Self {
    Self::new(reservation.bytes())
  }

  /// Creates a sequence with room for `capacity` elements already committed.
  pub fn with_capacity(reservation_limit: usize, capacity: usize) -> StableResult<Self> {
    let mut vec = Self::new(reservation_limit);
    vec.ensure_total_capacity(capacity)?;
    Ok(vec)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn reservation_limit(&self) -> usize {
    self.limit
  }

  /// Largest capacity the reservation can ever back.
  pub fn max_capacity(&self) -> usize {
    self.limit / Self::STRIDE
  }

  /// Bytes currently committed, always a whole number of pages.
  pub fn committed_bytes(&self) -> usize {
    self.region.as_ref().map_or(0, Region::committed)
  }

  pub fn page_size(&self) -> usize {
    page_size()
  }

  pub const fn alignment() -> usize {
    Self::ALIGNMENT
  }

  pub const fn stride() -> usize {
    Self::STRIDE
  }

  /// Base of the sequence. Dangling until the first commit, fixed afterwards.
  #[inline]
  pub fn as_ptr(&self) -> *const T {
    self.base().as_ptr()
  }

  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut T {
    self.base().as_ptr()
  }

  #[inline]
  fn base(&self) -> NonNull<T> {
    self
      .region
      .as_ref()
      .map_or(NonNull::dangling(), |region| region.as_ptr())
  }

  /// The live elements.
  #[inline]
  pub fn as_slice(&self) -> &[T] {
    unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
  }

  #[inline]
  pub fn as_mut_slice(&mut self) -> &mut [T] {
    unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
  }

  /// Committed slots past the live elements.
  pub fn unused_capacity_slice(&mut self) -> &mut [MaybeUninit<T>] {
    let spare = self.capacity - self.len;
    unsafe {
      let start = self.as_mut_ptr().add(self.len) as *mut MaybeUninit<T>;
      slice::from_raw_parts_mut(start, spare)
    }
  }

  /// Every committed slot, live or not.
  pub fn allocated_slice(&self) -> &[MaybeUninit<T>] {
    unsafe { slice::from_raw_parts(self.as_ptr() as *const MaybeUninit<T>, self.capacity) }
  }

  /// Sets the length without dropping or initializing anything.
  ///
  /// # Safety
  ///
  /// `new_len` must not exceed the capacity and the first `new_len` elements
  /// must be initialized.
  pub unsafe fn set_len(&mut self, new_len: usize) {
    debug_assert!(new_len <= self.capacity);
    self.len = new_len;
  }
}

impl<T, const ALIGN: usize> Default for StableVec<T, ALIGN> {
  fn default() -> Self {
    Self::with_reservation(Reservation::default())
  }
}

impl<T, const ALIGN: usize> Drop for StableVec<T, ALIGN> {
  fn drop(&mut self) {
    let live = ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len);
    self.len = 0;
    unsafe { ptr::drop_in_place(live) };
  }
}

impl<T, const ALIGN: usize> Deref for StableVec<T, ALIGN> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T, const ALIGN: usize> DerefMut for StableVec<T, ALIGN> {
  fn deref_mut(&mut self) -> &mut [T] {
    self.as_mut_slice()
  }
}

impl<T, const ALIGN: usize> AsRef<[T]> for StableVec<T, ALIGN> {
  fn as_ref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T, const ALIGN: usize> AsMut<[T]> for StableVec<T, ALIGN> {
  fn as_mut(&mut self) -> &mut [T] {
    self.as_mut_slice()
  }
}

impl<'a, T, const ALIGN: usize> IntoIterator for &'a StableVec<T, ALIGN> {
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.as_slice().iter()
  }
}

impl<'a, T, const ALIGN: usize> IntoIterator for &'a mut StableVec<T, ALIGN> {
  type Item = &'a mut T;
  type IntoIter = slice::IterMut<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.as_mut_slice().iter_mut()
  }
}

impl<T: fmt::Debug, const ALIGN: usize> fmt::Debug for StableVec<T, ALIGN> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self.as_slice(), f)
  }
}

pub mod prelude {
  pub use super::{
    Reservation,
    StableError,
    StableResult,
    StableVec,
  };
}
