use core::ptr;

use stablevec_region::Region;
use stablevec_sys::prim::page_align;

use crate::{
  StableError,
  StableResult,
  StableVec,
};

impl<T, const ALIGN: usize> StableVec<T, ALIGN> {
  /// Committed bytes needed to back `capacity` elements.
  pub fn bytes_for_capacity(capacity: usize) -> Option<usize> {
    let raw = Self::STRIDE.checked_mul(capacity)?;
    page_align(raw).ok()
  }

  fn exhausted(&self, requested: usize) -> StableError {
    StableError::LimitExceeded {
      requested,
      limit: self.limit,
    }
  }

  /// Commits enough pages for `new_capacity` elements.
  ///
  /// Never over-allocates: only the pages covering `new_capacity` are
  /// committed. Fails without side effects when the reservation is too small
  /// or the system refuses the pages.
  pub fn ensure_total_capacity(&mut self, new_capacity: usize) -> StableResult<()> {
    if new_capacity <= self.capacity {
      return Ok(());
    }

    let wanted =
      Self::bytes_for_capacity(new_capacity).ok_or_else(|| self.exhausted(usize::MAX))?;
    if wanted > self.limit {
      return Err(self.exhausted(wanted));
    }

    let region = match self.region.take() {
      Some(region) => region,
      None => {
        tracing::debug!(limit = self.limit, "reserving address range");
        Region::reserve(self.limit)?
      }
    };
    let region = self.region.insert(region);

    region.commit_to(wanted)?;
    self.capacity = new_capacity;
    Ok(())
  }

  pub fn ensure_unused_capacity(&mut self, additional: usize) -> StableResult<()> {
    let total = self
      .len
      .checked_add(additional)
      .ok_or_else(|| self.exhausted(usize::MAX))?;
    self.ensure_total_capacity(total)
  }

  /// Drops every element from `new_len` on. Capacity and pages are untouched.
  ///
  /// # Panics
  ///
  /// If `new_len` is greater than the length.
  pub fn shrink_retaining_capacity(&mut self, new_len: usize) {
    assert!(
      new_len <= self.len,
      "cannot shrink {} elements to {new_len}",
      self.len
    );

    let tail = self.len - new_len;
    unsafe {
      let tail = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(new_len), tail);
      self.len = new_len;
      ptr::drop_in_place(tail);
    }
  }

  pub fn clear_retaining_capacity(&mut self) {
    self.shrink_retaining_capacity(0);
  }

  /// Shrinks to `new_len` and decommits the pages no longer needed.
  ///
  /// The reservation and base address are kept, so growing again reuses the
  /// same addresses.
  pub fn shrink_and_free(&mut self, new_len: usize) {
    self.shrink_retaining_capacity(new_len);

    if let (Some(region), Some(keep)) = (self.region.as_mut(), Self::bytes_for_capacity(new_len)) {
      tracing::debug!(
        len = new_len,
        committed = region.committed(),
        keep,
        "shrinking committed pages"
      );
      region.decommit_to(keep);
    }
    self.capacity = new_len;
  }

  pub fn clear_and_free(&mut self) {
    self.shrink_and_free(0);
  }

  /// Makes every committed slot live.
  ///
  /// # Safety
  ///
  /// Slots past the current length must hold initialized values of `T`. Fresh
  /// pages are zeroed, so this holds for types where all-zero is valid and the
  /// slots were never written since being committed.
  pub unsafe fn expand_to_capacity(&mut self) {
    self.len = self.capacity;
  }

  /// Grows with clones of `value` or shrinks, keeping capacity on shrink.
  pub fn resize(&mut self, new_len: usize, value: T) -> StableResult<()>
  where
    T: Clone,
  {
    if new_len > self.len {
      return self.append_n_times(value, new_len - self.len);
    }

    self.shrink_retaining_capacity(new_len);
    Ok(())
  }

  pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> StableResult<()>
  where
    F: FnMut() -> T,
  {
    if new_len <= self.len {
      self.shrink_retaining_capacity(new_len);
      return Ok(());
    }

    self.ensure_total_capacity(new_len)?;
    while self.len < new_len {
      self.append_assume_capacity(f());
    }
    Ok(())
  }
}
