//! Element operations. Every capacity-changing entry point comes in two
//! flavours: a checked one that grows through the engine, and an
//! `_assume_capacity` one that panics if the room was not reserved first.

use core::ptr;

use crate::{
  StableResult,
  StableVec,
};

impl<T, const ALIGN: usize> StableVec<T, ALIGN> {
  #[inline]
  fn assert_spare(&self, additional: usize) {
    assert!(
      additional <= self.capacity - self.len,
      "{additional} more elements do not fit in capacity {} (length {})",
      self.capacity,
      self.len
    );
  }

  pub fn append(&mut self, value: T) -> StableResult<()> {
    self.ensure_unused_capacity(1)?;
    self.append_assume_capacity(value);
    Ok(())
  }

  #[inline]
  pub fn append_assume_capacity(&mut self, value: T) {
    self.assert_spare(1);
    unsafe { self.as_mut_ptr().add(self.len).write(value) };
    self.len += 1;
  }

  /// Appends `value` and returns a reference to its slot.
  pub fn add_one(&mut self, value: T) -> StableResult<&mut T> {
    self.ensure_unused_capacity(1)?;
    Ok(self.add_one_assume_capacity(value))
  }

  pub fn add_one_assume_capacity(&mut self, value: T) -> &mut T {
    self.append_assume_capacity(value);
    let index = self.len - 1;
    &mut self.as_mut_slice()[index]
  }

  pub fn append_slice(&mut self, items: &[T]) -> StableResult<()>
  where
    T: Clone,
  {
    self.ensure_unused_capacity(items.len())?;
    self.append_slice_assume_capacity(items);
    Ok(())
  }

  pub fn append_slice_assume_capacity(&mut self, items: &[T])
  where
    T: Clone,
  {
    self.assert_spare(items.len());
    for item in items {
      unsafe { self.as_mut_ptr().add(self.len).write(item.clone()) };
      self.len += 1;
    }
  }

  pub fn append_n_times(&mut self, value: T, n: usize) -> StableResult<()>
  where
    T: Clone,
  {
    self.ensure_unused_capacity(n)?;
    self.append_n_times_assume_capacity(value, n);
    Ok(())
  }

  pub fn append_n_times_assume_capacity(&mut self, value: T, n: usize)
  where
    T: Clone,
  {
    self.assert_spare(n);
    if n == 0 {
      return;
    }

    for _ in 1..n {
      unsafe { self.as_mut_ptr().add(self.len).write(value.clone()) };
      self.len += 1;
    }
    unsafe { self.as_mut_ptr().add(self.len).write(value) };
    self.len += 1;
  }

  /// Inserts `value` at `index`, shifting the tail up by one.
  ///
  /// # Panics
  ///
  /// If `index` is greater than the length.
  pub fn insert(&mut self, index: usize, value: T) -> StableResult<()> {
    self.assert_index(index);
    self.ensure_unused_capacity(1)?;
    self.insert_assume_capacity(index, value);
    Ok(())
  }

  pub fn insert_assume_capacity(&mut self, index: usize, value: T) {
    self.assert_index(index);
    self.assert_spare(1);

    unsafe {
      let slot = self.as_mut_ptr().add(index);
      ptr::copy(slot, slot.add(1), self.len - index);
      slot.write(value);
    }
    self.len += 1;
  }

  pub fn insert_slice(&mut self, index: usize, items: &[T]) -> StableResult<()>
  where
    T: Clone,
  {
    self.assert_index(index);
    self.ensure_unused_capacity(items.len())?;
    self.insert_slice_assume_capacity(index, items);
    Ok(())
  }

  pub fn insert_slice_assume_capacity(&mut self, index: usize, items: &[T])
  where
    T: Clone,
  {
    self.assert_index(index);
    self.assert_spare(items.len());

    let count = items.len();
    let old_len = self.len;
    unsafe {
      let base = self.as_mut_ptr();
      ptr::copy(base.add(index), base.add(index + count), old_len - index);

      // Until the gap is filled the shifted tail is outside `len`; a panicking
      // clone leaks it rather than dropping anything twice.
      self.len = index;
      for (offset, item) in items.iter().enumerate() {
        base.add(index + offset).write(item.clone());
        self.len += 1;
      }
    }
    self.len = old_len + count;
  }

  /// Replaces `len` elements starting at `start` with `items`.
  ///
  /// Capacity is secured before anything is written, so a failed call leaves
  /// the sequence as it was.
  ///
  /// # Panics
  ///
  /// If `start + len` is past the end.
  pub fn replace_range(&mut self, start: usize, len: usize, items: &[T]) -> StableResult<()>
  where
    T: Clone,
  {
    self.assert_range(start, len);
    if items.len() > len {
      self.ensure_unused_capacity(items.len() - len)?;
    }
    self.replace_range_assume_capacity(start, len, items);
    Ok(())
  }

  pub fn replace_range_assume_capacity(&mut self, start: usize, len: usize, items: &[T])
  where
    T: Clone,
  {
    self.assert_range(start, len);
    let end = start + len;

    if items.len() <= len {
      let fill = start + items.len();
      self.as_mut_slice()[start..fill].clone_from_slice(items);
      self.remove_range(fill, end);
    } else {
      let (head, rest) = items.split_at(len);
      self.as_mut_slice()[start..end].clone_from_slice(head);
      self.insert_slice_assume_capacity(end, rest);
    }
  }

  /// Removes and returns the element at `index`, keeping the order of the rest.
  pub fn ordered_remove(&mut self, index: usize) -> T {
    self.assert_element(index);

    unsafe {
      let slot = self.as_mut_ptr().add(index);
      let value = slot.read();
      ptr::copy(slot.add(1), slot, self.len - index - 1);
      self.len -= 1;
      value
    }
  }

  /// Removes and returns the element at `index`, moving the last element
  /// into its place.
  pub fn swap_remove(&mut self, index: usize) -> T {
    self.assert_element(index);

    let last = self.len - 1;
    unsafe {
      let base = self.as_mut_ptr();
      let value = base.add(index).read();
      if index != last {
        ptr::copy_nonoverlapping(base.add(last), base.add(index), 1);
      }
      self.len = last;
      value
    }
  }

  /// Removes the last element.
  ///
  /// # Panics
  ///
  /// If the sequence is empty.
  pub fn pop(&mut self) -> T {
    assert!(!self.is_empty(), "pop from an empty sequence");
    self.len -= 1;
    unsafe { self.as_mut_ptr().add(self.len).read() }
  }

  pub fn pop_or_none(&mut self) -> Option<T> {
    if self.is_empty() {
      return None;
    }
    Some(self.pop())
  }

  fn remove_range(&mut self, from: usize, to: usize) {
    let old_len = self.len;
    let count = to - from;
    if count == 0 {
      return;
    }

    unsafe {
      let base = self.as_mut_ptr();
      self.len = from;
      ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(from), count));
      ptr::copy(base.add(to), base.add(from), old_len - to);
    }
    self.len = old_len - count;
  }

  #[inline]
  fn assert_index(&self, index: usize) {
    assert!(
      index <= self.len,
      "insertion index {index} is past the end (length {})",
      self.len
    );
  }

  #[inline]
  fn assert_element(&self, index: usize) {
    assert!(
      index < self.len,
      "index {index} out of bounds (length {})",
      self.len
    );
  }

  #[inline]
  fn assert_range(&self, start: usize, len: usize) {
    let in_bounds = start.checked_add(len).is_some_and(|end| end <= self.len);
    assert!(
      in_bounds,
      "range {start}+{len} out of bounds (length {})",
      self.len
    );
  }
}
