/// Returns `None` when `align` is not a power of two.
pub const fn is_aligned(value: usize, align: usize) -> Option<bool> {
  if !align.is_power_of_two() {
    return None;
  }
  Some(value & (align - 1) == 0)
}

/// Rounds `value` up to the next multiple of `align`.
///
/// Fails on a non power-of-two `align` or when the result does not fit in a
/// `usize`.
pub const fn align_up(value: usize, align: usize) -> Option<usize> {
  if !align.is_power_of_two() {
    return None;
  }

  let mask = align - 1;
  match value.checked_add(mask) {
    Some(sum) => Some(sum & !mask),
    None => None,
  }
}

pub const fn align_down(value: usize, align: usize) -> Option<usize> {
  if !align.is_power_of_two() {
    return None;
  }

  Some(value & !(align - 1))
}

/// Larger of two sizes, usable in const context.
pub const fn max(a: usize, b: usize) -> usize {
  if a > b { a } else { b }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_aligned() {
    assert_eq!(is_aligned(0, 1), Some(true));
    assert_eq!(is_aligned(0, 4096), Some(true));
    assert_eq!(is_aligned(4096, 4096), Some(true));
    assert_eq!(is_aligned(8192, 4096), Some(true));
    assert_eq!(is_aligned(4095, 4096), Some(false));
    assert_eq!(is_aligned(4097, 4096), Some(false));
    assert_eq!(is_aligned(24, 8), Some(true));
    assert_eq!(is_aligned(24, 16), Some(false));

    assert_eq!(is_aligned(12, 0), None);
    assert_eq!(is_aligned(12, 12), None);
  }

  #[test]
  fn test_align_up() {
    assert_eq!(align_up(0, 4096), Some(0));
    assert_eq!(align_up(1, 4096), Some(4096));
    assert_eq!(align_up(10, 4096), Some(4096));
    assert_eq!(align_up(4096, 4096), Some(4096));
    assert_eq!(align_up(4097, 4096), Some(8192));
    assert_eq!(align_up(5 * 4096, 4096), Some(5 * 4096));
    assert_eq!(align_up(24, 16), Some(32));

    assert_eq!(align_up(100, 0), None);
    assert_eq!(align_up(100, 48), None);
  }

  #[test]
  fn test_align_up_overflow() {
    assert_eq!(align_up(usize::MAX, 2), None);
    assert_eq!(align_up(usize::MAX - 4094, 4096), None);
    assert_eq!(align_up(usize::MAX, 1), Some(usize::MAX));
  }

  #[test]
  fn test_align_down() {
    assert_eq!(align_down(0, 4096), Some(0));
    assert_eq!(align_down(4095, 4096), Some(0));
    assert_eq!(align_down(4096, 4096), Some(4096));
    assert_eq!(align_down(12_345, 4096), Some(12_288));

    assert_eq!(align_down(100, 3), None);
  }

  #[test]
  fn test_max() {
    assert_eq!(max(1, 4096), 4096);
    assert_eq!(max(24, 8), 24);
    assert_eq!(max(7, 7), 7);
  }
}
