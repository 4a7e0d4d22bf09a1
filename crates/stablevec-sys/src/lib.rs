#![cfg_attr(not(test), no_std)]

pub mod math;
pub mod prim;
pub mod system;
pub mod unix;
pub mod windows;

pub use system::GLOBAL_SYSTEM;

pub mod prelude {
  pub use super::{
    GLOBAL_SYSTEM,
    math::{
      align_down,
      align_up,
      is_aligned,
    },
    prim::{
      PrimError,
      PrimResult,
      is_page_aligned,
      page_align,
      page_size,
      pages_for,
    },
    system::{
      SysError,
      SysOption,
      SysResult,
      System,
    },
  };
}
