#![cfg_attr(not(feature = "std"), no_std)]

//! Address-stable growable sequences over reserved virtual memory.
//!
//! See [`StableVec`] for the container; [`sys`] and [`region`] expose the
//! layers it is built from.

pub use stablevec_array::{
  Reservation,
  StableError,
  StableResult,
  StableVec,
};
pub use stablevec_region as region;
pub use stablevec_sys as sys;

pub mod prelude {
  pub use stablevec_array::prelude::*;
  pub use stablevec_sys::prelude::*;
}
