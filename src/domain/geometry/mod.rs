//! Coordinate transform: percentage config → pixel geometry, plus the DPR-aware
//! backing store and the resize debounce that feeds it.

pub mod backing_store;
pub mod debounce;
pub mod transform;

pub use backing_store::*;
pub use debounce::*;
pub use transform::*;
