//! Display aggregate: the floating canvases, their registry and the shared marker set.

pub mod entities;
pub mod markers;
pub mod persistence;
pub mod registry;
pub mod value_objects;

pub use entities::*;
pub use markers::*;
pub use persistence::*;
pub use registry::DisplayRegistry;
pub use value_objects::*;
