//! Market data consumed by the displays: snapshots, ticks and the price window derived from them.

pub mod price_scale;
pub mod statistics;
pub mod value_objects;
pub mod visual_range;

pub use price_scale::PriceScale;
pub use statistics::*;
pub use value_objects::*;
pub use visual_range::*;
