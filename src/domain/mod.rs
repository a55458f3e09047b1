//! Pure core: no DOM, no timers, no JS calls. Everything here runs natively.

pub mod display;
pub mod errors;
pub mod geometry;
pub mod interaction;
pub mod logging;
pub mod market;
