//! Browser-facing adapters: canvas drawing, DOM listeners, timers and the
//! console logging sink.

pub mod events;
pub mod rendering;
pub mod services;
pub mod timers;
