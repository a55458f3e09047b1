pub mod canvas;
pub mod context;
pub mod indicators;
pub mod render_loop;

pub use canvas::{CancelFlag, CanvasSurface, RetryExhausted, RetryPolicy};
pub use context::DrawingContext;
pub use indicators::{LAYERS, Layer, LayerInput, Palette};
pub use render_loop::{FrameOutcome, FrameRequest, RenderLoop, SkipReason};
