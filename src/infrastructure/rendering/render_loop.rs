//! Per-display frame scheduler.
//!
//! Each rendered frame starts from a known context state: identity transform,
//! a cleared backing store, then a single DPR scale. Geometry and the price
//! scale are re-derived every frame from the debounce-settled size.

use std::collections::VecDeque;

use derive_more::Display as DeriveDisplay;

use super::context::DrawingContext;
use super::indicators::{LAYERS, LayerInput, Palette};
use crate::domain::display::Display;
use crate::domain::errors::RenderingError;
use crate::domain::geometry::{BackingStore, CoordinateTransform, ResizeDebounce};
use crate::domain::logging::LogComponent;
use crate::domain::market::{DistributionProfile, PROFILE_BUCKETS, PriceScale, VOLATILITY_WINDOW, VolatilityReading};
use crate::{log_error, log_trace, log_warn};

/// Minimum spacing between rendered frames.
pub const MIN_FRAME_INTERVAL_MS: f64 = 16.0;
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone, PartialEq, DeriveDisplay)]
pub enum SkipReason {
    #[display(fmt = "frame gate")]
    Throttled,
    #[display(fmt = "no visual range")]
    NoVisualRange,
    #[display(fmt = "degenerate price scale")]
    InvalidScale,
    #[display(fmt = "context error: {}", _0)]
    Context(RenderingError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Rendered { failed_layers: Vec<&'static str> },
    Skipped(SkipReason),
}

impl FrameOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, FrameOutcome::Rendered { .. })
    }
}

/// Inputs for one frame of one display
pub struct FrameRequest<'a> {
    pub display: &'a Display,
    pub markers: &'a [f64],
    pub hover_y: Option<f64>,
    pub device_pixel_ratio: f64,
    /// True while this display is the target of an active resize session.
    pub resizing: bool,
}

#[derive(Debug, Default)]
pub struct RenderLoop {
    last_frame_ms: Option<f64>,
    fps_log: VecDeque<f64>,
    debounce: ResizeDebounce,
    palette: Palette,
    frames_rendered: u64,
    frames_skipped: u64,
    layer_failures: u64,
}

impl RenderLoop {
    pub fn new(palette: Palette) -> Self {
        Self { palette, ..Self::default() }
    }

    pub fn frame(
        &mut self,
        ctx: &mut dyn DrawingContext,
        request: FrameRequest<'_>,
        now_ms: f64,
    ) -> FrameOutcome {
        if let Some(last) = self.last_frame_ms {
            if now_ms - last < MIN_FRAME_INTERVAL_MS {
                return FrameOutcome::Skipped(SkipReason::Throttled);
            }
        }

        let display = request.display;
        let Some(range) = display.state.visual_range.filter(|_| display.ready) else {
            return self.skip(SkipReason::NoVisualRange);
        };

        let size = self.debounce.settle(display.size, now_ms, request.resizing);
        let store = BackingStore::new(size, request.device_pixel_ratio);
        if let Err(e) = self.prepare(ctx, &store) {
            log_error!(LogComponent::Infrastructure("RenderLoop"), "{}: {}", display.id, e);
            return self.skip(SkipReason::Context(e));
        }

        let geometry = CoordinateTransform::scale(&display.config, store.css_width, store.css_height);
        let Some(scale) = PriceScale::new(&range, geometry.content_height) else {
            return self.skip(SkipReason::InvalidScale);
        };

        let state = &display.state;
        let profile = DistributionProfile::build(&state.history, &range, PROFILE_BUCKETS);
        let volatility = state
            .adr_range()
            .and_then(|adr| VolatilityReading::measure(&state.history, VOLATILITY_WINDOW, adr));
        let input = LayerInput {
            geometry: &geometry,
            scale: &scale,
            config: &display.config,
            state,
            profile: &profile,
            volatility,
            markers: request.markers,
            hover_y: request.hover_y,
            palette: &self.palette,
        };

        let mut failed_layers = Vec::new();
        for layer in LAYERS.iter() {
            ctx.save();
            let result = (layer.draw)(ctx, &input);
            ctx.restore();
            if let Err(e) = result {
                log_warn!(
                    LogComponent::Infrastructure("RenderLoop"),
                    "{} layer '{}' failed: {}",
                    display.id,
                    layer.name,
                    e
                );
                failed_layers.push(layer.name);
            }
        }
        self.layer_failures += failed_layers.len() as u64;

        self.record_frame(now_ms);
        FrameOutcome::Rendered { failed_layers }
    }

    /// Identity transform, full backing-store clear, DPR scale, background.
    fn prepare(&self, ctx: &mut dyn DrawingContext, store: &BackingStore) -> Result<(), RenderingError> {
        if store.differs_from(ctx.backing_size().0, ctx.backing_size().1) {
            log_trace!(
                LogComponent::Infrastructure("RenderLoop"),
                "backing store -> {}x{}",
                store.pixel_width,
                store.pixel_height
            );
            ctx.resize_backing_store(store.pixel_width, store.pixel_height);
        }
        ctx.reset_transform()?;
        ctx.clear_rect(0.0, 0.0, f64::from(store.pixel_width), f64::from(store.pixel_height));
        ctx.scale(store.dpr, store.dpr)?;
        ctx.set_fill_style(self.palette.background);
        ctx.fill_rect(0.0, 0.0, store.css_width, store.css_height);
        Ok(())
    }

    fn skip(&mut self, reason: SkipReason) -> FrameOutcome {
        self.frames_skipped += 1;
        FrameOutcome::Skipped(reason)
    }

    fn record_frame(&mut self, now_ms: f64) {
        if let Some(last) = self.last_frame_ms {
            let delta = now_ms - last;
            if delta > 0.0 {
                self.fps_log.push_back(1000.0 / delta);
                if self.fps_log.len() > FPS_WINDOW {
                    self.fps_log.pop_front();
                }
            }
        }
        self.last_frame_ms = Some(now_ms);
        self.frames_rendered += 1;
    }

    /// Adopt the live size now; called when a resize session ends.
    pub fn flush_resize(&mut self, display: &Display) {
        self.debounce.flush(display.size);
    }

    /// Drop pending debounce state; called on display teardown.
    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }

    pub fn average_fps(&self) -> f64 {
        if self.fps_log.is_empty() {
            0.0
        } else {
            self.fps_log.iter().sum::<f64>() / self.fps_log.len() as f64
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    pub fn layer_failures(&self) -> u64 {
        self.layer_failures
    }

    /// Renderer statistics as a JSON string.
    pub fn performance_info(&self) -> String {
        serde_json::json!({
            "backend": "Canvas2D",
            "avg_fps": self.average_fps(),
            "frames_rendered": self.frames_rendered,
            "frames_skipped": self.frames_skipped,
            "layer_failures": self.layer_failures,
        })
        .to_string()
    }
}
