//! Browser canvas acquisition and the `DrawingContext` implementation over
//! `CanvasRenderingContext2d`.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::context::DrawingContext;
use crate::domain::errors::RenderingError;
use crate::domain::logging::LogComponent;
use crate::log_warn;

/// Bounded exponential backoff for canvas/context acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, base_delay_ms: 100 }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base, 2×base, 4×base...
    pub fn delay_for(&self, attempt: u32) -> u32 {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay_ms.saturating_mul(1 << exp)
    }
}

/// All attempts failed; carries the count and the last error.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryExhausted {
    pub attempts: u32,
    pub last_error: RenderingError,
}

/// Shared cancellation flag, flipped when the owning display is torn down.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Rc<Cell<bool>>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Run `attempt` until it succeeds, the policy is exhausted or `cancel` fires.
/// `sleep` receives the delay in ms; the browser passes a gloo timer future.
pub async fn retry_with_backoff<T, A, S, F>(
    policy: RetryPolicy,
    cancel: &CancelFlag,
    mut attempt: A,
    mut sleep: S,
) -> Result<T, RetryExhausted>
where
    A: FnMut() -> Result<T, RenderingError>,
    S: FnMut(u32) -> F,
    F: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut tries = 0;
    loop {
        tries += 1;
        let last_error = match attempt() {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        if tries >= max_attempts || cancel.is_cancelled() {
            return Err(RetryExhausted { attempts: tries, last_error });
        }
        log_warn!(
            LogComponent::Infrastructure("CanvasSurface"),
            "attempt {}/{} failed: {}",
            tries,
            max_attempts,
            last_error
        );
        sleep(policy.delay_for(tries)).await;
        if cancel.is_cancelled() {
            return Err(RetryExhausted { attempts: tries, last_error });
        }
    }
}

fn call_failed(err: JsValue) -> RenderingError {
    RenderingError::CallFailed(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// A canvas element together with its 2d context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn acquire(canvas_id: &str) -> Result<Self, RenderingError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| RenderingError::ContextUnavailable("document not available".into()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| RenderingError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RenderingError::CanvasNotFound(canvas_id.to_string()))?;
        Self::from_canvas(canvas)
    }

    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Self, RenderingError> {
        let context = canvas
            .get_context("2d")
            .map_err(call_failed)?
            .ok_or_else(|| RenderingError::ContextUnavailable("get_context returned null".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderingError::ContextUnavailable("not a 2d context".into()))?;
        Ok(Self { canvas, context })
    }

    /// Acquire with the policy's backoff, waiting on gloo timers between attempts.
    pub async fn acquire_with_retry(
        canvas_id: &str,
        policy: RetryPolicy,
        cancel: &CancelFlag,
    ) -> Result<Self, RetryExhausted> {
        retry_with_backoff(
            policy,
            cancel,
            || Self::acquire(canvas_id),
            |ms| gloo_timers::future::TimeoutFuture::new(ms),
        )
        .await
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawingContext for CanvasSurface {
    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize_backing_store(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn reset_transform(&mut self) -> Result<(), RenderingError> {
        self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).map_err(call_failed)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), RenderingError> {
        self.context.scale(x, y).map_err(call_failed)
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.stroke_rect(x, y, width, height);
    }

    #[allow(deprecated)]
    fn set_fill_style(&mut self, color: &str) {
        self.context.set_fill_style(&JsValue::from_str(color));
    }

    #[allow(deprecated)]
    fn set_stroke_style(&mut self, color: &str) {
        self.context.set_stroke_style(&JsValue::from_str(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), RenderingError> {
        let array = js_sys::Array::new();
        for s in segments {
            array.push(&JsValue::from_f64(*s));
        }
        self.context.set_line_dash(&array).map_err(call_failed)
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.context.set_global_alpha(alpha);
    }

    fn set_font(&mut self, font: &str) {
        self.context.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.context.set_text_align(align);
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.context.set_text_baseline(baseline);
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderingError> {
        self.context.arc(x, y, radius, start, end).map_err(call_failed)
    }

    fn fill(&mut self) {
        self.context.fill();
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderingError> {
        self.context.fill_text(text, x, y).map_err(call_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn delays_double_per_attempt() {
        let policy = RetryPolicy::default();
        let delays: Vec<u32> = (1..=4).map(|a| policy.delay_for(a)).collect();
        assert_eq!(delays, vec![100, 200, 400, 800]);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let mut slept = Vec::new();
        let result: Result<(), _> = block_on(retry_with_backoff(
            RetryPolicy::default(),
            &CancelFlag::new(),
            || {
                calls += 1;
                Err(RenderingError::CanvasNotFound("c".into()))
            },
            |ms| {
                slept.push(ms);
                futures::future::ready(())
            },
        ));
        let err = result.unwrap_err();
        assert_eq!(err.attempts, 5);
        assert_eq!(calls, 5);
        assert_eq!(slept, vec![100, 200, 400, 800]);
    }

    #[test]
    fn succeeds_on_later_attempt() {
        let mut calls = 0;
        let result = block_on(retry_with_backoff(
            RetryPolicy::default(),
            &CancelFlag::new(),
            || {
                calls += 1;
                if calls < 3 { Err(RenderingError::CanvasNotFound("c".into())) } else { Ok(calls) }
            },
            |_| futures::future::ready(()),
        ));
        assert_eq!(result, Ok(3));
    }

    #[test]
    fn cancel_stops_retrying() {
        let cancel = CancelFlag::new();
        let mut calls = 0;
        let result: Result<(), _> = block_on(retry_with_backoff(
            RetryPolicy::default(),
            &cancel,
            || {
                calls += 1;
                Err(RenderingError::CanvasNotFound("c".into()))
            },
            |_| {
                cancel.cancel();
                futures::future::ready(())
            },
        ));
        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls, 1);
    }
}
