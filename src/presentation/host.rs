//! Browser-side glue: canvases per display, the session listeners, the
//! animation-frame loop and the market-event pipeline task.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo::render::{AnimationFrame, request_animation_frame};
use leptos::spawn_local;
use web_sys::PointerEvent;

use crate::application::data_pipeline::{self, MarketFeed};
use crate::application::with_workspace;
use crate::domain::display::DisplayId;
use crate::domain::geometry::RESIZE_DEBOUNCE_MS;
use crate::domain::interaction::{Commit, ListenerDirective, PointerInput};
use crate::domain::logging::LogComponent;
use crate::domain::market::MarketEvent;
use crate::global_state::bump_layout;
use crate::infrastructure::events::SessionListeners;
use crate::infrastructure::rendering::{CancelFlag, CanvasSurface, RetryPolicy};
use crate::infrastructure::services::{device_pixel_ratio, now_ms};
use crate::infrastructure::timers::DebounceTimer;
use crate::{log_info, log_warn};

struct SurfaceSlot {
    surface: Option<CanvasSurface>,
    cancel: CancelFlag,
    settle_timer: DebounceTimer,
}

thread_local! {
    static SURFACES: RefCell<HashMap<DisplayId, SurfaceSlot>> = RefCell::new(HashMap::new());
    static LISTENERS: RefCell<Option<SessionListeners>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<AnimationFrame>> = const { RefCell::new(None) };
    static FEED: RefCell<Option<MarketFeed>> = const { RefCell::new(None) };
}

pub fn canvas_id(id: DisplayId) -> String {
    format!("price-canvas-{}", id.value())
}

pub fn pointer_input(ev: &PointerEvent) -> PointerInput {
    PointerInput::new(f64::from(ev.client_x()), f64::from(ev.client_y()), ev.button(), ev.pointer_id())
}

/// Carry out what the interaction manager asked for.
pub fn apply_directive(directive: ListenerDirective) {
    match directive {
        ListenerDirective::Install => LISTENERS.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(SessionListeners::install(on_document_move, on_document_up, on_document_cancel));
            }
        }),
        ListenerDirective::Remove => {
            // Detach after the current handler returns; a listener may be the caller.
            if let Some(listeners) = LISTENERS.with(|slot| slot.borrow_mut().take()) {
                spawn_local(async move { listeners.remove() });
            }
        }
        ListenerDirective::Keep | ListenerDirective::None => {}
    }
}

fn on_document_move(ev: PointerEvent) {
    let commit = with_workspace(|ws| ws.pointer_move(pointer_input(&ev)));
    match commit {
        Some(Commit::Resized { id, .. }) => {
            schedule_settle(id);
            bump_layout();
        }
        Some(Commit::Moved { .. }) => bump_layout(),
        None => {}
    }
}

fn on_document_up(ev: PointerEvent) {
    let directive = with_workspace(|ws| ws.pointer_up(pointer_input(&ev)));
    apply_directive(directive);
    bump_layout();
}

fn on_document_cancel(ev: PointerEvent) {
    let directive = with_workspace(|ws| ws.pointer_cancel(pointer_input(&ev)));
    apply_directive(directive);
    bump_layout();
}

/// Render `id` once the resize has been quiet for the debounce period, even
/// if no animation frame arrives in between.
fn schedule_settle(id: DisplayId) {
    SURFACES.with(|surfaces| {
        if let Some(slot) = surfaces.borrow_mut().get_mut(&id) {
            slot.settle_timer.schedule(RESIZE_DEBOUNCE_MS as u32 + 1, move || render_display(id));
        }
    });
}

/// Start acquiring the canvas of a freshly mounted display.
pub fn attach_canvas(id: DisplayId) {
    let cancel = CancelFlag::new();
    SURFACES.with(|surfaces| {
        surfaces.borrow_mut().insert(
            id,
            SurfaceSlot { surface: None, cancel: cancel.clone(), settle_timer: DebounceTimer::new() },
        );
    });

    spawn_local(async move {
        let result = CanvasSurface::acquire_with_retry(&canvas_id(id), RetryPolicy::default(), &cancel).await;
        if cancel.is_cancelled() {
            return;
        }
        match result {
            Ok(surface) => SURFACES.with(|surfaces| {
                if let Some(slot) = surfaces.borrow_mut().get_mut(&id) {
                    slot.surface = Some(surface);
                }
            }),
            Err(e) => {
                with_workspace(|ws| ws.mark_canvas_failed(id, e.attempts, e.last_error.to_string()));
                bump_layout();
            }
        }
    });
}

/// Tear down the per-display browser resources: pending retries and timers.
pub fn detach_canvas(id: DisplayId) {
    let slot = SURFACES.with(|surfaces| surfaces.borrow_mut().remove(&id));
    if let Some(mut slot) = slot {
        slot.cancel.cancel();
        slot.settle_timer.cancel();
    }
}

fn render_display(id: DisplayId) {
    let now = now_ms();
    let dpr = device_pixel_ratio();
    SURFACES.with(|surfaces| {
        if let Some(surface) = surfaces.borrow_mut().get_mut(&id).and_then(|s| s.surface.as_mut()) {
            with_workspace(|ws| ws.render_frame(id, surface, now, dpr));
        }
    });
}

fn render_all() {
    let now = now_ms();
    let dpr = device_pixel_ratio();
    SURFACES.with(|surfaces| {
        let mut surfaces = surfaces.borrow_mut();
        with_workspace(|ws| {
            for (id, slot) in surfaces.iter_mut() {
                if let Some(surface) = slot.surface.as_mut() {
                    ws.render_frame(*id, surface, now, dpr);
                }
            }
        });
    });
}

/// Keep one animation-frame callback queued for the lifetime of the page.
pub fn start_frame_loop() {
    let handle = request_animation_frame(|_| {
        render_all();
        start_frame_loop();
    });
    FRAME.with(|frame| *frame.borrow_mut() = Some(handle));
}

/// Spawn the consumer task and keep the push side for the wasm API.
pub fn start_pipeline() {
    if FEED.with(|feed| feed.borrow().is_some()) {
        return;
    }
    let (feed, events) = data_pipeline::channel();
    FEED.with(|slot| *slot.borrow_mut() = Some(feed));
    wasm_bindgen_futures::spawn_local(async move {
        let stats = data_pipeline::consume(events, |event| with_workspace(|ws| ws.apply_event(event))).await;
        log_info!(LogComponent::Presentation("Host"), "market pipeline closed: {:?}", stats);
    });
    log_info!(LogComponent::Presentation("Host"), "market pipeline started");
}

/// Queue an event for the pipeline task. `false` if the pipeline is not running.
pub fn push_event(event: MarketEvent) -> bool {
    let pushed = FEED.with(|feed| feed.borrow().as_ref().is_some_and(|f| f.push(event)));
    if !pushed {
        log_warn!(LogComponent::Presentation("Host"), "market event dropped: pipeline not running");
    }
    pushed
}
