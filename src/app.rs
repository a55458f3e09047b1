use std::str::FromStr;

use leptos::*;
use strum::IntoEnumIterator;
use wasm_bindgen::JsCast;
use web_sys::{Element, PointerEvent};

use crate::application::with_workspace;
use crate::domain::display::{Display, DisplayId, DisplayStatus};
use crate::domain::interaction::{InteractionOutcome, PointerTarget, ResizeHandle};
use crate::domain::logging::LogComponent;
use crate::global_state::{bump_layout, display_ids, layout_version, status_line};
use crate::infrastructure::services::viewport_size;
use crate::log_warn;
use crate::presentation::host::{self, pointer_input};

const STYLE: &str = r#"
.price-workspace {
    position: fixed;
    inset: 0;
    background: #0b1220;
    font-family: -apple-system, BlinkMacSystemFont, sans-serif;
    color: #e5e7eb;
    overflow: hidden;
}
.toolbar {
    position: absolute;
    top: 8px;
    right: 8px;
    display: flex;
    gap: 6px;
    z-index: 100000;
}
.floating-display {
    position: absolute;
    box-sizing: border-box;
    border: 1px solid #1f2937;
    border-radius: 4px;
    touch-action: none;
    user-select: none;
    cursor: grab;
}
.floating-display canvas {
    display: block;
    width: 100%;
    height: 100%;
}
.display-title {
    position: absolute;
    top: 2px;
    left: 6px;
    font-size: 10px;
    opacity: 0.7;
    pointer-events: none;
}
.display-close {
    position: absolute;
    top: 0;
    right: 4px;
    cursor: pointer;
    opacity: 0.6;
}
.display-error {
    position: absolute;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    font-size: 11px;
    color: #f87171;
}
.resize-handle { position: absolute; width: 8px; height: 8px; }
.resize-handle.n, .resize-handle.s { left: 8px; right: 8px; width: auto; }
.resize-handle.e, .resize-handle.w { top: 8px; bottom: 8px; height: auto; }
.resize-handle.n, .resize-handle.nw, .resize-handle.ne { top: -4px; }
.resize-handle.s, .resize-handle.sw, .resize-handle.se { bottom: -4px; }
.resize-handle.w, .resize-handle.nw, .resize-handle.sw { left: -4px; }
.resize-handle.e, .resize-handle.ne, .resize-handle.se { right: -4px; }
.status { position: absolute; bottom: 6px; left: 8px; font-size: 11px; opacity: 0.6; }
"#;

#[component]
pub fn App() -> impl IntoView {
    let (symbol, set_symbol) = create_signal("EURUSD".to_string());

    host::start_pipeline();
    host::start_frame_loop();

    let sync_viewport = || {
        let (w, h) = viewport_size();
        with_workspace(|ws| ws.set_viewport(w, h));
    };
    sync_viewport();
    let resize_listener = gloo::events::EventListener::new(&window(), "resize", move |_| sync_viewport());
    on_cleanup(move || drop(resize_listener));

    let add_display = move |_| {
        let name = symbol.get_untracked();
        match with_workspace(|ws| ws.add_display(&name, None)) {
            Ok(id) => {
                display_ids().update(|ids| ids.push(id));
                status_line().set(format!("added {}", name.to_uppercase()));
            }
            Err(e) => status_line().set(e.to_string()),
        }
    };

    view! {
        <style>{STYLE}</style>
        <div class="price-workspace">
            <div class="toolbar">
                <input
                    prop:value=move || symbol.get()
                    on:input=move |ev| set_symbol.set(event_target_value(&ev))
                />
                <button on:click=add_display>"Add display"</button>
            </div>
            <For
                each=move || display_ids().get()
                key=|id| *id
                children=move |id| view! { <FloatingDisplay id=id /> }
            />
            <div class="status">{move || status_line().get()}</div>
        </div>
    }
}

fn container_style(display: &Display) -> String {
    format!(
        "left: {}px; top: {}px; width: {}px; height: {}px; z-index: {};",
        display.position.x, display.position.y, display.size.width, display.size.height, display.z_index
    )
}

/// Resize grip under the pointer, if any, read from `data-handle`.
fn handle_under(ev: &web_sys::Event) -> Option<ResizeHandle> {
    let element = ev.target()?.dyn_into::<Element>().ok()?;
    let name = element.get_attribute("data-handle")?;
    match ResizeHandle::from_str(&name) {
        Ok(handle) => Some(handle),
        Err(_) => {
            log_warn!(LogComponent::Presentation("FloatingDisplay"), "unknown handle '{}'", name);
            None
        }
    }
}

/// Pointer y in CSS px from the top of the display's canvas. `None` over a
/// resize grip, whose own box would otherwise give the offset.
fn canvas_y(id: DisplayId, ev: &web_sys::MouseEvent) -> Option<f64> {
    if handle_under(ev).is_some() {
        return None;
    }
    let canvas = document().get_element_by_id(&host::canvas_id(id))?;
    Some(f64::from(ev.client_y()) - canvas.get_bounding_client_rect().top())
}

#[component]
fn FloatingDisplay(id: DisplayId) -> impl IntoView {
    let style = move || {
        layout_version().get();
        with_workspace(|ws| ws.display(id).map(container_style)).unwrap_or_default()
    };
    let title = with_workspace(|ws| ws.display(id).map(|d| d.symbol.to_string())).unwrap_or_default();
    let error = move || {
        layout_version().get();
        with_workspace(|ws| match ws.display(id).map(|d| &d.status) {
            Some(DisplayStatus::Error { reason, .. }) => Some(reason.clone()),
            _ => None,
        })
    };

    let on_pointer_down = move |ev: PointerEvent| {
        let on_close = ev
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .is_some_and(|el| el.class_name().contains("display-close"));
        if on_close {
            return;
        }
        let target = handle_under(&ev).map_or(PointerTarget::Surface, PointerTarget::Handle);
        let result = with_workspace(|ws| ws.pointer_down(id, target, pointer_input(&ev)));
        if result.outcome != InteractionOutcome::Ignored {
            if let Some(el) = ev.current_target().and_then(|t| t.dyn_into::<Element>().ok()) {
                let _ = el.set_pointer_capture(ev.pointer_id());
            }
        }
        host::apply_directive(result.directive);
        bump_layout();
    };

    let on_lost_capture = move |ev: PointerEvent| {
        let directive = with_workspace(|ws| ws.lost_capture(pointer_input(&ev)));
        host::apply_directive(directive);
    };

    let on_click = move |ev: web_sys::MouseEvent| {
        // NaN still consumes a pending drag suppression but never adds a marker
        let y = canvas_y(id, &ev).unwrap_or(f64::NAN);
        if let Err(e) = with_workspace(|ws| ws.canvas_click(id, y)) {
            status_line().set(e.to_string());
        }
    };

    let on_hover = move |ev: PointerEvent| {
        with_workspace(|ws| ws.set_hover(id, canvas_y(id, &ev)));
    };
    let on_leave = move |_ev: PointerEvent| {
        with_workspace(|ws| ws.set_hover(id, None));
    };

    let close = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        match with_workspace(|ws| ws.close_display(id)) {
            Ok(directive) => host::apply_directive(directive),
            Err(e) => status_line().set(e.to_string()),
        }
        display_ids().update(|ids| ids.retain(|other| *other != id));
    };

    request_animation_frame(move || host::attach_canvas(id));
    on_cleanup(move || host::detach_canvas(id));

    let handles = ResizeHandle::iter()
        .map(|handle| {
            let name = handle.as_ref().to_string();
            view! {
                <div
                    class=format!("resize-handle {}", name)
                    data-handle=name
                    style=format!("cursor: {};", handle.cursor())
                />
            }
        })
        .collect_view();

    view! {
        <div
            class="floating-display"
            style=style
            on:pointerdown=on_pointer_down
            on:lostpointercapture=on_lost_capture
            on:click=on_click
            on:pointermove=on_hover
            on:pointerleave=on_leave
        >
            <canvas id=host::canvas_id(id) />
            <span class="display-title">{title}</span>
            <span class="display-close" on:click=close>"×"</span>
            {move || error().map(|reason| view! { <div class="display-error">{reason}</div> })}
            {handles}
        </div>
    }
}
