#![cfg(target_arch = "wasm32")]

use price_display_wasm::application::Workspace;
use price_display_wasm::domain::display::Position;
use price_display_wasm::domain::market::{DaySnapshot, MarketEvent, Symbol, Tick};
use price_display_wasm::infrastructure::rendering::{
    CancelFlag, CanvasSurface, DrawingContext, RetryPolicy,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn frame_sizes_the_backing_store_by_dpr() {
    let canvas = mount_canvas("web-canvas-frame");
    let mut surface = CanvasSurface::from_canvas(canvas).unwrap();

    let mut workspace = Workspace::default();
    let id = workspace.add_display("EURUSD", Some(Position::new(0.0, 0.0))).unwrap();
    let symbol = Symbol::from("EURUSD");
    let snapshot = DaySnapshot {
        projected_adr_high: 1.1050,
        projected_adr_low: 1.0950,
        todays_high: 1.1010,
        todays_low: 1.0990,
        day_open_price: 1.1000,
    };
    workspace.apply_event(MarketEvent::Snapshot { symbol: symbol.clone(), snapshot }).unwrap();
    workspace.apply_event(MarketEvent::Tick { symbol, tick: Tick::new(1.1002, 1) }).unwrap();

    let outcome = workspace.render_frame(id, &mut surface, 0.0, 2.0).unwrap();
    assert!(outcome.is_rendered());
    assert_eq!(surface.backing_size(), (440, 240));
}

#[wasm_bindgen_test]
async fn mounted_canvas_is_acquired_on_first_try() {
    mount_canvas("web-canvas-acquire");
    let surface =
        CanvasSurface::acquire_with_retry("web-canvas-acquire", RetryPolicy::default(), &CancelFlag::new())
            .await;
    assert!(surface.is_ok());
}

#[wasm_bindgen_test]
async fn missing_canvas_gives_up_after_policy_attempts() {
    let policy = RetryPolicy { max_attempts: 2, base_delay_ms: 1 };
    let result = CanvasSurface::acquire_with_retry("no-such-canvas", policy, &CancelFlag::new()).await;
    let exhausted = result.err().unwrap();
    assert_eq!(exhausted.attempts, 2);
}

#[wasm_bindgen_test]
fn api_keeps_the_display_list_in_step() {
    use leptos::SignalGetUntracked;
    use price_display_wasm::global_state::display_ids;
    use price_display_wasm::presentation::WorkspaceApi;

    let api = WorkspaceApi::new();
    let raw = api.add_display("gbpusd", Some(40.0), Some(40.0)).unwrap();
    let id = price_display_wasm::domain::display::DisplayId::from(raw as u64);
    assert!(display_ids().get_untracked().contains(&id));

    api.close_display(raw).unwrap();
    assert!(!display_ids().get_untracked().contains(&id));

    let layout = api.export_layout().unwrap();
    let restored = api.restore_layout(&layout).unwrap();
    assert!(restored.is_empty());
}
