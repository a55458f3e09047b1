use futures::executor::block_on;
use price_display_wasm::application::data_pipeline::{self, PipelineStats};
use price_display_wasm::application::{Workspace, WorkspaceSettings};
use price_display_wasm::domain::display::{DisplayId, DisplayStatus, MarkerToggle, Position};
use price_display_wasm::domain::errors::{DomainError, RegistryError};
use price_display_wasm::domain::interaction::{ListenerDirective, PointerInput, PointerTarget, ResizeHandle};
use price_display_wasm::domain::market::{DaySnapshot, MarketEvent, Symbol, Tick};

fn snapshot() -> DaySnapshot {
    DaySnapshot {
        projected_adr_high: 1.1050,
        projected_adr_low: 1.0950,
        todays_high: 1.1010,
        todays_low: 1.0990,
        day_open_price: 1.1000,
    }
}

fn ready_workspace() -> (Workspace, DisplayId) {
    let mut workspace = Workspace::new(WorkspaceSettings::default());
    let id = workspace.add_display("eurusd", Some(Position::new(100.0, 100.0))).unwrap();
    let symbol = Symbol::from("EURUSD");
    workspace.apply_event(MarketEvent::Snapshot { symbol: symbol.clone(), snapshot: snapshot() }).unwrap();
    workspace.apply_event(MarketEvent::Tick { symbol, tick: Tick::new(1.1002, 1) }).unwrap();
    (workspace, id)
}

#[test]
fn clicking_the_same_price_twice_toggles_a_marker() {
    let (mut workspace, id) = ready_workspace();

    let added = workspace.canvas_click(id, 60.0).unwrap();
    assert!(matches!(added, MarkerToggle::Added(_)));
    assert_eq!(workspace.markers().len(), 1);

    let removed = workspace.canvas_click(id, 61.0).unwrap();
    assert!(matches!(removed, MarkerToggle::Removed(_)));
    assert!(workspace.markers().is_empty());
}

#[test]
fn markers_are_shared_between_displays() {
    let (mut workspace, first) = ready_workspace();
    let second = workspace.add_display("EURUSD", Some(Position::new(600.0, 100.0))).unwrap();

    workspace.canvas_click(first, 40.0).unwrap();
    // same symbol, same size: the marker sits under the same y on the second display
    assert!(matches!(workspace.canvas_click(second, 40.0).unwrap(), MarkerToggle::Removed(_)));
}

#[test]
fn click_on_display_without_range_is_ignored() {
    let mut workspace = Workspace::default();
    let id = workspace.add_display("EURUSD", None).unwrap();
    assert_eq!(workspace.canvas_click(id, 50.0), Ok(MarkerToggle::Ignored));
    assert!(workspace.markers().is_empty());
}

#[test]
fn click_on_unknown_display_is_an_error() {
    let mut workspace = Workspace::default();
    let missing = DisplayId::from(99);
    assert_eq!(
        workspace.canvas_click(missing, 10.0),
        Err(DomainError::Registry(RegistryError::DisplayNotFound(missing)))
    );
}

#[test]
fn release_after_a_drag_is_not_a_click() {
    let (mut workspace, id) = ready_workspace();

    workspace.pointer_down(id, PointerTarget::Surface, PointerInput::primary(150.0, 150.0));
    workspace.pointer_move(PointerInput::primary(200.0, 180.0));
    assert_eq!(workspace.pointer_up(PointerInput::primary(200.0, 180.0)), ListenerDirective::Remove);

    assert_eq!(workspace.canvas_click(id, 60.0), Ok(MarkerToggle::Ignored));
    assert!(matches!(workspace.canvas_click(id, 60.0), Ok(MarkerToggle::Added(_))));
}

#[test]
fn press_and_release_in_place_is_a_click() {
    let (mut workspace, id) = ready_workspace();

    workspace.pointer_down(id, PointerTarget::Surface, PointerInput::primary(150.0, 150.0));
    workspace.pointer_up(PointerInput::primary(151.0, 151.0));
    // lostpointercapture arrives after pointerup and must not swallow the click
    assert_eq!(workspace.lost_capture(PointerInput::primary(151.0, 151.0)), ListenerDirective::None);

    assert!(matches!(workspace.canvas_click(id, 60.0), Ok(MarkerToggle::Added(_))));
}

#[test]
fn cancelled_gesture_swallows_the_click() {
    let (mut workspace, id) = ready_workspace();

    workspace.pointer_down(id, PointerTarget::Surface, PointerInput::primary(150.0, 150.0));
    assert_eq!(workspace.pointer_cancel(PointerInput::primary(150.0, 150.0)), ListenerDirective::Remove);
    assert_eq!(workspace.canvas_click(id, 60.0), Ok(MarkerToggle::Ignored));
}

#[test]
fn closing_the_dragged_display_removes_listeners() {
    let (mut workspace, id) = ready_workspace();

    workspace.pointer_down(id, PointerTarget::Surface, PointerInput::primary(150.0, 150.0));
    assert_eq!(workspace.close_display(id), Ok(ListenerDirective::Remove));
    assert!(workspace.display(id).is_none());
    assert!(workspace.performance_info(id).is_none());
    assert!(workspace.close_display(id).is_err());
}

#[test]
fn empty_symbol_is_rejected() {
    let mut workspace = Workspace::default();
    assert!(matches!(workspace.add_display("   ", None), Err(DomainError::Validation(_))));
}

#[test]
fn pipeline_counts_applied_unmatched_and_rejected() {
    let mut workspace = Workspace::default();
    let id = workspace.add_display("EURUSD", None).unwrap();

    let (feed, events) = data_pipeline::channel();
    let eurusd = Symbol::from("EURUSD");
    let mut broken = snapshot();
    broken.day_open_price = f64::NAN;

    assert!(feed.push(MarketEvent::Snapshot { symbol: eurusd.clone(), snapshot: snapshot() }));
    feed.push(MarketEvent::Tick { symbol: eurusd.clone(), tick: Tick::new(1.1004, 1) });
    feed.push(MarketEvent::Tick { symbol: Symbol::from("GBPUSD"), tick: Tick::new(1.27, 2) });
    feed.push(MarketEvent::Tick { symbol: eurusd.clone(), tick: Tick::new(f64::INFINITY, 3) });
    feed.push(MarketEvent::Snapshot { symbol: eurusd, snapshot: broken });
    feed.close();

    let stats = block_on(data_pipeline::consume(events, |event| workspace.apply_event(event)));
    assert_eq!(stats, PipelineStats { applied: 2, unmatched: 1, rejected: 2 });

    let display = workspace.display(id).unwrap();
    assert!(display.ready);
    assert_eq!(display.state.current_price, Some(1.1004));
}

#[test]
fn market_events_parse_from_feed_json() {
    let json = r#"{"type":"tick","symbol":"eurusd","tick":{"currentPrice":1.1,"timestamp":1700000000000}}"#;
    let event: MarketEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.symbol(), &Symbol::from("EURUSD"));

    let empty = r#"{"type":"tick","symbol":"  ","tick":{"currentPrice":1.1,"timestamp":0}}"#;
    assert!(serde_json::from_str::<MarketEvent>(empty).is_err());
}

#[test]
fn failed_canvas_stays_in_error_while_data_arrives() {
    let mut workspace = Workspace::new(WorkspaceSettings::default());
    let id = workspace.add_display("EURUSD", None).unwrap();
    assert_eq!(workspace.display(id).unwrap().status, DisplayStatus::Loading);

    workspace.mark_canvas_failed(id, 5, "canvas not found".to_string());
    let symbol = Symbol::from("EURUSD");
    workspace.apply_event(MarketEvent::Snapshot { symbol: symbol.clone(), snapshot: snapshot() }).unwrap();
    workspace.apply_event(MarketEvent::Tick { symbol, tick: Tick::new(1.1004, 2) }).unwrap();

    let display = workspace.display(id).unwrap();
    assert!(display.ready);
    assert!(display.state.visual_range.is_some());
    assert_eq!(
        display.status,
        DisplayStatus::Error { attempts: 5, reason: "canvas not found".to_string() }
    );
}

#[test]
fn click_without_canvas_position_adds_nothing_but_ends_suppression() {
    let (mut workspace, id) = ready_workspace();

    workspace.pointer_down(id, PointerTarget::Handle(ResizeHandle::Se), PointerInput::primary(320.0, 220.0));
    workspace.pointer_move(PointerInput::primary(340.0, 240.0));
    workspace.pointer_up(PointerInput::primary(340.0, 240.0));

    // the click lands on the grip, which has no canvas y
    assert_eq!(workspace.canvas_click(id, f64::NAN), Ok(MarkerToggle::Ignored));
    assert!(workspace.markers().is_empty());

    assert!(matches!(workspace.canvas_click(id, 60.0), Ok(MarkerToggle::Added(_))));
}
