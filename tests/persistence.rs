use price_display_wasm::application::Workspace;
use price_display_wasm::domain::display::{
    Dimension, DisplayConfig, DisplayId, DisplayRegistry, MarkerSet, PersistedDisplay, Position, Size, WorkspaceLayout,
};
use price_display_wasm::domain::market::Symbol;

const LEGACY_LAYOUT: &str = r#"{
    "displays": [
        {
            "id": 7,
            "symbol": "eurusd",
            "position": { "x": 40, "y": 60 },
            "size": { "width": 300, "height": 140 },
            "config": { "axis_x": 62, "float_width": 240, "price_precision": 4 }
        }
    ]
}"#;

#[test]
fn legacy_numbers_are_classified_per_field() {
    let layout: WorkspaceLayout = serde_json::from_str(LEGACY_LAYOUT).unwrap();
    let entry = &layout.displays[0];
    assert_eq!(entry.config.axis_x, Dimension::Percent(62.0));
    assert_eq!(entry.config.float_width, Dimension::Absolute(240.0));
    assert_eq!(entry.config.price_precision, 4);
    assert_eq!(entry.z_index, 0);
    assert!(layout.markers.is_empty());
}

#[test]
fn exported_layout_writes_tagged_dimensions() {
    let mut registry = DisplayRegistry::default();
    registry.add_display(Symbol::from("EURUSD"), Some(Position::new(10.0, 20.0)));
    let layout = WorkspaceLayout::capture(&registry, &MarkerSet::new());

    let json = serde_json::to_value(&layout).unwrap();
    let axis = &json["displays"][0]["config"]["axis_x"];
    assert_eq!(axis["kind"], "percent");
    assert_eq!(axis["value"], 62.0);
    assert_eq!(json["displays"][0]["zIndex"], 1);
}

#[test]
fn restore_clamps_size_and_continues_ids() {
    let mut layout: WorkspaceLayout = serde_json::from_str(LEGACY_LAYOUT).unwrap();
    layout.displays[0].size = Size::new(5000.0, 10.0);
    let mut registry = DisplayRegistry::default();
    let mut markers = MarkerSet::new();

    let restored = layout.restore_into(&mut registry, &mut markers);
    assert_eq!(restored, vec![DisplayId::from(7)]);
    let display = registry.get(DisplayId::from(7)).unwrap();
    assert_eq!(display.size, registry.bounds().clamp(Size::new(5000.0, 10.0)));
    assert_eq!(display.symbol, Symbol::from("EURUSD"));

    let next = registry.add_display(Symbol::from("GBPUSD"), None);
    assert!(next.value() > 7);
}

#[test]
fn restoring_twice_skips_existing_ids() {
    let layout: WorkspaceLayout = serde_json::from_str(LEGACY_LAYOUT).unwrap();
    let mut registry = DisplayRegistry::default();
    let mut markers = MarkerSet::new();

    assert_eq!(layout.clone().restore_into(&mut registry, &mut markers).len(), 1);
    assert!(layout.restore_into(&mut registry, &mut markers).is_empty());
    assert_eq!(registry.len(), 1);
}

#[test]
fn workspace_round_trip_keeps_geometry_and_markers() {
    let mut source = Workspace::default();
    let id = source.add_display("EURUSD", Some(Position::new(300.0, 200.0))).unwrap();
    source.add_display("USDJPY", None).unwrap();
    let layout = source.export_layout();

    let json = serde_json::to_string(&layout).unwrap();
    let parsed: WorkspaceLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, layout);

    let mut target = Workspace::default();
    let restored = target.restore_layout(parsed);
    assert_eq!(restored.len(), 2);
    let display = target.display(id).unwrap();
    assert_eq!(display.position, Position::new(300.0, 200.0));
    assert!(target.performance_info(id).is_some());
}

#[test]
fn persisted_entry_fills_missing_config() {
    let entry: PersistedDisplay = serde_json::from_str(
        r#"{ "id": 1, "symbol": "XAUUSD", "position": { "x": 0, "y": 0 }, "size": { "width": 220, "height": 120 } }"#,
    )
    .unwrap();
    assert_eq!(entry.config, DisplayConfig::default());
}
