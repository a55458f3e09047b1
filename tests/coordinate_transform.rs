use price_display_wasm::domain::display::{Dimension, DisplayConfig, Size};
use price_display_wasm::domain::geometry::{BackingStore, CoordinateTransform, MIN_CONTAINER_PX};
use quickcheck_macros::quickcheck;

fn reference_config() -> DisplayConfig {
    DisplayConfig {
        axis_x: Dimension::Percent(50.0),
        float_width: Dimension::Percent(25.0),
        float_height: Dimension::Percent(25.0),
        float_x_offset: Dimension::Absolute(4.0),
        price_font_size: Dimension::Absolute(14.0),
        metric_font_size: Dimension::Absolute(10.0),
        orb_base_width: Dimension::Percent(25.0),
        profile_width: Dimension::Percent(25.0),
        meter_width: Dimension::Absolute(6.0),
        ..DisplayConfig::default()
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let config = DisplayConfig::default();
    let first = CoordinateTransform::scale(&config, 333.3, 177.7);
    for _ in 0..100 {
        let again = CoordinateTransform::scale(&config, 333.3, 177.7);
        assert_eq!(again, first);
        assert_eq!(again.axis_x.to_bits(), first.axis_x.to_bits());
    }
}

#[test]
fn reference_geometry_snapshot() {
    let geometry = CoordinateTransform::scale(&reference_config(), 240.0, 160.0);
    let json = serde_json::to_string_pretty(&geometry).unwrap();
    insta::assert_snapshot!("reference_geometry", json);
}

#[test]
fn degenerate_container_is_raised_to_minimum() {
    let config = DisplayConfig::default();
    for (w, h) in [(0.0, 0.0), (-50.0, 10.0), (f64::NAN, f64::INFINITY)] {
        let g = CoordinateTransform::scale(&config, w, h);
        assert!(g.container_width >= MIN_CONTAINER_PX);
        assert!(g.container_height >= MIN_CONTAINER_PX);
        assert!(g.axis_x.is_finite());
    }
}

#[test]
fn device_pixel_ratio_only_reaches_the_backing_store() {
    let config = DisplayConfig::default();
    let size = Size::new(220.0, 120.0);

    let crisp = BackingStore::new(size, 2.0);
    let plain = BackingStore::new(size, 1.0);
    assert_eq!((crisp.pixel_width, crisp.pixel_height), (440, 240));
    assert_eq!((plain.pixel_width, plain.pixel_height), (220, 120));

    let g_crisp = CoordinateTransform::scale(&config, crisp.css_width, crisp.css_height);
    let g_plain = CoordinateTransform::scale(&config, plain.css_width, plain.css_height);
    assert_eq!(g_crisp, g_plain);
}

#[test]
fn bad_dpr_falls_back_to_one() {
    let store = BackingStore::new(Size::new(100.0, 50.0), f64::NAN);
    assert_eq!(store.dpr, 1.0);
    assert_eq!(store.pixel_width, 100);
}

#[quickcheck]
fn geometry_is_always_finite_and_non_negative(w: f64, h: f64) -> bool {
    let g = CoordinateTransform::scale(&DisplayConfig::default(), w, h);
    [
        g.content_width,
        g.content_height,
        g.axis_x,
        g.float_width,
        g.float_height,
        g.float_x_offset,
        g.price_font_size,
        g.metric_font_size,
        g.orb_base_width,
        g.profile_width,
        g.meter_width,
    ]
    .iter()
    .all(|v| v.is_finite() && *v >= 0.0)
}

#[quickcheck]
fn percent_fields_scale_linearly(w: u16, h: u16) -> bool {
    let (w, h) = (f64::from(w) + 1.0, f64::from(h) + 1.0);
    let config = DisplayConfig::default();
    let base = CoordinateTransform::scale(&config, w, h);
    let doubled = CoordinateTransform::scale(&config, w * 2.0, h * 2.0);
    doubled.axis_x == base.axis_x * 2.0 && doubled.float_height == base.float_height * 2.0
}
