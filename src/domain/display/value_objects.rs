use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Opaque key of a floating display
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into, Serialize, Deserialize,
)]
#[display(fmt = "display-{}", _0)]
pub struct DisplayId(u64);

impl DisplayId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Replace NaN/∞ with a finite fallback.
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Top-left corner of a display in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn sanitized(self) -> Self {
        Self { x: finite_or(self.x, 0.0), y: finite_or(self.y, 0.0) }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn distance_to(self, other: Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Width and height in viewport (CSS) pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        DEFAULT_DISPLAY_SIZE
    }
}

pub const DEFAULT_DISPLAY_SIZE: Size = Size::new(220.0, 120.0);

/// Inclusive per-axis size limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: Size,
    pub max: Size,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self { min: Size::new(100.0, 60.0), max: Size::new(1200.0, 800.0) }
    }
}

impl SizeBounds {
    /// Clamp each axis into `[min, max]`. NaN and -∞ go to the minimum.
    pub fn clamp(&self, size: Size) -> Size {
        Size {
            width: clamp_axis(size.width, self.min.width, self.max.width),
            height: clamp_axis(size.height, self.min.height, self.max.height),
        }
    }

    pub fn contains(&self, size: Size) -> bool {
        self.clamp(size) == size
    }
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Axis-aligned rectangle in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(position: Position, size: Size) -> Self {
        Self { x: position.x, y: position.y, width: size.width, height: size.height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Strict overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Size of the browser viewport the displays float in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub width: f64,
    pub height: f64,
}

impl ViewportBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: finite_or(width, 0.0).max(0.0), height: finite_or(height, 0.0).max(0.0) }
    }
}

impl Default for ViewportBounds {
    fn default() -> Self {
        Self { width: 1920.0, height: 1080.0 }
    }
}

/// Values at or below this are read as percentages when loading untagged legacy configs.
pub const LEGACY_PERCENT_LIMIT: f64 = 200.0;

/// One configurable length: either a share of a container axis or fixed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "DimensionRepr", into = "TaggedDimension")]
pub enum Dimension {
    Percent(f64),
    Absolute(f64),
}

impl Dimension {
    /// Classify a bare number the way older layouts were written.
    pub fn from_legacy(value: f64) -> Self {
        if value <= LEGACY_PERCENT_LIMIT {
            Dimension::Percent(value)
        } else {
            Dimension::Absolute(value)
        }
    }

    /// Pixel length against an axis of `axis_px`. Never negative, never NaN.
    pub fn resolve(&self, axis_px: f64) -> f64 {
        let px = match *self {
            Dimension::Percent(pct) => pct / 100.0 * axis_px,
            Dimension::Absolute(px) => px,
        };
        finite_or(px, 0.0).max(0.0)
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Dimension::Percent(v) | Dimension::Absolute(v) => v.is_finite(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
enum TaggedDimension {
    Percent(f64),
    Absolute(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Tagged(TaggedDimension),
    Legacy(f64),
}

impl From<DimensionRepr> for Dimension {
    fn from(repr: DimensionRepr) -> Self {
        match repr {
            DimensionRepr::Tagged(TaggedDimension::Percent(v)) => Dimension::Percent(v),
            DimensionRepr::Tagged(TaggedDimension::Absolute(v)) => Dimension::Absolute(v),
            DimensionRepr::Legacy(v) => Dimension::from_legacy(v),
        }
    }
}

impl From<Dimension> for TaggedDimension {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Percent(v) => TaggedDimension::Percent(v),
            Dimension::Absolute(v) => TaggedDimension::Absolute(v),
        }
    }
}

/// Visual parameters of one display, relative to its container where percent-based
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub content_width: Dimension,
    pub content_height: Dimension,
    pub axis_x: Dimension,
    pub float_width: Dimension,
    pub float_height: Dimension,
    pub float_x_offset: Dimension,
    pub price_font_size: Dimension,
    pub metric_font_size: Dimension,
    pub orb_base_width: Dimension,
    pub profile_width: Dimension,
    pub meter_width: Dimension,
    pub show_profile: bool,
    pub show_range_meter: bool,
    pub show_volatility: bool,
    pub show_volatility_metric: bool,
    pub show_markers: bool,
    pub price_precision: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            content_width: Dimension::Percent(100.0),
            content_height: Dimension::Percent(100.0),
            axis_x: Dimension::Percent(62.0),
            float_width: Dimension::Percent(36.0),
            float_height: Dimension::Percent(18.0),
            float_x_offset: Dimension::Percent(2.0),
            price_font_size: Dimension::Percent(15.0),
            metric_font_size: Dimension::Percent(9.0),
            orb_base_width: Dimension::Percent(24.0),
            profile_width: Dimension::Percent(28.0),
            meter_width: Dimension::Percent(3.0),
            show_profile: true,
            show_range_meter: true,
            show_volatility: true,
            show_volatility_metric: true,
            show_markers: true,
            price_precision: 5,
        }
    }
}

impl DisplayConfig {
    pub const MAX_PRECISION: u8 = 8;

    /// Replace non-finite dimensions with defaults and bound the precision.
    pub fn sanitized(mut self) -> Self {
        let defaults = DisplayConfig::default();
        let fields: [(&mut Dimension, Dimension); 11] = [
            (&mut self.content_width, defaults.content_width),
            (&mut self.content_height, defaults.content_height),
            (&mut self.axis_x, defaults.axis_x),
            (&mut self.float_width, defaults.float_width),
            (&mut self.float_height, defaults.float_height),
            (&mut self.float_x_offset, defaults.float_x_offset),
            (&mut self.price_font_size, defaults.price_font_size),
            (&mut self.metric_font_size, defaults.metric_font_size),
            (&mut self.orb_base_width, defaults.orb_base_width),
            (&mut self.profile_width, defaults.profile_width),
            (&mut self.meter_width, defaults.meter_width),
        ];
        for (field, fallback) in fields {
            if !field.is_finite() {
                *field = fallback;
            }
        }
        self.price_precision = self.price_precision.min(Self::MAX_PRECISION);
        self
    }
}
