use crate::domain::display::Size;

pub const MAX_DEVICE_PIXEL_RATIO: f64 = 4.0;

/// Physical pixel buffer behind a canvas: CSS size × DPR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackingStore {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl BackingStore {
    pub fn new(css: Size, dpr: f64) -> Self {
        let dpr = Self::sanitize_dpr(dpr);
        let css_width = finite_positive(css.width);
        let css_height = finite_positive(css.height);
        Self {
            css_width,
            css_height,
            dpr,
            pixel_width: (css_width * dpr).round().max(1.0) as u32,
            pixel_height: (css_height * dpr).round().max(1.0) as u32,
        }
    }

    pub fn sanitize_dpr(dpr: f64) -> f64 {
        if dpr.is_finite() && dpr > 0.0 { dpr.min(MAX_DEVICE_PIXEL_RATIO) } else { 1.0 }
    }

    /// Whether the canvas element needs its width/height attributes rewritten.
    pub fn differs_from(&self, pixel_width: u32, pixel_height: u32) -> bool {
        self.pixel_width != pixel_width || self.pixel_height != pixel_height
    }
}

fn finite_positive(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}
