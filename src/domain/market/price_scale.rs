use super::visual_range::VisualRange;

/// Linear price → pixel mapping for one frame. Y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    high: f64,
    low: f64,
    height: f64,
}

impl PriceScale {
    /// `None` when the range or the height cannot produce a finite mapping.
    pub fn new(range: &VisualRange, content_height: f64) -> Option<Self> {
        let span = range.high - range.low;
        if !span.is_finite() || span <= 0.0 || !content_height.is_finite() || content_height <= 0.0 {
            return None;
        }
        Some(Self { high: range.high, low: range.low, height: content_height })
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        (self.high - price) / (self.high - self.low) * self.height
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        self.high - y / self.height * (self.high - self.low)
    }

    /// Price distance covered by `px` pixels.
    pub fn price_for_pixels(&self, px: f64) -> f64 {
        px / self.height * (self.high - self.low)
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::visual_range::RangeFraction;

    #[test]
    fn maps_extremes_to_edges() {
        let range = VisualRange { high: 110.0, low: 90.0, fraction: RangeFraction::default() };
        let scale = PriceScale::new(&range, 120.0).unwrap();
        assert_eq!(scale.price_to_y(110.0), 0.0);
        assert_eq!(scale.price_to_y(90.0), 120.0);
        assert!((scale.y_to_price(60.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        let flat = VisualRange { high: 1.0, low: 1.0, fraction: RangeFraction::default() };
        assert!(PriceScale::new(&flat, 100.0).is_none());
        let ok = VisualRange { high: 2.0, low: 1.0, fraction: RangeFraction::default() };
        assert!(PriceScale::new(&ok, 0.0).is_none());
    }
}
