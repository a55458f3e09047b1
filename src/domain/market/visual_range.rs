//! Price window shown by a display.
//!
//! The window is centred on the day open and sized as a fraction of the
//! projected ADR. The fraction is picked fresh from fixed breakpoints on every
//! call: the calculator takes no previous fraction as input, so a spike in
//! price can widen the window only while the spike lasts.

use serde::{Deserialize, Serialize};

use crate::domain::errors::RangeError;

/// Padding added above and below the computed window, as a share of its span.
pub const RANGE_PADDING: f64 = 0.05;

/// Breakpoints on distance-from-open / ADR, highest first.
const FRACTION_BREAKPOINTS: [(f64, f64); 3] = [(0.75, 1.0), (0.5, 0.75), (0.3, 0.5)];

/// Fraction used when price sits close to the open.
pub const MIN_RANGE_FRACTION: f64 = 0.3;

/// Share of the ADR shown, always within `(0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RangeFraction(f64);

impl RangeFraction {
    /// Bounded constructor; anything outside `(0, 1]` is clamped into it.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Self(MIN_RANGE_FRACTION);
        }
        Self(value.min(1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Target fraction for a given distance-from-open expressed in ADRs.
    pub fn for_distance(pct: f64) -> Self {
        let fraction = FRACTION_BREAKPOINTS
            .iter()
            .find(|(threshold, _)| pct > *threshold)
            .map(|(_, fraction)| *fraction)
            .unwrap_or(MIN_RANGE_FRACTION);
        Self(fraction)
    }
}

impl Default for RangeFraction {
    fn default() -> Self {
        Self(MIN_RANGE_FRACTION)
    }
}

/// Everything the calculator reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeInput {
    pub current_price: f64,
    pub day_open_price: f64,
    pub projected_adr_high: f64,
    pub projected_adr_low: f64,
    pub todays_high: f64,
    pub todays_low: f64,
}

/// Computed price window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualRange {
    pub high: f64,
    pub low: f64,
    pub fraction: RangeFraction,
}

impl VisualRange {
    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }
}

/// Stateless mapping from day-range data to a visual window
pub struct VisualRangeCalculator;

impl VisualRangeCalculator {
    pub fn compute(input: &RangeInput) -> Result<VisualRange, RangeError> {
        let checks = [
            ("current price", input.current_price),
            ("day open price", input.day_open_price),
            ("projected ADR high", input.projected_adr_high),
            ("projected ADR low", input.projected_adr_low),
            ("today's high", input.todays_high),
            ("today's low", input.todays_low),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RangeError::InsufficientData(*name));
        }

        let adr_range = input.projected_adr_high - input.projected_adr_low;
        if adr_range <= 0.0 {
            return Err(RangeError::InvalidRange {
                low: input.projected_adr_low,
                high: input.projected_adr_high,
            });
        }

        let pct = (input.current_price - input.day_open_price).abs() / adr_range;
        let fraction = RangeFraction::for_distance(pct);

        let half = adr_range / 2.0 * fraction.value();
        let mut high = input.day_open_price + half;
        let mut low = input.day_open_price - half;

        high = high.max(input.todays_high);
        low = low.min(input.todays_low);

        let padding = (high - low) * RANGE_PADDING;
        high += padding;
        low -= padding;

        if high <= low {
            return Err(RangeError::InvalidRange { low, high });
        }
        Ok(VisualRange { high, low, fraction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(current: f64) -> RangeInput {
        RangeInput {
            current_price: current,
            day_open_price: 100.0,
            projected_adr_high: 110.0,
            projected_adr_low: 90.0,
            todays_high: 100.5,
            todays_low: 99.5,
        }
    }

    #[test]
    fn breakpoints_are_exclusive() {
        assert_eq!(RangeFraction::for_distance(0.3).value(), 0.3);
        assert_eq!(RangeFraction::for_distance(0.31).value(), 0.5);
        assert_eq!(RangeFraction::for_distance(0.5).value(), 0.5);
        assert_eq!(RangeFraction::for_distance(0.51).value(), 0.75);
        assert_eq!(RangeFraction::for_distance(0.76).value(), 1.0);
        assert_eq!(RangeFraction::for_distance(3.0).value(), 1.0);
    }

    #[test]
    fn centred_on_open_with_padding() {
        let range = VisualRangeCalculator::compute(&input(100.0)).unwrap();
        // half = 10 * 0.3 = 3 → [97, 103], span 6, padding 0.3
        assert!((range.high - 103.3).abs() < 1e-9);
        assert!((range.low - 96.7).abs() < 1e-9);
    }

    #[test]
    fn todays_extremes_widen_the_window() {
        let mut data = input(100.0);
        data.todays_high = 105.0;
        let range = VisualRangeCalculator::compute(&data).unwrap();
        assert!(range.high > 105.0);
        assert!(range.low < 97.0);
    }

    #[test]
    fn zero_adr_is_rejected() {
        let mut data = input(100.0);
        data.projected_adr_low = 110.0;
        assert!(matches!(
            VisualRangeCalculator::compute(&data),
            Err(RangeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn fraction_constructor_is_bounded() {
        assert_eq!(RangeFraction::new(4.0).value(), 1.0);
        assert_eq!(RangeFraction::new(-1.0).value(), MIN_RANGE_FRACTION);
        assert_eq!(RangeFraction::new(f64::NAN).value(), MIN_RANGE_FRACTION);
    }
}
