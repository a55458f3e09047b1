use std::collections::VecDeque;

use super::value_objects::Tick;
use super::visual_range::VisualRange;

pub const TICK_HISTORY_CAPACITY: usize = 512;
pub const VOLATILITY_WINDOW: usize = 64;
pub const PROFILE_BUCKETS: usize = 48;

/// Most recent ticks of one display, oldest first
#[derive(Debug, Clone)]
pub struct TickHistory {
    ticks: VecDeque<Tick>,
    capacity: usize,
}

impl Default for TickHistory {
    fn default() -> Self {
        Self::with_capacity(TICK_HISTORY_CAPACITY)
    }
}

impl TickHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { ticks: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, tick: Tick) {
        if self.ticks.len() == self.capacity {
            self.ticks.pop_front();
        }
        self.ticks.push_back(tick);
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
    }

    pub fn latest(&self) -> Option<&Tick> {
        self.ticks.back()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|t| t.current_price)
    }

    /// Prices of the last `n` ticks, oldest first.
    pub fn recent_prices(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        let skip = self.ticks.len().saturating_sub(n);
        self.ticks.iter().skip(skip).map(|t| t.current_price)
    }
}

/// Tick counts per price bucket across the visual range
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionProfile {
    pub buckets: Vec<u32>,
    pub low: f64,
    pub high: f64,
}

impl DistributionProfile {
    pub fn build(history: &TickHistory, range: &VisualRange, bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut buckets = vec![0u32; bucket_count];
        let span = range.span();
        if span > 0.0 {
            for price in history.prices().filter(|p| range.contains(*p)) {
                let idx = ((price - range.low) / span * bucket_count as f64) as usize;
                buckets[idx.min(bucket_count - 1)] += 1;
            }
        }
        Self { buckets, low: range.low, high: range.high }
    }

    pub fn max_count(&self) -> u32 {
        self.buckets.iter().copied().max().unwrap_or(0)
    }

    pub fn bucket_height(&self) -> f64 {
        (self.high - self.low) / self.buckets.len() as f64
    }

    /// Lower and upper price bound of bucket `idx`.
    pub fn bucket_bounds(&self, idx: usize) -> (f64, f64) {
        let h = self.bucket_height();
        let lo = self.low + h * idx as f64;
        (lo, lo + h)
    }
}

/// Short-window volatility relative to the projected ADR
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityReading {
    /// Standard deviation of tick-to-tick price changes.
    pub stddev: f64,
    /// High minus low over the window.
    pub window_range: f64,
    /// `window_range / adr_range`, clamped to `[0, 1]`.
    pub intensity: f64,
}

impl VolatilityReading {
    pub fn measure(history: &TickHistory, window: usize, adr_range: f64) -> Option<Self> {
        if !(adr_range.is_finite() && adr_range > 0.0) {
            return None;
        }
        let prices: Vec<f64> = history.recent_prices(window).collect();
        if prices.len() < 2 {
            return None;
        }

        let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
        let variance = deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / deltas.len() as f64;

        let (lo, hi) = prices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let window_range = hi - lo;

        Some(Self {
            stddev: variance.sqrt(),
            window_range,
            intensity: (window_range / adr_range).clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::visual_range::RangeFraction;

    #[test]
    fn history_drops_oldest_when_full() {
        let mut history = TickHistory::with_capacity(3);
        for i in 0..5 {
            history.push(Tick::new(i as f64, i));
        }
        assert_eq!(history.prices().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn profile_ignores_prices_outside_range() {
        let mut history = TickHistory::default();
        for p in [95.0, 100.0, 100.1, 120.0] {
            history.push(Tick::new(p, 0));
        }
        let range = VisualRange { high: 110.0, low: 90.0, fraction: RangeFraction::default() };
        let profile = DistributionProfile::build(&history, &range, 4);
        assert_eq!(profile.buckets.iter().sum::<u32>(), 3);
        assert_eq!(profile.buckets[2], 2);
    }

    #[test]
    fn flat_prices_have_zero_volatility() {
        let mut history = TickHistory::default();
        for i in 0..10 {
            history.push(Tick::new(50.0, i));
        }
        let reading = VolatilityReading::measure(&history, VOLATILITY_WINDOW, 10.0).unwrap();
        assert_eq!(reading.stddev, 0.0);
        assert_eq!(reading.intensity, 0.0);
    }
}
