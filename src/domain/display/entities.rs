use serde::{Deserialize, Serialize};

use super::value_objects::{DisplayConfig, DisplayId, Position, Rect, Size};
use crate::domain::errors::RangeError;
use crate::domain::market::{
    DaySnapshot, RangeFraction, RangeInput, Symbol, Tick, TickHistory, Timestamp, VisualRange,
    VisualRangeCalculator,
};

/// Lifecycle of a display as seen by the user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DisplayStatus {
    #[default]
    Loading,
    Ready,
    /// Non-fatal: the canvas could not be set up after `attempts` tries.
    Error { attempts: u32, reason: String },
}

/// Live market state of one display
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub current_price: Option<f64>,
    pub day_open_price: Option<f64>,
    pub projected_adr_high: Option<f64>,
    pub projected_adr_low: Option<f64>,
    pub todays_high: Option<f64>,
    pub todays_low: Option<f64>,
    pub visual_range: Option<VisualRange>,
    pub history: TickHistory,
    pub last_tick: Option<Timestamp>,
}

impl DisplayState {
    pub fn apply_snapshot(&mut self, snapshot: &DaySnapshot) {
        self.day_open_price = Some(snapshot.day_open_price);
        self.projected_adr_high = Some(snapshot.projected_adr_high);
        self.projected_adr_low = Some(snapshot.projected_adr_low);
        self.todays_high = Some(snapshot.todays_high);
        self.todays_low = Some(snapshot.todays_low);
        self.history.clear();
    }

    /// Record a tick; a price outside today's extremes extends them.
    pub fn apply_tick(&mut self, tick: &Tick) {
        let price = tick.current_price;
        self.current_price = Some(price);
        self.todays_high = Some(self.todays_high.map_or(price, |h| h.max(price)));
        self.todays_low = Some(self.todays_low.map_or(price, |l| l.min(price)));
        self.last_tick = Some(tick.timestamp);
        self.history.push(*tick);
    }

    pub fn range_input(&self) -> Result<RangeInput, RangeError> {
        Ok(RangeInput {
            current_price: self.current_price.ok_or(RangeError::InsufficientData("current price"))?,
            day_open_price: self.day_open_price.ok_or(RangeError::InsufficientData("day open price"))?,
            projected_adr_high: self
                .projected_adr_high
                .ok_or(RangeError::InsufficientData("projected ADR high"))?,
            projected_adr_low: self
                .projected_adr_low
                .ok_or(RangeError::InsufficientData("projected ADR low"))?,
            todays_high: self.todays_high.ok_or(RangeError::InsufficientData("today's high"))?,
            todays_low: self.todays_low.ok_or(RangeError::InsufficientData("today's low"))?,
        })
    }

    /// Replace the visual range with a fresh computation. On error the range is dropped
    /// so frames are skipped instead of drawn against a stale scale.
    pub fn recompute_range(&mut self) -> Result<VisualRange, RangeError> {
        let result = self.range_input().and_then(|input| VisualRangeCalculator::compute(&input));
        self.visual_range = result.as_ref().ok().copied();
        result
    }

    pub fn visual_high(&self) -> Option<f64> {
        self.visual_range.map(|r| r.high)
    }

    pub fn visual_low(&self) -> Option<f64> {
        self.visual_range.map(|r| r.low)
    }

    pub fn target_range_fraction(&self) -> RangeFraction {
        self.visual_range.map(|r| r.fraction).unwrap_or_default()
    }

    pub fn adr_range(&self) -> Option<f64> {
        match (self.projected_adr_high, self.projected_adr_low) {
            (Some(h), Some(l)) if h > l => Some(h - l),
            _ => None,
        }
    }
}

/// One floating canvas
#[derive(Debug, Clone)]
pub struct Display {
    pub id: DisplayId,
    pub symbol: Symbol,
    pub position: Position,
    pub size: Size,
    pub z_index: u32,
    pub config: DisplayConfig,
    pub state: DisplayState,
    pub ready: bool,
    pub status: DisplayStatus,
}

impl Display {
    pub fn new(id: DisplayId, symbol: Symbol, position: Position, size: Size, z_index: u32) -> Self {
        Self {
            id,
            symbol,
            position,
            size,
            z_index,
            config: DisplayConfig::default(),
            state: DisplayState::default(),
            ready: false,
            status: DisplayStatus::Loading,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Recompute the range and refresh the `ready` flag.
    pub(crate) fn refresh_range(&mut self) -> Result<VisualRange, RangeError> {
        let result = self.state.recompute_range();
        self.ready = result.is_ok();
        if self.ready && self.status == DisplayStatus::Loading {
            self.status = DisplayStatus::Ready;
        }
        result
    }
}
