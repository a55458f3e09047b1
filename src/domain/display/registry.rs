//! Owner of every live display.
//!
//! Position and size are written only by the interaction manager (and by layout
//! restore, which re-validates); market state only by the data pipeline entry
//! points `apply_snapshot` / `apply_tick`.

use std::collections::HashMap;

use super::entities::{Display, DisplayStatus};
use super::value_objects::{
    DEFAULT_DISPLAY_SIZE, DisplayConfig, DisplayId, Position, Rect, Size, SizeBounds,
};
use crate::domain::errors::{DomainError, RangeError, RegistryError, ValidationError};
use crate::domain::logging::LogComponent;
use crate::domain::market::{DaySnapshot, Symbol, Tick};
use crate::{log_debug, log_warn};

/// Where the first display lands and how far each next one is offset.
const CASCADE_ORIGIN: Position = Position { x: 40.0, y: 40.0 };
const CASCADE_STEP: f64 = 24.0;
const CASCADE_WRAP: usize = 10;

/// Last known market data per symbol, used to seed newly added displays.
#[derive(Debug, Clone, Default)]
struct SymbolFeed {
    snapshot: Option<DaySnapshot>,
    last_tick: Option<Tick>,
}

pub struct DisplayRegistry {
    displays: Vec<Display>,
    feeds: HashMap<Symbol, SymbolFeed>,
    bounds: SizeBounds,
    next_id: u64,
    next_z: u32,
}

impl Default for DisplayRegistry {
    fn default() -> Self {
        Self::new(SizeBounds::default())
    }
}

impl DisplayRegistry {
    pub fn new(bounds: SizeBounds) -> Self {
        Self { displays: Vec::new(), feeds: HashMap::new(), bounds, next_id: 1, next_z: 1 }
    }

    pub fn bounds(&self) -> SizeBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.displays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    pub fn get(&self, id: DisplayId) -> Option<&Display> {
        self.displays.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: DisplayId) -> Option<&mut Display> {
        self.displays.iter_mut().find(|d| d.id == id)
    }

    pub fn contains(&self, id: DisplayId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Display> {
        self.displays.iter()
    }

    pub fn ids(&self) -> Vec<DisplayId> {
        self.displays.iter().map(|d| d.id).collect()
    }

    /// Displays back to front.
    pub fn iter_by_z(&self) -> Vec<&Display> {
        let mut ordered: Vec<&Display> = self.displays.iter().collect();
        ordered.sort_by_key(|d| d.z_index);
        ordered
    }

    /// Bounding boxes of every display except `id`.
    pub fn rects_except(&self, id: DisplayId) -> Vec<Rect> {
        self.displays.iter().filter(|d| d.id != id).map(Display::rect).collect()
    }

    /// Topmost display under a viewport point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<DisplayId> {
        self.displays
            .iter()
            .filter(|d| d.rect().contains_point(x, y))
            .max_by_key(|d| d.z_index)
            .map(|d| d.id)
    }

    /// Create a display for `symbol`. Without an explicit position displays cascade
    /// from the top-left corner.
    pub fn add_display(&mut self, symbol: Symbol, position: Option<Position>) -> DisplayId {
        let id = DisplayId::from(self.next_id);
        self.next_id += 1;

        let position = position.map(Position::sanitized).unwrap_or_else(|| {
            let step = (self.displays.len() % CASCADE_WRAP) as f64 * CASCADE_STEP;
            CASCADE_ORIGIN.offset(step, step)
        });
        let size = self.bounds.clamp(DEFAULT_DISPLAY_SIZE);
        let z = self.take_z();

        let mut display = Display::new(id, symbol.clone(), position, size, z);
        self.seed_from_feed(&mut display);
        self.displays.push(display);

        log_debug!(LogComponent::Domain("DisplayRegistry"), "added {} for {}", id, symbol);
        id
    }

    /// Insert a fully specified display, e.g. from a restored layout.
    pub(crate) fn insert_restored(
        &mut self,
        id: DisplayId,
        symbol: Symbol,
        position: Position,
        size: Size,
        z_index: u32,
        config: DisplayConfig,
    ) -> Result<(), RegistryError> {
        if self.contains(id) {
            return Err(RegistryError::DuplicateDisplay(id));
        }
        let mut display =
            Display::new(id, symbol, position.sanitized(), self.bounds.clamp(size), z_index);
        display.config = config.sanitized();
        self.seed_from_feed(&mut display);
        self.displays.push(display);
        self.next_id = self.next_id.max(id.value() + 1);
        self.next_z = self.next_z.max(z_index + 1);
        Ok(())
    }

    pub fn close_display(&mut self, id: DisplayId) -> Result<Display, RegistryError> {
        let idx = self
            .displays
            .iter()
            .position(|d| d.id == id)
            .ok_or(RegistryError::DisplayNotFound(id))?;
        let removed = self.displays.remove(idx);
        log_debug!(LogComponent::Domain("DisplayRegistry"), "closed {}", id);
        Ok(removed)
    }

    pub fn bring_to_front(&mut self, id: DisplayId) {
        let top = self.displays.iter().map(|d| d.z_index).max().unwrap_or(0);
        let needs_raise = self.get(id).is_some_and(|d| d.z_index < top);
        if needs_raise {
            let z = self.take_z();
            if let Some(display) = self.get_mut(id) {
                display.z_index = z;
            }
        }
    }

    fn take_z(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Geometry commit from the interaction manager.
    pub(crate) fn commit_position(&mut self, id: DisplayId, position: Position) -> bool {
        match self.get_mut(id) {
            Some(display) => {
                display.position = position.sanitized();
                true
            }
            None => false,
        }
    }

    /// Resize commit from the interaction manager; size is clamped to bounds.
    pub(crate) fn commit_resize(&mut self, id: DisplayId, position: Position, size: Size) -> bool {
        let bounds = self.bounds;
        match self.get_mut(id) {
            Some(display) => {
                display.position = position.sanitized();
                display.size = bounds.clamp(size);
                true
            }
            None => false,
        }
    }

    /// Settings-panel entry point.
    pub fn update_config(&mut self, id: DisplayId, config: DisplayConfig) -> Result<(), DomainError> {
        let display = self.get_mut(id).ok_or(RegistryError::DisplayNotFound(id))?;
        display.config = config.sanitized();
        Ok(())
    }

    pub(crate) fn set_status(&mut self, id: DisplayId, status: DisplayStatus) {
        if let Some(display) = self.get_mut(id) {
            display.status = status;
        }
    }

    /// Feed a day snapshot to every display of `symbol`. Returns how many were updated.
    pub fn apply_snapshot(&mut self, symbol: &Symbol, snapshot: DaySnapshot) -> Result<usize, DomainError> {
        snapshot.validate()?;
        self.feeds.entry(symbol.clone()).or_default().snapshot = Some(snapshot);

        let mut updated = 0;
        for display in self.displays.iter_mut().filter(|d| &d.symbol == symbol) {
            display.state.apply_snapshot(&snapshot);
            refresh_logged(display, "snapshot");
            updated += 1;
        }
        Ok(updated)
    }

    /// Feed a live tick to every display of `symbol`. Returns how many were updated.
    pub fn apply_tick(&mut self, symbol: &Symbol, tick: Tick) -> Result<usize, DomainError> {
        if !tick.current_price.is_finite() {
            return Err(ValidationError::InvalidPrice(format!(
                "non-finite tick for {}",
                symbol
            ))
            .into());
        }
        self.feeds.entry(symbol.clone()).or_default().last_tick = Some(tick);

        let mut updated = 0;
        for display in self.displays.iter_mut().filter(|d| &d.symbol == symbol) {
            display.state.apply_tick(&tick);
            refresh_logged(display, "tick");
            updated += 1;
        }
        Ok(updated)
    }

    fn seed_from_feed(&self, display: &mut Display) {
        let Some(feed) = self.feeds.get(&display.symbol) else {
            return;
        };
        if let Some(snapshot) = &feed.snapshot {
            display.state.apply_snapshot(snapshot);
        }
        if let Some(tick) = &feed.last_tick {
            display.state.apply_tick(tick);
        }
        refresh_logged(display, "seed");
    }
}

/// Recompute the visual range; a display still waiting for its first snapshot
/// or tick is expected, an inconsistent range is not.
fn refresh_logged(display: &mut Display, cause: &str) {
    match display.refresh_range() {
        Ok(_) => {}
        Err(RangeError::InsufficientData(_missing)) => {
            log_debug!(
                LogComponent::Domain("DisplayRegistry"),
                "{} waiting for {} after {}",
                display.id,
                _missing,
                cause
            );
        }
        Err(e) => {
            log_warn!(
                LogComponent::Domain("DisplayRegistry"),
                "{} has no visual range after {}: {}",
                display.id,
                cause,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_offsets_new_displays() {
        let mut registry = DisplayRegistry::default();
        let a = registry.add_display(Symbol::from("eurusd"), None);
        let b = registry.add_display(Symbol::from("gbpusd"), None);
        let pa = registry.get(a).unwrap().position;
        let pb = registry.get(b).unwrap().position;
        assert_eq!(pb.x - pa.x, CASCADE_STEP);
        assert_eq!(pb.y - pa.y, CASCADE_STEP);
    }

    #[test]
    fn bring_to_front_raises_z() {
        let mut registry = DisplayRegistry::default();
        let a = registry.add_display(Symbol::from("A"), None);
        let b = registry.add_display(Symbol::from("B"), None);
        registry.bring_to_front(a);
        assert!(registry.get(a).unwrap().z_index > registry.get(b).unwrap().z_index);
        assert_eq!(registry.hit_test(100.0, 100.0), Some(a));
    }
}
