use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[display(fmt = "marker-{}", _0)]
pub struct MarkerId(u64);

/// User-placed price annotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerToggle {
    Added(MarkerId),
    Removed(MarkerId),
    Ignored,
}

/// Markers shared by every display of the application
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    next_id: u64,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn add(&mut self, price: f64) -> Option<MarkerId> {
        if !price.is_finite() {
            return None;
        }
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.push(Marker { id, price });
        Some(id)
    }

    pub fn remove(&mut self, id: MarkerId) -> bool {
        let before = self.markers.len();
        self.markers.retain(|m| m.id != id);
        before != self.markers.len()
    }

    /// Nearest marker within `tolerance` of `price`.
    pub fn hit_test(&self, price: f64, tolerance: f64) -> Option<MarkerId> {
        self.markers
            .iter()
            .map(|m| (m.id, (m.price - price).abs()))
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Click semantics: remove a hit marker, otherwise place a new one.
    pub fn toggle_at(&mut self, price: f64, tolerance: f64) -> MarkerToggle {
        if let Some(id) = self.hit_test(price, tolerance) {
            self.remove(id);
            return MarkerToggle::Removed(id);
        }
        match self.add(price) {
            Some(id) => MarkerToggle::Added(id),
            None => MarkerToggle::Ignored,
        }
    }

    pub fn prices(&self) -> Vec<f64> {
        self.markers.iter().map(|m| m.price).collect()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
