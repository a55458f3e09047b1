//! Serializable workspace layout. Storage itself belongs to the host page;
//! this module only exports and re-validates.

use serde::{Deserialize, Serialize};

use super::markers::MarkerSet;
use super::registry::DisplayRegistry;
use super::value_objects::{DisplayConfig, DisplayId, Position, Size};
use crate::domain::errors::RegistryError;
use crate::domain::logging::LogComponent;
use crate::domain::market::Symbol;
use crate::log_warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDisplay {
    pub id: DisplayId,
    pub symbol: Symbol,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub z_index: u32,
    #[serde(default)]
    pub config: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLayout {
    pub displays: Vec<PersistedDisplay>,
    #[serde(default)]
    pub markers: Vec<f64>,
}

impl WorkspaceLayout {
    pub fn capture(registry: &DisplayRegistry, markers: &MarkerSet) -> Self {
        let displays = registry
            .iter()
            .map(|d| PersistedDisplay {
                id: d.id,
                symbol: d.symbol.clone(),
                position: d.position,
                size: d.size,
                z_index: d.z_index,
                config: d.config.clone(),
            })
            .collect();
        Self { displays, markers: markers.prices() }
    }

    /// Load into `registry` and `markers`. Entries whose id already exists are skipped;
    /// geometry is clamped the same way freshly created displays are.
    pub fn restore_into(
        self,
        registry: &mut DisplayRegistry,
        markers: &mut MarkerSet,
    ) -> Vec<DisplayId> {
        let mut restored = Vec::with_capacity(self.displays.len());
        for entry in self.displays {
            let id = entry.id;
            match registry.insert_restored(
                id,
                entry.symbol,
                entry.position,
                entry.size,
                entry.z_index,
                entry.config,
            ) {
                Ok(()) => restored.push(id),
                Err(RegistryError::DuplicateDisplay(dup)) => {
                    log_warn!(LogComponent::Domain("Layout"), "skipping duplicate {}", dup);
                }
                Err(e) => {
                    log_warn!(LogComponent::Domain("Layout"), "skipping {}: {}", id, e);
                }
            }
        }
        for price in self.markers {
            markers.add(price);
        }
        restored
    }
}
