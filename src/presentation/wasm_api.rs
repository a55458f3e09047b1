use leptos::SignalUpdate;
use wasm_bindgen::prelude::*;

use crate::application::with_workspace;
use crate::domain::display::{DisplayId, Position, WorkspaceLayout};
use crate::domain::errors::{AppError, PresentationError};
use crate::domain::interaction::InteractionSettings;
use crate::domain::market::{DaySnapshot, MarketEvent, Symbol, Tick};
use crate::global_state::{bump_layout, display_ids};
use crate::presentation::host;

/// JavaScript entry point to the floating price displays.
///
/// Display ids cross the boundary as plain numbers. Layouts, settings and
/// snapshots cross as JSON strings.
#[wasm_bindgen]
#[derive(Default)]
pub struct WorkspaceApi;

fn display_id(raw: f64) -> Result<DisplayId, JsValue> {
    if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 {
        Ok(DisplayId::from(raw as u64))
    } else {
        Err(AppError::from(PresentationError::InvalidArgument(format!("bad display id {}", raw))).into())
    }
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| AppError::from(PresentationError::from(e)).into())
}

fn symbol(raw: &str) -> Result<Symbol, JsValue> {
    Symbol::new(raw).map_err(|e| AppError::from(crate::domain::errors::DomainError::from(e)).into())
}

#[wasm_bindgen]
impl WorkspaceApi {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        host::start_pipeline();
        Self
    }

    /// Open a display for `symbol`; cascades when no position is given.
    #[wasm_bindgen(js_name = addDisplay)]
    pub fn add_display(&self, symbol: &str, x: Option<f64>, y: Option<f64>) -> Result<f64, JsValue> {
        let position = x.zip(y).map(|(x, y)| Position::new(x, y));
        let id = with_workspace(|ws| ws.add_display(symbol, position)).map_err(AppError::from)?;
        display_ids().update(|ids| ids.push(id));
        Ok(id.value() as f64)
    }

    #[wasm_bindgen(js_name = closeDisplay)]
    pub fn close_display(&self, id: f64) -> Result<(), JsValue> {
        let id = display_id(id)?;
        let directive = with_workspace(|ws| ws.close_display(id)).map_err(AppError::from)?;
        host::apply_directive(directive);
        display_ids().update(|ids| ids.retain(|other| *other != id));
        Ok(())
    }

    /// Queue a `MarketEvent` JSON (`{"type":"snapshot"|"tick", ...}`).
    #[wasm_bindgen(js_name = pushEvent)]
    pub fn push_event(&self, json: &str) -> Result<bool, JsValue> {
        let event: MarketEvent = parse(json)?;
        Ok(host::push_event(event))
    }

    #[wasm_bindgen(js_name = pushSnapshot)]
    pub fn push_snapshot(&self, symbol_name: &str, snapshot_json: &str) -> Result<bool, JsValue> {
        let snapshot: DaySnapshot = parse(snapshot_json)?;
        Ok(host::push_event(MarketEvent::Snapshot { symbol: symbol(symbol_name)?, snapshot }))
    }

    #[wasm_bindgen(js_name = pushTick)]
    pub fn push_tick(&self, symbol_name: &str, price: f64, timestamp: f64) -> Result<bool, JsValue> {
        let tick = Tick::new(price, timestamp.max(0.0) as u64);
        Ok(host::push_event(MarketEvent::Tick { symbol: symbol(symbol_name)?, tick }))
    }

    #[wasm_bindgen(js_name = exportLayout)]
    pub fn export_layout(&self) -> Result<String, JsValue> {
        let layout = with_workspace(|ws| ws.export_layout());
        serde_json::to_string(&layout).map_err(|e| AppError::from(PresentationError::from(e)).into())
    }

    /// Restore a layout; returns the ids that were actually added.
    #[wasm_bindgen(js_name = restoreLayout)]
    pub fn restore_layout(&self, json: &str) -> Result<Vec<f64>, JsValue> {
        let layout: WorkspaceLayout = parse(json)?;
        let restored = with_workspace(|ws| ws.restore_layout(layout));
        display_ids().update(|ids| ids.extend(restored.iter().copied()));
        bump_layout();
        Ok(restored.iter().map(|id| id.value() as f64).collect())
    }

    #[wasm_bindgen(js_name = setInteractionSettings)]
    pub fn set_interaction_settings(&self, json: &str) -> Result<(), JsValue> {
        let settings: InteractionSettings = parse(json)?;
        with_workspace(|ws| ws.set_interaction_settings(settings));
        Ok(())
    }

    #[wasm_bindgen(js_name = markerPrices)]
    pub fn marker_prices(&self) -> Vec<f64> {
        with_workspace(|ws| ws.markers().prices())
    }

    #[wasm_bindgen(js_name = clearMarkers)]
    pub fn clear_markers(&self) {
        with_workspace(|ws| ws.clear_markers());
    }

    /// Renderer statistics of one display as JSON.
    #[wasm_bindgen(js_name = performanceInfo)]
    pub fn performance_info(&self, id: f64) -> Result<Option<String>, JsValue> {
        let id = display_id(id)?;
        Ok(with_workspace(|ws| ws.performance_info(id)))
    }
}
