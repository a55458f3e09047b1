//! Process-wide coordinator tying the registry, the marker set, the
//! interaction manager and one render loop per display together.
//!
//! Every public method corresponds to one host event (pointer, click, data,
//! frame) and leaves the workspace consistent when it returns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::display::{
    Display, DisplayConfig, DisplayId, DisplayRegistry, DisplayStatus, MarkerSet, MarkerToggle,
    Position, ViewportBounds, WorkspaceLayout,
};
use crate::domain::errors::{DomainError, RegistryError};
use crate::domain::geometry::CoordinateTransform;
use crate::domain::interaction::{
    Commit, InteractionManager, InteractionSettings, ListenerDirective, PointerDownResult,
    PointerInput, PointerTarget,
};
use crate::domain::logging::LogComponent;
use crate::domain::market::{MarketEvent, PriceScale, Symbol};
use crate::infrastructure::rendering::{DrawingContext, FrameOutcome, FrameRequest, RenderLoop};
use crate::{log_info, log_warn};

/// Pointer travel below which a press-release counts as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    pub interaction: InteractionSettings,
    pub viewport: ViewportBounds,
    /// Marker hit tolerance in CSS px, converted to price per display.
    pub marker_hit_tolerance_px: f64,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            interaction: InteractionSettings::default(),
            viewport: ViewportBounds::default(),
            marker_hit_tolerance_px: 4.0,
        }
    }
}

#[derive(Debug, Default)]
struct DisplayRuntime {
    render_loop: RenderLoop,
    hover_y: Option<f64>,
}

pub struct Workspace {
    registry: DisplayRegistry,
    markers: MarkerSet,
    interaction: InteractionManager,
    runtimes: HashMap<DisplayId, DisplayRuntime>,
    settings: WorkspaceSettings,
    press_origin: Option<Position>,
    suppress_click: bool,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceSettings::default())
    }
}

impl Workspace {
    pub fn new(settings: WorkspaceSettings) -> Self {
        Self {
            registry: DisplayRegistry::new(settings.interaction.size_bounds),
            markers: MarkerSet::new(),
            interaction: InteractionManager::new(settings.interaction, settings.viewport),
            runtimes: HashMap::new(),
            settings,
            press_origin: None,
            suppress_click: false,
        }
    }

    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn interaction(&self) -> &InteractionManager {
        &self.interaction
    }

    pub fn settings(&self) -> &WorkspaceSettings {
        &self.settings
    }

    pub fn display(&self, id: DisplayId) -> Option<&Display> {
        self.registry.get(id)
    }

    pub fn add_display(&mut self, symbol: &str, position: Option<Position>) -> Result<DisplayId, DomainError> {
        let symbol = Symbol::new(symbol)?;
        let id = self.registry.add_display(symbol, position);
        self.runtimes.insert(id, DisplayRuntime::default());
        log_info!(LogComponent::Application("Workspace"), "added {}", id);
        Ok(id)
    }

    /// Close a display. A live gesture on it ends; the directive says whether
    /// the host must detach its listeners.
    pub fn close_display(&mut self, id: DisplayId) -> Result<ListenerDirective, DomainError> {
        self.registry.close_display(id)?;
        if let Some(mut runtime) = self.runtimes.remove(&id) {
            runtime.render_loop.cancel();
        }
        Ok(self.interaction.forget_display(id))
    }

    pub fn update_config(&mut self, id: DisplayId, config: DisplayConfig) -> Result<(), DomainError> {
        self.registry.update_config(id, config)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let viewport = ViewportBounds::new(width, height);
        self.settings.viewport = viewport;
        self.interaction.set_viewport(viewport);
    }

    pub fn set_interaction_settings(&mut self, settings: InteractionSettings) {
        self.settings.interaction = settings;
        self.interaction.set_settings(settings);
    }

    pub fn pointer_down(&mut self, id: DisplayId, target: PointerTarget, input: PointerInput) -> PointerDownResult {
        let result = self.interaction.pointer_down(&mut self.registry, id, target, input);
        if self.interaction.state().active_target() == Some(id) {
            self.press_origin = Some(input.point());
            self.suppress_click = false;
        }
        result
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> Option<Commit> {
        self.interaction.pointer_move(&mut self.registry, input)
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> ListenerDirective {
        let ending = self.interaction.state().session().copied();
        let directive = self.interaction.pointer_up(input);
        if let Some(session) = ending.filter(|_| self.interaction.state().is_idle()) {
            if let Some(origin) = self.press_origin.take() {
                self.suppress_click = origin.distance_to(input.point()) > CLICK_SLOP_PX;
            }
            self.settle_after_gesture(session.target_id);
        }
        directive
    }

    pub fn pointer_cancel(&mut self, input: PointerInput) -> ListenerDirective {
        let ending = self.interaction.state().active_target();
        let directive = self.interaction.pointer_cancel(input);
        self.finish_aborted(ending);
        directive
    }

    pub fn lost_capture(&mut self, input: PointerInput) -> ListenerDirective {
        let ending = self.interaction.state().active_target();
        let directive = self.interaction.lost_capture(input);
        self.finish_aborted(ending);
        directive
    }

    fn finish_aborted(&mut self, ending: Option<DisplayId>) {
        if let Some(id) = ending.filter(|_| self.interaction.state().is_idle()) {
            self.press_origin = None;
            self.suppress_click = true;
            self.settle_after_gesture(id);
        }
    }

    fn settle_after_gesture(&mut self, id: DisplayId) {
        if let (Some(display), Some(runtime)) = (self.registry.get(id), self.runtimes.get_mut(&id)) {
            runtime.render_loop.flush_resize(display);
        }
    }

    /// Click on a display's canvas at `canvas_y` (CSS px from its top): toggles
    /// the marker nearest that price, or adds one.
    pub fn canvas_click(&mut self, id: DisplayId, canvas_y: f64) -> Result<MarkerToggle, DomainError> {
        if std::mem::take(&mut self.suppress_click) {
            return Ok(MarkerToggle::Ignored);
        }
        let display = self.registry.get(id).ok_or(RegistryError::DisplayNotFound(id))?;
        let Some(scale) = Self::scale_for(display) else {
            return Ok(MarkerToggle::Ignored);
        };
        if !canvas_y.is_finite() {
            return Ok(MarkerToggle::Ignored);
        }
        let price = scale.y_to_price(canvas_y);
        let tolerance = scale.price_for_pixels(self.settings.marker_hit_tolerance_px);
        Ok(self.markers.toggle_at(price, tolerance))
    }

    fn scale_for(display: &Display) -> Option<PriceScale> {
        let range = display.state.visual_range?;
        let geometry = CoordinateTransform::scale(&display.config, display.size.width, display.size.height);
        PriceScale::new(&range, geometry.content_height)
    }

    pub fn set_hover(&mut self, id: DisplayId, canvas_y: Option<f64>) {
        if let Some(runtime) = self.runtimes.get_mut(&id) {
            runtime.hover_y = canvas_y.filter(|y| y.is_finite());
        }
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    /// Route one market event to every display of its symbol.
    pub fn apply_event(&mut self, event: MarketEvent) -> Result<usize, DomainError> {
        match event {
            MarketEvent::Snapshot { symbol, snapshot } => self.registry.apply_snapshot(&symbol, snapshot),
            MarketEvent::Tick { symbol, tick } => self.registry.apply_tick(&symbol, tick),
        }
    }

    /// Render one frame of `id` into `ctx`. `None` for unknown displays.
    pub fn render_frame(
        &mut self,
        id: DisplayId,
        ctx: &mut dyn DrawingContext,
        now_ms: f64,
        device_pixel_ratio: f64,
    ) -> Option<FrameOutcome> {
        let display = self.registry.get(id)?;
        let runtime = self.runtimes.get_mut(&id)?;
        let markers = self.markers.prices();
        let request = FrameRequest {
            display,
            markers: &markers,
            hover_y: runtime.hover_y,
            device_pixel_ratio,
            resizing: self.interaction.is_resizing(id),
        };
        Some(runtime.render_loop.frame(ctx, request, now_ms))
    }

    /// Mark a display whose canvas could not be acquired.
    pub fn mark_canvas_failed(&mut self, id: DisplayId, attempts: u32, reason: String) {
        log_warn!(
            LogComponent::Application("Workspace"),
            "{} unusable after {} attempts: {}",
            id,
            attempts,
            reason
        );
        self.registry.set_status(id, DisplayStatus::Error { attempts, reason });
    }

    pub fn export_layout(&self) -> WorkspaceLayout {
        WorkspaceLayout::capture(&self.registry, &self.markers)
    }

    /// Restore displays and markers; existing ids are kept and not duplicated.
    pub fn restore_layout(&mut self, layout: WorkspaceLayout) -> Vec<DisplayId> {
        let restored = layout.restore_into(&mut self.registry, &mut self.markers);
        for id in &restored {
            self.runtimes.entry(*id).or_default();
        }
        restored
    }

    pub fn performance_info(&self, id: DisplayId) -> Option<String> {
        self.runtimes.get(&id).map(|r| r.render_loop.performance_info())
    }
}
