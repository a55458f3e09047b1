use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::domain::display::{DisplayId, Position, Rect, Size, SizeBounds};

/// Primary mouse button / touch contact / pen tip.
pub const PRIMARY_BUTTON: i16 = 0;

/// One of the eight resize grips around a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub fn moves_north(self) -> bool {
        matches!(self, Self::N | Self::Nw | Self::Ne)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::S | Self::Sw | Self::Se)
    }

    pub fn moves_west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// CSS cursor shown while hovering the grip.
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Raw pointer event fields, in viewport (client) pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub client_x: f64,
    pub client_y: f64,
    pub button: i16,
    pub pointer_id: i32,
}

impl PointerInput {
    pub fn new(client_x: f64, client_y: f64, button: i16, pointer_id: i32) -> Self {
        Self { client_x, client_y, button, pointer_id }
    }

    /// Primary-button input with pointer id 1.
    pub fn primary(client_x: f64, client_y: f64) -> Self {
        Self::new(client_x, client_y, PRIMARY_BUTTON, 1)
    }

    pub fn is_finite(&self) -> bool {
        self.client_x.is_finite() && self.client_y.is_finite()
    }

    pub fn is_primary(&self) -> bool {
        self.button == PRIMARY_BUTTON
    }

    pub fn point(&self) -> Position {
        Position::new(self.client_x, self.client_y)
    }
}

/// What part of a display a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Surface,
    Handle(ResizeHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

impl From<PointerTarget> for GestureKind {
    fn from(target: PointerTarget) -> Self {
        match target {
            PointerTarget::Surface => GestureKind::Drag,
            PointerTarget::Handle(_) => GestureKind::Resize,
        }
    }
}

/// One in-flight gesture. All moves are computed from the `start_*` snapshot,
/// never from the previous move, so float error cannot accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSession {
    pub target_id: DisplayId,
    pub handle: Option<ResizeHandle>,
    pub start_pointer: Position,
    pub start_position: Position,
    pub start_size: Size,
    pub pointer_id: i32,
    /// Geometry most recently written to the registry.
    pub last_committed: Rect,
}

impl InteractionSession {
    pub fn start_rect(&self) -> Rect {
        Rect::new(self.start_position, self.start_size)
    }

    pub fn kind(&self) -> GestureKind {
        if self.handle.is_some() { GestureKind::Resize } else { GestureKind::Drag }
    }
}

/// The single system-wide gesture slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(InteractionSession),
    Resizing(InteractionSession),
}

impl InteractionState {
    pub fn session(&self) -> Option<&InteractionSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(s) | Self::Resizing(s) => Some(s),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut InteractionSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(s) | Self::Resizing(s) => Some(s),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_resizing(&self, id: DisplayId) -> bool {
        matches!(self, Self::Resizing(s) if s.target_id == id)
    }

    pub fn active_target(&self) -> Option<DisplayId> {
        self.session().map(|s| s.target_id)
    }
}

/// Tunables for drag/resize behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Cell size in px; `None` disables snapping.
    pub grid_snap: Option<f64>,
    pub collision_avoidance: bool,
    /// Minimum spacing kept between displays when avoiding collisions.
    pub collision_gap: f64,
    /// Pixels of a display that must stay inside the viewport on each axis.
    pub min_visible_margin: f64,
    pub size_bounds: SizeBounds,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            grid_snap: None,
            collision_avoidance: false,
            collision_gap: 4.0,
            min_visible_margin: 40.0,
            size_bounds: SizeBounds::default(),
        }
    }
}
