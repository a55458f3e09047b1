//! The single authority over pointer-driven drag and resize gestures.
//!
//! Hosts forward raw pointer events here and act on the returned
//! [`ListenerDirective`]s; the manager never touches the DOM itself. Document
//! listeners are installed once when a session starts and removed once when it
//! ends, never from inside the pointer-down that started them.

use super::placement::{avoid_collisions, clamp_to_viewport, resize_rect, snap_to_grid};
use super::state::{
    GestureKind, InteractionSession, InteractionSettings, InteractionState, PointerInput,
    PointerTarget,
};
use crate::domain::display::{DisplayId, DisplayRegistry, Position, Rect, Size, ViewportBounds};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_trace};

/// What the host must do with its document-level pointer listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerDirective {
    /// Attach move/up/cancel listeners now.
    Install,
    /// Listeners are already attached for the live session.
    Keep,
    /// Detach them; the session has ended.
    Remove,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Started,
    /// Same target, different gesture kind: the session was replaced in place.
    Superseded,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDownResult {
    pub outcome: InteractionOutcome,
    pub directive: ListenerDirective,
}

impl PointerDownResult {
    fn ignored(directive: ListenerDirective) -> Self {
        Self { outcome: InteractionOutcome::Ignored, directive }
    }
}

/// Geometry written to the registry by a pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Commit {
    Moved { id: DisplayId, position: Position },
    Resized { id: DisplayId, position: Position, size: Size },
}

impl Commit {
    pub fn id(&self) -> DisplayId {
        match *self {
            Commit::Moved { id, .. } | Commit::Resized { id, .. } => id,
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum EndReason {
    #[display(fmt = "pointer-up")]
    PointerUp,
    #[display(fmt = "pointer-cancel")]
    PointerCancel,
    #[display(fmt = "lost-capture")]
    LostCapture,
    #[display(fmt = "target-closed")]
    TargetClosed,
}

#[derive(Debug, Default)]
pub struct InteractionManager {
    state: InteractionState,
    settings: InteractionSettings,
    viewport: ViewportBounds,
    listeners_attached: bool,
    installs: u32,
    removals: u32,
}

impl InteractionManager {
    pub fn new(settings: InteractionSettings, viewport: ViewportBounds) -> Self {
        Self { settings, viewport, ..Self::default() }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: InteractionSettings) {
        self.settings = settings;
    }

    pub fn viewport(&self) -> ViewportBounds {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportBounds) {
        self.viewport = viewport;
    }

    pub fn listener_installs(&self) -> u32 {
        self.installs
    }

    pub fn listener_removals(&self) -> u32 {
        self.removals
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    pub fn is_resizing(&self, id: DisplayId) -> bool {
        self.state.is_resizing(id)
    }

    /// Begin (or supersede) a gesture on `id`.
    pub fn pointer_down(
        &mut self,
        registry: &mut DisplayRegistry,
        id: DisplayId,
        target: PointerTarget,
        input: PointerInput,
    ) -> PointerDownResult {
        let held = self.held_directive();
        if !input.is_finite() || !input.is_primary() {
            return PointerDownResult::ignored(held);
        }
        let Some(display) = registry.get(id) else {
            return PointerDownResult::ignored(held);
        };

        let outcome = match self.state.session() {
            None => InteractionOutcome::Started,
            Some(live) if live.target_id != id => {
                log_trace!(
                    LogComponent::Domain("InteractionManager"),
                    "ignoring pointer-down on {} while {} is active",
                    id,
                    live.target_id
                );
                return PointerDownResult::ignored(held);
            }
            Some(live) if live.kind() == GestureKind::from(target) => {
                return PointerDownResult::ignored(held);
            }
            Some(_) => InteractionOutcome::Superseded,
        };

        let rect = display.rect();
        let session = InteractionSession {
            target_id: id,
            handle: match target {
                PointerTarget::Handle(h) => Some(h),
                PointerTarget::Surface => None,
            },
            start_pointer: input.point(),
            start_position: rect.position(),
            start_size: display.size,
            pointer_id: input.pointer_id,
            last_committed: rect,
        };
        self.state = match target {
            PointerTarget::Surface => InteractionState::Dragging(session),
            PointerTarget::Handle(_) => InteractionState::Resizing(session),
        };
        registry.bring_to_front(id);

        let directive = if self.listeners_attached {
            ListenerDirective::Keep
        } else {
            self.listeners_attached = true;
            self.installs += 1;
            ListenerDirective::Install
        };
        log_debug!(
            LogComponent::Domain("InteractionManager"),
            "{:?} {:?} on {}",
            outcome,
            session.kind(),
            id
        );
        PointerDownResult { outcome, directive }
    }

    /// Compute and commit the geometry for a pointer move.
    pub fn pointer_move(&mut self, registry: &mut DisplayRegistry, input: PointerInput) -> Option<Commit> {
        if !input.is_finite() {
            return None;
        }
        let settings = self.settings;
        let viewport = self.viewport;
        let (session, resizing) = match &mut self.state {
            InteractionState::Idle => return None,
            InteractionState::Dragging(s) => (s, false),
            InteractionState::Resizing(s) => (s, true),
        };
        if input.pointer_id != session.pointer_id {
            return None;
        }

        let dx = input.client_x - session.start_pointer.x;
        let dy = input.client_y - session.start_pointer.y;
        let id = session.target_id;

        let commit = if resizing {
            let handle = session.handle?;
            let resized = resize_rect(
                session.start_rect(),
                handle,
                dx,
                dy,
                &settings.size_bounds,
                viewport,
                settings.min_visible_margin,
            );
            let position = resized.position();
            let size = Size::new(resized.width, resized.height);
            if !registry.commit_resize(id, position, size) {
                return None;
            }
            session.last_committed = Rect::new(position, size);
            Commit::Resized { id, position, size }
        } else {
            let moved = snap_to_grid(session.start_position.offset(dx, dy), settings.grid_snap);
            let candidate = Rect::new(moved, session.start_size);
            let resolved = if settings.collision_avoidance {
                let others = registry.rects_except(id);
                avoid_collisions(
                    candidate,
                    &others,
                    settings.collision_gap,
                    viewport,
                    settings.min_visible_margin,
                )
                .unwrap_or(session.last_committed.position())
            } else {
                moved
            };
            let position = clamp_to_viewport(
                Rect::new(resolved, session.start_size),
                viewport,
                settings.min_visible_margin,
            );
            if !registry.commit_position(id, position) {
                return None;
            }
            session.last_committed = Rect::new(position, session.start_size);
            Commit::Moved { id, position }
        };
        Some(commit)
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> ListenerDirective {
        self.end_for(input, EndReason::PointerUp)
    }

    pub fn pointer_cancel(&mut self, input: PointerInput) -> ListenerDirective {
        self.end_for(input, EndReason::PointerCancel)
    }

    pub fn lost_capture(&mut self, input: PointerInput) -> ListenerDirective {
        self.end_for(input, EndReason::LostCapture)
    }

    /// End the session only if `input` comes from the pointer that owns it.
    fn end_for(&mut self, input: PointerInput, reason: EndReason) -> ListenerDirective {
        match self.state.session() {
            Some(s) if s.pointer_id == input.pointer_id => self.end(reason),
            _ => self.held_directive(),
        }
    }

    /// End the session if it targets a display that is being closed.
    pub fn forget_display(&mut self, id: DisplayId) -> ListenerDirective {
        if self.state.active_target() == Some(id) {
            self.end(EndReason::TargetClosed)
        } else {
            self.held_directive()
        }
    }

    /// Return to `Idle`. Committed geometry is left exactly as last written.
    fn end(&mut self, reason: EndReason) -> ListenerDirective {
        let previous = std::mem::take(&mut self.state);
        if let Some(session) = previous.session() {
            log_debug!(
                LogComponent::Domain("InteractionManager"),
                "session on {} ended ({})",
                session.target_id,
                reason
            );
        }
        if self.listeners_attached {
            self.listeners_attached = false;
            self.removals += 1;
            ListenerDirective::Remove
        } else {
            ListenerDirective::None
        }
    }

    fn held_directive(&self) -> ListenerDirective {
        if self.listeners_attached { ListenerDirective::Keep } else { ListenerDirective::None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interaction::ResizeHandle;
    use crate::domain::market::Symbol;

    fn setup() -> (InteractionManager, DisplayRegistry, DisplayId) {
        let mut registry = DisplayRegistry::default();
        let id = registry.add_display(Symbol::from("EURUSD"), Some(Position::new(100.0, 100.0)));
        (InteractionManager::default(), registry, id)
    }

    #[test]
    fn drag_follows_raw_delta() {
        let (mut manager, mut registry, id) = setup();
        manager.pointer_down(&mut registry, id, PointerTarget::Surface, PointerInput::primary(150.0, 150.0));
        let commit = manager.pointer_move(&mut registry, PointerInput::primary(180.0, 170.0));
        assert_eq!(commit, Some(Commit::Moved { id, position: Position::new(130.0, 120.0) }));
    }

    #[test]
    fn secondary_button_is_ignored() {
        let (mut manager, mut registry, id) = setup();
        let result =
            manager.pointer_down(&mut registry, id, PointerTarget::Surface, PointerInput::new(1.0, 1.0, 2, 1));
        assert_eq!(result.outcome, InteractionOutcome::Ignored);
        assert!(manager.state().is_idle());
    }

    #[test]
    fn handle_supersedes_drag_on_same_target() {
        let (mut manager, mut registry, id) = setup();
        manager.pointer_down(&mut registry, id, PointerTarget::Surface, PointerInput::primary(150.0, 150.0));
        let result = manager.pointer_down(
            &mut registry,
            id,
            PointerTarget::Handle(ResizeHandle::Se),
            PointerInput::primary(320.0, 220.0),
        );
        assert_eq!(result.outcome, InteractionOutcome::Superseded);
        assert_eq!(result.directive, ListenerDirective::Keep);
        assert!(manager.is_resizing(id));
        assert_eq!(manager.listener_installs(), 1);
    }

    #[test]
    fn non_finite_move_is_dropped() {
        let (mut manager, mut registry, id) = setup();
        manager.pointer_down(&mut registry, id, PointerTarget::Surface, PointerInput::primary(150.0, 150.0));
        assert!(manager.pointer_move(&mut registry, PointerInput::primary(f64::NAN, 0.0)).is_none());
        assert_eq!(registry.get(id).unwrap().position, Position::new(100.0, 100.0));
    }
}
