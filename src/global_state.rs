use crate::domain::display::DisplayId;
use leptos::*;
use once_cell::sync::OnceCell;

/// Reactive mirrors of workspace state for the Leptos views.
pub struct Globals {
    /// Open displays in creation order.
    pub display_ids: RwSignal<Vec<DisplayId>>,
    /// Bumped whenever a display's position, size or z-index changes.
    pub layout_version: RwSignal<u64>,
    pub status_line: RwSignal<String>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        display_ids: create_rw_signal(Vec::new()),
        layout_version: create_rw_signal(0),
        status_line: create_rw_signal(String::new()),
    })
}

pub fn display_ids() -> RwSignal<Vec<DisplayId>> {
    globals().display_ids
}

pub fn layout_version() -> RwSignal<u64> {
    globals().layout_version
}

pub fn status_line() -> RwSignal<String> {
    globals().status_line
}

pub fn bump_layout() {
    layout_version().update(|v| *v = v.wrapping_add(1));
}
