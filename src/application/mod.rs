pub mod data_pipeline;
pub mod workspace;

pub use data_pipeline::{MarketFeed, PipelineStats};
pub use workspace::{Workspace, WorkspaceSettings};

use std::cell::RefCell;

thread_local! {
    static WORKSPACE: RefCell<Workspace> = RefCell::new(Workspace::default());
}

/// Run `f` with the process-wide workspace borrowed mutably for one handler.
pub fn with_workspace<R>(f: impl FnOnce(&mut Workspace) -> R) -> R {
    WORKSPACE.with(|ws| f(&mut ws.borrow_mut()))
}
