pub mod manager;
pub mod placement;
pub mod state;

pub use manager::*;
pub use state::*;
