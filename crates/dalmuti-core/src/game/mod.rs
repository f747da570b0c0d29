pub mod selection;
pub mod snapshot;
pub mod state;
