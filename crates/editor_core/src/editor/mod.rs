//! Editor-side tooling built on top of the scene core

pub mod selection;

pub use selection::{SelectionChangedEvent, SelectionManager};
