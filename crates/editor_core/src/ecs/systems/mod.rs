//! Scene systems
//!
//! Systems borrow the [`Scene`](super::Scene) per call rather than owning it;
//! the editor's update loop passes them around explicitly (constructor
//! injection, no global registries).

pub mod picking_system;
pub mod transform_system;

pub use picking_system::{HitResult, PickingSystem};
pub use transform_system::TransformSystem;
