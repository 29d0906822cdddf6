//! # Editor Core
//!
//! Scene, transform, and picking core for a real-time 3D level editor.
//!
//! ## Features
//!
//! - **ECS Scene Graph**: Sparse-set component storage with stable entity identity
//! - **Transform Hierarchy**: Cached local/world matrices with dirty-flag propagation
//! - **Ray Picking**: Closest-hit and all-hits ray/AABB queries with distance ordering
//! - **Selection Management**: Ordered multi-selection, primary selection, change events
//!
//! ## Quick Start
//!
//! ```rust
//! use editor_core::prelude::*;
//!
//! let mut scene = Scene::new();
//! let transform_system = TransformSystem::new();
//!
//! let entity = scene.create_entity_named("Crate");
//! scene.add_component(entity, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
//!
//! let world = transform_system.get_world_transform(&mut scene, entity);
//! assert_eq!(world[(1, 3)], 1.0);
//! ```
//!
//! Rendering, asset import, and UI are external collaborators: they consume the
//! scene through [`ecs::Scene::all_entities`] and [`ecs::Scene::get_component`],
//! and feed input into [`editor::SelectionManager`] and
//! [`ecs::systems::PickingSystem`].

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod ecs;
pub mod editor;
pub mod foundation;

/// Common imports for editor users
pub mod prelude {
    pub use crate::{
        assets::{GpuMesh, GpuResourceManager, MeshHandle},
        config::EditorConfig,
        ecs::{
            components::{MeshRenderer, Name, Selected, Transform, Visible},
            systems::{HitResult, PickingSystem, TransformSystem},
            Component, Entity, Scene, Storage,
        },
        editor::{SelectionChangedEvent, SelectionManager},
        foundation::{
            bounds::Aabb,
            math::{Mat4, Vec3, Vec4},
        },
    };
}
