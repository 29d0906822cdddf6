//! Hierarchical transform resolution
//!
//! Computes world matrices by composing each entity's local matrix with its
//! parent chain, caching the result in the [`Transform`] component and
//! recomputing only what the dirty flags say is stale.

use crate::ecs::components::Transform;
use crate::ecs::{Entity, Scene};
use crate::foundation::math::{Mat4, Vec3};

/// Resolves and caches world-space transforms for scene entities
///
/// Stateless: all caches live in the [`Transform`] components themselves, so
/// any number of call sites can share one system value. Mutating a transform
/// through [`Scene::get_component_mut`] directly leaves descendants stale;
/// use the setters here (or call [`TransformSystem::mark_dirty`] afterwards)
/// so the subtree is invalidated.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformSystem;

impl TransformSystem {
    /// Create a new transform system
    pub fn new() -> Self {
        Self
    }

    /// Mark `entity` and its descendants in need of recomputation
    pub fn mark_dirty(&self, scene: &mut Scene, entity: Entity) {
        scene.mark_transform_dirty(entity);
    }

    /// World matrix for `entity`, recomputing stale ancestors as needed
    ///
    /// Roots compose against identity; entities without a [`Transform`]
    /// contribute identity and terminate the walk. Never fails: invalid
    /// entities simply yield identity.
    pub fn get_world_transform(&self, scene: &mut Scene, entity: Entity) -> Mat4 {
        match scene.get_component::<Transform>(entity) {
            None => return Mat4::identity(),
            Some(transform) if !transform.is_world_dirty() => {
                return transform.cached_world_matrix();
            }
            Some(_) => {}
        }

        let parent = scene.parent(entity);
        let parent_world = if parent.is_null() {
            Mat4::identity()
        } else {
            self.get_world_transform(scene, parent)
        };

        let Some(transform) = scene.get_component_mut::<Transform>(entity) else {
            return Mat4::identity();
        };
        let world = parent_world * transform.local_matrix();
        transform.set_world_matrix(world);
        world
    }

    /// Set `entity`'s local position and invalidate its subtree
    pub fn set_position(&self, scene: &mut Scene, entity: Entity, position: Vec3) -> bool {
        let updated =
            scene.modify_component::<Transform>(entity, |transform| transform.set_position(position));
        if updated {
            scene.mark_transform_dirty(entity);
        }
        updated
    }

    /// Set `entity`'s local Euler rotation (radians) and invalidate its subtree
    pub fn set_rotation(&self, scene: &mut Scene, entity: Entity, rotation: Vec3) -> bool {
        let updated =
            scene.modify_component::<Transform>(entity, |transform| transform.set_rotation(rotation));
        if updated {
            scene.mark_transform_dirty(entity);
        }
        updated
    }

    /// Set `entity`'s local scale and invalidate its subtree
    pub fn set_scale(&self, scene: &mut Scene, entity: Entity, scale: Vec3) -> bool {
        let updated =
            scene.modify_component::<Transform>(entity, |transform| transform.set_scale(scale));
        if updated {
            scene.mark_transform_dirty(entity);
        }
        updated
    }
}
