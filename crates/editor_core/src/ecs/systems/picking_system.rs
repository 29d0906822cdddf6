//! Ray picking against renderable entities
//!
//! Casts world-space rays against the bounding boxes of every entity carrying
//! both a [`Transform`] and a [`MeshRenderer`], returning hits ordered by
//! distance. The viewport layer owns mouse-to-ray conversion; this system
//! only sees rays.

use crate::config::PickingConfig;
use crate::ecs::components::{MeshRenderer, Transform};
use crate::ecs::systems::TransformSystem;
use crate::ecs::{Entity, Scene};
use crate::foundation::math::Vec3;

/// Rays shorter than this are treated as degenerate (no hits)
const MIN_DIRECTION_LENGTH_SQUARED: f32 = 1e-12;

/// Ray-entity intersection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Whether anything was hit
    pub hit: bool,
    /// The hit entity, or [`Entity::NULL`] on a miss
    pub entity: Entity,
    /// Distance from the ray origin to the entry point
    pub distance: f32,
    /// World-space position of the entry point
    pub world_position: Vec3,
}

impl Default for HitResult {
    fn default() -> Self {
        Self {
            hit: false,
            entity: Entity::NULL,
            distance: f32::MAX,
            world_position: Vec3::zeros(),
        }
    }
}

impl HitResult {
    /// The canonical miss value
    pub fn miss() -> Self {
        Self::default()
    }
}

impl PartialOrd for HitResult {
    /// Order by distance, so a plain sort yields closest-first
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.distance.partial_cmp(&other.distance)
    }
}

/// Ray caster over the scene's renderable entities
///
/// Candidates are entities with both [`Transform`] and [`MeshRenderer`] whose
/// bounds are valid; anything else is skipped, not treated as a miss or an
/// error. Bounds are taken to world space through the
/// [`TransformSystem`] so hierarchy placement is honored.
#[derive(Debug, Clone, Copy)]
pub struct PickingSystem {
    /// Default maximum ray length
    max_distance: f32,
}

impl Default for PickingSystem {
    fn default() -> Self {
        Self {
            max_distance: PickingConfig::default().max_distance,
        }
    }
}

impl PickingSystem {
    /// Create a picking system with the default maximum ray length
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a picking system from editor configuration
    pub fn from_config(config: &PickingConfig) -> Self {
        Self {
            max_distance: config.max_distance,
        }
    }

    /// The default maximum ray length used by [`PickingSystem::raycast`]
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Find the closest entity hit by the ray, within the default range
    pub fn raycast(
        &self,
        scene: &mut Scene,
        transforms: &TransformSystem,
        origin: Vec3,
        direction: Vec3,
    ) -> HitResult {
        self.raycast_within(scene, transforms, origin, direction, self.max_distance)
    }

    /// Find the closest entity hit by the ray, within `max_distance`
    ///
    /// Returns [`HitResult::miss`] when nothing intersects, the direction is
    /// (near) zero length, or `max_distance <= 0`. Degenerate input is not an
    /// error.
    pub fn raycast_within(
        &self,
        scene: &mut Scene,
        transforms: &TransformSystem,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> HitResult {
        let Some(direction) = normalize_direction(direction, max_distance) else {
            return HitResult::miss();
        };

        let mut closest = HitResult::miss();
        for (entity, bounds) in pickable_candidates(scene) {
            let world_bounds = bounds.transformed(&transforms.get_world_transform(scene, entity));
            if let Some(distance) = world_bounds.intersect_ray(origin, direction) {
                if distance <= max_distance && distance < closest.distance {
                    closest = HitResult {
                        hit: true,
                        entity,
                        distance,
                        world_position: origin + direction * distance,
                    };
                }
            }
        }
        closest
    }

    /// All entities hit by the ray, sorted ascending by distance
    pub fn raycast_all(
        &self,
        scene: &mut Scene,
        transforms: &TransformSystem,
        origin: Vec3,
        direction: Vec3,
    ) -> Vec<HitResult> {
        self.raycast_all_within(scene, transforms, origin, direction, self.max_distance)
    }

    /// All entities hit by the ray within `max_distance`, closest first
    pub fn raycast_all_within(
        &self,
        scene: &mut Scene,
        transforms: &TransformSystem,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Vec<HitResult> {
        let Some(direction) = normalize_direction(direction, max_distance) else {
            return Vec::new();
        };

        let mut hits = Vec::new();
        for (entity, bounds) in pickable_candidates(scene) {
            let world_bounds = bounds.transformed(&transforms.get_world_transform(scene, entity));
            if let Some(distance) = world_bounds.intersect_ray(origin, direction) {
                if distance <= max_distance {
                    hits.push(HitResult {
                        hit: true,
                        entity,
                        distance,
                        world_position: origin + direction * distance,
                    });
                }
            }
        }

        hits.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        hits
    }
}

/// Entities eligible for picking: Transform + MeshRenderer with valid bounds
///
/// Collected up front because resolving world transforms needs the scene
/// mutably while iterating.
fn pickable_candidates(scene: &Scene) -> Vec<(Entity, crate::foundation::bounds::Aabb)> {
    scene
        .all_entities()
        .filter(|entity| scene.has_component::<Transform>(*entity))
        .filter_map(|entity| {
            let renderer = scene.get_component::<MeshRenderer>(entity)?;
            renderer.bounds.is_valid().then_some((entity, renderer.bounds))
        })
        .collect()
}

/// Normalize the ray direction, rejecting degenerate queries
fn normalize_direction(direction: Vec3, max_distance: f32) -> Option<Vec3> {
    if max_distance <= 0.0 || direction.magnitude_squared() < MIN_DIRECTION_LENGTH_SQUARED {
        None
    } else {
        Some(direction.normalize())
    }
}
