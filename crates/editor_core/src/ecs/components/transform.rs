//! Transform component
//!
//! Pure data: position, Euler rotation, and scale with lazily cached local
//! and world matrices. The component knows nothing about the hierarchy;
//! world-matrix resolution and subtree dirty propagation belong to
//! [`TransformSystem`](crate::ecs::systems::TransformSystem).

use bitflags::bitflags;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

bitflags! {
    /// Which cached matrices are stale
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TransformDirty: u8 {
        /// Local matrix must be rebuilt from position/rotation/scale
        const LOCAL = 1 << 0;
        /// World matrix must be recomposed from the parent chain
        const WORLD = 1 << 1;
    }
}

/// Spatial placement of an entity relative to its parent
///
/// Fields are private so that every mutation raises both dirty flags; stale
/// cached matrices are therefore impossible through this API. Rotation is
/// Euler angles in radians, applied Z·Y·X.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,

    local_matrix: Mat4,
    world_matrix: Mat4,
    dirty: TransformDirty,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            local_matrix: Mat4::identity(),
            world_matrix: Mat4::identity(),
            dirty: TransformDirty::all(),
        }
    }
}

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position set
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder: set rotation from Euler angles (radians, applied Z·Y·X)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set non-uniform scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Position relative to the parent
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler rotation in radians
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Scale factors
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set position and mark both matrices dirty
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.mark_dirty();
    }

    /// Set Euler rotation (radians) and mark both matrices dirty
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.mark_dirty();
    }

    /// Set scale and mark both matrices dirty
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.mark_dirty();
    }

    /// Mark both cached matrices stale
    ///
    /// Descendants' world matrices are not touched here; the hierarchy owner
    /// propagates (see [`Scene::mark_transform_dirty`](crate::ecs::Scene::mark_transform_dirty)).
    pub fn mark_dirty(&mut self) {
        self.dirty = TransformDirty::all();
    }

    /// Mark only the world matrix stale (an ancestor moved)
    pub fn mark_world_dirty(&mut self) {
        self.dirty |= TransformDirty::WORLD;
    }

    /// Whether the local matrix needs recomputation
    pub fn is_local_dirty(&self) -> bool {
        self.dirty.contains(TransformDirty::LOCAL)
    }

    /// Whether the world matrix needs recomputation
    pub fn is_world_dirty(&self) -> bool {
        self.dirty.contains(TransformDirty::WORLD)
    }

    /// Get the local transformation matrix, recomputing it if stale
    ///
    /// Composition order is translation · rotationZ · rotationY · rotationX ·
    /// scale, so scale applies first and translation last.
    pub fn local_matrix(&mut self) -> Mat4 {
        if self.is_local_dirty() {
            let translation = Mat4::new_translation(&self.position);
            let rotation = Mat4::rotation_z(self.rotation.z)
                * Mat4::rotation_y(self.rotation.y)
                * Mat4::rotation_x(self.rotation.x);
            let scaling = Mat4::new_nonuniform_scaling(&self.scale);

            self.local_matrix = translation * rotation * scaling;
            self.dirty -= TransformDirty::LOCAL;
        }
        self.local_matrix
    }

    /// The cached world matrix; authoritative only when not world-dirty
    pub fn cached_world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// Store a freshly composed world matrix and clear the world-dirty flag
    pub fn set_world_matrix(&mut self, world: Mat4) {
        self.world_matrix = world;
        self.dirty -= TransformDirty::WORLD;
    }
}
