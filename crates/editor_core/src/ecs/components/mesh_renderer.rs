//! Renderable mesh component

use std::sync::Arc;

use crate::assets::{GpuMesh, MeshHandle};
use crate::foundation::bounds::Aabb;

/// Component linking an entity to GPU mesh resources
///
/// The GPU mesh is shared ownership: many entities may reference the same
/// uploaded mesh, and the resource manager's cache holds it too. `bounds` is
/// the local (model) space box; picking and selection compose it with the
/// entity's world matrix.
#[derive(Debug, Clone, Default)]
pub struct MeshRenderer {
    /// Handle to the source mesh in the resource manager, if registered
    pub mesh: Option<MeshHandle>,

    /// Uploaded GPU mesh, or `None` while the upload is pending
    pub gpu_mesh: Option<Arc<GpuMesh>>,

    /// Local-space bounding box; invalid until the mesh is known
    pub bounds: Aabb,

    /// Level-of-detail bias for rendering
    pub lod_bias: f32,
}

impl MeshRenderer {
    /// Create an empty mesh renderer (no mesh, invalid bounds)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with known local bounds but no uploaded mesh yet
    pub fn with_bounds(bounds: Aabb) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Create a renderer from an uploaded mesh, adopting its local bounds
    pub fn from_uploaded(handle: MeshHandle, gpu_mesh: Arc<GpuMesh>) -> Self {
        let bounds = gpu_mesh.bounds();
        Self {
            mesh: Some(handle),
            gpu_mesh: Some(gpu_mesh),
            bounds,
            lod_bias: 0.0,
        }
    }

    /// Whether the GPU mesh has been uploaded
    pub fn is_uploaded(&self) -> bool {
        self.gpu_mesh.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_default_has_invalid_bounds() {
        let renderer = MeshRenderer::new();
        assert!(!renderer.bounds.is_valid());
        assert!(!renderer.is_uploaded());
    }

    #[test]
    fn test_from_uploaded_adopts_mesh_bounds() {
        let mut manager = crate::assets::GpuResourceManager::new();
        let bounds = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let handle = manager.register_mesh(GpuMesh::new("cube", 24, 36, bounds));
        let gpu_mesh = manager.mesh(handle).expect("mesh just registered");

        let renderer = MeshRenderer::from_uploaded(handle, gpu_mesh);
        assert!(renderer.is_uploaded());
        assert_eq!(renderer.bounds, bounds);
        assert_eq!(renderer.mesh, Some(handle));
    }

    #[test]
    fn test_clone_shares_gpu_mesh() {
        let mut manager = crate::assets::GpuResourceManager::new();
        let bounds = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let handle = manager.register_mesh(GpuMesh::new("shared", 8, 12, bounds));
        let gpu_mesh = manager.mesh(handle).expect("mesh just registered");

        let renderer = MeshRenderer::from_uploaded(handle, gpu_mesh);
        let copy = renderer.clone();
        assert!(Arc::ptr_eq(
            renderer.gpu_mesh.as_ref().expect("uploaded"),
            copy.gpu_mesh.as_ref().expect("uploaded"),
        ));
    }
}
