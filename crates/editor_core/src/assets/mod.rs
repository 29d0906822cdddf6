//! GPU resource boundary
//!
//! The scene core never talks to a graphics API. What it needs from the GPU
//! side is identity and lifetime: an opaque record per uploaded mesh, shared
//! between every entity that renders it and the manager's own cache. The real
//! upload/download machinery lives in the renderer, which populates this
//! registry when a scene is imported.

use std::sync::Arc;

use crate::foundation::bounds::Aabb;
use crate::foundation::collections::{HandleMap, TypedHandle};

/// Stable handle to a registered GPU mesh
pub type MeshHandle = TypedHandle<GpuMesh>;

/// Opaque record of an uploaded mesh
///
/// Holds only what the editor core queries: a debug name, sizes, and the
/// local-space bounds used for picking and selection. Never dereferenced for
/// GPU work here.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuMesh {
    name: String,
    vertex_count: u32,
    index_count: u32,
    bounds: Aabb,
}

impl GpuMesh {
    /// Describe an uploaded mesh
    pub fn new(name: impl Into<String>, vertex_count: u32, index_count: u32, bounds: Aabb) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            index_count,
            bounds,
        }
    }

    /// Debug name of the mesh
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of vertices in the uploaded buffer
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indices in the uploaded buffer
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Local-space bounding box of the mesh
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Owner of shared GPU mesh records
///
/// Entries are reference counted; unregistering drops the manager's share,
/// and any [`MeshRenderer`](crate::ecs::components::MeshRenderer) still
/// holding the `Arc` keeps the record alive until it lets go.
#[derive(Debug, Default)]
pub struct GpuResourceManager {
    meshes: HandleMap<Arc<GpuMesh>>,
}

impl GpuResourceManager {
    /// Create an empty resource manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an uploaded mesh and return its handle
    pub fn register_mesh(&mut self, mesh: GpuMesh) -> MeshHandle {
        MeshHandle::new(self.meshes.insert(Arc::new(mesh)))
    }

    /// Get a shared reference to a registered mesh
    pub fn mesh(&self, handle: MeshHandle) -> Option<Arc<GpuMesh>> {
        self.meshes.get(handle.key()).cloned()
    }

    /// Drop the manager's share of a mesh; returns `false` for unknown handles
    pub fn unregister_mesh(&mut self, handle: MeshHandle) -> bool {
        self.meshes.remove(handle.key()).is_some()
    }

    /// Number of registered meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn cube_mesh() -> GpuMesh {
        GpuMesh::new(
            "cube",
            24,
            36,
            Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)),
        )
    }

    #[test]
    fn test_register_and_fetch() {
        let mut manager = GpuResourceManager::new();
        let handle = manager.register_mesh(cube_mesh());

        let mesh = manager.mesh(handle).expect("registered mesh");
        assert_eq!(mesh.name(), "cube");
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert!(mesh.bounds().is_valid());
        assert_eq!(manager.mesh_count(), 1);
    }

    #[test]
    fn test_unregister_invalidates_handle() {
        let mut manager = GpuResourceManager::new();
        let handle = manager.register_mesh(cube_mesh());

        assert!(manager.unregister_mesh(handle));
        assert!(manager.mesh(handle).is_none());
        assert!(!manager.unregister_mesh(handle));
    }

    #[test]
    fn test_shared_mesh_outlives_unregistration() {
        let mut manager = GpuResourceManager::new();
        let handle = manager.register_mesh(cube_mesh());
        let shared = manager.mesh(handle).expect("registered mesh");

        manager.unregister_mesh(handle);
        // The outstanding holder keeps the record alive
        assert_eq!(shared.name(), "cube");
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
