//! Scene management with hierarchy support
//!
//! `Scene` owns entity allocation, one sparse-set storage per component type,
//! and the parent/child graph. All operations assume single-threaded access;
//! there is no internal synchronization.

use std::any::TypeId;
use std::collections::HashMap;

use log::warn;

use super::components::Transform;
use super::storage::AnyStorage;
use super::{Component, Entity, Storage};
use crate::foundation::math::{Mat4, Mat4Ext};

/// ECS scene: entities, components, and the transform hierarchy
///
/// Entity ids are allocated here and only here, monotonically from 1.
/// Destroyed ids are never reused, so a stale `Entity` handle can never alias
/// a newer entity. Invalid-entity mutations are silent no-ops; queries on
/// invalid entities return `None`/`false`.
#[derive(Default)]
pub struct Scene {
    next_id: u32,
    entities: Vec<Entity>,
    alive: Vec<bool>,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
    parents: HashMap<Entity, Entity>,
    children: HashMap<Entity, Vec<Entity>>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Create a new entity
    ///
    /// Every entity gets a [`Visible`](super::components::Visible) component
    /// so render-side queries never need a missing-component fallback.
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_id.max(1));
        self.next_id = entity.id() + 1;
        self.entities.push(entity);
        self.alive.push(true);

        self.add_component(entity, super::components::Visible::default());
        entity
    }

    /// Create a new entity with a [`Name`](super::components::Name) component
    pub fn create_entity_named(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.create_entity();
        self.add_component(entity, super::components::Name::new(name));
        entity
    }

    /// Destroy an entity, removing it everywhere
    ///
    /// Children are detached to the root (they keep their components and
    /// local transforms), the entity is unlinked from its parent, every
    /// component storage drops it, and the id becomes permanently invalid.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.is_valid(entity) {
            return false;
        }

        self.detach_from_parent(entity);

        if let Some(children) = self.children.remove(&entity) {
            for child in children {
                self.parents.remove(&child);
                // Losing the parent changes the child's world placement
                self.mark_transform_dirty(child);
            }
        }

        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }

        self.alive[(entity.id() - 1) as usize] = false;
        true
    }

    /// Whether `entity` refers to a live entity of this scene
    pub fn is_valid(&self, entity: Entity) -> bool {
        let id = entity.id() as usize;
        id != 0 && id <= self.alive.len() && self.alive[id - 1]
    }

    /// All live entities, in creation order
    pub fn all_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities
            .iter()
            .copied()
            .filter(|entity| self.is_valid(*entity))
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }

    /// Attach (or overwrite) a component on `entity`
    ///
    /// Returns `false` without storing anything if `entity` is invalid.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> bool {
        if !self.is_valid(entity) {
            warn!("add_component on invalid entity {}", entity.id());
            return false;
        }
        self.storage_or_insert::<C>().insert(entity, component)
    }

    /// Remove a component from `entity`
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> bool {
        if !self.is_valid(entity) {
            return false;
        }
        self.storage_mut::<C>()
            .is_some_and(|storage| storage.remove(entity).is_some())
    }

    /// Get a component, or `None` if absent or `entity` is invalid
    ///
    /// This is the primary safe-access idiom throughout the editor.
    pub fn get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        if !self.is_valid(entity) {
            return None;
        }
        self.storage::<C>()?.try_get(entity)
    }

    /// Get a component mutably, or `None` if absent or `entity` is invalid
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        if !self.is_valid(entity) {
            return None;
        }
        self.storage_mut::<C>()?.try_get_mut(entity)
    }

    /// Whether `entity` has a component of type `C`
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.is_valid(entity)
            && self
                .storages
                .get(&TypeId::of::<C>())
                .is_some_and(|storage| storage.has_entity(entity))
    }

    /// Apply `f` to `entity`'s component of type `C`, if present
    ///
    /// Returns `false` when the entity is invalid or lacks the component.
    pub fn modify_component<C: Component>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut C),
    ) -> bool {
        match self.get_component_mut::<C>(entity) {
            Some(component) => {
                f(component);
                true
            }
            None => false,
        }
    }

    /// Visit every `(entity, component)` pair of type `C`
    ///
    /// Storages never hold destroyed entities (`destroy_entity` sweeps every
    /// storage), so each visited entity is live. Mutating this component type
    /// during traversal is not possible through the borrow rules; collect
    /// entities first if structural changes are needed.
    pub fn for_each<C: Component>(&self, mut f: impl FnMut(Entity, &C)) {
        if let Some(storage) = self.storage::<C>() {
            for (entity, component) in storage.iter() {
                f(entity, component);
            }
        }
    }

    /// Visit every `(entity, component)` pair of type `C` mutably
    pub fn for_each_mut<C: Component>(&mut self, mut f: impl FnMut(Entity, &mut C)) {
        if let Some(storage) = self.storage_mut::<C>() {
            for (entity, component) in storage.iter_mut() {
                f(entity, component);
            }
        }
    }

    /// Find the first entity whose [`Name`](super::components::Name) matches
    pub fn find_entity_by_name(&self, target: &str) -> Entity {
        let mut result = Entity::NULL;
        self.for_each::<super::components::Name>(|entity, name| {
            if result.is_null() && name.name == target {
                result = entity;
            }
        });
        result
    }

    // Hierarchy management

    /// Parent `child` under `parent`
    ///
    /// Rejected silently when either entity is invalid, when `child == parent`,
    /// or when the link would create a cycle. The child's world *position* is
    /// preserved by rewriting its local translation against the new parent's
    /// world matrix; rotation and scale keep their local values.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) {
        if !self.is_valid(child) || !self.is_valid(parent) {
            warn!("set_parent with invalid entity ({} -> {})", child.id(), parent.id());
            return;
        }
        if child == parent || self.is_ancestor(child, parent) {
            return;
        }

        let child_world = self
            .has_component::<Transform>(child)
            .then(|| self.compute_world_transform(child));

        self.detach_from_parent(child);
        self.parents.insert(child, parent);
        self.children.entry(parent).or_default().push(child);

        if let Some(child_world) = child_world {
            if self.has_component::<Transform>(parent) {
                let parent_world = self.compute_world_transform(parent);
                if let Some(parent_inverse) = parent_world.try_inverse() {
                    let new_local = parent_inverse * child_world;
                    if let Some(transform) = self.get_component_mut::<Transform>(child) {
                        transform.set_position(new_local.translation_part());
                    }
                }
            }
        }

        self.mark_transform_dirty(child);
    }

    /// Detach `child` from its parent, leaving it at the root
    pub fn remove_parent(&mut self, child: Entity) {
        if self.parents.contains_key(&child) {
            self.detach_from_parent(child);
            self.mark_transform_dirty(child);
        }
    }

    /// The parent of `child`, or [`Entity::NULL`] for roots
    pub fn parent(&self, child: Entity) -> Entity {
        self.parents.get(&child).copied().unwrap_or(Entity::NULL)
    }

    /// The children of `parent`, in attach order
    pub fn children(&self, parent: Entity) -> &[Entity] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }

    /// Mark `entity`'s transform fully dirty and every descendant world-dirty
    ///
    /// A descendant's world matrix depends on every ancestor, so any placement
    /// change must sweep the whole subtree.
    pub fn mark_transform_dirty(&mut self, entity: Entity) {
        if let Some(transform) = self.get_component_mut::<Transform>(entity) {
            transform.mark_dirty();
        }

        let mut stack: Vec<Entity> = self.children(entity).to_vec();
        while let Some(current) = stack.pop() {
            if let Some(transform) = self.get_component_mut::<Transform>(current) {
                transform.mark_world_dirty();
            }
            stack.extend_from_slice(self.children(current));
        }
    }

    // Internal helpers

    fn detach_from_parent(&mut self, child: Entity) {
        if let Some(parent) = self.parents.remove(&child) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|entity| *entity != child);
            }
        }
    }

    /// Walk up the parent chain from `descendant` looking for `ancestor`
    fn is_ancestor(&self, ancestor: Entity, descendant: Entity) -> bool {
        let mut current = self.parent(descendant);
        while !current.is_null() {
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// World matrix by walking local matrices up the hierarchy
    ///
    /// Used for reparenting math; does not touch the world-matrix cache.
    fn compute_world_transform(&mut self, entity: Entity) -> Mat4 {
        let local = match self.get_component_mut::<Transform>(entity) {
            Some(transform) => transform.local_matrix(),
            None => return Mat4::identity(),
        };

        let parent = self.parent(entity);
        if parent.is_null() || !self.has_component::<Transform>(parent) {
            local
        } else {
            self.compute_world_transform(parent) * local
        }
    }

    fn storage<C: Component>(&self) -> Option<&Storage<C>> {
        self.storages
            .get(&TypeId::of::<C>())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    fn storage_mut<C: Component>(&mut self) -> Option<&mut Storage<C>> {
        self.storages
            .get_mut(&TypeId::of::<C>())
            .and_then(|storage| storage.as_any_mut().downcast_mut())
    }

    fn storage_or_insert<C: Component>(&mut self) -> &mut Storage<C> {
        self.storages
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(Storage::<C>::new()))
            .as_any_mut()
            .downcast_mut()
            .expect("component storage registered under wrong TypeId")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{MeshRenderer, Name, Visible};
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    #[test]
    fn test_created_entities_are_distinct() {
        let mut scene = Scene::new();
        let entities: Vec<Entity> = (0..64).map(|_| scene.create_entity()).collect();

        for (i, a) in entities.iter().enumerate() {
            assert!(scene.is_valid(*a));
            for b in &entities[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_destroy_invalidates_everywhere() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        scene.add_component(entity, Health(10));
        scene.add_component(entity, Transform::identity());

        assert!(scene.destroy_entity(entity));
        assert!(!scene.is_valid(entity));
        assert!(!scene.has_component::<Health>(entity));
        assert!(!scene.has_component::<Transform>(entity));
        assert!(!scene.has_component::<Visible>(entity));
        assert!(scene.get_component::<Health>(entity).is_none());

        // Destroying again is a no-op
        assert!(!scene.destroy_entity(entity));
    }

    #[test]
    fn test_destroyed_ids_are_not_reused() {
        let mut scene = Scene::new();
        let first = scene.create_entity();
        scene.destroy_entity(first);

        let second = scene.create_entity();
        assert_ne!(first, second);
        assert!(!scene.is_valid(first));
        assert!(scene.is_valid(second));
    }

    #[test]
    fn test_component_round_trip() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();

        assert!(scene.add_component(entity, Health(42)));
        assert_eq!(scene.get_component::<Health>(entity), Some(&Health(42)));

        // Overwrite
        assert!(scene.add_component(entity, Health(7)));
        assert_eq!(scene.get_component::<Health>(entity), Some(&Health(7)));

        assert!(scene.remove_component::<Health>(entity));
        assert!(!scene.has_component::<Health>(entity));
        assert!(!scene.remove_component::<Health>(entity));
    }

    #[test]
    fn test_invalid_entity_operations_are_noops() {
        crate::foundation::logging::try_init();
        let mut scene = Scene::new();
        assert!(!scene.add_component(Entity::NULL, Health(1)));
        assert!(scene.get_component::<Health>(Entity::NULL).is_none());
        assert!(!scene.has_component::<Health>(Entity::NULL));
        assert!(!scene.modify_component::<Health>(Entity::NULL, |_| {}));
    }

    #[test]
    fn test_create_entity_named_attaches_name_and_visible() {
        let mut scene = Scene::new();
        let entity = scene.create_entity_named("Hero");

        assert_eq!(scene.get_component::<Name>(entity).map(|n| n.name.as_str()), Some("Hero"));
        assert!(scene.has_component::<Visible>(entity));
        assert_eq!(scene.find_entity_by_name("Hero"), entity);
        assert_eq!(scene.find_entity_by_name("Villain"), Entity::NULL);
    }

    #[test]
    fn test_all_entities_in_creation_order() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        let b = scene.create_entity();
        let c = scene.create_entity();
        scene.destroy_entity(b);

        let live: Vec<Entity> = scene.all_entities().collect();
        assert_eq!(live, vec![a, c]);
        assert_eq!(scene.entity_count(), 2);
    }

    #[test]
    fn test_parent_child_links_agree() {
        let mut scene = Scene::new();
        let parent = scene.create_entity();
        let child = scene.create_entity();

        scene.set_parent(child, parent);
        assert_eq!(scene.parent(child), parent);
        assert_eq!(scene.children(parent), &[child]);

        scene.remove_parent(child);
        assert_eq!(scene.parent(child), Entity::NULL);
        assert!(scene.children(parent).is_empty());
    }

    #[test]
    fn test_set_parent_rejects_self_and_cycles() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        let b = scene.create_entity();
        let c = scene.create_entity();
        scene.set_parent(b, a);
        scene.set_parent(c, b);

        scene.set_parent(a, a);
        assert_eq!(scene.parent(a), Entity::NULL);

        // a -> b -> c; parenting a under c would close a cycle
        scene.set_parent(a, c);
        assert_eq!(scene.parent(a), Entity::NULL);
        assert_eq!(scene.parent(c), b);
    }

    #[test]
    fn test_reparenting_moves_child_between_child_lists() {
        let mut scene = Scene::new();
        let first = scene.create_entity();
        let second = scene.create_entity();
        let child = scene.create_entity();

        scene.set_parent(child, first);
        scene.set_parent(child, second);

        assert!(scene.children(first).is_empty());
        assert_eq!(scene.children(second), &[child]);
        assert_eq!(scene.parent(child), second);
    }

    #[test]
    fn test_destroy_detaches_children_to_root() {
        let mut scene = Scene::new();
        let parent = scene.create_entity();
        let child_a = scene.create_entity();
        let child_b = scene.create_entity();
        scene.set_parent(child_a, parent);
        scene.set_parent(child_b, parent);

        scene.destroy_entity(parent);

        // Children survive and become roots, never cascade-destroyed
        assert!(scene.is_valid(child_a));
        assert!(scene.is_valid(child_b));
        assert_eq!(scene.parent(child_a), Entity::NULL);
        assert_eq!(scene.parent(child_b), Entity::NULL);
    }

    #[test]
    fn test_destroy_removes_entity_from_parents_child_list() {
        let mut scene = Scene::new();
        let parent = scene.create_entity();
        let child = scene.create_entity();
        scene.set_parent(child, parent);

        scene.destroy_entity(child);
        assert!(scene.children(parent).is_empty());
    }

    #[test]
    fn test_set_parent_preserves_world_position() {
        let mut scene = Scene::new();
        let parent = scene.create_entity();
        let child = scene.create_entity();
        scene.add_component(parent, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        scene.add_component(child, Transform::from_position(Vec3::new(4.0, 5.0, 6.0)));

        scene.set_parent(child, parent);

        // Local position is rewritten so that parent_world * local keeps the
        // child where it was
        let local = scene
            .get_component::<Transform>(child)
            .expect("child transform")
            .position();
        assert_relative_eq!(local, Vec3::new(-6.0, 5.0, 6.0), epsilon = 1e-5);
    }

    #[test]
    fn test_mark_transform_dirty_sweeps_descendants() {
        let mut scene = Scene::new();
        let root = scene.create_entity();
        let mid = scene.create_entity();
        let leaf = scene.create_entity();
        for entity in [root, mid, leaf] {
            scene.add_component(entity, Transform::identity());
        }
        scene.set_parent(mid, root);
        scene.set_parent(leaf, mid);

        // Settle all caches
        for entity in [root, mid, leaf] {
            let transform = scene.get_component_mut::<Transform>(entity).expect("transform");
            let _ = transform.local_matrix();
            transform.set_world_matrix(Mat4::identity());
        }

        scene.mark_transform_dirty(root);

        assert!(scene.get_component::<Transform>(root).expect("transform").is_local_dirty());
        assert!(scene.get_component::<Transform>(mid).expect("transform").is_world_dirty());
        assert!(!scene.get_component::<Transform>(mid).expect("transform").is_local_dirty());
        assert!(scene.get_component::<Transform>(leaf).expect("transform").is_world_dirty());
    }

    #[test]
    fn test_for_each_visits_all_components() {
        let mut scene = Scene::new();
        let a = scene.create_entity();
        let b = scene.create_entity();
        let c = scene.create_entity();
        scene.add_component(a, Health(1));
        scene.add_component(b, Health(2));
        scene.destroy_entity(c);

        let mut visited: Vec<(Entity, i32)> = Vec::new();
        scene.for_each::<Health>(|entity, health| visited.push((entity, health.0)));
        visited.sort_by_key(|(entity, _)| entity.id());
        assert_eq!(visited, vec![(a, 1), (b, 2)]);

        scene.for_each_mut::<Health>(|_, health| health.0 += 10);
        assert_eq!(scene.get_component::<Health>(a), Some(&Health(11)));
    }

    #[test]
    fn test_modify_component_applies_closure() {
        let mut scene = Scene::new();
        let entity = scene.create_entity();
        scene.add_component(entity, MeshRenderer::new());

        assert!(scene.modify_component::<MeshRenderer>(entity, |renderer| {
            renderer.lod_bias = 1.5;
        }));
        assert_relative_eq!(
            scene.get_component::<MeshRenderer>(entity).expect("renderer").lod_bias,
            1.5
        );
    }
}
