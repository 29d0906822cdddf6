//! Central selection management
//!
//! `SelectionManager` is the authoritative owner of "what is selected". It
//! keeps the ECS [`Selected`] components mirrored to its internal ordered
//! sequence, maintains the single primary selection, and notifies listeners
//! synchronously after each state change has fully settled.

use log::warn;

use crate::config::EditorConfig;
use crate::ecs::components::{MeshRenderer, Selected, Transform};
use crate::ecs::systems::TransformSystem;
use crate::ecs::{Entity, Scene};
use crate::foundation::bounds::Aabb;
use crate::foundation::math::Vec4;

/// Selection change event data
///
/// `added` and `removed` are the set differences between `current_selection`
/// and `previous_selection`, in current/previous order respectively.
#[derive(Debug, Clone, Default)]
pub struct SelectionChangedEvent {
    /// Selection before the mutation, in selection order
    pub previous_selection: Vec<Entity>,
    /// Selection after the mutation, in selection order
    pub current_selection: Vec<Entity>,
    /// Entities newly selected by this mutation
    pub added: Vec<Entity>,
    /// Entities deselected by this mutation
    pub removed: Vec<Entity>,
    /// Primary selection before the mutation
    pub previous_primary: Entity,
    /// Primary selection after the mutation
    pub new_primary: Entity,
}

/// Listener callback invoked synchronously on every selection change
pub type SelectionListener = Box<dyn FnMut(&SelectionChangedEvent)>;

/// Authoritative owner of the editor's selection state
///
/// The selection is an ordered sequence without duplicates; the first entry is
/// the fallback primary. Every membership mutation adds or removes [`Selected`]
/// components; primary-only mutations rewrite the `is_primary` flags in place.
/// Listeners observe fully settled state only, and only when something
/// actually changed.
#[derive(Default)]
pub struct SelectionManager {
    selection: Vec<Entity>,
    primary: Entity,
    listeners: Vec<SelectionListener>,
    highlight_color: Option<Vec4>,
}

impl SelectionManager {
    /// Create an empty selection manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection manager using the configured highlight color
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            highlight_color: Some(Vec4::from(config.selection.highlight_color)),
            ..Self::default()
        }
    }

    // Basic selection operations

    /// Select `entity`, replacing the current selection unless `additive`
    ///
    /// Invalid entities are ignored (no state change, no notification).
    /// The newly selected entity becomes primary when there was none or it is
    /// the only selection.
    pub fn select(&mut self, scene: &mut Scene, entity: Entity, additive: bool) {
        if !scene.is_valid(entity) {
            warn!("attempting to select invalid entity {}", entity.id());
            return;
        }

        let previous = self.selection.clone();
        let previous_primary = self.primary;

        let mut removed = Vec::new();
        if !additive {
            removed = std::mem::take(&mut self.selection);
            self.primary = Entity::NULL;
        }

        let mut added = Vec::new();
        if !self.selection.contains(&entity) {
            self.selection.push(entity);
            if self.primary.is_null() || self.selection.len() == 1 {
                self.primary = entity;
            }
            added.push(entity);
        }

        self.sync_to_ecs(scene, &added, &removed);
        self.notify_if_changed(&previous, previous_primary);
    }

    /// Select several entities at once
    ///
    /// Invalid entities are skipped individually. The first valid entity
    /// becomes primary if none was set.
    pub fn select_many(&mut self, scene: &mut Scene, entities: &[Entity], additive: bool) {
        let previous = self.selection.clone();
        let previous_primary = self.primary;

        let mut removed = Vec::new();
        if !additive {
            removed = std::mem::take(&mut self.selection);
            self.primary = Entity::NULL;
        }

        let mut added = Vec::new();
        for &entity in entities {
            if !scene.is_valid(entity) {
                warn!("skipping invalid entity {} in batch selection", entity.id());
                continue;
            }
            if !self.selection.contains(&entity) {
                self.selection.push(entity);
                added.push(entity);
            }
        }

        if self.primary.is_null() {
            self.primary = self.selection.first().copied().unwrap_or(Entity::NULL);
        }

        self.sync_to_ecs(scene, &added, &removed);
        self.notify_if_changed(&previous, previous_primary);
    }

    /// Remove `entity` from the selection if present
    ///
    /// If it was primary, the first remaining selected entity takes over.
    pub fn deselect(&mut self, scene: &mut Scene, entity: Entity) {
        let Some(index) = self.selection.iter().position(|e| *e == entity) else {
            return;
        };

        let previous = self.selection.clone();
        let previous_primary = self.primary;

        self.selection.remove(index);
        if self.primary == entity {
            self.primary = self.selection.first().copied().unwrap_or(Entity::NULL);
        }

        self.sync_to_ecs(scene, &[], &[entity]);
        self.notify_if_changed(&previous, previous_primary);
    }

    /// Clear the selection; a no-op (without notification) when already empty
    pub fn deselect_all(&mut self, scene: &mut Scene) {
        if self.selection.is_empty() {
            return;
        }

        let previous = self.selection.clone();
        let previous_primary = self.primary;

        let removed = std::mem::take(&mut self.selection);
        self.primary = Entity::NULL;

        self.sync_to_ecs(scene, &[], &removed);
        self.notify_if_changed(&previous, previous_primary);
    }

    /// Deselect `entity` if selected, otherwise additively select it
    pub fn toggle_selection(&mut self, scene: &mut Scene, entity: Entity) {
        if !scene.is_valid(entity) {
            warn!("attempting to toggle selection on invalid entity {}", entity.id());
            return;
        }

        if self.is_selected(entity) {
            self.deselect(scene, entity);
        } else {
            self.select(scene, entity, true);
        }
    }

    // Selection queries

    /// The selected entities, in selection order
    pub fn selected_entities(&self) -> &[Entity] {
        &self.selection
    }

    /// Whether `entity` is currently selected
    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selection.contains(&entity)
    }

    /// Number of selected entities
    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    /// Whether anything is selected
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The earliest-selected entity, or [`Entity::NULL`]
    pub fn first_selected(&self) -> Entity {
        self.selection.first().copied().unwrap_or(Entity::NULL)
    }

    // Primary selection (for transform gizmos)

    /// The primary selection, or [`Entity::NULL`]
    pub fn primary_selection(&self) -> Entity {
        self.primary
    }

    /// Promote `entity` to primary
    ///
    /// Ignored unless `entity` is null (clearing the primary) or already a
    /// member of the selection. Rewrites `is_primary` on the affected
    /// [`Selected`] components without touching membership.
    pub fn set_primary_selection(&mut self, scene: &mut Scene, entity: Entity) {
        if !entity.is_null() && !self.is_selected(entity) {
            warn!("cannot set non-selected entity {} as primary", entity.id());
            return;
        }

        let previous_primary = self.primary;
        self.primary = entity;

        if !previous_primary.is_null() {
            if let Some(selected) = scene.get_component_mut::<Selected>(previous_primary) {
                selected.is_primary = false;
            }
        }
        if !entity.is_null() {
            if let Some(selected) = scene.get_component_mut::<Selected>(entity) {
                selected.is_primary = true;
            }
        }

        let previous = self.selection.clone();
        self.notify_if_changed(&previous, previous_primary);
    }

    // Spatial selection queries

    /// World-space bounds of the current selection
    ///
    /// Transforms each selected entity's local box corners through the
    /// [`TransformSystem`]. Returns an invalid box when the selection is
    /// empty, no transform system is available, or no selected entity has
    /// valid bounds.
    pub fn selection_bounds(
        &self,
        scene: &mut Scene,
        transforms: Option<&TransformSystem>,
    ) -> Aabb {
        let mut combined = Aabb::default();
        if self.selection.is_empty() {
            return combined;
        }
        let Some(transforms) = transforms else {
            // World transforms are unavailable; an empty box is the honest answer
            return combined;
        };

        for &entity in &self.selection {
            let bounds = match scene.get_component::<MeshRenderer>(entity) {
                Some(renderer) if renderer.bounds.is_valid() => renderer.bounds,
                _ => continue,
            };
            if !scene.has_component::<Transform>(entity) {
                continue;
            }
            let world_matrix = transforms.get_world_transform(scene, entity);
            combined = combined.union(&bounds.transformed(&world_matrix));
        }

        combined
    }

    /// Bounding-sphere radius of the selection (half the bounds diagonal)
    pub fn selection_radius(
        &self,
        scene: &mut Scene,
        transforms: Option<&TransformSystem>,
    ) -> f32 {
        let bounds = self.selection_bounds(scene, transforms);
        if bounds.is_valid() {
            bounds.size().magnitude() * 0.5
        } else {
            0.0
        }
    }

    // Validation and cleanup

    /// Drop selected entities that are no longer valid
    ///
    /// Reassigns the primary if it was dropped. Notifies once, and only when
    /// something was actually removed.
    pub fn validate_selection(&mut self, scene: &mut Scene) {
        let previous = self.selection.clone();
        let previous_primary = self.primary;

        let removed: Vec<Entity> = self
            .selection
            .iter()
            .copied()
            .filter(|entity| !scene.is_valid(*entity))
            .collect();
        if removed.is_empty() {
            return;
        }

        self.selection.retain(|entity| scene.is_valid(*entity));
        if !scene.is_valid(self.primary) {
            self.primary = self.selection.first().copied().unwrap_or(Entity::NULL);
        }

        self.sync_to_ecs(scene, &[], &removed);
        self.notify_if_changed(&previous, previous_primary);
    }

    /// Rebuild the selection from the ECS [`Selected`] components
    ///
    /// The ECS becomes the authoritative source; used to recover after
    /// external mutation of `Selected` components.
    pub fn refresh_from_ecs(&mut self, scene: &mut Scene) {
        let previous = self.selection.clone();
        let previous_primary = self.primary;

        self.selection.clear();
        self.primary = Entity::NULL;

        let mut selection = Vec::new();
        let mut primary = Entity::NULL;
        scene.for_each::<Selected>(|entity, selected| {
            selection.push(entity);
            if selected.is_primary {
                primary = entity;
            }
        });
        self.selection = selection;
        self.primary = primary;

        self.notify_if_changed(&previous, previous_primary);
    }

    // Snapshot support for undo-style workflows

    /// Snapshot the current selection order
    pub fn capture_selection(&self) -> Vec<Entity> {
        self.selection.clone()
    }

    /// Restore a previously captured selection
    ///
    /// Entities that are no longer valid are filtered out. `primary` is
    /// honored when it survives the filter; otherwise the first restored
    /// entity becomes primary.
    pub fn restore_selection(&mut self, scene: &mut Scene, entities: &[Entity], primary: Entity) {
        let previous = self.selection.clone();
        let previous_primary = self.primary;

        let removed = std::mem::take(&mut self.selection);
        self.primary = Entity::NULL;

        let mut added = Vec::new();
        for &entity in entities {
            if scene.is_valid(entity) && !self.selection.contains(&entity) {
                self.selection.push(entity);
                added.push(entity);
            }
        }

        if !primary.is_null() && self.is_selected(primary) {
            self.primary = primary;
        } else {
            self.primary = self.selection.first().copied().unwrap_or(Entity::NULL);
        }

        self.sync_to_ecs(scene, &added, &removed);
        self.notify_if_changed(&previous, previous_primary);
    }

    // Event registration

    /// Register a listener invoked synchronously after every selection change
    ///
    /// All listeners receive every event, in registration order.
    pub fn register_listener(&mut self, listener: impl FnMut(&SelectionChangedEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Drop all registered listeners
    pub fn unregister_all_listeners(&mut self) {
        self.listeners.clear();
    }

    // Internal helpers

    /// Mirror membership changes into the ECS and refresh primary flags
    ///
    /// Runs before notification so listeners never observe a half-updated
    /// scene.
    fn sync_to_ecs(&mut self, scene: &mut Scene, added: &[Entity], removed: &[Entity]) {
        for &entity in removed {
            if scene.has_component::<Selected>(entity) {
                scene.remove_component::<Selected>(entity);
            }
        }

        for &entity in added {
            let is_primary = entity == self.primary;
            let component = match self.highlight_color {
                Some(color) => Selected::with_color(is_primary, color),
                None => Selected::new(is_primary),
            };
            scene.add_component(entity, component);
        }

        // Keep is_primary authoritative across the whole selection
        for &entity in &self.selection {
            if let Some(selected) = scene.get_component_mut::<Selected>(entity) {
                selected.is_primary = entity == self.primary;
            }
        }
    }

    /// Fire one event if the selection or primary actually changed
    fn notify_if_changed(&mut self, previous: &[Entity], previous_primary: Entity) {
        if self.selection == previous && self.primary == previous_primary {
            return;
        }

        let event = self.create_change_event(previous, previous_primary);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    fn create_change_event(
        &self,
        previous: &[Entity],
        previous_primary: Entity,
    ) -> SelectionChangedEvent {
        let added = self
            .selection
            .iter()
            .copied()
            .filter(|entity| !previous.contains(entity))
            .collect();
        let removed = previous
            .iter()
            .copied()
            .filter(|entity| !self.selection.contains(entity))
            .collect();

        SelectionChangedEvent {
            previous_selection: previous.to_vec(),
            current_selection: self.selection.clone(),
            added,
            removed,
            previous_primary,
            new_primary: self.primary,
        }
    }
}
