//! Component trait and implementations

/// Marker trait for components
///
/// A component is a plain value type attached to an entity. No copyability
/// requirement beyond clone/move: components may own strings, vectors, and
/// shared pointers.
pub trait Component: 'static {}

// Implement Component for the editor component set
impl Component for crate::ecs::components::Transform {}
impl Component for crate::ecs::components::MeshRenderer {}
impl Component for crate::ecs::components::Name {}
impl Component for crate::ecs::components::Visible {}
impl Component for crate::ecs::components::Selected {}
