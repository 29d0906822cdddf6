//! Selection marker component
//!
//! Presence of this component means "selected". Membership and the
//! single-primary invariant are owned by
//! [`SelectionManager`](crate::editor::SelectionManager); the component itself
//! is plain data mirrored into the ECS for renderers and panels to query.

use crate::foundation::math::Vec4;

/// Marker component for selected entities
#[derive(Debug, Clone, PartialEq)]
pub struct Selected {
    /// Primary selection for gizmo placement and single-target operations
    pub is_primary: bool,

    /// Selection outline color
    pub highlight_color: Vec4,
}

impl Selected {
    /// Default selection outline color (orange)
    pub fn default_highlight_color() -> Vec4 {
        Vec4::new(1.0, 0.6, 0.0, 1.0)
    }

    /// Create a selection marker
    pub fn new(is_primary: bool) -> Self {
        Self {
            is_primary,
            highlight_color: Self::default_highlight_color(),
        }
    }

    /// Create a selection marker with a custom outline color
    pub fn with_color(is_primary: bool, highlight_color: Vec4) -> Self {
        Self {
            is_primary,
            highlight_color,
        }
    }
}

impl Default for Selected {
    fn default() -> Self {
        Self::new(false)
    }
}
