//! Axis-aligned bounding boxes for spatial queries
//!
//! The editor uses local-space boxes on [`MeshRenderer`](crate::ecs::components::MeshRenderer)
//! components; picking and selection transform them to world space per query.

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Axis-Aligned Bounding Box
///
/// A default-constructed box is *invalid* (min > max on every axis). Expanding
/// an invalid box by a point makes it a degenerate point box; this lets callers
/// accumulate bounds with a running [`Aabb::expand`] loop without a separate
/// "first point" branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vec3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with the given half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Whether the box encloses any volume (min <= max on every axis)
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the full size (max - min) of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get corner `index` (0..8), with bits 0/1/2 selecting max x/y/z
    pub fn corner(&self, index: usize) -> Vec3 {
        debug_assert!(index < 8, "AABB has 8 corners");
        Vec3::new(
            if index & 1 == 0 { self.min.x } else { self.max.x },
            if index & 2 == 0 { self.min.y } else { self.max.y },
            if index & 4 == 0 { self.min.z } else { self.max.z },
        )
    }

    /// Grow the box to contain a point
    pub fn expand(&mut self, point: Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Union of two boxes; invalid operands contribute nothing
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut result = *self;
        if other.is_valid() {
            result.expand(other.min);
            result.expand(other.max);
        }
        result
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Transform all 8 corners by a matrix and return their world-space AABB
    ///
    /// Exact under rotation the box itself is not, but conservative: the result
    /// always encloses the transformed box.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let mut result = Aabb::default();
        if !self.is_valid() {
            return result;
        }
        for index in 0..8 {
            let corner = matrix.transform_point(&Point3::from(self.corner(index)));
            result.expand(corner.coords);
        }
        result
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns the distance to the entry point if the ray intersects, `None`
    /// otherwise. A ray starting inside the box reports distance 0.
    /// Based on "An Efficient and Robust Ray-Box Intersection Algorithm".
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        if !self.is_valid() {
            return None;
        }

        let inv_dir = Vec3::new(
            if ray_dir.x != 0.0 { 1.0 / ray_dir.x } else { f32::INFINITY },
            if ray_dir.y != 0.0 { 1.0 / ray_dir.y } else { f32::INFINITY },
            if ray_dir.z != 0.0 { 1.0 / ray_dir.z } else { f32::INFINITY },
        );

        let t1 = (self.min.x - ray_origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray_origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray_origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray_origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray_origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray_origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // Ray intersects if tmax >= tmin and tmax >= 0
        if tmax >= tmin && tmax >= 0.0 {
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_default_is_invalid() {
        let aabb = Aabb::default();
        assert!(!aabb.is_valid());
    }

    #[test]
    fn test_expand_makes_valid() {
        let mut aabb = Aabb::default();
        aabb.expand(Vec3::new(1.0, 2.0, 3.0));
        assert!(aabb.is_valid());
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));

        aabb.expand(Vec3::new(-1.0, 0.0, 5.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn test_center_and_size() {
        let aabb = Aabb::from_center_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 1.0, 1.5));
        assert_relative_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
        assert_relative_eq!(aabb.size(), Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_corners_cover_extremes() {
        let aabb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.corner(0), aabb.min);
        assert_eq!(aabb.corner(7), aabb.max);

        let mut rebuilt = Aabb::default();
        for index in 0..8 {
            rebuilt.expand(aabb.corner(index));
        }
        assert_eq!(rebuilt, aabb);
    }

    #[test]
    fn test_union_ignores_invalid() {
        let aabb = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let combined = aabb.union(&Aabb::default());
        assert_eq!(combined, aabb);
    }

    #[test]
    fn test_intersect_ray_hits_front_face() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let distance = aabb
            .intersect_ray(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0))
            .expect("ray should hit");
        assert_relative_eq!(distance, 4.0, epsilon = EPSILON);
    }

    #[test]
    fn test_intersect_ray_misses() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Pointing away
        assert!(aabb
            .intersect_ray(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0))
            .is_none());
        // Offset past the box
        assert!(aabb
            .intersect_ray(Vec3::new(-5.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_intersect_ray_from_inside() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let distance = aabb
            .intersect_ray(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0))
            .expect("ray from inside should hit");
        assert_relative_eq!(distance, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_transformed_scales_and_translates() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let matrix = Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0))
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 2.0, 2.0));

        let world = aabb.transformed(&matrix);
        assert_relative_eq!(world.min, Vec3::new(8.0, -2.0, -2.0), epsilon = EPSILON);
        assert_relative_eq!(world.max, Vec3::new(12.0, 2.0, 2.0), epsilon = EPSILON);
    }
}
