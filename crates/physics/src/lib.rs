#![warn(missing_docs)]
//! Physics primitives (AABB, rays, collider queries).

mod collider;
mod debug;
mod ray;

use glam::Vec3;

pub use collider::{Channels, Collider, ColliderHandle, ColliderSet, IgnoreSet};
pub use debug::{DebugColor, DebugLines, DebugSegment};
pub use ray::{Ray, RayError, RayHit};

/// Direction components smaller than this are treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-8;

/// World query primitive: nearest blocking surface along a bounded ray.
pub trait SpatialQuery {
    /// Return the nearest collider blocking `channel` along `ray`, skipping
    /// colliders owned by anything in `ignore`.
    fn nearest_blocking_hit(
        &self,
        ray: &Ray,
        channel: Channels,
        ignore: &IgnoreSet,
    ) -> Option<RayHit>;
}

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all());
        Self { min, max }
    }

    /// Create an AABB from its center and half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Copy of this box moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Tests whether `point` lies inside or on the boundary of the box.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    /// Slab test against a ray.
    ///
    /// Returns the distance along `dir` to the entry point and the normal of
    /// the face that was entered. A ray starting inside the box reports a hit
    /// at distance zero with the normal facing back along the ray.
    pub fn ray_intersection(&self, origin: Vec3, dir: Vec3) -> Option<(f32, Vec3)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < PARALLEL_EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_enter {
                t_enter = t0;
                normal = Vec3::ZERO;
                normal[axis] = -d.signum();
            }
            t_exit = t_exit.min(t1);

            if t_enter > t_exit {
                return None;
            }
        }

        // Entire box behind the origin
        if t_exit < 0.0 {
            return None;
        }

        if t_enter < 0.0 {
            // Origin on a face and leaving the box.
            if t_exit <= 0.0 {
                return None;
            }
            return Some((0.0, -dir));
        }

        Some((t_enter, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::splat(0.5))
    }

    #[test]
    fn intersects_overlapping_boxes() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(0.75, 0.0, 0.0));
        let c = unit_box_at(Vec3::new(3.0, 0.0, 0.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn ray_hits_front_face() {
        let aabb = unit_box_at(Vec3::ZERO);
        let (distance, normal) = aabb
            .ray_intersection(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0))
            .expect("ray should hit");
        assert!((distance - 1.5).abs() < 1e-5);
        assert_eq!(normal, Vec3::Z);
    }

    #[test]
    fn ray_misses_offset_box() {
        let aabb = unit_box_at(Vec3::ZERO);
        let miss = aabb.ray_intersection(Vec3::new(2.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(miss.is_none());
    }

    #[test]
    fn ray_ignores_box_behind_origin() {
        let aabb = unit_box_at(Vec3::new(-5.0, 0.0, 0.0));
        assert!(aabb.ray_intersection(Vec3::ZERO, Vec3::X).is_none());
    }

    #[test]
    fn ray_starting_inside_hits_at_zero() {
        let aabb = unit_box_at(Vec3::ZERO);
        let (distance, normal) = aabb
            .ray_intersection(Vec3::ZERO, Vec3::X)
            .expect("start penetrating");
        assert_eq!(distance, 0.0);
        assert_eq!(normal, -Vec3::X);
    }

    #[test]
    fn ray_leaving_from_a_face_misses() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::new(0.0, 1.0, 1.0));
        assert!(aabb.ray_intersection(Vec3::ZERO, Vec3::X).is_none());

        let (distance, normal) = aabb
            .ray_intersection(Vec3::ZERO, -Vec3::X)
            .expect("entering through the face");
        assert_eq!(distance, 0.0);
        assert_eq!(normal, Vec3::X);
    }

    #[test]
    fn axis_aligned_ray_on_slab_boundary_hits() {
        // Ray travelling exactly along the top face plane.
        let aabb = unit_box_at(Vec3::new(3.0, 0.0, 0.0));
        let hit = aabb.ray_intersection(Vec3::new(0.0, 0.5, 0.0), Vec3::X);
        let (distance, _) = hit.expect("grazing ray should hit");
        assert!((distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn contains_and_translate() {
        let aabb = unit_box_at(Vec3::ZERO).translated(Vec3::new(10.0, 0.0, 0.0));
        assert!(aabb.contains_point(Vec3::new(10.25, 0.0, 0.0)));
        assert!(!aabb.contains_point(Vec3::ZERO));
        assert_eq!(aabb.center(), Vec3::new(10.0, 0.0, 0.0));
    }
}
