//! Bounded rays and hit records.

use glam::Vec3;
use marionette_core::ActorId;
use thiserror::Error;

/// Reasons a ray cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RayError {
    /// Origin has a NaN or infinite component.
    #[error("ray origin {0} is not finite")]
    NonFiniteOrigin(Vec3),
    /// Direction has a NaN or infinite component.
    #[error("ray direction {0} is not finite")]
    NonFiniteDirection(Vec3),
    /// Direction has zero length and cannot be normalized.
    #[error("ray direction has zero length")]
    ZeroDirection,
    /// Maximum distance is zero, negative or not finite.
    #[error("ray distance {0} must be positive and finite")]
    InvalidDistance(f32),
}

/// A ray with a normalized direction and a positive length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
}

impl Ray {
    /// Validate inputs and build a ray.
    ///
    /// The direction is normalized here so the reach of the ray never scales
    /// with the length of the vector the caller passed in.
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Result<Self, RayError> {
        if !origin.is_finite() {
            return Err(RayError::NonFiniteOrigin(origin));
        }
        if !direction.is_finite() {
            return Err(RayError::NonFiniteDirection(direction));
        }
        if !(max_distance.is_finite() && max_distance > 0.0) {
            return Err(RayError::InvalidDistance(max_distance));
        }
        let direction = direction.try_normalize().ok_or(RayError::ZeroDirection)?;
        Ok(Self {
            origin,
            direction,
            max_distance,
        })
    }

    /// Start point.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Reach of the ray.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Point `t` units along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Far end of the traced segment.
    pub fn end(&self) -> Vec3 {
        self.point_at(self.max_distance)
    }
}

/// Nearest blocking hit reported by a [`crate::SpatialQuery`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Normal of the surface that was hit.
    pub normal: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    /// Actor owning the collider, `None` for static geometry.
    pub target: Option<ActorId>,
}
