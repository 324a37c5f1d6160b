#![warn(missing_docs)]
//! Third-person camera rig: control rotation, spring arm and viewpoint.

use glam::{Mat4, Vec3};

/// Pitch limit in radians (89 degrees) to keep the view matrix well defined.
pub const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Source of the player's viewpoint, read fresh every time it is needed.
pub trait Viewpoint {
    /// Where interaction traces start.
    fn viewpoint_origin(&self) -> Vec3;
    /// Unit vector the player is looking along.
    fn viewpoint_forward(&self) -> Vec3;
}

/// Yaw/pitch pair driven by look input.
///
/// Yaw is measured around +Y with zero facing +X; positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlRotation {
    /// Horizontal rotation in radians, kept in `[0, TAU)`.
    pub yaw: f32,
    /// Vertical rotation in radians, clamped to `±PITCH_LIMIT`.
    pub pitch: f32,
}

impl ControlRotation {
    /// Rotation with the given angles, normalized.
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut rotation = Self::default();
        rotation.add_yaw(yaw);
        rotation.add_pitch(pitch);
        rotation
    }

    /// Add horizontal rotation.
    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).rem_euclid(std::f32::consts::TAU);
    }

    /// Add vertical rotation.
    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Full look direction including pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Forward direction flattened onto the ground plane (yaw only).
    pub fn yaw_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Right direction on the ground plane (yaw only).
    pub fn yaw_right(&self) -> Vec3 {
        self.yaw_forward().cross(Vec3::Y)
    }
}

/// Boom that keeps the camera a fixed distance behind its pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringArm {
    /// Distance from pivot to camera.
    pub target_arm_length: f32,
    /// Offset applied at the camera end, in world axes.
    pub socket_offset: Vec3,
    /// Follow the controller's rotation instead of the pawn's facing.
    pub use_pawn_control_rotation: bool,
}

impl Default for SpringArm {
    fn default() -> Self {
        Self {
            target_arm_length: 300.0,
            socket_offset: Vec3::ZERO,
            use_pawn_control_rotation: true,
        }
    }
}

impl SpringArm {
    /// Camera socket position for a pivot and arm rotation.
    pub fn socket_position(&self, pivot: Vec3, rotation: &ControlRotation) -> Vec3 {
        pivot - rotation.forward() * self.target_arm_length + self.socket_offset
    }
}

/// Camera attached to the end of a [`SpringArm`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Boom the camera hangs from.
    pub arm: SpringArm,
    /// Vertical field of view in radians.
    pub fov: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            arm: SpringArm::default(),
            fov: 90f32.to_radians(),
        }
    }
}

impl CameraRig {
    /// Rig with a custom arm length.
    pub fn with_arm_length(length: f32) -> Self {
        Self {
            arm: SpringArm {
                target_arm_length: length,
                ..SpringArm::default()
            },
            ..Self::default()
        }
    }

    fn arm_rotation(&self, control: &ControlRotation, pawn_facing: f32) -> ControlRotation {
        if self.arm.use_pawn_control_rotation {
            *control
        } else {
            ControlRotation::new(pawn_facing, 0.0)
        }
    }

    /// World-space camera position.
    pub fn position(&self, pivot: Vec3, control: &ControlRotation, pawn_facing: f32) -> Vec3 {
        self.arm
            .socket_position(pivot, &self.arm_rotation(control, pawn_facing))
    }

    /// Camera look direction. The camera itself never rotates relative to the arm.
    pub fn forward(&self, control: &ControlRotation, pawn_facing: f32) -> Vec3 {
        self.arm_rotation(control, pawn_facing).forward()
    }

    /// View matrix (world space -> camera space).
    pub fn view_matrix(&self, pivot: Vec3, control: &ControlRotation, pawn_facing: f32) -> Mat4 {
        let eye = self.position(pivot, control, pawn_facing);
        Mat4::look_at_rh(eye, eye + self.forward(control, pawn_facing), Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rotation_faces_positive_x() {
        let rotation = ControlRotation::default();
        let forward = rotation.forward();
        assert!((forward.x - 1.0).abs() < 1e-5);
        assert!(forward.y.abs() < 1e-5);
        assert!(forward.z.abs() < 1e-5);
        assert!((rotation.yaw_right() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut rotation = ControlRotation::default();
        rotation.add_pitch(10.0);
        assert_eq!(rotation.pitch, PITCH_LIMIT);
        rotation.add_pitch(-20.0);
        assert_eq!(rotation.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn yaw_wraps() {
        let mut rotation = ControlRotation::default();
        rotation.add_yaw(-std::f32::consts::FRAC_PI_2);
        assert!(rotation.yaw >= 0.0 && rotation.yaw < std::f32::consts::TAU);
        assert!((rotation.yaw - 3.0 * std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn yaw_forward_ignores_pitch() {
        let rotation = ControlRotation::new(0.0, 0.5);
        assert_eq!(rotation.yaw_forward(), Vec3::X);
        assert!(rotation.forward().y > 0.0);
    }

    #[test]
    fn camera_sits_behind_pivot() {
        let rig = CameraRig::default();
        let control = ControlRotation::default();
        let pivot = Vec3::new(0.0, 90.0, 0.0);
        let position = rig.position(pivot, &control, 0.0);
        assert!((position - Vec3::new(-300.0, 90.0, 0.0)).length() < 1e-3);
        assert!((rig.forward(&control, 0.0) - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn arm_can_follow_pawn_facing() {
        let mut rig = CameraRig::with_arm_length(100.0);
        rig.arm.use_pawn_control_rotation = false;
        let control = ControlRotation::new(1.0, 0.3);
        let forward = rig.forward(&control, 0.0);
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn view_matrix_is_finite() {
        let rig = CameraRig::default();
        let view = rig.view_matrix(Vec3::ZERO, &ControlRotation::new(0.3, -0.2), 0.0);
        assert!(view.to_cols_array().iter().all(|x| x.is_finite()));
    }
}
