//! Walking, jumping and turning for a ground-bound character.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Tunables for [`CharacterMovement`]. Units are world units and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSettings {
    /// Top horizontal speed.
    pub max_walk_speed: f32,
    /// Horizontal acceleration while input is held.
    pub max_acceleration: f32,
    /// Horizontal deceleration on the ground without input.
    pub braking_deceleration: f32,
    /// Fraction of acceleration available in the air.
    pub air_control: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Initial upward speed of a jump.
    pub jump_velocity: f32,
    /// Turn the body toward the movement direction.
    pub orient_rotation_to_movement: bool,
    /// Turn rate in degrees per second.
    pub rotation_rate_degrees: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            max_walk_speed: 600.0,
            max_acceleration: 2048.0,
            braking_deceleration: 2048.0,
            air_control: 0.35,
            gravity: 980.0,
            jump_velocity: 420.0,
            orient_rotation_to_movement: true,
            rotation_rate_degrees: 500.0,
        }
    }
}

/// Integrates movement input into velocity and position.
#[derive(Debug, Clone)]
pub struct CharacterMovement {
    settings: MovementSettings,
    velocity: Vec3,
    pending_input: Vec3,
    facing_yaw: f32,
    grounded: bool,
    jump_pressed: bool,
}

impl CharacterMovement {
    /// Grounded, motionless movement state.
    pub fn new(settings: MovementSettings) -> Self {
        Self {
            settings,
            velocity: Vec3::ZERO,
            pending_input: Vec3::ZERO,
            facing_yaw: 0.0,
            grounded: true,
            jump_pressed: false,
        }
    }

    /// Accumulate input for the next step. Consumed by [`CharacterMovement::step`].
    pub fn add_input(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += direction * scale;
    }

    /// Request a jump; it starts on the next grounded step.
    pub fn jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Cancel a pending jump request.
    pub fn stop_jumping(&mut self) {
        self.jump_pressed = false;
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Body facing in radians (same convention as control yaw).
    pub fn facing_yaw(&self) -> f32 {
        self.facing_yaw
    }

    /// Whether the character stands on the floor.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether a jump request is waiting.
    pub fn is_jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    /// Advance by `dt`. `floor` is the root height when standing.
    pub fn step(&mut self, position: &mut Vec3, dt: f32, floor: f32) {
        let s = self.settings;
        let input = Vec3::new(self.pending_input.x, 0.0, self.pending_input.z).clamp_length_max(1.0);
        self.pending_input = Vec3::ZERO;

        let mut horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        if input != Vec3::ZERO {
            let accel = if self.grounded {
                s.max_acceleration
            } else {
                s.max_acceleration * s.air_control
            };
            horizontal += input * accel * dt;
            horizontal = horizontal.clamp_length_max(s.max_walk_speed * input.length());
        } else if self.grounded {
            let speed = (horizontal.length() - s.braking_deceleration * dt).max(0.0);
            horizontal = horizontal.normalize_or_zero() * speed;
        }
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;

        if s.orient_rotation_to_movement && input != Vec3::ZERO {
            let target = input.z.atan2(input.x);
            let max_turn = s.rotation_rate_degrees.to_radians() * dt;
            self.facing_yaw = turn_towards(self.facing_yaw, target, max_turn);
        }

        if self.jump_pressed && self.grounded {
            self.velocity.y = s.jump_velocity;
            self.grounded = false;
            self.jump_pressed = false;
        }

        if !self.grounded {
            self.velocity.y -= s.gravity * dt;
        }

        *position += self.velocity * dt;

        if position.y <= floor {
            position.y = floor;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
            self.grounded = true;
        }
    }
}

/// Rotate `current` toward `target` by at most `max_delta`, along the short way.
fn turn_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = (target - current + PI).rem_euclid(TAU) - PI;
    (current + delta.clamp(-max_delta, max_delta)).rem_euclid(TAU)
}
