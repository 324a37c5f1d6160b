//! The player's pawn: capsule body, camera rig, movement and interaction probe.

use glam::Vec3;
use marionette_camera::{CameraRig, ControlRotation, Viewpoint};
use marionette_core::ActorId;
use marionette_physics::{Aabb, Channels};
use marionette_world::props::PawnBody;
use marionette_world::{DispatchError, DispatchOutcome, InteractionDispatcher, ObjectRegistry, World};
use tracing::debug;

use crate::movement::{CharacterMovement, MovementSettings};

/// Construction parameters for a [`MarionetteCharacter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterSettings {
    /// Capsule radius, used as the horizontal half extent of the body box.
    pub capsule_radius: f32,
    /// Capsule half height; the root sits this far above the floor.
    pub capsule_half_height: f32,
    /// Reach of the interaction trace.
    pub interaction_distance: f32,
    /// Spring arm length behind the character.
    pub arm_length: f32,
    /// Walking and jumping tunables.
    pub movement: MovementSettings,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            capsule_radius: 34.0,
            capsule_half_height: 88.0,
            interaction_distance: 350.0,
            arm_length: 300.0,
            movement: MovementSettings::default(),
        }
    }
}

/// Player-controlled character living in a [`World`].
///
/// The world owns the character's body (a [`PawnBody`] plus its collider);
/// this struct holds the handle and everything the controller drives.
#[derive(Debug, Clone)]
pub struct MarionetteCharacter {
    id: ActorId,
    location: Vec3,
    control: ControlRotation,
    camera: CameraRig,
    movement: CharacterMovement,
    settings: CharacterSettings,
    interaction: InteractionDispatcher,
}

impl MarionetteCharacter {
    /// Spawn the body into `world` standing on the floor at `feet`.
    pub fn spawn(
        world: &mut World,
        name: impl Into<String>,
        feet: Vec3,
        settings: CharacterSettings,
    ) -> Self {
        let location = feet + Vec3::Y * settings.capsule_half_height;
        let bounds = capsule_bounds(location, &settings);
        let id = world.spawn_with_collider(
            Box::new(PawnBody::new(name)),
            bounds,
            Channels::all(),
        );
        debug!(%id, ?location, "character spawned");
        Self {
            id,
            location,
            control: ControlRotation::default(),
            camera: CameraRig::with_arm_length(settings.arm_length),
            movement: CharacterMovement::new(settings.movement),
            settings,
            interaction: InteractionDispatcher::default(),
        }
    }

    /// Handle of the body in the world.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Root (capsule center) location.
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Controller-driven view rotation.
    pub fn control_rotation(&self) -> ControlRotation {
        self.control
    }

    /// Replace the view rotation, e.g. to face a spawn direction.
    pub fn set_control_rotation(&mut self, control: ControlRotation) {
        self.control = control;
    }

    /// Body facing in radians.
    pub fn facing_yaw(&self) -> f32 {
        self.movement.facing_yaw()
    }

    /// Movement state.
    pub fn movement(&self) -> &CharacterMovement {
        &self.movement
    }

    /// Settings the character was spawned with.
    pub fn settings(&self) -> &CharacterSettings {
        &self.settings
    }

    /// World-space camera position at the end of the spring arm.
    pub fn camera_location(&self) -> Vec3 {
        self.camera
            .position(self.location, &self.control, self.facing_yaw())
    }

    /// Walk along the view's flattened forward axis. Zero is ignored.
    pub fn move_forward(&mut self, value: f32) {
        if value != 0.0 {
            self.movement.add_input(self.control.yaw_forward(), value);
        }
    }

    /// Strafe along the view's flattened right axis. Zero is ignored.
    pub fn move_right(&mut self, value: f32) {
        if value != 0.0 {
            self.movement.add_input(self.control.yaw_right(), value);
        }
    }

    /// Pitch the view. Positive input looks down.
    pub fn look_up(&mut self, value: f32) {
        if value != 0.0 {
            self.control.add_pitch(-value);
        }
    }

    /// Yaw the view. Positive input turns right.
    pub fn look_right(&mut self, value: f32) {
        if value != 0.0 {
            self.control.add_yaw(value);
        }
    }

    /// Start a jump.
    pub fn jump(&mut self) {
        self.movement.jump();
    }

    /// Release the jump input.
    pub fn stop_jumping(&mut self) {
        self.movement.stop_jumping();
    }

    /// Trace from the current viewpoint and interact with whatever is hit.
    pub fn perform_interaction_check<R>(
        &self,
        registry: &mut R,
    ) -> Result<DispatchOutcome, DispatchError>
    where
        R: ObjectRegistry + ?Sized,
    {
        self.interaction.fire(
            registry,
            self.viewpoint_origin(),
            self.viewpoint_forward(),
            self.settings.interaction_distance,
            self.id,
        )
    }

    /// Integrate movement and move the body's collider along.
    pub fn tick(&mut self, dt: f32, world: &mut World) {
        let floor = self.settings.capsule_half_height;
        self.movement.step(&mut self.location, dt, floor);
        world.set_actor_collider(self.id, capsule_bounds(self.location, &self.settings));
    }
}

impl Viewpoint for MarionetteCharacter {
    fn viewpoint_origin(&self) -> Vec3 {
        self.location
    }

    fn viewpoint_forward(&self) -> Vec3 {
        self.camera.forward(&self.control, self.facing_yaw())
    }
}

fn capsule_bounds(center: Vec3, settings: &CharacterSettings) -> Aabb {
    Aabb::from_center_half_extents(
        center,
        Vec3::new(
            settings.capsule_radius,
            settings.capsule_half_height,
            settings.capsule_radius,
        ),
    )
}
