//! Player controller: routes decoded actions to the possessed character.

use glam::Vec2;
use marionette_input::{ActionState, InputContext};
use marionette_world::{DispatchError, DispatchOutcome, World};
use tracing::{info, warn};

use crate::character::MarionetteCharacter;

/// Look tuning applied before rotation reaches the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Radians of rotation per unit of look input.
    pub mouse_sensitivity: f32,
    /// Flip the vertical look axis.
    pub invert_y: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.0025,
            invert_y: false,
        }
    }
}

/// Owns at most one character and forwards input to it.
#[derive(Debug, Default)]
pub struct MarionetteController {
    settings: ControllerSettings,
    pawn: Option<MarionetteCharacter>,
}

impl MarionetteController {
    /// Controller with no pawn.
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            pawn: None,
        }
    }

    /// Take control of `character`, returning the previously possessed one.
    pub fn possess(&mut self, character: MarionetteCharacter) -> Option<MarionetteCharacter> {
        info!(pawn = %character.id(), "possessed character");
        self.pawn.replace(character)
    }

    /// Release the current character.
    pub fn unpossess(&mut self) -> Option<MarionetteCharacter> {
        self.pawn.take()
    }

    /// Possessed character.
    pub fn character(&self) -> Option<&MarionetteCharacter> {
        self.pawn.as_ref()
    }

    /// Possessed character, mutably.
    pub fn character_mut(&mut self) -> Option<&mut MarionetteCharacter> {
        self.pawn.as_mut()
    }

    /// Look tuning.
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// `axis.y` walks forward, `axis.x` strafes right.
    pub fn handle_move(&mut self, axis: Vec2) {
        if let Some(pawn) = self.pawn_or_warn("move") {
            pawn.move_forward(axis.y);
            pawn.move_right(axis.x);
        }
    }

    /// Raw look delta: `x` yaws, `y` pitches (positive looks down).
    pub fn handle_look(&mut self, axis: Vec2) {
        let sensitivity = self.settings.mouse_sensitivity;
        let pitch_sign = if self.settings.invert_y { -1.0 } else { 1.0 };
        if let Some(pawn) = self.pawn_or_warn("look") {
            pawn.look_right(axis.x * sensitivity);
            pawn.look_up(axis.y * sensitivity * pitch_sign);
        }
    }

    /// Jump pressed. Silent when nothing is possessed.
    pub fn handle_jump_started(&mut self) {
        if let Some(pawn) = self.pawn.as_mut() {
            info!("Jump Started");
            pawn.jump();
        }
    }

    /// Jump released. Silent when nothing is possessed.
    pub fn handle_jump_completed(&mut self) {
        if let Some(pawn) = self.pawn.as_mut() {
            info!("Jump Completed");
            pawn.stop_jumping();
        }
    }

    /// Interact pressed. `Ok(None)` when nothing is possessed.
    pub fn handle_interact(
        &mut self,
        world: &mut World,
    ) -> Result<Option<DispatchOutcome>, DispatchError> {
        match self.pawn_or_warn("interact") {
            Some(pawn) => {
                info!("Interact Action Triggered");
                pawn.perform_interaction_check(world).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Apply one frame of decoded input.
    ///
    /// Rotation is applied before the interact edge so the trace uses the
    /// view the player sees this frame. Returns the interaction outcome when
    /// interact was pressed.
    pub fn apply(
        &mut self,
        actions: &ActionState,
        world: &mut World,
    ) -> Result<Option<DispatchOutcome>, DispatchError> {
        if actions.context == InputContext::Gameplay {
            if actions.move_axis != Vec2::ZERO {
                self.handle_move(actions.move_axis);
            }
            if actions.look_axis != Vec2::ZERO {
                self.handle_look(actions.look_axis);
            }
            if actions.jump_started {
                self.handle_jump_started();
            }
        }
        if actions.jump_completed {
            self.handle_jump_completed();
        }
        if actions.context == InputContext::Gameplay && actions.interact_started {
            return self.handle_interact(world);
        }
        Ok(None)
    }

    fn pawn_or_warn(&mut self, what: &str) -> Option<&mut MarionetteCharacter> {
        if self.pawn.is_none() {
            warn!("{} ignored: no character possessed", what);
        }
        self.pawn.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterSettings;
    use glam::Vec3;
    use marionette_physics::{Aabb, Channels};
    use marionette_world::props::Switch;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn possessed(world: &mut World) -> MarionetteController {
        let mut controller = MarionetteController::new(ControllerSettings {
            mouse_sensitivity: 0.01,
            invert_y: false,
        });
        let character =
            MarionetteCharacter::spawn(world, "player", Vec3::ZERO, CharacterSettings::default());
        assert!(controller.possess(character).is_none());
        controller
    }

    fn gameplay(build: impl FnOnce(&mut ActionState)) -> ActionState {
        let mut state = ActionState {
            context: InputContext::Gameplay,
            ..ActionState::default()
        };
        build(&mut state);
        state
    }

    #[test]
    fn look_scales_by_sensitivity() {
        let mut world = World::new();
        let mut controller = possessed(&mut world);
        controller.handle_look(Vec2::new(10.0, -5.0));
        let rotation = controller.character().unwrap().control_rotation();
        assert!((rotation.yaw - 0.1).abs() < 1e-6);
        assert!((rotation.pitch - 0.05).abs() < 1e-6);
    }

    #[test]
    fn invert_y_flips_pitch() {
        let mut world = World::new();
        let mut controller = MarionetteController::new(ControllerSettings {
            mouse_sensitivity: 0.01,
            invert_y: true,
        });
        controller.possess(MarionetteCharacter::spawn(
            &mut world,
            "player",
            Vec3::ZERO,
            CharacterSettings::default(),
        ));
        controller.handle_look(Vec2::new(0.0, -5.0));
        let rotation = controller.character().unwrap().control_rotation();
        assert!((rotation.pitch + 0.05).abs() < 1e-6);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(run: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, run);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn action_logs_follow_the_pawn_check() {
        let logs = captured_logs(|| {
            let mut controller = MarionetteController::default();
            controller.handle_jump_started();
            controller.handle_jump_completed();
        });
        assert!(!logs.contains("Jump Started"));
        assert!(!logs.contains("Jump Completed"));

        let logs = captured_logs(|| {
            let mut world = World::new();
            let mut controller = possessed(&mut world);
            controller.handle_jump_started();
            controller.handle_jump_completed();
            controller.handle_interact(&mut world).unwrap();
        });
        assert!(logs.contains("Jump Started"));
        assert!(logs.contains("Jump Completed"));
        assert!(logs.contains("Interact Action Triggered"));
    }

    #[test]
    fn without_a_pawn_everything_is_a_no_op() {
        let mut world = World::new();
        let mut controller = MarionetteController::default();
        controller.handle_move(Vec2::Y);
        controller.handle_jump_started();
        let state = gameplay(|s| s.interact_started = true);
        assert_eq!(controller.apply(&state, &mut world).unwrap(), None);
    }

    #[test]
    fn interact_edge_dispatches_through_the_pawn() {
        let mut world = World::new();
        let mut controller = possessed(&mut world);
        let lamp = world.spawn_with_collider(
            Box::new(Switch::new("lamp")),
            Aabb::from_center_half_extents(Vec3::new(250.0, 88.0, 0.0), Vec3::splat(30.0)),
            Channels::all(),
        );

        let idle = gameplay(|_| {});
        assert_eq!(controller.apply(&idle, &mut world).unwrap(), None);

        let press = gameplay(|s| s.interact_started = true);
        let outcome = controller.apply(&press, &mut world).unwrap().unwrap();
        assert_eq!(outcome.kind(), "Dispatched");
        assert_eq!(outcome.target(), Some(lamp));
        assert_eq!(world.object(lamp).and_then(|o| o.status()).as_deref(), Some("on"));
    }

    #[test]
    fn menu_context_drops_gameplay_actions() {
        let mut world = World::new();
        let mut controller = possessed(&mut world);
        let state = ActionState {
            context: InputContext::Menu,
            move_axis: Vec2::Y,
            look_axis: Vec2::new(50.0, 0.0),
            jump_started: true,
            interact_started: true,
            ..ActionState::default()
        };
        assert_eq!(controller.apply(&state, &mut world).unwrap(), None);
        let pawn = controller.character().unwrap();
        assert_eq!(pawn.control_rotation().yaw, 0.0);
        assert!(!pawn.movement().is_jump_pressed());
    }

    #[test]
    fn jump_release_cancels_request() {
        let mut world = World::new();
        let mut controller = possessed(&mut world);
        controller
            .apply(&gameplay(|s| s.jump_started = true), &mut world)
            .unwrap();
        assert!(controller.character().unwrap().movement().is_jump_pressed());
        controller
            .apply(&gameplay(|s| s.jump_completed = true), &mut world)
            .unwrap();
        assert!(!controller.character().unwrap().movement().is_jump_pressed());
    }

    #[test]
    fn possess_replaces_previous_pawn() {
        let mut world = World::new();
        let mut controller = possessed(&mut world);
        let first = controller.character().unwrap().id();
        let second =
            MarionetteCharacter::spawn(&mut world, "other", Vec3::ZERO, CharacterSettings::default());
        let second_id = second.id();
        let previous = controller.possess(second).expect("first pawn returned");
        assert_eq!(previous.id(), first);
        assert_eq!(controller.character().unwrap().id(), second_id);
        assert!(controller.unpossess().is_some());
        assert!(controller.character().is_none());
    }
}
