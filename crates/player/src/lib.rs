#![warn(missing_docs)]
//! Player-controlled character and the controller that drives it.
//!
//! The controller turns decoded [`ActionState`](marionette_input::ActionState)
//! frames into calls on the possessed [`MarionetteCharacter`]; the character
//! owns its camera rig, movement and interaction probe.

mod character;
mod controller;
mod movement;

pub use character::{CharacterSettings, MarionetteCharacter};
pub use controller::{ControllerSettings, MarionetteController};
pub use movement::{CharacterMovement, MovementSettings};
