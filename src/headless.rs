use crate::config::ControlsConfig;
use crate::scene::SceneDescription;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use glam::Vec3;
use marionette_camera::ControlRotation;
use marionette_core::SimTick;
use marionette_input::{Bindings, InputContext, InputProcessor, InputSnapshot};
use marionette_player::{MarionetteCharacter, MarionetteController};
use marionette_testkit::{EventRecord, JsonlSink};
use marionette_world::{DispatchOutcome, World};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub controls: ControlsConfig,
    pub scene: SceneDescription,
    pub script: Option<ScriptedInputPlayer>,
    pub max_ticks: u64,
    pub dt: f32,
    pub events: Option<PathBuf>,
    pub exit_when_script_finished: bool,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub ticks: u64,
    /// Interaction attempts by outcome kind.
    pub outcomes: BTreeMap<&'static str, u64>,
    /// Final `(name, status)` of every actor that reports one.
    pub statuses: Vec<(String, String)>,
}

#[derive(Serialize)]
struct OutcomePayload<'a> {
    target: Option<&'a str>,
    point: Option<[f32; 3]>,
    reason: Option<&'a str>,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let HeadlessConfig {
        controls,
        scene,
        mut script,
        max_ticks,
        dt,
        events,
        exit_when_script_finished,
    } = cfg;

    if !(dt.is_finite() && dt > 0.0) {
        anyhow::bail!("tick length must be positive, got {dt}");
    }

    let mut world = World::new();
    scene.spawn_into(&mut world)?;

    let mut character = MarionetteCharacter::spawn(
        &mut world,
        "player",
        Vec3::from_array(scene.player.position),
        controls.character_settings(),
    );
    character.set_control_rotation(ControlRotation::new(
        scene.player.yaw_degrees.to_radians(),
        0.0,
    ));
    let mut controller = MarionetteController::new(controls.controller_settings());
    controller.possess(character);
    let mut input = InputProcessor::new(Bindings::from_overrides(&controls.bindings));

    let mut sink = match &events {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to create event log {}", path.display()))?,
        ),
        None => None,
    };

    if script.is_none() {
        warn!("No scripted input given; the character will stand still");
    }

    let mut summary = RunSummary::default();
    let mut tick = SimTick::ZERO;
    while tick.0 < max_ticks {
        let snapshot = match script.as_mut() {
            Some(script) => script.advance(dt),
            None => InputSnapshot {
                context: InputContext::Gameplay,
                ..InputSnapshot::default()
            },
        };
        let actions = input.process(&snapshot);

        match controller.apply(&actions, &mut world) {
            Ok(Some(outcome)) => {
                *summary.outcomes.entry(outcome.kind()).or_default() += 1;
                if let Some(sink) = sink.as_mut() {
                    write_outcome(sink, tick, &outcome, &world)?;
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(%err, tick = tick.0, "interaction rejected");
                *summary.outcomes.entry("InvalidInput").or_default() += 1;
            }
        }

        if let Some(pawn) = controller.character_mut() {
            pawn.tick(dt, &mut world);
        }
        world.tick(dt);
        tick = tick.advance(1);

        if exit_when_script_finished && script.as_ref().is_some_and(|s| s.is_finished()) {
            info!(tick = tick.0, "Scripted input finished");
            break;
        }
    }

    summary.ticks = tick.0;
    summary.statuses = world
        .actors()
        .filter_map(|(_, object)| {
            object
                .status()
                .map(|status| (object.name().to_owned(), status))
        })
        .collect();
    Ok(summary)
}

fn write_outcome(
    sink: &mut JsonlSink,
    tick: SimTick,
    outcome: &DispatchOutcome,
    world: &World,
) -> Result<()> {
    let reason = match outcome {
        DispatchOutcome::TargetHandlerFault { reason, .. } => Some(reason.as_str()),
        _ => None,
    };
    let payload = OutcomePayload {
        target: outcome.target().and_then(|id| world.object_name(id)),
        point: outcome.point().map(|p| p.to_array()),
        reason,
    };
    let payload = serde_json::to_string(&payload)?;
    sink.write(&EventRecord {
        tick,
        kind: outcome.kind(),
        payload: &payload,
    })
}
