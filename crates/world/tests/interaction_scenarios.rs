//! End-to-end interaction scenarios against a populated world.

use glam::Vec3;
use marionette_core::ActorId;
use marionette_physics::{Aabb, Channels};
use marionette_testkit::{
    record_world_scenario, run_world_scenario, HandlerBehavior, RecordingInteractable,
    ScenarioConfig,
};
use marionette_world::props::{Door, PawnBody, StaticProp, Switch};
use marionette_world::{DispatchError, DispatchOutcome, InteractionDispatcher, World};
use std::path::PathBuf;

const REACH: f32 = 350.0;

fn face_at(x: f32) -> Aabb {
    Aabb::new(Vec3::new(x, -60.0, -60.0), Vec3::new(x + 80.0, 60.0, 60.0))
}

fn world_with_player() -> (World, ActorId) {
    let mut world = World::new();
    let player = world.spawn_with_collider(
        Box::new(PawnBody::new("player")),
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(34.0, 88.0, 34.0)),
        Channels::all(),
    );
    (world, player)
}

fn fire(world: &mut World, requester: ActorId) -> Result<DispatchOutcome, DispatchError> {
    InteractionDispatcher::default().fire(world, Vec3::ZERO, Vec3::X, REACH, requester)
}

#[test]
fn interactable_at_300_is_dispatched_with_requester() {
    let (mut world, player) = world_with_player();
    let (recorder, log) = RecordingInteractable::new("terminal");
    let target = world.spawn_with_collider(Box::new(recorder), face_at(300.0), Channels::all());

    let outcome = fire(&mut world, player).unwrap();
    match outcome {
        DispatchOutcome::Dispatched { target: t, point } => {
            assert_eq!(t, target);
            assert!((point - Vec3::new(300.0, 0.0, 0.0)).length() < 1e-3);
        }
        other => panic!("expected dispatch, got {other:?}"),
    }
    assert_eq!(log.calls(), vec![player]);
}

#[test]
fn interactable_at_400_is_out_of_reach() {
    let (mut world, player) = world_with_player();
    let (recorder, log) = RecordingInteractable::new("terminal");
    world.spawn_with_collider(Box::new(recorder), face_at(400.0), Channels::all());

    assert_eq!(fire(&mut world, player).unwrap(), DispatchOutcome::NoTarget);
    assert_eq!(log.count(), 0);
}

#[test]
fn plain_prop_at_300_is_not_interactable() {
    let (mut world, player) = world_with_player();
    let target = world.spawn_with_collider(
        Box::new(StaticProp::new("boulder")),
        face_at(300.0),
        Channels::all(),
    );

    assert_eq!(
        fire(&mut world, player).unwrap(),
        DispatchOutcome::TargetNotInteractable {
            target,
            point: Vec3::new(300.0, 0.0, 0.0),
        }
    );
}

#[test]
fn faulting_handlers_never_escape() {
    for behavior in [
        HandlerBehavior::Fail("jammed".into()),
        HandlerBehavior::Panic("exploded".into()),
    ] {
        let (mut world, player) = world_with_player();
        let (recorder, log) = RecordingInteractable::with_behavior("terminal", behavior);
        world.spawn_with_collider(Box::new(recorder), face_at(300.0), Channels::all());

        let outcome = fire(&mut world, player).unwrap();
        assert_eq!(outcome.kind(), "TargetHandlerFault");
        assert_eq!(log.count(), 1);

        // The world stays usable afterwards.
        let again = fire(&mut world, player).unwrap();
        assert_eq!(again.kind(), "TargetHandlerFault");
        assert_eq!(log.count(), 2);
    }
}

#[test]
fn locked_door_reports_fault() {
    let (mut world, player) = world_with_player();
    world.spawn_with_collider(
        Box::new(Door::new("vault").locked()),
        face_at(200.0),
        Channels::all(),
    );
    match fire(&mut world, player).unwrap() {
        DispatchOutcome::TargetHandlerFault { reason, .. } => {
            assert_eq!(reason, "vault is locked")
        }
        other => panic!("expected fault, got {other:?}"),
    }
}

#[test]
fn nearer_blocker_shadows_interactable() {
    let (mut world, player) = world_with_player();
    let (recorder, log) = RecordingInteractable::new("terminal");
    world.spawn_with_collider(Box::new(recorder), face_at(300.0), Channels::all());
    let crate_id = world.spawn_with_collider(
        Box::new(StaticProp::new("crate")),
        face_at(150.0),
        Channels::all(),
    );

    assert_eq!(fire(&mut world, player).unwrap().target(), Some(crate_id));
    assert_eq!(log.count(), 0);
}

#[test]
fn trigger_volume_does_not_block_visibility() {
    let (mut world, player) = world_with_player();
    world.spawn_with_collider(
        Box::new(StaticProp::new("trigger")),
        face_at(100.0),
        Channels::PAWN,
    );
    let (recorder, log) = RecordingInteractable::new("terminal");
    world.spawn_with_collider(Box::new(recorder), face_at(250.0), Channels::all());

    assert_eq!(fire(&mut world, player).unwrap().kind(), "Dispatched");
    assert_eq!(log.count(), 1);
}

#[test]
fn despawned_target_is_no_longer_dispatched() {
    let (mut world, player) = world_with_player();
    let (recorder, log) = RecordingInteractable::new("terminal");
    let target = world.spawn_with_collider(Box::new(recorder), face_at(300.0), Channels::all());

    assert_eq!(fire(&mut world, player).unwrap().kind(), "Dispatched");
    world.despawn(target);
    assert_eq!(fire(&mut world, player).unwrap(), DispatchOutcome::NoTarget);
    assert_eq!(log.count(), 1);
}

#[test]
fn repeated_misses_stay_misses() {
    let (mut world, player) = world_with_player();
    world.spawn_with_collider(Box::new(Switch::new("lamp")), face_at(900.0), Channels::all());

    let report = record_world_scenario("misses", 5, &mut world, |_, world| {
        Some(fire(world, player).unwrap())
    });
    assert!(report.frames[1..]
        .iter()
        .all(|frame| frame.outcome.as_deref() == Some("NoTarget")));
    assert!(report
        .frames
        .iter()
        .all(|frame| frame.actors.get("lamp").map(String::as_str) == Some("off")));
}

#[test]
fn lamp_slides_into_reach_snapshot() {
    let (mut world, player) = world_with_player();
    let lamp = world.spawn_with_collider(
        Box::new(Switch::new("lamp")),
        face_at(500.0),
        Channels::all(),
    );
    world.spawn_with_collider(
        Box::new(Door::new("gate").locked()),
        Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 400.0), Vec3::splat(40.0)),
        Channels::all(),
    );

    let config = ScenarioConfig {
        name: "lamp_slides_into_reach".into(),
        ticks: 4,
        snapshot_path: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/golden/lamp_slides_into_reach.json"),
    };
    run_world_scenario(config, &mut world, |tick, world| {
        let face = 450.0 - 50.0 * tick.0 as f32;
        world.set_actor_collider(lamp, face_at(face));
        Some(fire(world, player).unwrap())
    })
    .expect("snapshot matches");
}
