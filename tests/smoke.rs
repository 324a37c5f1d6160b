use glam::Vec3;
use marionette_core::SimTick;
use marionette_player::{CharacterSettings, MarionetteCharacter};
use marionette_testkit::{EventRecord, JsonlSink};
use marionette_world::props::Switch;
use marionette_world::World;
use marionette_physics::{Aabb, Channels};

#[test]
fn deterministic_event_stream_can_be_written() {
    let path = std::env::temp_dir().join(format!(
        "marionette-eventlog-{}.jsonl",
        std::process::id()
    ));
    let mut sink = JsonlSink::create(&path).expect("can create temp log");
    let tick = SimTick::ZERO.advance(1);
    let record = EventRecord {
        tick,
        kind: "SmokeTest",
        payload: "ok",
    };
    sink.write(&record).expect("can write event");
    drop(sink);

    let log = std::fs::read_to_string(&path).expect("log readable");
    assert_eq!(log.lines().count(), 1);
    std::fs::remove_file(&path).expect("can remove temp log");
}

#[test]
fn character_can_flip_a_switch() {
    let mut world = World::new();
    let lamp = world.spawn_with_collider(
        Box::new(Switch::new("lamp")),
        Aabb::from_center_half_extents(Vec3::new(200.0, 88.0, 0.0), Vec3::splat(25.0)),
        Channels::all(),
    );
    let player =
        MarionetteCharacter::spawn(&mut world, "player", Vec3::ZERO, CharacterSettings::default());
    let outcome = player
        .perform_interaction_check(&mut world)
        .expect("valid viewpoint");
    assert_eq!(outcome.target(), Some(lamp));
    assert_eq!(
        world.object(lamp).and_then(|o| o.status()).as_deref(),
        Some("on")
    );
}
