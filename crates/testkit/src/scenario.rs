//! Tick-stepped interaction scenarios with golden snapshots.
//!
//! A scenario steps a [`World`] for a fixed number of ticks. Each step may
//! fire an interaction; after every step the harness records the outcome
//! label and the status of every actor that reports one.

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use marionette_core::SimTick;
use marionette_world::{DispatchOutcome, World};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for a scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Name written into the report.
    pub name: String,
    /// Number of steps (the report holds `ticks + 1` frames).
    pub ticks: u64,
    /// Golden JSON file.
    pub snapshot_path: PathBuf,
}

/// State captured after one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioFrame {
    /// Tick number.
    pub tick: u64,
    /// Outcome label of the interaction fired during the step, if any.
    pub outcome: Option<String>,
    /// Actor name to status, for actors that report one.
    pub actors: BTreeMap<String, String>,
}

/// Full record of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Captured frames, starting with the initial state at tick 0.
    pub frames: Vec<ScenarioFrame>,
}

/// Step `world` and collect a report without comparing it to anything.
pub fn record_world_scenario<Step>(
    name: &str,
    ticks: u64,
    world: &mut World,
    mut step: Step,
) -> ScenarioReport
where
    Step: FnMut(SimTick, &mut World) -> Option<DispatchOutcome>,
{
    let mut frames = Vec::with_capacity(ticks as usize + 1);
    let mut tick = SimTick::ZERO;
    frames.push(capture(tick, None, world));

    for _ in 0..ticks {
        let outcome = step(tick, world);
        tick = tick.advance(1);
        frames.push(capture(tick, outcome.as_ref(), world));
    }

    ScenarioReport {
        name: name.to_owned(),
        frames,
    }
}

/// Step `world` and assert (or update) the golden at `config.snapshot_path`.
pub fn run_world_scenario<Step>(config: ScenarioConfig, world: &mut World, step: Step) -> Result<()>
where
    Step: FnMut(SimTick, &mut World) -> Option<DispatchOutcome>,
{
    let report = record_world_scenario(&config.name, config.ticks, world, step);
    assert_json_snapshot(config.snapshot_path, &report)
}

fn capture(tick: SimTick, outcome: Option<&DispatchOutcome>, world: &World) -> ScenarioFrame {
    let actors = world
        .actors()
        .filter_map(|(_, object)| object.status().map(|s| (object.name().to_owned(), s)))
        .collect();
    ScenarioFrame {
        tick: tick.0,
        outcome: outcome.map(|o| o.kind().to_owned()),
        actors,
    }
}
