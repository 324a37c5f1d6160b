use marionette_input::{parse_binding, InputBinding, InputContext, InputSnapshot};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScriptedStep {
    /// Seconds this step stays active.
    pub duration: f32,
    /// Keys and mouse buttons held for the whole step, named as in the
    /// controls config (`KeyW`, `Space`, `MouseLeft`).
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub look_x: f32,
    #[serde(default)]
    pub look_y: f32,
}

/// Replays a timed list of held inputs as per-frame [`InputSnapshot`]s.
///
/// Snapshots carry physical keys only; bindings and edges are resolved by
/// whoever processes them.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    held: Vec<Vec<InputBinding>>,
    index: usize,
    time_in_step: f32,
    finished: bool,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let file: ScriptedInputFile = serde_json::from_str(&contents)?;
        Self::new(file.steps)
    }

    pub fn new(steps: Vec<ScriptedStep>) -> anyhow::Result<Self> {
        if steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        let mut held = Vec::with_capacity(steps.len());
        for step in &steps {
            if !(step.duration.is_finite() && step.duration > 0.0) {
                anyhow::bail!("scripted step duration must be positive, got {}", step.duration);
            }
            let bindings = step
                .keys
                .iter()
                .map(|token| {
                    parse_binding(token)
                        .ok_or_else(|| anyhow::anyhow!("unknown key {token:?} in scripted step"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            held.push(bindings);
        }
        Ok(Self {
            steps,
            held,
            index: 0,
            time_in_step: 0.0,
            finished: false,
        })
    }

    /// Whether the last step has run to completion. Afterwards no input is held.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Input for the frame starting now, then advance the clock by `dt`.
    pub fn advance(&mut self, dt: f32) -> InputSnapshot {
        let mut snapshot = InputSnapshot {
            context: InputContext::Gameplay,
            ..InputSnapshot::default()
        };
        if self.finished {
            return snapshot;
        }

        let step = &self.steps[self.index];
        snapshot.mouse_delta = (f64::from(step.look_x), f64::from(step.look_y));
        for binding in &self.held[self.index] {
            snapshot.hold(*binding);
        }

        self.time_in_step += dt;
        while self.time_in_step >= self.steps[self.index].duration {
            self.time_in_step -= self.steps[self.index].duration;
            if self.index + 1 < self.steps.len() {
                self.index += 1;
            } else {
                self.finished = true;
                break;
            }
        }

        snapshot
    }
}
