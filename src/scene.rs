//! JSON scene descriptions: which props exist, where, and what they do.

use glam::Vec3;
use marionette_core::ActorId;
use marionette_physics::{Aabb, Channels};
use marionette_world::props::{Door, Sign, StaticProp, Switch};
use marionette_world::{World, WorldObject};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("prop {0:?} has invalid bounds")]
    InvalidBounds(String),
    #[error("prop name {0:?} is used twice")]
    DuplicateName(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SceneDescription {
    #[serde(default)]
    pub player: PlayerStart,
    #[serde(default)]
    pub props: Vec<PropSpec>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerStart {
    /// Feet position.
    pub position: [f32; 3],
    pub yaw_degrees: f32,
}

impl Default for PlayerStart {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            yaw_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PropSpec {
    pub name: String,
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
    #[serde(flatten)]
    pub kind: PropKind,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropKind {
    Switch,
    Door {
        #[serde(default)]
        locked: bool,
    },
    Sign {
        text: String,
    },
    /// Solid scenery owned by an actor that cannot be interacted with.
    Crate,
    /// Level geometry with no owning actor.
    Wall,
}

/// Names of the actors a scene spawned, in scene order.
pub type SpawnedProps = Vec<(String, ActorId)>;

impl SceneDescription {
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Small built-in room used when no scene file is given.
    pub fn builtin() -> Self {
        let prop = |name: &str, center: [f32; 3], kind: PropKind| PropSpec {
            name: name.to_owned(),
            center,
            half_extents: [30.0, 60.0, 30.0],
            kind,
        };
        Self {
            player: PlayerStart::default(),
            props: vec![
                prop("lamp", [300.0, 88.0, 0.0], PropKind::Switch),
                prop("cellar", [0.0, 88.0, 300.0], PropKind::Door { locked: true }),
                prop(
                    "notice",
                    [0.0, 88.0, -300.0],
                    PropKind::Sign {
                        text: "Welcome to the workshop".to_owned(),
                    },
                ),
                prop("barrel", [-300.0, 88.0, 0.0], PropKind::Crate),
            ],
        }
    }

    /// Validate every prop, then populate `world`.
    pub fn spawn_into(&self, world: &mut World) -> Result<SpawnedProps, SceneError> {
        let mut names = BTreeSet::new();
        for prop in &self.props {
            if !names.insert(prop.name.as_str()) {
                return Err(SceneError::DuplicateName(prop.name.clone()));
            }
            prop.bounds()?;
        }

        let mut spawned = Vec::new();
        for prop in &self.props {
            let bounds = prop.bounds()?;
            let object: Box<dyn WorldObject> = match &prop.kind {
                PropKind::Wall => {
                    world.add_static_collider(bounds, Channels::all());
                    continue;
                }
                PropKind::Switch => Box::new(Switch::new(&prop.name)),
                PropKind::Door { locked: false } => Box::new(Door::new(&prop.name)),
                PropKind::Door { locked: true } => Box::new(Door::new(&prop.name).locked()),
                PropKind::Sign { text } => Box::new(Sign::new(&prop.name, text)),
                PropKind::Crate => Box::new(StaticProp::new(&prop.name)),
            };
            let id = world.spawn_with_collider(object, bounds, Channels::all());
            spawned.push((prop.name.clone(), id));
        }
        info!(props = self.props.len(), actors = spawned.len(), "scene loaded");
        Ok(spawned)
    }
}

impl PropSpec {
    fn bounds(&self) -> Result<Aabb, SceneError> {
        let center = Vec3::from_array(self.center);
        let half = Vec3::from_array(self.half_extents);
        if !center.is_finite() || !half.is_finite() || half.cmple(Vec3::ZERO).any() {
            return Err(SceneError::InvalidBounds(self.name.clone()));
        }
        Ok(Aabb::from_center_half_extents(center, half))
    }
}
