//! Stock world objects.

use marionette_core::ActorId;
use tracing::info;

use crate::{Interactable, WorldObject};

/// Two-state switch that flips on every interaction.
#[derive(Debug, Clone)]
pub struct Switch {
    name: String,
    on: bool,
    toggles: u32,
}

impl Switch {
    /// New switch, initially off.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: false,
            toggles: 0,
        }
    }

    /// Current state.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Number of times the switch has been flipped.
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl WorldObject for Switch {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_interactable(&mut self) -> Option<&mut dyn Interactable> {
        Some(self)
    }

    fn status(&self) -> Option<String> {
        Some(if self.on { "on" } else { "off" }.to_owned())
    }
}

impl Interactable for Switch {
    fn interact(&mut self, requester: ActorId) -> anyhow::Result<()> {
        self.on = !self.on;
        self.toggles += 1;
        info!(switch = %self.name, on = self.on, %requester, "switch flipped");
        Ok(())
    }
}

/// Door that opens and closes. A locked door refuses to move.
#[derive(Debug, Clone)]
pub struct Door {
    name: String,
    open: bool,
    locked: bool,
}

impl Door {
    /// New closed, unlocked door.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: false,
            locked: false,
        }
    }

    /// Builder: lock the door.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Whether the door is open.
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl WorldObject for Door {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_interactable(&mut self) -> Option<&mut dyn Interactable> {
        Some(self)
    }

    fn status(&self) -> Option<String> {
        let state = match (self.locked, self.open) {
            (true, _) => "locked",
            (false, true) => "open",
            (false, false) => "closed",
        };
        Some(state.to_owned())
    }
}

impl Interactable for Door {
    fn interact(&mut self, _requester: ActorId) -> anyhow::Result<()> {
        if self.locked {
            anyhow::bail!("{} is locked", self.name);
        }
        self.open = !self.open;
        info!(door = %self.name, open = self.open, "door moved");
        Ok(())
    }
}

/// Readable sign that remembers who read it last.
#[derive(Debug, Clone)]
pub struct Sign {
    name: String,
    text: String,
    last_reader: Option<ActorId>,
}

impl Sign {
    /// New sign with `text`.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            last_reader: None,
        }
    }

    /// Actor that most recently read the sign.
    pub fn last_reader(&self) -> Option<ActorId> {
        self.last_reader
    }
}

impl WorldObject for Sign {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_interactable(&mut self) -> Option<&mut dyn Interactable> {
        Some(self)
    }

    fn status(&self) -> Option<String> {
        self.last_reader.map(|reader| format!("read by {reader}"))
    }
}

impl Interactable for Sign {
    fn interact(&mut self, requester: ActorId) -> anyhow::Result<()> {
        info!(sign = %self.name, reader = %requester, "{}", self.text);
        self.last_reader = Some(requester);
        Ok(())
    }
}

/// Scenery without any interaction capability.
#[derive(Debug, Clone)]
pub struct StaticProp {
    name: String,
}

impl StaticProp {
    /// New prop.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl WorldObject for StaticProp {
    fn name(&self) -> &str {
        &self.name
    }
}

/// World-side body of a player-controlled character.
#[derive(Debug, Clone)]
pub struct PawnBody {
    name: String,
}

impl PawnBody {
    /// New body.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl WorldObject for PawnBody {
    fn name(&self) -> &str {
        &self.name
    }
}
