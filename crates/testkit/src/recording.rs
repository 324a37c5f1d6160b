//! Interactable test double that records every call.

use marionette_core::ActorId;
use marionette_world::{Interactable, WorldObject};
use std::cell::RefCell;
use std::rc::Rc;

/// What a [`RecordingInteractable`] does after recording a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerBehavior {
    /// Return `Ok(())`.
    Succeed,
    /// Return an error with this message.
    Fail(String),
    /// Panic with this message.
    Panic(String),
}

/// Shared view of the requesters a [`RecordingInteractable`] has seen.
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    calls: Rc<RefCell<Vec<ActorId>>>,
}

impl InteractionLog {
    /// Requesters in call order.
    pub fn calls(&self) -> Vec<ActorId> {
        self.calls.borrow().clone()
    }

    /// Number of calls.
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }
}

/// World object whose interaction handler only records its requester.
#[derive(Debug)]
pub struct RecordingInteractable {
    name: String,
    behavior: HandlerBehavior,
    log: InteractionLog,
}

impl RecordingInteractable {
    /// Recorder that succeeds, plus the log to inspect it with.
    pub fn new(name: impl Into<String>) -> (Self, InteractionLog) {
        Self::with_behavior(name, HandlerBehavior::Succeed)
    }

    /// Recorder with a chosen behavior.
    pub fn with_behavior(
        name: impl Into<String>,
        behavior: HandlerBehavior,
    ) -> (Self, InteractionLog) {
        let log = InteractionLog::default();
        let recorder = Self {
            name: name.into(),
            behavior,
            log: log.clone(),
        };
        (recorder, log)
    }
}

impl WorldObject for RecordingInteractable {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_interactable(&mut self) -> Option<&mut dyn Interactable> {
        Some(self)
    }

    fn status(&self) -> Option<String> {
        Some(format!("calls={}", self.log.count()))
    }
}

impl Interactable for RecordingInteractable {
    fn interact(&mut self, requester: ActorId) -> anyhow::Result<()> {
        self.log.calls.borrow_mut().push(requester);
        match &self.behavior {
            HandlerBehavior::Succeed => Ok(()),
            HandlerBehavior::Fail(message) => Err(anyhow::anyhow!("{message}")),
            HandlerBehavior::Panic(message) => panic!("{}", message),
        }
    }
}
