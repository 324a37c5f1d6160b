#![warn(missing_docs)]
//! World object storage and the interaction targeting subsystem.
//!
//! The [`World`] owns every actor. Everything else refers to actors through
//! [`ActorId`] handles, which never keep an actor alive.

pub mod interaction;
pub mod props;

use glam::Vec3;
use marionette_core::ActorId;
use marionette_physics::{
    Aabb, Channels, Collider, ColliderHandle, ColliderSet, DebugLines, IgnoreSet, Ray, RayHit,
    SpatialQuery,
};

pub use interaction::{
    DispatchError, DispatchOutcome, InteractionDispatcher, InteractionProbe, ObjectRegistry,
};

/// Capability exposed by objects the player can interact with.
///
/// Implementers own their response entirely. The caller never looks at what
/// happened beyond noticing a failure.
pub trait Interactable {
    /// React to `requester` interacting with this object.
    fn interact(&mut self, requester: ActorId) -> anyhow::Result<()>;
}

/// Anything that can live in a [`World`].
pub trait WorldObject {
    /// Display name used in logs.
    fn name(&self) -> &str;

    /// Interaction capability, if this object has one.
    ///
    /// Objects implementing [`Interactable`] override this to return `Some(self)`.
    fn as_interactable(&mut self) -> Option<&mut dyn Interactable> {
        None
    }

    /// Short human-readable state, if the object has any worth reporting.
    fn status(&self) -> Option<String> {
        None
    }
}

struct Entry {
    object: Box<dyn WorldObject>,
    collider: Option<ColliderHandle>,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Actor storage plus the collision geometry the probe queries.
#[derive(Default)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    colliders: ColliderSet,
    debug_lines: DebugLines,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor without collision.
    pub fn spawn(&mut self, object: Box<dyn WorldObject>) -> ActorId {
        let entry = Entry {
            object,
            collider: None,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            ActorId::new(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            ActorId::new(self.slots.len() as u32 - 1, 0)
        }
    }

    /// Add an actor with a collider blocking `blocks`.
    pub fn spawn_with_collider(
        &mut self,
        object: Box<dyn WorldObject>,
        shape: Aabb,
        blocks: Channels,
    ) -> ActorId {
        let id = self.spawn(object);
        let handle = self.colliders.insert(Collider {
            shape,
            owner: Some(id),
            blocks,
        });
        if let Some(entry) = self.entry_mut(id) {
            entry.collider = Some(handle);
        }
        id
    }

    /// Add level geometry that belongs to no actor.
    pub fn add_static_collider(&mut self, shape: Aabb, blocks: Channels) -> ColliderHandle {
        self.colliders.insert(Collider {
            shape,
            owner: None,
            blocks,
        })
    }

    /// Remove an actor. Outstanding handles to it stop resolving.
    pub fn despawn(&mut self, id: ActorId) -> Option<Box<dyn WorldObject>> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        if let Some(handle) = entry.collider {
            self.colliders.remove(handle);
        }
        Some(entry.object)
    }

    /// Whether `id` still refers to a live actor.
    pub fn is_alive(&self, id: ActorId) -> bool {
        self.entry(id).is_some()
    }

    /// Borrow an actor.
    pub fn object(&self, id: ActorId) -> Option<&dyn WorldObject> {
        self.entry(id).map(|entry| entry.object.as_ref())
    }

    /// Name of a live actor.
    pub fn object_name(&self, id: ActorId) -> Option<&str> {
        self.entry(id).map(|entry| entry.object.name())
    }

    /// Move or resize an actor's collider.
    pub fn set_actor_collider(&mut self, id: ActorId, shape: Aabb) -> bool {
        match self.entry(id).and_then(|entry| entry.collider) {
            Some(handle) => self.colliders.set_shape(handle, shape),
            None => false,
        }
    }

    /// Current bounds of an actor's collider.
    pub fn actor_collider(&self, id: ActorId) -> Option<Aabb> {
        let handle = self.entry(id)?.collider?;
        self.colliders.get(handle).map(|collider| collider.shape)
    }

    /// Live actors in slot order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &dyn WorldObject)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|entry| {
                (
                    ActorId::new(index as u32, slot.generation),
                    entry.object.as_ref(),
                )
            })
        })
    }

    /// Number of live actors.
    pub fn actor_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Debug segments queued by traces.
    pub fn debug_lines(&self) -> &DebugLines {
        &self.debug_lines
    }

    /// Advance world time (expires debug drawing).
    pub fn tick(&mut self, dt: f32) {
        self.debug_lines.tick(dt);
    }

    /// Convenience query straight from a point and direction.
    pub fn line_trace(
        &self,
        start: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: &IgnoreSet,
    ) -> Option<RayHit> {
        let ray = Ray::new(start, direction, max_distance).ok()?;
        self.nearest_blocking_hit(&ray, Channels::VISIBILITY, ignore)
    }

    fn entry(&self, id: ActorId) -> Option<&Entry> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: ActorId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut()
    }
}

impl SpatialQuery for World {
    fn nearest_blocking_hit(
        &self,
        ray: &Ray,
        channel: Channels,
        ignore: &IgnoreSet,
    ) -> Option<RayHit> {
        self.colliders.nearest_blocking_hit(ray, channel, ignore)
    }
}

impl ObjectRegistry for World {
    fn object_mut(&mut self, id: ActorId) -> Option<&mut (dyn WorldObject + 'static)> {
        self.entry_mut(id).map(|entry| entry.object.as_mut())
    }

    fn debug_lines_mut(&mut self) -> Option<&mut DebugLines> {
        Some(&mut self.debug_lines)
    }
}
