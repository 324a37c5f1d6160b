//! Collider storage and the linear nearest-hit query.

use crate::{Aabb, Ray, RayHit, SpatialQuery};
use marionette_core::ActorId;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Query channels a collider blocks.
    pub struct Channels: u8 {
        /// Line-of-sight traces (interaction probes use this).
        const VISIBILITY = 0b0000_0001;
        /// Character movement.
        const PAWN = 0b0000_0010;
        /// Camera boom probes.
        const CAMERA = 0b0000_0100;
    }
}

impl Default for Channels {
    fn default() -> Self {
        Channels::all()
    }
}

/// A collision shape registered with a [`ColliderSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// World-space bounds.
    pub shape: Aabb,
    /// Actor the collider belongs to, `None` for static level geometry.
    pub owner: Option<ActorId>,
    /// Channels this collider blocks.
    pub blocks: Channels,
}

impl Collider {
    /// Collider blocking every channel.
    pub fn solid(shape: Aabb, owner: Option<ActorId>) -> Self {
        Self {
            shape,
            owner,
            blocks: Channels::all(),
        }
    }
}

/// Stable index of a collider inside its set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(usize);

/// Flat collider storage. Removed slots are recycled.
#[derive(Debug, Default)]
pub struct ColliderSet {
    slots: Vec<Option<Collider>>,
    free: Vec<usize>,
}

impl ColliderSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider.
    pub fn insert(&mut self, collider: Collider) -> ColliderHandle {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(collider);
            ColliderHandle(index)
        } else {
            self.slots.push(Some(collider));
            ColliderHandle(self.slots.len() - 1)
        }
    }

    /// Unregister a collider, returning it if it was present.
    pub fn remove(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let removed = self.slots.get_mut(handle.0)?.take();
        if removed.is_some() {
            self.free.push(handle.0);
        }
        removed
    }

    /// Look up a collider.
    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.slots.get(handle.0)?.as_ref()
    }

    /// Replace the bounds of an existing collider.
    pub fn set_shape(&mut self, handle: ColliderHandle, shape: Aabb) -> bool {
        match self.slots.get_mut(handle.0) {
            Some(Some(collider)) => {
                collider.shape = shape;
                true
            }
            _ => false,
        }
    }

    /// Number of live colliders.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the set holds no colliders.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate live colliders in slot order. Freed slots are reused by `insert`.
    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.slots.iter().flatten()
    }
}

impl SpatialQuery for ColliderSet {
    fn nearest_blocking_hit(
        &self,
        ray: &Ray,
        channel: Channels,
        ignore: &IgnoreSet,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for collider in self.iter() {
            if !collider.blocks.intersects(channel) {
                continue;
            }
            if collider.owner.is_some_and(|owner| ignore.contains(owner)) {
                continue;
            }
            let Some((distance, normal)) = collider
                .shape
                .ray_intersection(ray.origin(), ray.direction())
            else {
                continue;
            };
            if distance > ray.max_distance() {
                continue;
            }
            // Strict comparison keeps the earliest slot on exact ties.
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(RayHit {
                    point: ray.point_at(distance),
                    normal,
                    distance,
                    target: collider.owner,
                });
            }
        }

        best
    }
}

/// Actors excluded from a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    actors: Vec<ActorId>,
}

impl IgnoreSet {
    /// Empty ignore set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore set containing only `actor`.
    pub fn single(actor: ActorId) -> Self {
        Self {
            actors: vec![actor],
        }
    }

    /// Add an actor; duplicates are dropped.
    pub fn insert(&mut self, actor: ActorId) {
        if !self.contains(actor) {
            self.actors.push(actor);
        }
    }

    /// Builder form of [`IgnoreSet::insert`].
    pub fn with(mut self, actor: ActorId) -> Self {
        self.insert(actor);
        self
    }

    /// Whether `actor` is ignored.
    pub fn contains(&self, actor: ActorId) -> bool {
        self.actors.contains(&actor)
    }
}
