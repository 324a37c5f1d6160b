//! Interaction targeting: a forward probe plus capability dispatch.
//!
//! [`InteractionDispatcher::fire`] runs one complete, stateless transaction:
//! build a ray from the viewpoint, find the nearest blocking hit, and if the
//! hit actor exposes [`Interactable`](crate::Interactable), invoke it with the
//! requesting actor. Handler failures stop at this boundary.

use std::panic::{catch_unwind, AssertUnwindSafe};

use glam::Vec3;
use marionette_core::ActorId;
use marionette_physics::{
    Channels, DebugColor, DebugLines, IgnoreSet, Ray, RayError, RayHit, SpatialQuery,
};
use thiserror::Error;
use tracing::{info, trace, warn};

use crate::WorldObject;

/// How long traced segments stay visible, in seconds.
pub const DEFAULT_DEBUG_LIFETIME: f32 = 2.0;

/// Lookup side of the world the dispatcher needs.
pub trait ObjectRegistry: SpatialQuery {
    /// Resolve a handle to a live object.
    fn object_mut(&mut self, id: ActorId) -> Option<&mut (dyn WorldObject + 'static)>;

    /// Where traces should be drawn, if anywhere.
    fn debug_lines_mut(&mut self) -> Option<&mut DebugLines> {
        None
    }
}

/// Caller errors rejected before the world is queried.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DispatchError {
    /// Non-finite viewpoint, zero forward vector or non-positive reach.
    #[error("invalid interaction input: {0}")]
    InvalidInput(#[from] RayError),
}

/// Terminal result of one [`InteractionDispatcher::fire`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Nothing owned by a live actor was in reach.
    NoTarget,
    /// An actor was hit but does not expose the interaction capability.
    TargetNotInteractable {
        /// Actor that was hit.
        target: ActorId,
        /// Hit point.
        point: Vec3,
    },
    /// The target's handler ran to completion.
    Dispatched {
        /// Actor that was notified.
        target: ActorId,
        /// Hit point.
        point: Vec3,
    },
    /// The target's handler failed; the failure was contained here.
    TargetHandlerFault {
        /// Actor whose handler failed.
        target: ActorId,
        /// Hit point.
        point: Vec3,
        /// Error or panic message from the handler.
        reason: String,
    },
}

impl DispatchOutcome {
    /// Stable label for logs and event streams.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchOutcome::NoTarget => "NoTarget",
            DispatchOutcome::TargetNotInteractable { .. } => "TargetNotInteractable",
            DispatchOutcome::Dispatched { .. } => "Dispatched",
            DispatchOutcome::TargetHandlerFault { .. } => "TargetHandlerFault",
        }
    }

    /// Actor that was hit, if any.
    pub fn target(&self) -> Option<ActorId> {
        match self {
            DispatchOutcome::NoTarget => None,
            DispatchOutcome::TargetNotInteractable { target, .. }
            | DispatchOutcome::Dispatched { target, .. }
            | DispatchOutcome::TargetHandlerFault { target, .. } => Some(*target),
        }
    }

    /// Hit point, if any.
    pub fn point(&self) -> Option<Vec3> {
        match self {
            DispatchOutcome::NoTarget => None,
            DispatchOutcome::TargetNotInteractable { point, .. }
            | DispatchOutcome::Dispatched { point, .. }
            | DispatchOutcome::TargetHandlerFault { point, .. } => Some(*point),
        }
    }
}

/// Single bounded trace against the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionProbe {
    /// Channel the trace runs on.
    pub channel: Channels,
    /// Lifetime of the debug segment, or `None` to skip drawing.
    pub debug_lifetime: Option<f32>,
}

impl Default for InteractionProbe {
    fn default() -> Self {
        Self {
            channel: Channels::VISIBILITY,
            debug_lifetime: Some(DEFAULT_DEBUG_LIFETIME),
        }
    }
}

impl InteractionProbe {
    /// Nearest blocking hit along `ray`, never reporting anything in `ignore`.
    pub fn cast<Q>(&self, query: &Q, ray: &Ray, ignore: &IgnoreSet) -> Option<RayHit>
    where
        Q: SpatialQuery + ?Sized,
    {
        let hit = query.nearest_blocking_hit(ray, self.channel, ignore);
        trace!(
            start = ?ray.origin(),
            end = ?ray.end(),
            hit = hit.is_some(),
            "interaction trace"
        );
        hit
    }

    /// Queue the traced segment: green when something was hit, red otherwise.
    pub fn draw(&self, lines: &mut DebugLines, ray: &Ray, hit: Option<&RayHit>) {
        if let Some(lifetime) = self.debug_lifetime {
            let color = if hit.is_some() {
                DebugColor::Green
            } else {
                DebugColor::Red
            };
            lines.push(ray.origin(), ray.end(), color, lifetime);
        }
    }
}

/// Turns an interact intent into a capability call on the targeted actor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InteractionDispatcher {
    probe: InteractionProbe,
}

impl InteractionDispatcher {
    /// Dispatcher using `probe` for its traces.
    pub fn new(probe: InteractionProbe) -> Self {
        Self { probe }
    }

    /// Probe configuration.
    pub fn probe(&self) -> &InteractionProbe {
        &self.probe
    }

    /// Run one interaction attempt from the given viewpoint.
    ///
    /// `origin` and `forward` are read fresh by the caller each time. The
    /// forward vector is normalized here. Invalid input is rejected before
    /// the world is queried.
    pub fn fire<R>(
        &self,
        registry: &mut R,
        origin: Vec3,
        forward: Vec3,
        max_distance: f32,
        requester: ActorId,
    ) -> Result<DispatchOutcome, DispatchError>
    where
        R: ObjectRegistry + ?Sized,
    {
        let ray = Ray::new(origin, forward, max_distance)?;
        let ignore = IgnoreSet::single(requester);

        let hit = self.probe.cast(&*registry, &ray, &ignore);
        if let Some(lines) = registry.debug_lines_mut() {
            self.probe.draw(lines, &ray, hit.as_ref());
        }

        let Some((target, point)) = hit.and_then(|hit| hit.target.map(|t| (t, hit.point))) else {
            trace!(%requester, "interaction found no target");
            return Ok(DispatchOutcome::NoTarget);
        };

        let Some(object) = registry.object_mut(target) else {
            trace!(%requester, %target, "interaction hit a stale actor handle");
            return Ok(DispatchOutcome::NoTarget);
        };
        let name = object.name().to_owned();

        let Some(capability) = object.as_interactable() else {
            info!("Hit actor {} does not implement the interaction capability", name);
            return Ok(DispatchOutcome::TargetNotInteractable { target, point });
        };

        let result = catch_unwind(AssertUnwindSafe(|| capability.interact(requester)));
        let fault = match result {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(format!("{err:#}")),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };

        match fault {
            None => {
                info!("Interacted with: {}", name);
                Ok(DispatchOutcome::Dispatched { target, point })
            }
            Some(reason) => {
                warn!(%target, "Interaction handler on {} failed: {}", name, reason);
                Ok(DispatchOutcome::TargetHandlerFault {
                    target,
                    point,
                    reason,
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_owned()
    }
}
