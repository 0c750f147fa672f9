//! Events that drive ticks.
//!
//! The engine treats events as opaque. The only capability it looks at is
//! [`Event::target_node_id`]: completion events produced by continuations
//! are addressed to the node that spawned them, everything else is a
//! broadcast tick.

use std::any::Any;
use std::fmt::Debug;
use std::time::Instant;

use crate::NodeId;

/// Input for a single tick of the tree.
pub trait Event: Any + Debug + Send + Sync + 'static {
    /// Node this event is addressed to, if any.
    fn target_node_id(&self) -> Option<NodeId> {
        None
    }
}

impl dyn Event {
    /// Returns `true` if the concrete event type is `T`.
    pub fn is<T: Event>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Returns `true` if this event is addressed to `id`.
    pub fn is_addressed_to(&self, id: NodeId) -> bool {
        self.target_node_id() == Some(id)
    }
}

/// Generic tick carrying no payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvent;

impl Event for TickEvent {}

/// Asks a repeating decorator for another round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatEvent {
    pub target: NodeId,
}

impl Event for RepeatEvent {
    fn target_node_id(&self) -> Option<NodeId> {
        Some(self.target)
    }
}

/// Published by an [`AsyncDelayer`](crate::AsyncDelayer) continuation once
/// its delay elapsed.
///
/// `start` identifies the activation that armed the timer, so a completion
/// from an earlier activation is never mistaken for the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayFinished {
    pub target: NodeId,
    pub start: Instant,
}

impl Event for DelayFinished {
    fn target_node_id(&self) -> Option<NodeId> {
        Some(self.target)
    }
}
