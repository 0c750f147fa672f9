//! Core node trait.
//!
//! This module defines the [`Node`] trait, the single lifecycle contract
//! implemented by every tree element, together with the state every node
//! shares ([`NodeCore`]). The trait is generic over a blackboard type `B`
//! that the engine threads through every tick without interpreting it.

use std::fmt;

use uuid::Uuid;

use crate::{Event, NodeError, NodeResult, Status, TickContext};

/// Process-unique identity of a node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Display-name parameter accepted by every node constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseParams(String);

impl BaseParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns the configured name, or `fallback` when none was given.
    pub fn name_or(&self, fallback: &str) -> String {
        if self.0.is_empty() {
            fallback.to_owned()
        } else {
            self.0.clone()
        }
    }
}

impl From<&str> for BaseParams {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BaseParams {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// State shared by every node: identity, display name and last status.
///
/// The status can only be written from inside this crate, by
/// [`update`](crate::update).
#[derive(Debug, Clone)]
pub struct NodeCore {
    id: NodeId,
    name: String,
    status: Option<Status>,
}

impl NodeCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            status: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Status recorded by the most recent update, `None` before the first.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }
}

/// Structural family of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// No children; does the actual work.
    Leaf,
    /// Exactly one child whose result it transforms.
    Decorator,
    /// An ordered list of children whose results it aggregates.
    Composite,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Leaf => "leaf",
            NodeKind::Decorator => "decorator",
            NodeKind::Composite => "composite",
        }
    }
}

/// A behavior tree node.
///
/// Never call `enter`, `tick` or `leave` directly on a child: route it
/// through [`update`](crate::update), which is the only place that opens and
/// closes activations and records status.
pub trait Node<B>: Send {
    fn core(&self) -> &NodeCore;

    fn core_mut(&mut self) -> &mut NodeCore;

    /// Opens a new activation. Called once, before the first tick of it.
    fn enter(&mut self, _bb: &mut B) {}

    /// Advances the node for one event.
    ///
    /// Must not block: anything that waits belongs in a continuation
    /// returned with `Running`.
    fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B>;

    /// Closes the activation after a terminal tick, including `Error`.
    fn leave(&mut self, _bb: &mut B) -> Result<(), NodeError> {
        Ok(())
    }

    fn children(&self) -> &[Box<dyn Node<B>>] {
        &[]
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn id(&self) -> NodeId {
        self.core().id()
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    fn status(&self) -> Option<Status> {
        self.core().status()
    }
}

/// Blanket implementation for boxed nodes.
///
/// This allows `Box<dyn Node<B>>` to be used wherever a `Node<B>` is
/// expected, e.g. as the root handed to [`update`](crate::update).
impl<B> Node<B> for Box<dyn Node<B>> {
    #[inline]
    fn core(&self) -> &NodeCore {
        (**self).core()
    }

    #[inline]
    fn core_mut(&mut self) -> &mut NodeCore {
        (**self).core_mut()
    }

    #[inline]
    fn enter(&mut self, bb: &mut B) {
        (**self).enter(bb)
    }

    #[inline]
    fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B> {
        (**self).tick(ctx, bb, evt)
    }

    #[inline]
    fn leave(&mut self, bb: &mut B) -> Result<(), NodeError> {
        (**self).leave(bb)
    }

    #[inline]
    fn children(&self) -> &[Box<dyn Node<B>>] {
        (**self).children()
    }

    #[inline]
    fn kind(&self) -> NodeKind {
        (**self).kind()
    }
}

/// Depth-first search for the node with identity `id`.
pub fn find_node<B>(root: &dyn Node<B>, id: NodeId) -> Option<&dyn Node<B>> {
    if root.id() == id {
        return Some(root);
    }
    root.children()
        .iter()
        .find_map(|child| find_node(child.as_ref(), id))
}
