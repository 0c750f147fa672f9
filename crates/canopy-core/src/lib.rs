//! Event-driven behavior tree engine.
//!
//! A tree is a hierarchy of [`Node`]s sharing a caller-defined blackboard
//! `B`. Every step feeds one [`Event`] to the root through [`update`], which
//! runs the enter/tick/leave lifecycle of each node it reaches.
//!
//! - **Running is first class**: a node may stay open across many events
//! - **No blocking ticks**: waiting work is handed back as a
//!   [`Continuation`] that reports completion with an addressed event
//! - **Topology is fixed** once built; only node-local state changes
//!
//! # Architecture
//!
//! - [`Node`]: lifecycle trait implemented by every node
//! - [`Status`] / [`NodeResult`]: per-tick outcome, with a [`Resume`]
//!   wake-up request riding on `Running`
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - Decorator nodes: [`Inverter`], [`RepeatUntil`], [`UntilSuccess`],
//!   [`UntilFailure`], [`AsyncDelayer`]
//! - Leaves: [`Succeed`], [`Fail`], [`FunctionAction`], [`Counter`],
//!   [`Signaller`]
//!
//! Driving a tree from an event queue lives in the `canopy-runtime` crate.

pub mod action;
pub mod builder;
pub mod composite;
pub mod continuation;
pub mod decorator;
pub mod error;
pub mod event;
pub mod node;
pub mod render;
pub mod result;
pub mod status;
pub mod update;

#[cfg(test)]
mod testing;

// Re-export core types for ergonomic API
pub use action::{
    ActionFn, Counter, CounterParams, Fail, FunctionAction, FunctionActionParams, Signaller,
    SignallerParams, Succeed,
};
pub use composite::{Selector, Sequence};
pub use continuation::{Continuation, ContinuationContext, EventSender};
pub use decorator::{
    AsyncDelayer, AsyncDelayerParams, Inverter, RepeatUntil, RepeatUntilParams, UntilFailure,
    UntilPredicate, UntilSuccess,
};
pub use error::{ConfigCheck, ConfigError, ContinuationError, NodeError};
pub use event::{DelayFinished, Event, RepeatEvent, TickEvent};
pub use node::{BaseParams, Node, NodeCore, NodeId, NodeKind, find_node};
pub use render::{log_tree, render_tree};
pub use result::{NodeResult, Resume};
pub use status::Status;
pub use update::{TickContext, update};
