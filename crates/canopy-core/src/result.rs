//! Tick results.

use std::fmt;

use futures::future::BoxFuture;

use crate::{Continuation, ContinuationContext, ContinuationError, Event, NodeError, Status};

/// How a `Running` node asks to be woken up again.
pub enum Resume<B> {
    /// Background work; the driver spawns it on the tokio runtime and it
    /// reports back by enqueuing an event.
    Spawn(Continuation<B>),
    /// Event the driver puts on the queue as soon as the step ends. No task
    /// is spawned, so this works without a runtime.
    Requeue(Box<dyn Event>),
}

impl<B> fmt::Debug for Resume<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resume::Spawn(_) => f.write_str("Spawn(..)"),
            Resume::Requeue(evt) => f.debug_tuple("Requeue").field(evt).finish(),
        }
    }
}

/// What a node reports for one tick.
///
/// A wake-up request can only ride along with `Running`, and an `Error`
/// always carries its payload, so neither combination has to be checked at
/// runtime.
pub enum NodeResult<B> {
    Success,
    Failure,
    Running(Option<Resume<B>>),
    Error(NodeError),
}

impl<B> NodeResult<B> {
    /// `Running` without background work.
    pub fn running() -> Self {
        NodeResult::Running(None)
    }

    /// `Running` with a continuation the driver spawns after this tick.
    pub fn running_with<F>(continuation: F) -> Self
    where
        F: FnOnce(ContinuationContext<B>) -> BoxFuture<'static, Result<(), ContinuationError>>
            + Send
            + 'static,
    {
        NodeResult::Running(Some(Resume::Spawn(Box::new(continuation))))
    }

    /// `Running` with `event` enqueued by the driver straight after this tick.
    pub fn running_then<E: Event>(event: E) -> Self {
        NodeResult::Running(Some(Resume::Requeue(Box::new(event))))
    }

    pub fn error(node: impl Into<String>, message: impl Into<String>) -> Self {
        NodeResult::Error(NodeError::new(node, message))
    }

    pub fn status(&self) -> Status {
        match self {
            NodeResult::Success => Status::Success,
            NodeResult::Failure => Status::Failure,
            NodeResult::Running(_) => Status::Running,
            NodeResult::Error(_) => Status::Error,
        }
    }

    pub fn has_continuation(&self) -> bool {
        matches!(self, NodeResult::Running(Some(Resume::Spawn(_))))
    }

    /// The event a `Running` result asks the driver to enqueue, if any.
    pub fn requeued_event(&self) -> Option<&dyn Event> {
        match self {
            NodeResult::Running(Some(Resume::Requeue(evt))) => Some(evt.as_ref()),
            _ => None,
        }
    }

    /// Swaps `Success` and `Failure`; `Running` keeps its wake-up request and
    /// `Error` keeps its payload.
    pub fn invert(self) -> Self {
        match self {
            NodeResult::Success => NodeResult::Failure,
            NodeResult::Failure => NodeResult::Success,
            other => other,
        }
    }
}

impl<B> fmt::Debug for NodeResult<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeResult::Success => f.write_str("Success"),
            NodeResult::Failure => f.write_str("Failure"),
            NodeResult::Running(None) => f.write_str("Running"),
            NodeResult::Running(Some(resume)) => f.debug_tuple("Running").field(resume).finish(),
            NodeResult::Error(err) => f.debug_tuple("Error").field(err).finish(),
        }
    }
}
