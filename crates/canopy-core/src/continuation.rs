//! Background work spawned by `Running` nodes.
//!
//! A node that has to wait (on a timer, an I/O completion, an external
//! signal) never blocks inside `tick`. It returns
//! [`NodeResult::Running`](crate::NodeResult) with a [`Continuation`]; the
//! driver spawns it, and the continuation reports back by enqueuing an event
//! addressed to the node through [`EventSender`].

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{ContinuationError, Event};

/// Deferred unit of work returned alongside `Running`.
pub type Continuation<B> = Box<
    dyn FnOnce(ContinuationContext<B>) -> BoxFuture<'static, Result<(), ContinuationError>>
        + Send,
>;

/// Producer handle onto the tree's event queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Box<dyn Event>>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<Box<dyn Event>>) -> Self {
        Self { tx }
    }

    /// Enqueues `event`, waiting for capacity if the queue is full.
    pub async fn send<E: Event>(&self, event: E) -> Result<(), ContinuationError> {
        self.send_boxed(Box::new(event)).await
    }

    pub async fn send_boxed(&self, event: Box<dyn Event>) -> Result<(), ContinuationError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ContinuationError::QueueClosed)
    }

    /// Enqueues `event` without waiting.
    pub fn try_send<E: Event>(&self, event: E) -> Result<(), ContinuationError> {
        self.tx.try_send(Box::new(event)).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => ContinuationError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ContinuationError::QueueClosed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Everything a continuation gets to work with.
///
/// The blackboard is a snapshot taken when the continuation was spawned.
/// Writing to it has no effect on the tree; results travel back as events.
pub struct ContinuationContext<B> {
    cancel: CancellationToken,
    blackboard: B,
    events: EventSender,
}

impl<B> ContinuationContext<B> {
    pub fn new(cancel: CancellationToken, blackboard: B, events: EventSender) -> Self {
        Self {
            cancel,
            blackboard,
            events,
        }
    }

    pub fn blackboard(&self) -> &B {
        &self.blackboard
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the tree is torn down.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    pub fn events(&self) -> &EventSender {
        &self.events
    }

    /// Enqueues `event` unless the tree is cancelled first.
    ///
    /// Cancellation observed before or while waiting for queue capacity
    /// yields [`ContinuationError::Interrupted`] and nothing is enqueued.
    ///
    /// The returned future does not borrow the context, so it can be built
    /// up front and awaited after the context (and its blackboard) is gone.
    pub fn enqueue<E: Event>(
        &self,
        event: E,
    ) -> impl Future<Output = Result<(), ContinuationError>> + Send + 'static + use<B, E> {
        let cancel = self.cancel.clone();
        let events = self.events.clone();
        async move {
            if cancel.is_cancelled() {
                return Err(ContinuationError::Interrupted);
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ContinuationError::Interrupted),
                sent = events.send(event) => sent,
            }
        }
    }
}
