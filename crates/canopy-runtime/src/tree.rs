//! Event-driven tree driver.
//!
//! [`BehaviorTree`] owns the root node, the blackboard and a bounded event
//! queue. Each step feeds one event to the root. A `Running` root may ask to
//! be woken up: continuations are spawned as tokio tasks and report back by
//! enqueuing events, while requeued events go straight onto the queue.

use std::fmt;

use canopy_core::{
    ConfigCheck, ConfigError, Continuation, ContinuationContext, ContinuationError, Event,
    EventSender, Node, NodeResult, Resume, Status, TickContext, find_node, log_tree,
    render_tree,
};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::TreeConfig;
use crate::error::{Result, TreeError};

/// Callback invoked with the root after every step.
pub type Visitor<B> = Box<dyn FnMut(&dyn Node<B>) + Send>;

/// A behavior tree bound to its blackboard and event queue.
///
/// Only the task driving the tree touches nodes or the blackboard.
/// Continuations get a clone of the blackboard and an [`EventSender`].
pub struct BehaviorTree<B> {
    root: Box<dyn Node<B>>,
    blackboard: B,
    config: TreeConfig,
    cancel: CancellationToken,
    events_tx: Option<mpsc::Sender<Box<dyn Event>>>,
    events_rx: mpsc::Receiver<Box<dyn Event>>,
    visitor: Option<Visitor<B>>,
    ticks: u64,
    tasks: JoinSet<()>,
}

impl<B: Clone + Send + 'static> BehaviorTree<B> {
    /// Create a new tree builder around `blackboard`.
    pub fn builder(blackboard: B) -> TreeBuilder<B> {
        TreeBuilder::new(blackboard)
    }

    /// Runs one step with `evt`.
    ///
    /// A continuation returned by the root is spawned onto the current tokio
    /// runtime. A requeued event is pushed onto the queue without waiting,
    /// so it needs no runtime; if the queue is full it is dropped, since the
    /// events already waiting will tick the tree again. A node error aborts
    /// the step and is returned as [`TreeError::Node`].
    pub fn update(&mut self, evt: &dyn Event) -> Result<Status> {
        self.ticks += 1;
        let ctx = TickContext::new(self.ticks, self.cancel.clone());
        let result = canopy_core::update(self.root.as_mut(), &ctx, &mut self.blackboard, evt);

        if let Some(visitor) = self.visitor.as_mut() {
            visitor(self.root.as_ref());
        }
        if self.config.trace_steps {
            log_tree(self.root.as_ref());
        }
        self.reap_finished();

        trace!(
            target: "canopy::tree",
            tick = self.ticks,
            status = result.status().as_str(),
            "step"
        );

        match result {
            NodeResult::Running(Some(Resume::Spawn(continuation))) => {
                self.spawn_continuation(continuation)?;
                Ok(Status::Running)
            }
            NodeResult::Running(Some(Resume::Requeue(evt))) => {
                self.requeue(evt)?;
                Ok(Status::Running)
            }
            NodeResult::Error(source) => Err(TreeError::Node {
                tick: self.ticks,
                source,
            }),
            other => Ok(other.status()),
        }
    }

    /// Drives the tree from its event queue until cancelled or a node fails.
    ///
    /// `initial` is enqueued first. Events addressed to a node that is not
    /// currently running are dropped. The queue is closed when the loop
    /// returns, so later sends from continuations fail instead of piling up.
    pub async fn event_loop<E: Event>(&mut self, initial: E) -> Result<()> {
        let Some(tx) = self.events_tx.clone() else {
            return Err(TreeError::QueueClosed);
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {}
            sent = tx.send(Box::new(initial)) => sent.map_err(|_| TreeError::QueueClosed)?,
        }
        drop(tx);

        let outcome = loop {
            let evt = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break Ok(()),
                evt = self.events_rx.recv() => match evt {
                    Some(evt) => evt,
                    None => break Ok(()),
                },
            };

            if self.is_stale(evt.as_ref()) {
                debug!(target: "canopy::tree", event = ?evt, "dropping event for inactive node");
                continue;
            }
            if let Err(err) = self.update(evt.as_ref()) {
                break Err(err);
            }
        };

        if let Err(err) = &outcome {
            warn!(target: "canopy::tree", error = %err, "event loop stopped");
            self.cancel.cancel();
        }
        self.close_queue();
        outcome
    }

    /// Waits for the next queued event, for callers stepping the tree by hand.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn recv_event(&mut self) -> Option<Box<dyn Event>> {
        self.events_rx.recv().await
    }

    /// Number of events waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.events_rx.len()
    }

    /// Producer handle onto the event queue, `None` once it is closed.
    pub fn sender(&self) -> Option<EventSender> {
        self.events_tx.clone().map(EventSender::new)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancels the tree and waits for every spawned continuation to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        self.close_queue();
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined {
                warn!(target: "canopy::tree", error = %err, "continuation task failed");
            }
        }
    }

    pub fn root(&self) -> &dyn Node<B> {
        self.root.as_ref()
    }

    pub fn blackboard(&self) -> &B {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut B {
        &mut self.blackboard
    }

    /// Status of the root after the most recent step.
    pub fn status(&self) -> Option<Status> {
        self.root.status()
    }

    /// Number of steps run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn spawn_continuation(&mut self, continuation: Continuation<B>) -> Result<()> {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| TreeError::NoAsyncRuntime)?;
        let Some(tx) = self.events_tx.clone() else {
            return Err(TreeError::QueueClosed);
        };

        let cx = ContinuationContext::new(
            self.cancel.clone(),
            self.blackboard.clone(),
            EventSender::new(tx),
        );
        let work = continuation(cx);
        self.tasks.spawn_on(
            async move {
                match work.await {
                    Ok(()) => {}
                    Err(ContinuationError::Interrupted) => {
                        debug!(target: "canopy::tree", "continuation interrupted");
                    }
                    Err(err) => {
                        warn!(target: "canopy::tree", error = %err, "continuation failed");
                    }
                }
            },
            &handle,
        );
        Ok(())
    }

    fn requeue(&self, evt: Box<dyn Event>) -> Result<()> {
        let Some(tx) = self.events_tx.as_ref() else {
            return Err(TreeError::QueueClosed);
        };
        match tx.try_send(evt) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(evt)) => {
                debug!(target: "canopy::tree", event = ?evt, "event queue full, dropping wake-up");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(TreeError::QueueClosed),
        }
    }

    fn reap_finished(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(err) = joined {
                warn!(target: "canopy::tree", error = %err, "continuation task failed");
            }
        }
    }

    fn is_stale(&self, evt: &dyn Event) -> bool {
        evt.target_node_id().is_some_and(|id| {
            find_node(self.root.as_ref(), id).and_then(|node| node.status())
                != Some(Status::Running)
        })
    }

    fn close_queue(&mut self) {
        if self.events_tx.take().is_some() {
            self.events_rx.close();
            debug!(target: "canopy::tree", "event queue closed");
        }
    }
}

impl<B> fmt::Display for BehaviorTree<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_tree(self.root.as_ref()))
    }
}

/// Builder for [`BehaviorTree`].
pub struct TreeBuilder<B> {
    blackboard: B,
    root: Option<Box<dyn Node<B>>>,
    config: TreeConfig,
    cancel: Option<CancellationToken>,
    visitor: Option<Visitor<B>>,
}

impl<B: Clone + Send + 'static> TreeBuilder<B> {
    fn new(blackboard: B) -> Self {
        Self {
            blackboard,
            root: None,
            config: TreeConfig::default(),
            cancel: None,
            visitor: None,
        }
    }

    pub fn root(mut self, root: Box<dyn Node<B>>) -> Self {
        self.root = Some(root);
        self
    }

    /// Override driver configuration
    pub fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Ties the tree to `token`: the tree runs on a child token, so
    /// cancelling `token` stops it while `cancel()` on the tree leaves
    /// `token` alone.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn visitor(mut self, visitor: impl FnMut(&dyn Node<B>) + Send + 'static) -> Self {
        self.visitor = Some(Box::new(visitor));
        self
    }

    /// Build the tree
    ///
    /// # Errors
    ///
    /// Lists every problem found: a missing root, an empty event queue.
    pub fn build(self) -> std::result::Result<BehaviorTree<B>, ConfigError> {
        let mut check = ConfigCheck::new("BehaviorTree");
        self.config.validate(&mut check);
        let Some(root) = self.root else {
            return Err(check.reject("root is not set"));
        };
        check.finish()?;

        let (events_tx, events_rx) = mpsc::channel(self.config.event_buffer_size);
        let cancel = self
            .cancel
            .map_or_else(CancellationToken::new, |parent| parent.child_token());

        Ok(BehaviorTree {
            root,
            blackboard: self.blackboard,
            config: self.config,
            cancel,
            events_tx: Some(events_tx),
            events_rx,
            visitor: self.visitor,
            ticks: 0,
            tasks: JoinSet::new(),
        })
    }
}
