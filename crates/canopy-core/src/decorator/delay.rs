//! Timer decorator that postpones its child.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::{
    BaseParams, ContinuationError, DelayFinished, Event, Node, NodeCore, NodeKind, NodeResult,
    TickContext, update,
};

#[derive(Debug, Clone, Default)]
pub struct AsyncDelayerParams {
    pub base: BaseParams,
    pub delay: Duration,
}

impl AsyncDelayerParams {
    pub fn new(name: impl Into<BaseParams>, delay: Duration) -> Self {
        Self {
            base: name.into(),
            delay,
        }
    }
}

/// Holds its child back until a delay has elapsed.
///
/// # Semantics
///
/// - the first tick of an activation arms a timer and reports `Running`
///   with a continuation that sleeps for `delay`, then enqueues a
///   [`DelayFinished`] addressed to this node
/// - every tick before that event arrives reports plain `Running`
/// - the matching `DelayFinished` ticks the child, and from then on every
///   tick of the activation goes to the child, so the child may itself be
///   asynchronous
///
/// A `DelayFinished` left over from an earlier activation carries a
/// different `start` and is ignored. If the tree is cancelled while the
/// timer runs, the continuation returns [`ContinuationError::Interrupted`]
/// and enqueues nothing.
pub struct AsyncDelayer<B> {
    core: NodeCore,
    child: Box<dyn Node<B>>,
    delay: Duration,
    start: Option<Instant>,
    armed: bool,
    elapsed: bool,
}

impl<B> AsyncDelayer<B> {
    pub fn new(params: AsyncDelayerParams, child: Box<dyn Node<B>>) -> Self {
        Self {
            core: NodeCore::new(params.base.name_or("AsyncDelayer")),
            child,
            delay: params.delay,
            start: None,
            armed: false,
            elapsed: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn is_own_completion(&self, evt: &dyn Event) -> bool {
        evt.downcast_ref::<DelayFinished>()
            .is_some_and(|done| done.target == self.core.id() && Some(done.start) == self.start)
    }
}

impl<B: 'static> Node<B> for AsyncDelayer<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn enter(&mut self, _bb: &mut B) {
        self.start = Some(Instant::now());
        self.armed = false;
        self.elapsed = false;
    }

    fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B> {
        if self.elapsed {
            return update(self.child.as_mut(), ctx, bb, evt);
        }

        if !self.armed {
            let Some(start) = self.start else {
                return NodeResult::error(self.core.name(), "ticked before enter");
            };
            self.armed = true;
            debug!(
                target: "canopy::delay",
                node = self.core.name(),
                delay = ?self.delay,
                "timer armed"
            );
            let target = self.core.id();
            let delay = self.delay;
            return NodeResult::running_with(move |cx| {
                let cancel = cx.cancellation_token().clone();
                let finished = cx.enqueue(DelayFinished { target, start });
                Box::pin(async move {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ContinuationError::Interrupted),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    finished.await
                })
            });
        }

        if self.is_own_completion(evt) {
            debug!(target: "canopy::delay", node = self.core.name(), "delay elapsed");
            self.elapsed = true;
            return update(self.child.as_mut(), ctx, bb, evt);
        }

        NodeResult::running()
    }

    fn children(&self) -> &[Box<dyn Node<B>>] {
        std::slice::from_ref(&self.child)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }
}
