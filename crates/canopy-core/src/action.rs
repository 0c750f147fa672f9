//! Leaf library.
//!
//! Small ready-made leaves: constant outcomes ([`Succeed`], [`Fail`]),
//! a closure wrapper ([`FunctionAction`]) and two channel-backed leaves used
//! to observe a running tree from the outside ([`Counter`], [`Signaller`]).
//! Every leaf here finishes in a single tick.

use tokio::sync::mpsc;
use tracing::debug;

use crate::{BaseParams, Event, Node, NodeCore, NodeResult, TickContext};

/// Always succeeds.
pub struct Succeed {
    core: NodeCore,
}

impl Succeed {
    pub fn new(params: BaseParams) -> Self {
        Self {
            core: NodeCore::new(params.name_or("Succeed")),
        }
    }
}

impl<B> Node<B> for Succeed {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn tick(&mut self, _ctx: &TickContext, _bb: &mut B, _evt: &dyn Event) -> NodeResult<B> {
        NodeResult::Success
    }
}

/// Always fails.
pub struct Fail {
    core: NodeCore,
}

impl Fail {
    pub fn new(params: BaseParams) -> Self {
        Self {
            core: NodeCore::new(params.name_or("Fail")),
        }
    }
}

impl<B> Node<B> for Fail {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn tick(&mut self, _ctx: &TickContext, _bb: &mut B, _evt: &dyn Event) -> NodeResult<B> {
        NodeResult::Failure
    }
}

pub type ActionFn<B> = Box<dyn FnMut(&mut B) -> NodeResult<B> + Send>;

pub struct FunctionActionParams<B> {
    pub base: BaseParams,
    pub func: ActionFn<B>,
}

impl<B> FunctionActionParams<B> {
    pub fn new(
        name: impl Into<BaseParams>,
        func: impl FnMut(&mut B) -> NodeResult<B> + Send + 'static,
    ) -> Self {
        Self {
            base: name.into(),
            func: Box::new(func),
        }
    }
}

/// Leaf whose tick is a closure over the blackboard.
///
/// The closure decides the status, and may return `Running` with a
/// continuation like any hand-written leaf.
pub struct FunctionAction<B> {
    core: NodeCore,
    func: ActionFn<B>,
}

impl<B> FunctionAction<B> {
    pub fn new(params: FunctionActionParams<B>) -> Self {
        Self {
            core: NodeCore::new(params.base.name_or("FunctionAction")),
            func: params.func,
        }
    }
}

impl<B> Node<B> for FunctionAction<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn tick(&mut self, _ctx: &TickContext, bb: &mut B, _evt: &dyn Event) -> NodeResult<B> {
        (self.func)(bb)
    }
}

#[derive(Debug, Clone)]
pub struct CounterParams {
    pub base: BaseParams,
    pub limit: u32,
    pub count_tx: mpsc::UnboundedSender<u32>,
}

/// Counts its own activations.
///
/// Each activation bumps the count and publishes it on `count_tx`, then
/// succeeds while the count is below `limit` and fails once it reaches it.
/// The count survives across activations; nothing resets it.
pub struct Counter {
    core: NodeCore,
    limit: u32,
    count: u32,
    count_tx: mpsc::UnboundedSender<u32>,
}

impl Counter {
    pub fn new(params: CounterParams) -> Self {
        Self {
            core: NodeCore::new(params.base.name_or("Counter")),
            limit: params.limit,
            count: 0,
            count_tx: params.count_tx,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl<B> Node<B> for Counter {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn tick(&mut self, _ctx: &TickContext, _bb: &mut B, _evt: &dyn Event) -> NodeResult<B> {
        self.count = self.count.saturating_add(1);
        if self.count_tx.send(self.count).is_err() {
            debug!(target: "canopy::action", node = self.core.name(), "count receiver dropped");
        }
        if self.count < self.limit {
            NodeResult::Success
        } else {
            NodeResult::Failure
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignallerParams<T> {
    pub base: BaseParams,
    pub channel: mpsc::UnboundedSender<T>,
    pub signal: T,
}

/// Sends a clone of `signal` on `channel` and succeeds.
pub struct Signaller<T> {
    core: NodeCore,
    channel: mpsc::UnboundedSender<T>,
    signal: T,
}

impl<T> Signaller<T> {
    pub fn new(params: SignallerParams<T>) -> Self {
        Self {
            core: NodeCore::new(params.base.name_or("Signaller")),
            channel: params.channel,
            signal: params.signal,
        }
    }
}

impl<B, T: Clone + Send> Node<B> for Signaller<T> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn tick(&mut self, _ctx: &TickContext, _bb: &mut B, _evt: &dyn Event) -> NodeResult<B> {
        match self.channel.send(self.signal.clone()) {
            Ok(()) => NodeResult::Success,
            Err(_) => NodeResult::error(self.core.name(), "signal channel closed"),
        }
    }
}
