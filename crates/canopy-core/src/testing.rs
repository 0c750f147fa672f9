//! Scripted leaves for unit tests.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Event, Node, NodeCore, NodeResult, Status, TickContext};

/// Lifecycle counters shared between a [`Scripted`] and the test body.
#[derive(Debug, Clone, Default)]
pub(crate) struct LifecycleCounts {
    enters: Arc<AtomicUsize>,
    ticks: Arc<AtomicUsize>,
    leaves: Arc<AtomicUsize>,
}

impl LifecycleCounts {
    pub(crate) fn enters(&self) -> usize {
        self.enters.load(Ordering::SeqCst)
    }

    pub(crate) fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    pub(crate) fn leaves(&self) -> usize {
        self.leaves.load(Ordering::SeqCst)
    }
}

/// Leaf that replays a fixed list of statuses, one per tick, repeating the
/// last entry once the script runs out.
pub(crate) struct Scripted<B> {
    core: NodeCore,
    script: Vec<Status>,
    cursor: usize,
    counts: LifecycleCounts,
    _bb: PhantomData<fn(&mut B)>,
}

impl<B> Scripted<B> {
    pub(crate) fn new(name: &str, script: Vec<Status>) -> (Self, LifecycleCounts) {
        let counts = LifecycleCounts::default();
        let leaf = Self {
            core: NodeCore::new(name),
            script,
            cursor: 0,
            counts: counts.clone(),
            _bb: PhantomData,
        };
        (leaf, counts)
    }

    pub(crate) fn boxed(name: &str, script: Vec<Status>) -> (Box<dyn Node<B>>, LifecycleCounts)
    where
        B: 'static,
    {
        let (leaf, counts) = Self::new(name, script);
        (Box::new(leaf), counts)
    }
}

impl<B> Node<B> for Scripted<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn enter(&mut self, _bb: &mut B) {
        self.counts.enters.fetch_add(1, Ordering::SeqCst);
    }

    fn tick(&mut self, _ctx: &TickContext, _bb: &mut B, _evt: &dyn Event) -> NodeResult<B> {
        self.counts.ticks.fetch_add(1, Ordering::SeqCst);
        let status = self
            .script
            .get(self.cursor)
            .or(self.script.last())
            .copied()
            .unwrap_or(Status::Success);
        self.cursor += 1;
        match status {
            Status::Success => NodeResult::Success,
            Status::Failure => NodeResult::Failure,
            Status::Running => NodeResult::running(),
            Status::Error => NodeResult::error(self.core.name(), "scripted error"),
        }
    }

    fn leave(&mut self, _bb: &mut B) -> Result<(), crate::NodeError> {
        self.counts.leaves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
