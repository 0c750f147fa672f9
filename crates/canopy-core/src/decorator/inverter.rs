//! Logical NOT over a child's result.

use crate::{BaseParams, Event, Node, NodeCore, NodeKind, NodeResult, TickContext, update};

/// Inverts the result of its child.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
/// - `Running` (with any wake-up request) and `Error` pass through untouched
///
/// This is analogous to a logical NOT (!) operation.
pub struct Inverter<B> {
    core: NodeCore,
    child: Box<dyn Node<B>>,
}

impl<B> Inverter<B> {
    /// Creates a new inverter that wraps the given child.
    pub fn new(child: Box<dyn Node<B>>) -> Self {
        Self::with_params(BaseParams::default(), child)
    }

    pub fn with_params(params: BaseParams, child: Box<dyn Node<B>>) -> Self {
        Self {
            core: NodeCore::new(params.name_or("Inverter")),
            child,
        }
    }
}

impl<B> Node<B> for Inverter<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B> {
        update(self.child.as_mut(), ctx, bb, evt).invert()
    }

    fn children(&self) -> &[Box<dyn Node<B>>] {
        std::slice::from_ref(&self.child)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }
}
