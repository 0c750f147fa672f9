//! The update algorithm: one node, one event, one lifecycle step.

use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::{Event, Node, NodeResult, Status};

/// Per-step context handed to every tick.
#[derive(Debug, Clone, Default)]
pub struct TickContext {
    tick: u64,
    cancel: CancellationToken,
}

impl TickContext {
    pub fn new(tick: u64, cancel: CancellationToken) -> Self {
        Self { tick, cancel }
    }

    /// Sequence number of the step, starting at 1 for the first.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Drives `node` through one tick.
///
/// Opens an activation (`enter`) unless one is already running, ticks,
/// records the status and closes the activation (`leave`) on any terminal
/// status. The tick result is returned unchanged; a failing `leave` is
/// logged and does not override it.
pub fn update<B, N>(node: &mut N, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B>
where
    N: Node<B> + ?Sized,
{
    if node.status() != Some(Status::Running) {
        trace!(target: "canopy::update", node = node.name(), id = %node.id(), "enter");
        node.enter(bb);
    }

    let result = node.tick(ctx, bb, evt);
    let status = result.status();
    node.core_mut().set_status(status);

    if status.is_terminal() {
        trace!(
            target: "canopy::update",
            node = node.name(),
            id = %node.id(),
            status = status.as_str(),
            "leave"
        );
        if let Err(err) = node.leave(bb) {
            warn!(
                target: "canopy::update",
                node = node.name(),
                id = %node.id(),
                error = %err,
                "leave failed"
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TickEvent;
    use crate::testing::Scripted;

    #[test]
    fn terminal_tick_enters_and_leaves_once() {
        let (mut leaf, counts) = Scripted::<()>::new("leaf", vec![Status::Success]);
        let ctx = TickContext::default();

        let result = update(&mut leaf, &ctx, &mut (), &TickEvent);

        assert_eq!(result.status(), Status::Success);
        assert_eq!(leaf.status(), Some(Status::Success));
        assert_eq!(counts.enters(), 1);
        assert_eq!(counts.leaves(), 1);
    }

    #[test]
    fn running_keeps_the_activation_open() {
        let (mut leaf, counts) =
            Scripted::<()>::new("leaf", vec![Status::Running, Status::Running, Status::Failure]);
        let ctx = TickContext::default();

        assert_eq!(update(&mut leaf, &ctx, &mut (), &TickEvent).status(), Status::Running);
        assert_eq!(update(&mut leaf, &ctx, &mut (), &TickEvent).status(), Status::Running);
        assert_eq!(counts.enters(), 1);
        assert_eq!(counts.leaves(), 0);

        assert_eq!(update(&mut leaf, &ctx, &mut (), &TickEvent).status(), Status::Failure);
        assert_eq!(counts.enters(), 1);
        assert_eq!(counts.leaves(), 1);
        assert_eq!(counts.ticks(), 3);
    }

    #[test]
    fn error_still_closes_the_activation() {
        let (mut leaf, counts) = Scripted::<()>::new("leaf", vec![Status::Error]);
        let ctx = TickContext::default();

        let result = update(&mut leaf, &ctx, &mut (), &TickEvent);

        assert!(matches!(result, NodeResult::Error(_)));
        assert_eq!(leaf.status(), Some(Status::Error));
        assert_eq!(counts.leaves(), 1);
    }

    #[test]
    fn next_activation_enters_again() {
        let (mut leaf, counts) =
            Scripted::<()>::new("leaf", vec![Status::Success, Status::Failure]);
        let ctx = TickContext::default();

        update(&mut leaf, &ctx, &mut (), &TickEvent);
        update(&mut leaf, &ctx, &mut (), &TickEvent);

        assert_eq!(counts.enters(), 2);
        assert_eq!(counts.leaves(), 2);
    }
}
