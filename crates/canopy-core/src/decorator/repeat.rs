//! Repeat decorators: [`RepeatUntil`] and its fixed-predicate forms.

use tracing::debug;

use crate::{
    BaseParams, Event, Node, NodeCore, NodeId, NodeKind, NodeResult, RepeatEvent, Status,
    TickContext, update,
};

/// Predicate deciding whether a terminal child result ends the repetition.
pub type UntilPredicate<B> = Box<dyn FnMut(&NodeResult<B>) -> bool + Send>;

pub struct RepeatUntilParams<B> {
    pub base: BaseParams,
    pub until: UntilPredicate<B>,
}

impl<B> RepeatUntilParams<B> {
    pub fn new(
        name: impl Into<BaseParams>,
        until: impl FnMut(&NodeResult<B>) -> bool + Send + 'static,
    ) -> Self {
        Self {
            base: name.into(),
            until: Box::new(until),
        }
    }
}

/// Re-runs its child until a predicate accepts one of its terminal results.
///
/// # Semantics
///
/// - `Running` from the child passes through untouched
/// - `Error` from the child is reported immediately; the predicate is not
///   consulted, so errors are never retried away
/// - `Success`/`Failure` are handed to the predicate, exactly once each and
///   in tick order:
///   - `true`: the child's result is reported and the activation closes
///   - `false`: `Running` is reported together with a [`RepeatEvent`]
///     addressed to this node, which the driver enqueues as soon as the step
///     ends, so an event-driven tree ticks it again; the child opens a fresh
///     activation on that tick. No task is spawned, so a tree stepped by
///     hand without a runtime repeats the same way
///
/// The same child instance is reused for every round. Whether its own
/// internal state resets between rounds is up to the child's `enter`.
pub struct RepeatUntil<B> {
    core: NodeCore,
    child: Box<dyn Node<B>>,
    until: UntilPredicate<B>,
}

impl<B> RepeatUntil<B> {
    pub fn new(params: RepeatUntilParams<B>, child: Box<dyn Node<B>>) -> Self {
        Self {
            core: NodeCore::new(params.base.name_or("RepeatUntil")),
            child,
            until: params.until,
        }
    }
}

impl<B: 'static> Node<B> for RepeatUntil<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B> {
        let result = update(self.child.as_mut(), ctx, bb, evt);
        match result.status() {
            Status::Running | Status::Error => result,
            Status::Success | Status::Failure => {
                if (self.until)(&result) {
                    return result;
                }
                debug!(
                    target: "canopy::repeat",
                    node = self.core.name(),
                    child_status = result.status().as_str(),
                    "predicate unmet, repeating child"
                );
                request_repeat(self.core.id())
            }
        }
    }

    fn children(&self) -> &[Box<dyn Node<B>>] {
        std::slice::from_ref(&self.child)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Decorator
    }
}

fn request_repeat<B>(target: NodeId) -> NodeResult<B> {
    NodeResult::running_then(RepeatEvent { target })
}

macro_rules! until_status {
    ($(#[$meta:meta])* $name:ident, $status:expr, $default_name:literal) => {
        $(#[$meta])*
        pub struct $name<B>(RepeatUntil<B>);

        impl<B: 'static> $name<B> {
            pub fn new(child: Box<dyn Node<B>>) -> Self {
                Self::with_params(BaseParams::default(), child)
            }

            pub fn with_params(params: BaseParams, child: Box<dyn Node<B>>) -> Self {
                let base = BaseParams::new(params.name_or($default_name));
                let until = |result: &NodeResult<B>| result.status() == $status;
                Self(RepeatUntil::new(
                    RepeatUntilParams {
                        base,
                        until: Box::new(until),
                    },
                    child,
                ))
            }
        }

        impl<B: 'static> Node<B> for $name<B> {
            fn core(&self) -> &NodeCore {
                self.0.core()
            }

            fn core_mut(&mut self) -> &mut NodeCore {
                self.0.core_mut()
            }

            fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B> {
                self.0.tick(ctx, bb, evt)
            }

            fn children(&self) -> &[Box<dyn Node<B>>] {
                self.0.children()
            }

            fn kind(&self) -> NodeKind {
                NodeKind::Decorator
            }
        }
    };
}

until_status!(
    /// Repeats its child until it succeeds, then reports `Success`.
    UntilSuccess,
    Status::Success,
    "UntilSuccess"
);

until_status!(
    /// Repeats its child until it fails, then reports `Failure`.
    UntilFailure,
    Status::Failure,
    "UntilFailure"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Scripted;
    use crate::{Fail, TickEvent};

    fn tick<N: Node<()>>(node: &mut N) -> NodeResult<()> {
        update(node, &TickContext::default(), &mut (), &TickEvent)
    }

    #[test]
    fn repeat_until_second_result_runs_two_activations() {
        let (child, counts) = Scripted::boxed("always fails", vec![Status::Failure]);
        let mut calls = 0;
        let mut repeat = RepeatUntil::new(
            RepeatUntilParams::new("RepeatUntilTwo", move |_: &NodeResult<()>| {
                calls += 1;
                calls == 2
            }),
            child,
        );

        let first = tick(&mut repeat);
        assert_eq!(first.status(), Status::Running);
        assert!(!first.has_continuation());
        let wake = first.requeued_event().expect("repeat requests another tick");
        assert!(wake.is::<RepeatEvent>());
        assert!(wake.is_addressed_to(repeat.id()));

        assert_eq!(tick(&mut repeat).status(), Status::Failure);
        assert_eq!(counts.enters(), 2);
        assert_eq!(counts.leaves(), 2);
    }

    #[test]
    fn predicate_sees_only_terminal_results() {
        let (child, _) = Scripted::boxed("child", vec![Status::Running, Status::Success]);
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = seen.clone();
        let mut repeat = RepeatUntil::new(
            RepeatUntilParams::new("Record", move |r: &NodeResult<()>| {
                log.lock().unwrap().push(r.status());
                true
            }),
            child,
        );

        assert_eq!(tick(&mut repeat).status(), Status::Running);
        assert_eq!(tick(&mut repeat).status(), Status::Success);
        assert_eq!(*seen.lock().unwrap(), vec![Status::Success]);
    }

    #[test]
    fn child_error_is_not_retried() {
        let (child, counts) = Scripted::boxed("broken", vec![Status::Error]);
        let mut repeat = RepeatUntil::new(
            RepeatUntilParams::new("Never", |_: &NodeResult<()>| false),
            child,
        );

        assert!(matches!(tick(&mut repeat), NodeResult::Error(_)));
        assert_eq!(counts.enters(), 1);
    }

    #[test]
    fn until_success_closes_on_first_success() {
        let (child, counts) =
            Scripted::boxed("flaky", vec![Status::Failure, Status::Failure, Status::Success]);
        let mut until = UntilSuccess::new(child);

        assert_eq!(tick(&mut until).status(), Status::Running);
        assert_eq!(tick(&mut until).status(), Status::Running);
        assert_eq!(tick(&mut until).status(), Status::Success);
        assert_eq!(counts.enters(), 3);
        assert_eq!(until.status(), Some(Status::Success));
    }

    #[test]
    fn until_failure_closes_with_failure() {
        let mut until: UntilFailure<()> = UntilFailure::new(Box::new(Fail::new(Default::default())));
        assert_eq!(tick(&mut until).status(), Status::Failure);
    }

    #[test]
    fn until_success_passes_running_through_without_repeating() {
        let (child, counts) = Scripted::boxed("slow", vec![Status::Running, Status::Running]);
        let mut until = UntilSuccess::new(child);

        let result = tick(&mut until);
        assert_eq!(result.status(), Status::Running);
        assert!(!result.has_continuation());
        assert!(result.requeued_event().is_none());
        tick(&mut until);
        assert_eq!(counts.enters(), 1);
    }
}
