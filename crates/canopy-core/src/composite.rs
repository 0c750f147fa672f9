//! Composite nodes.
//!
//! Composite nodes control the execution flow of an ordered list of
//! children: [`Sequence`] (AND logic) and [`Selector`] (OR logic). Both
//! remember which child is in progress, so a `Running` child is resumed on
//! the next tick instead of restarting the list.

use crate::{
    BaseParams, ConfigCheck, ConfigError, Event, Node, NodeCore, NodeKind, NodeResult, Status,
    TickContext, update,
};

/// Executes children in order until one fails.
///
/// # Semantics
///
/// - `Success` advances to the next child within the same tick
/// - `Failure` or `Error` stops immediately and is reported as-is;
///   children after it are never entered
/// - `Running` is reported as-is (wake-up request included) and the sequence
///   resumes at the same child on the next tick
/// - if every child succeeds, the sequence succeeds
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub struct Sequence<B> {
    core: NodeCore,
    children: Vec<Box<dyn Node<B>>>,
    current: usize,
}

impl<B> Sequence<B> {
    /// Creates a sequence named "Sequence".
    ///
    /// # Errors
    ///
    /// Fails if `children` is empty.
    pub fn new(children: Vec<Box<dyn Node<B>>>) -> Result<Self, ConfigError> {
        Self::with_params(BaseParams::default(), children)
    }

    pub fn with_params(
        params: BaseParams,
        children: Vec<Box<dyn Node<B>>>,
    ) -> Result<Self, ConfigError> {
        let mut check = ConfigCheck::new("Sequence");
        check.require(!children.is_empty(), "Sequence must have at least one child");
        check.finish()?;

        Ok(Self {
            core: NodeCore::new(params.name_or("Sequence")),
            children,
            current: 0,
        })
    }
}

impl<B> Node<B> for Sequence<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn enter(&mut self, _bb: &mut B) {
        self.current = 0;
    }

    fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B> {
        while let Some(child) = self.children.get_mut(self.current) {
            let result = update(child.as_mut(), ctx, bb, evt);
            match result.status() {
                Status::Success => self.current += 1, // Move to next child
                Status::Failure | Status::Running | Status::Error => return result,
            }
        }
        // All children succeeded
        NodeResult::Success
    }

    fn children(&self) -> &[Box<dyn Node<B>>] {
        &self.children
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }
}

/// Executes children in order until one succeeds.
///
/// # Semantics
///
/// - `Failure` advances to the next child within the same tick
/// - `Success` or `Error` stops immediately and is reported as-is
/// - `Running` is reported as-is and resumed on the next tick
/// - if every child fails, the selector fails
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub struct Selector<B> {
    core: NodeCore,
    children: Vec<Box<dyn Node<B>>>,
    current: usize,
}

impl<B> Selector<B> {
    /// Creates a selector named "Selector".
    ///
    /// # Errors
    ///
    /// Fails if `children` is empty.
    pub fn new(children: Vec<Box<dyn Node<B>>>) -> Result<Self, ConfigError> {
        Self::with_params(BaseParams::default(), children)
    }

    pub fn with_params(
        params: BaseParams,
        children: Vec<Box<dyn Node<B>>>,
    ) -> Result<Self, ConfigError> {
        let mut check = ConfigCheck::new("Selector");
        check.require(!children.is_empty(), "Selector must have at least one child");
        check.finish()?;

        Ok(Self {
            core: NodeCore::new(params.name_or("Selector")),
            children,
            current: 0,
        })
    }
}

impl<B> Node<B> for Selector<B> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn enter(&mut self, _bb: &mut B) {
        self.current = 0;
    }

    fn tick(&mut self, ctx: &TickContext, bb: &mut B, evt: &dyn Event) -> NodeResult<B> {
        while let Some(child) = self.children.get_mut(self.current) {
            let result = update(child.as_mut(), ctx, bb, evt);
            match result.status() {
                Status::Failure => self.current += 1, // Try next child
                Status::Success | Status::Running | Status::Error => return result,
            }
        }
        // All children failed
        NodeResult::Failure
    }

    fn children(&self) -> &[Box<dyn Node<B>>] {
        &self.children
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Composite
    }
}
