//! Builder utilities for ergonomic behavior tree construction.
//!
//! Instead of writing `Box::new(Sequence::new(vec![...])?)`, trees can be
//! spelled as nested calls:
//!
//! ```
//! use std::time::Duration;
//! use canopy_core::Node;
//! use canopy_core::builder::*;
//!
//! let tree = sequence::<()>(vec![
//!     async_delayer("Wait", Duration::from_millis(10), succeed()),
//!     inverter(fail()),
//! ])
//! .unwrap();
//! assert_eq!(tree.children().len(), 2);
//! ```
//!
//! Composite helpers return `Result` because an empty child list is a
//! configuration error.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::{
    AsyncDelayer, AsyncDelayerParams, BaseParams, ConfigError, Counter, CounterParams, Fail,
    FunctionAction, FunctionActionParams, Inverter, Node, NodeResult, RepeatUntil,
    RepeatUntilParams, Selector, Sequence, Signaller, SignallerParams, Succeed, UntilFailure,
    UntilSuccess,
};

/// Shorthand for `Box::new(Sequence::new(children)?)`.
#[inline]
pub fn sequence<B: 'static>(
    children: Vec<Box<dyn Node<B>>>,
) -> Result<Box<dyn Node<B>>, ConfigError> {
    Ok(Box::new(Sequence::new(children)?))
}

/// Shorthand for `Box::new(Selector::new(children)?)`.
#[inline]
pub fn selector<B: 'static>(
    children: Vec<Box<dyn Node<B>>>,
) -> Result<Box<dyn Node<B>>, ConfigError> {
    Ok(Box::new(Selector::new(children)?))
}

#[inline]
pub fn inverter<B: 'static>(child: Box<dyn Node<B>>) -> Box<dyn Node<B>> {
    Box::new(Inverter::new(child))
}

/// Repeats `child` until `until` accepts one of its terminal results.
#[inline]
pub fn repeat_until<B: 'static>(
    name: impl Into<BaseParams>,
    until: impl FnMut(&NodeResult<B>) -> bool + Send + 'static,
    child: Box<dyn Node<B>>,
) -> Box<dyn Node<B>> {
    Box::new(RepeatUntil::new(RepeatUntilParams::new(name, until), child))
}

#[inline]
pub fn until_success<B: 'static>(child: Box<dyn Node<B>>) -> Box<dyn Node<B>> {
    Box::new(UntilSuccess::new(child))
}

#[inline]
pub fn until_failure<B: 'static>(child: Box<dyn Node<B>>) -> Box<dyn Node<B>> {
    Box::new(UntilFailure::new(child))
}

#[inline]
pub fn async_delayer<B: 'static>(
    name: impl Into<BaseParams>,
    delay: Duration,
    child: Box<dyn Node<B>>,
) -> Box<dyn Node<B>> {
    Box::new(AsyncDelayer::new(AsyncDelayerParams::new(name, delay), child))
}

#[inline]
pub fn succeed<B: 'static>() -> Box<dyn Node<B>> {
    Box::new(Succeed::new(BaseParams::default()))
}

#[inline]
pub fn fail<B: 'static>() -> Box<dyn Node<B>> {
    Box::new(Fail::new(BaseParams::default()))
}

#[inline]
pub fn function_action<B: 'static>(
    name: impl Into<BaseParams>,
    func: impl FnMut(&mut B) -> NodeResult<B> + Send + 'static,
) -> Box<dyn Node<B>> {
    Box::new(FunctionAction::new(FunctionActionParams::new(name, func)))
}

#[inline]
pub fn counter<B: 'static>(
    name: impl Into<BaseParams>,
    limit: u32,
    count_tx: mpsc::UnboundedSender<u32>,
) -> Box<dyn Node<B>> {
    Box::new(Counter::new(CounterParams {
        base: name.into(),
        limit,
        count_tx,
    }))
}

#[inline]
pub fn signaller<B: 'static, T: Clone + Send + 'static>(
    name: impl Into<BaseParams>,
    channel: mpsc::UnboundedSender<T>,
    signal: T,
) -> Box<dyn Node<B>> {
    Box::new(Signaller::new(SignallerParams {
        base: name.into(),
        channel,
        signal,
    }))
}
