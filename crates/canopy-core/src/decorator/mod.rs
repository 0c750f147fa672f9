//! Decorator nodes.
//!
//! Decorators wrap a single child and transform its result or the way it is
//! driven. This module provides [`Inverter`] (NOT logic), the repeat family
//! ([`RepeatUntil`], [`UntilSuccess`], [`UntilFailure`]) and the canonical
//! asynchronous node, [`AsyncDelayer`].

mod delay;
mod inverter;
mod repeat;

pub use delay::{AsyncDelayer, AsyncDelayerParams};
pub use inverter::Inverter;
pub use repeat::{RepeatUntil, RepeatUntilParams, UntilFailure, UntilSuccess, UntilPredicate};
