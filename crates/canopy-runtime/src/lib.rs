//! Driver for canopy behavior trees.
//!
//! Wraps a root node and its blackboard in a [`BehaviorTree`] that owns a
//! bounded event queue, spawns node continuations as tokio tasks and runs
//! the event loop until cancelled.
//!
//! ```no_run
//! use canopy_core::{TickEvent, builder::*};
//! use canopy_runtime::BehaviorTree;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), canopy_runtime::TreeError> {
//! let mut tree = BehaviorTree::builder(())
//!     .root(async_delayer("Wait", Duration::from_millis(100), succeed()))
//!     .build()?;
//! tree.event_loop(TickEvent).await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod tree;

pub use config::TreeConfig;
pub use error::{Result, TreeError};
pub use tree::{BehaviorTree, TreeBuilder, Visitor};
