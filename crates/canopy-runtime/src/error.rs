//! Errors surfaced by the tree driver.

use canopy_core::{ConfigError, NodeError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("tick {tick} aborted by a node error")]
    Node {
        tick: u64,
        #[source]
        source: NodeError,
    },

    #[error("continuation returned outside of a tokio runtime")]
    NoAsyncRuntime,

    #[error("event queue closed")]
    QueueClosed,
}
