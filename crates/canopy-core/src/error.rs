//! Error types shared by nodes, continuations and tree construction.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Construction-time configuration failure.
///
/// Collects every problem found while validating a node or tree so the
/// caller sees the full list at once. No partially built value is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{context}: {}", problems.join("; "))]
    Invalid {
        context: &'static str,
        problems: Vec<String>,
    },
}

impl ConfigError {
    pub fn problems(&self) -> &[String] {
        match self {
            ConfigError::Invalid { problems, .. } => problems,
        }
    }
}

/// Accumulates validation problems for a single construction site.
#[derive(Debug)]
pub struct ConfigCheck {
    context: &'static str,
    problems: Vec<String>,
}

impl ConfigCheck {
    pub fn new(context: &'static str) -> Self {
        Self {
            context,
            problems: Vec::new(),
        }
    }

    /// Records `problem` unless `ok` holds.
    pub fn require(&mut self, ok: bool, problem: impl Into<String>) -> &mut Self {
        if !ok {
            self.problems.push(problem.into());
        }
        self
    }

    /// Records `problem` and turns everything collected so far into an error.
    pub fn reject(mut self, problem: impl Into<String>) -> ConfigError {
        self.problems.push(problem.into());
        ConfigError::Invalid {
            context: self.context,
            problems: self.problems,
        }
    }

    pub fn finish(self) -> Result<(), ConfigError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                context: self.context,
                problems: self.problems,
            })
        }
    }
}

/// Payload of a `Status::Error` tick result.
#[derive(Debug, Error)]
#[error("node `{node}` failed: {message}")]
pub struct NodeError {
    node: String,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl NodeError {
    pub fn new(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Name of the node that reported the error.
    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a continuation ended without delivering its completion event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContinuationError {
    #[error("continuation interrupted by cancellation")]
    Interrupted,

    #[error("event queue closed")]
    QueueClosed,

    #[error("event queue full")]
    QueueFull,

    #[error("continuation failed: {0}")]
    Failed(String),
}
