use canopy_core::ConfigCheck;

/// Driver configuration shared by every tree instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Capacity of the bounded event queue.
    pub event_buffer_size: usize,
    /// Log the rendered tree at `debug` after every step.
    pub trace_steps: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            trace_steps: false,
        }
    }
}

impl TreeConfig {
    pub(crate) fn validate(&self, check: &mut ConfigCheck) {
        check.require(
            self.event_buffer_size > 0,
            "event buffer size must be positive",
        );
    }
}
