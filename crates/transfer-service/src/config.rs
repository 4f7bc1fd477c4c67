//! Service configuration
//!
//! Explicit, constructor-injected configuration - no environment-variable
//! statics.

/// Queue settings for the notification dispatcher
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Name of the queue notifications are submitted to
    pub queue_name: String,
}

impl QueueConfig {
    /// Create config for a named queue
    #[inline]
    #[must_use]
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::new("transfer-notifications")
    }
}
