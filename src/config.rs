//! Queue construction settings.

/// Settings applied when a [`FairQueue`](crate::FairQueue) is created.
///
/// ```rust
/// use fairq::{FairQueue, QueueConfig};
///
/// let config = QueueConfig::default()
///     .with_initial_capacity(256)
///     .with_label("jobs")
///     .with_metrics(false);
/// let queue: FairQueue<u64> = FairQueue::with_config(config);
/// assert_eq!(queue.label(), "jobs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Number of items the store preallocates room for
    pub initial_capacity: usize,
    /// Whether metrics are recorded from the start
    pub metrics_enabled: bool,
    /// Name attached to every log event emitted by the queue
    pub label: &'static str,
}

impl QueueConfig {
    /// Label used when none is configured
    pub const DEFAULT_LABEL: &'static str = "fair-queue";

    /// Preallocate room for `capacity` stored items.
    ///
    /// This is a hint only; the queue stays unbounded.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enable or disable metrics collection
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    /// Set the label reported in log events
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            metrics_enabled: true,
            label: Self::DEFAULT_LABEL,
        }
    }
}
