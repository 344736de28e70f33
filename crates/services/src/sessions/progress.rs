use assess_core::engine::Phase;
use chrono::Duration;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub step: usize,
    pub total_steps: usize,
    pub phase: Phase,
    pub topics_total: usize,
    pub topics_completed: usize,
    /// Zero outside the per-topic phases.
    pub answered_in_topic: usize,
    pub exercises_in_topic: usize,
    pub is_submitted: bool,
    /// `None` for untimed sessions.
    pub time_remaining: Option<Duration>,
}
