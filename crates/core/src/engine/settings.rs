use crate::engine::StepConvention;

/// Per-screen engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineSettings {
    pub step_convention: StepConvention,
    /// Reject answer changes once a timed session runs out of time.
    pub lock_answers_when_expired: bool,
}

impl EngineSettings {
    /// Settings for timed simulations: answers freeze when time is up.
    #[must_use]
    pub fn timed() -> Self {
        Self {
            lock_answers_when_expired: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_step_convention(mut self, convention: StepConvention) -> Self {
        self.step_convention = convention;
        self
    }
}
