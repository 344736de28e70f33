use std::sync::Arc;

use assess_core::engine::{self, EngineSettings, Phase};
use assess_core::model::{DiagnosticConfig, DiagnosticId, Identity, SubjectResult};
use storage::repository::{DiagnosticRepository, ResultRepository};

use super::progress::SessionProgress;
use super::service::{AssessmentSession, PendingAdvance};
use crate::Clock;
use crate::error::AssessmentError;
use crate::submission::SubmissionAdapter;

/// Result of a successful "next" action.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvanceOutcome {
    /// Phase the session moved to.
    pub phase: Phase,
    /// Subject result of the topic scored by this action, if any.
    pub scored: Option<SubjectResult>,
    /// True when this action submitted the final result.
    pub submitted: bool,
}

/// Orchestrates session start, resume, navigation, and submission.
#[derive(Clone)]
pub struct AssessmentLoopService {
    clock: Clock,
    diagnostics: Arc<dyn DiagnosticRepository>,
    results: Arc<dyn ResultRepository>,
    submission: SubmissionAdapter,
    settings: EngineSettings,
}

impl AssessmentLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        diagnostics: Arc<dyn DiagnosticRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            diagnostics,
            submission: SubmissionAdapter::new(Arc::clone(&results)),
            results,
            settings: EngineSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Fetch a diagnostic and start (or resume) a session for the student.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotFound` for an unknown diagnostic and
    /// `Transport`/`Parsing` for repository failures.
    pub async fn start_session(
        &self,
        diagnostic_id: &DiagnosticId,
        student: &Identity,
    ) -> Result<AssessmentSession, AssessmentError> {
        let config = self.diagnostics.get_diagnostic(diagnostic_id).await?;
        self.start_with_config(Arc::new(config), student).await
    }

    /// Start (or resume) a session for a config the host already holds.
    ///
    /// A prior result for the same diagnostic and student is replayed, so
    /// finished topics come back answered and scored.
    ///
    /// # Errors
    ///
    /// Returns `Transport`/`Parsing` when the prior-result lookup fails.
    pub async fn start_with_config(
        &self,
        config: Arc<DiagnosticConfig>,
        student: &Identity,
    ) -> Result<AssessmentSession, AssessmentError> {
        let started_at = self.clock.now();
        if config.id.is_blank() || student.user_id.is_blank() {
            return Ok(AssessmentSession::new(config, self.settings, started_at));
        }

        let prior = self
            .results
            .find_result(&config.id, &student.user_id)
            .await?;
        let Some(prior) = prior.into_result() else {
            return Ok(AssessmentSession::new(config, self.settings, started_at));
        };

        let replay = engine::replay_prior(&config, &prior);
        tracing::info!(
            diagnostic = %config.id,
            student = %student.user_id,
            completed = replay.completed.iter().filter(|done| **done).count(),
            "resuming from prior result"
        );
        Ok(AssessmentSession::resume(
            config,
            self.settings,
            started_at,
            replay,
        ))
    }

    /// Record an answer using the service clock for the time budget.
    ///
    /// # Errors
    ///
    /// See [`AssessmentSession::select_answer`].
    pub fn select_answer(
        &self,
        session: &mut AssessmentSession,
        ordinal: usize,
        option_index: usize,
    ) -> Result<(), AssessmentError> {
        session.select_answer(ordinal, option_index, self.clock.now())
    }

    #[must_use]
    pub fn progress(&self, session: &AssessmentSession) -> SessionProgress {
        session.progress(self.clock.now())
    }

    /// Handle "next": validate and score exercises, submit after the last
    /// topic, then move on.
    ///
    /// Nothing is committed unless every step succeeds, so a failed submission
    /// leaves the session as it was and the next call scores the topic again.
    /// The exclusive borrow keeps a second advance from starting while a
    /// submission is awaited; the payload is built before the await.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteAnswers` when exercises are unanswered,
    /// `MissingContext` when the submission lacks a diagnostic id or student,
    /// `Transport`/`Parsing` when the submission fails, and `InvalidStep` when
    /// already on the chat.
    pub async fn advance(
        &self,
        session: &mut AssessmentSession,
        student: &Identity,
    ) -> Result<AdvanceOutcome, AssessmentError> {
        let pending = session.prepare_advance()?;

        let submitted = if let PendingAdvance::Scored {
            totals,
            submit: true,
            ..
        } = &pending
        {
            let result = SubmissionAdapter::assemble(session.config(), student, totals)?;
            self.submission.submit(&result).await?;
            true
        } else {
            false
        };

        let scored = session.commit(pending);
        let phase = session.step_forward()?;
        Ok(AdvanceOutcome {
            phase,
            scored,
            submitted,
        })
    }

    /// Handle "back".
    ///
    /// # Errors
    ///
    /// Returns `InvalidStep` at the intro.
    pub fn go_back(&self, session: &mut AssessmentSession) -> Result<Phase, AssessmentError> {
        session.go_back()
    }
}
