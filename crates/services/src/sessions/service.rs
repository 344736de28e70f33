use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;

use assess_core::engine::{
    self, AnswerStore, EngineSettings, Phase, ReplayOutcome, RunningTotals, StepError,
    StepIndexer,
};
use assess_core::model::{DiagnosticConfig, SubjectResult, Topic};
use assess_core::time::TimeBudget;

use super::progress::SessionProgress;
use crate::error::{AssessmentError, log_step_defect};

//
// ─── PENDING ADVANCE ───────────────────────────────────────────────────────────
//

/// What leaving the current step requires, computed without touching the session.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAdvance {
    /// Nothing to score.
    Move,
    /// The current topic was validated and scored. Commit once any required
    /// submission has succeeded.
    Scored {
        topic: usize,
        subject: SubjectResult,
        totals: RunningTotals,
        submit: bool,
    },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a diagnostic, module exercise set, or timed simulation.
///
/// Owns the step counter, the recorded answers, per-topic completion, and the
/// running totals. The config is shared read-only; completion is tracked here,
/// never written back into it.
pub struct AssessmentSession {
    config: Arc<DiagnosticConfig>,
    settings: EngineSettings,
    indexer: StepIndexer,
    step: usize,
    answers: AnswerStore,
    completed: Vec<bool>,
    totals: RunningTotals,
    budget: TimeBudget,
    submitted: bool,
}

impl AssessmentSession {
    /// Start a fresh session at the intro.
    ///
    /// `started_at` should come from the services layer clock.
    #[must_use]
    pub fn new(
        config: Arc<DiagnosticConfig>,
        settings: EngineSettings,
        started_at: DateTime<Utc>,
    ) -> Self {
        let indexer = StepIndexer::new(settings.step_convention);
        let budget = TimeBudget::new(started_at, config.time_budget());
        Self {
            completed: vec![false; config.topic_count()],
            step: indexer.first_step(),
            indexer,
            config,
            settings,
            answers: AnswerStore::new(),
            totals: RunningTotals::new(),
            budget,
            submitted: false,
        }
    }

    /// Rebuild a session from a replayed prior result.
    ///
    /// Resumes at the description of the first topic not yet completed, or at
    /// the summary when every topic was already scored.
    #[must_use]
    pub fn resume(
        config: Arc<DiagnosticConfig>,
        settings: EngineSettings,
        started_at: DateTime<Utc>,
        replay: ReplayOutcome,
    ) -> Self {
        let mut session = Self::new(config, settings, started_at);
        let topic_count = session.config.topic_count();

        let mut completed = replay.completed;
        completed.resize(topic_count, false);

        let resume_at = if !completed.iter().any(|done| *done) {
            Phase::Intro
        } else if let Some(open) = completed.iter().position(|done| !done) {
            Phase::TopicDescription(open)
        } else {
            session.submitted = true;
            Phase::Summary
        };

        session.answers = replay.answers;
        session.totals = replay.totals;
        session.completed = completed;
        session.step = session
            .indexer
            .step_for(resume_at, topic_count)
            .unwrap_or_else(|_| session.indexer.first_step());
        session
    }

    #[must_use]
    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    #[must_use]
    pub fn totals(&self) -> &RunningTotals {
        &self.totals
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.budget.started_at()
    }

    /// Whether a topic was scored in this session or restored as scored.
    #[must_use]
    pub fn is_topic_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn completed_topics(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    /// Phase of the current step.
    ///
    /// # Errors
    ///
    /// Returns `StepError::InvalidStep` if the counter left the valid range,
    /// which indicates a navigation defect.
    pub fn phase(&self) -> Result<Phase, StepError> {
        self.indexer
            .resolve(self.step, self.config.topic_count())
            .inspect_err(log_step_defect)
    }

    /// Topic shown by the current step, with its index.
    #[must_use]
    pub fn current_topic(&self) -> Option<(usize, &Topic)> {
        let index = self.phase().ok()?.topic_index()?;
        self.config.topic(index).map(|topic| (index, topic))
    }

    /// Selected option for an exercise of the current topic.
    #[must_use]
    pub fn selected(&self, ordinal: usize) -> Option<usize> {
        let (_, topic) = self.current_topic()?;
        self.answers.get(&topic.title, ordinal)
    }

    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.budget.remaining(now)
    }

    #[must_use]
    pub fn is_time_expired(&self, now: DateTime<Utc>) -> bool {
        self.budget.is_expired(now)
    }

    #[must_use]
    pub fn progress(&self, now: DateTime<Utc>) -> SessionProgress {
        let phase = self.phase().unwrap_or(Phase::Intro);
        let (answered_in_topic, exercises_in_topic) = self
            .current_topic()
            .map(|(_, topic)| (self.answers.answered_count(topic), topic.exercise_count()))
            .unwrap_or((0, 0));
        SessionProgress {
            step: self.step,
            total_steps: StepIndexer::total_steps(self.config.topic_count()),
            phase,
            topics_total: self.config.topic_count(),
            topics_completed: self.completed_topics(),
            answered_in_topic,
            exercises_in_topic,
            is_submitted: self.submitted,
            time_remaining: self.budget.remaining(now),
        }
    }

    /// Record the chosen option for an exercise of the current topic.
    ///
    /// Choosing again overwrites the previous choice.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotOnExercises` outside an exercises step,
    /// `TopicLocked` for a topic already scored, `TimeExpired` when the
    /// settings lock answers after the time budget, and `Answer` for an
    /// exercise or option that does not exist.
    pub fn select_answer(
        &mut self,
        ordinal: usize,
        option_index: usize,
        now: DateTime<Utc>,
    ) -> Result<(), AssessmentError> {
        let Phase::TopicExercises(index) = self.phase()? else {
            return Err(AssessmentError::NotOnExercises);
        };
        let config = Arc::clone(&self.config);
        let topic = config.topic(index).ok_or(StepError::UnknownTopic {
            index,
            topic_count: config.topic_count(),
        })?;
        if self.is_topic_completed(index) {
            return Err(AssessmentError::TopicLocked(topic.title.clone()));
        }
        if self.settings.lock_answers_when_expired && self.budget.is_expired(now) {
            return Err(AssessmentError::TimeExpired);
        }

        self.answers.record(topic, ordinal, option_index)?;
        Ok(())
    }

    /// Step back one phase. Anything in flight is left alone.
    ///
    /// # Errors
    ///
    /// Returns `StepError::BeforeIntro` at the intro; the step is unchanged.
    pub fn go_back(&mut self) -> Result<Phase, AssessmentError> {
        if self.step <= self.indexer.first_step() {
            let err = StepError::BeforeIntro;
            log_step_defect(&err);
            return Err(err.into());
        }
        self.step -= 1;
        Ok(self.phase()?)
    }

    /// Validate and score the current step without changing anything.
    pub(crate) fn prepare_advance(&self) -> Result<PendingAdvance, AssessmentError> {
        let phase = self.phase()?;
        if phase == Phase::Chat {
            let err = StepError::PastChat;
            log_step_defect(&err);
            return Err(err.into());
        }
        let Phase::TopicExercises(index) = phase else {
            return Ok(PendingAdvance::Move);
        };
        if self.is_topic_completed(index) {
            return Ok(PendingAdvance::Move);
        }

        let topic = self.topic_at(index)?;
        engine::can_advance(phase, &self.answers, Some(topic))?;
        let score = engine::score(topic, &self.answers);
        let subject = score.subject.clone();
        let totals = self.totals.clone().fold_score(score);
        // Submit once this topic closes the set, whatever order topics finished in.
        let submit = self
            .completed
            .iter()
            .enumerate()
            .all(|(i, done)| i == index || *done);

        Ok(PendingAdvance::Scored {
            topic: index,
            subject,
            totals,
            submit,
        })
    }

    /// Apply a prepared advance. Returns the subject result it scored, if any.
    pub(crate) fn commit(&mut self, pending: PendingAdvance) -> Option<SubjectResult> {
        match pending {
            PendingAdvance::Move => None,
            PendingAdvance::Scored {
                topic,
                subject,
                totals,
                submit,
            } => {
                self.totals = totals;
                if let Some(done) = self.completed.get_mut(topic) {
                    *done = true;
                }
                if submit {
                    self.submitted = true;
                }
                Some(subject)
            }
        }
    }

    /// Move to the next phase.
    pub(crate) fn step_forward(&mut self) -> Result<Phase, AssessmentError> {
        if self.step >= self.indexer.last_step(self.config.topic_count()) {
            let err = StepError::PastChat;
            log_step_defect(&err);
            return Err(err.into());
        }
        self.step += 1;
        Ok(self.phase()?)
    }

    fn topic_at(&self, index: usize) -> Result<&Topic, StepError> {
        self.config.topic(index).ok_or(StepError::UnknownTopic {
            index,
            topic_count: self.config.topic_count(),
        })
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("diagnostic_id", &self.config.id)
            .field("topics_len", &self.config.topic_count())
            .field("step", &self.step)
            .field("completed", &self.completed)
            .field("good_answers", &self.totals.good_answers())
            .field("wrong_answers", &self.totals.wrong_answers())
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
