//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use assess_core::engine::{AnswerError, IncompleteAnswers, StepError};
use storage::repository::StorageError;

/// Context a submission cannot go without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    DiagnosticId,
    Student,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::DiagnosticId => f.write_str("a diagnostic id"),
            MissingField::Student => f.write_str("an authenticated student"),
        }
    }
}

/// Errors emitted by the assessment session and its loop service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error(transparent)]
    InvalidStep(#[from] StepError),
    #[error(transparent)]
    IncompleteAnswers(#[from] IncompleteAnswers),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error("answers can only be chosen on an exercise step")]
    NotOnExercises,
    #[error("topic `{0}` is already scored")]
    TopicLocked(String),
    #[error("time is up, answers are locked")]
    TimeExpired,
    #[error("cannot submit without {0}")]
    MissingContext(MissingField),
    #[error("diagnostic not found")]
    NotFound,
    #[error("transport failure: {0}")]
    Transport(StorageError),
    #[error("could not parse response: {0}")]
    Parsing(String),
}

impl From<StorageError> for AssessmentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => AssessmentError::NotFound,
            StorageError::Serialization(msg) => AssessmentError::Parsing(msg),
            other => AssessmentError::Transport(other),
        }
    }
}

impl AssessmentError {
    /// Message fit for showing to the person taking the assessment.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AssessmentError::InvalidStep(_) => {
                "That step is not available. Please reload the assessment.".to_string()
            }
            AssessmentError::IncompleteAnswers(err) => {
                let numbers: Vec<String> = err.missing.iter().map(ToString::to_string).collect();
                format!(
                    "Please answer every question before continuing (missing: {}).",
                    numbers.join(", ")
                )
            }
            AssessmentError::Answer(_) => "That answer is not one of the options.".to_string(),
            AssessmentError::NotOnExercises => {
                "Answers can only be chosen while solving exercises.".to_string()
            }
            AssessmentError::TopicLocked(title) => {
                format!("\"{title}\" has already been graded and can no longer be changed.")
            }
            AssessmentError::TimeExpired => "Time is up. Your answers are locked.".to_string(),
            AssessmentError::MissingContext(field) => {
                format!("Your results could not be sent: {field} is missing.")
            }
            AssessmentError::NotFound => "This assessment does not exist.".to_string(),
            AssessmentError::Transport(_) => {
                "Your results could not be sent. Check your connection and press next to retry."
                    .to_string()
            }
            AssessmentError::Parsing(_) => {
                "The server sent an unexpected response. Please try again later.".to_string()
            }
        }
    }

    /// True for upstream logic or data defects, as opposed to ordinary user errors.
    #[must_use]
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            AssessmentError::InvalidStep(_) | AssessmentError::Parsing(_)
        )
    }
}

/// Logs a navigation defect apart from ordinary user errors.
pub(crate) fn log_step_defect(err: &StepError) {
    tracing::error!(target: "assess::defect", error = %err, "invalid step navigation");
}
