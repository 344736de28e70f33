use thiserror::Error;

use crate::engine::{AnswerError, IncompleteAnswers, StepError};
use crate::model::ExerciseIdError;

/// Umbrella error for the synchronous engine pieces.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Step(#[from] StepError),
    #[error(transparent)]
    Incomplete(#[from] IncompleteAnswers),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    ExerciseId(#[from] ExerciseIdError),
}
