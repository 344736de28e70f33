use thiserror::Error;

use crate::engine::{AnswerStore, Phase};
use crate::model::Topic;

/// Exercises of a topic are still unanswered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("answer every exercise of `{topic}` before continuing ({} missing)", .missing.len())]
pub struct IncompleteAnswers {
    pub topic: String,
    /// 1-based numbers of the unanswered exercises.
    pub missing: Vec<usize>,
}

/// Gate for leaving the current phase.
///
/// Only `TopicExercises` is checked; every other phase passes. A missing topic
/// has nothing to answer and passes as well.
///
/// # Errors
///
/// Returns `IncompleteAnswers` when the topic has exercises without an answer.
pub fn can_advance(
    phase: Phase,
    answers: &AnswerStore,
    topic: Option<&Topic>,
) -> Result<(), IncompleteAnswers> {
    let (Phase::TopicExercises(_), Some(topic)) = (phase, topic) else {
        return Ok(());
    };
    let missing = answers.missing(topic);
    if missing.is_empty() {
        return Ok(());
    }
    Err(IncompleteAnswers {
        topic: topic.title.clone(),
        missing: missing.into_iter().map(|ordinal| ordinal + 1).collect(),
    })
}
