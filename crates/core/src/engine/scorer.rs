//! Converts a topic's answers into a subject result.

use crate::engine::AnswerStore;
use crate::model::{Answer, MAX_POINTS, SubjectResult, Topic};

/// Scoring output for one topic.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicScore {
    pub subject: SubjectResult,
    /// One per exercise, in exercise order.
    pub answers: Vec<Answer>,
    pub correct: u32,
}

impl TopicScore {
    #[must_use]
    pub fn wrong(&self) -> u32 {
        u32::try_from(self.answers.len())
            .unwrap_or(u32::MAX)
            .saturating_sub(self.correct)
    }
}

/// Points each exercise of a topic is worth. Zero for a topic without exercises.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn points_per_exercise(exercise_count: usize) -> f64 {
    if exercise_count == 0 {
        0.0
    } else {
        MAX_POINTS / exercise_count as f64
    }
}

/// Scores a topic against the recorded answers.
///
/// Deterministic: identical inputs give identical output. An exercise without
/// a usable answer key, or without a recorded answer, counts as incorrect.
#[must_use]
pub fn score(topic: &Topic, store: &AnswerStore) -> TopicScore {
    let mut correct = 0_u32;
    let mut answers = Vec::with_capacity(topic.exercise_count());

    for (ordinal, exercise) in topic.exercises.iter().enumerate() {
        let selected = store.get(&topic.title, ordinal);
        let key = exercise.correct_index();
        if key.is_none() {
            tracing::warn!(
                target: "assess::data_quality",
                topic = %topic.title,
                exercise = ordinal + 1,
                correct_answer = ?exercise.correct_answer,
                "exercise has no usable answer key, scoring it as incorrect"
            );
        }

        let is_correct = matches!((selected, key), (Some(s), Some(k)) if s == k);
        if is_correct {
            correct = correct.saturating_add(1);
        }
        answers.push(Answer {
            exercise_id: topic.exercise_id(ordinal),
            selected_option_index: selected,
            selected_answer: selected
                .and_then(|s| exercise.options.get(s))
                .cloned()
                .unwrap_or_default(),
            is_correct,
        });
    }

    let points = f64::from(correct) * points_per_exercise(topic.exercise_count());
    TopicScore {
        subject: SubjectResult::new(topic.title.clone(), points),
        answers,
        correct,
    }
}
