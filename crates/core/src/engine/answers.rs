use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::model::Topic;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("topic `{topic}` has no exercise #{number}")]
    UnknownExercise { topic: String, number: usize },

    #[error("exercise #{number} of `{topic}` has no option {option_index}")]
    UnknownOption {
        topic: String,
        number: usize,
        option_index: usize,
    },
}

/// Selected option per exercise, keyed by topic title and exercise ordinal.
///
/// Lives only in session memory; results are persisted through submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    answers: HashMap<String, BTreeMap<usize, usize>>,
}

impl AnswerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, overwriting any previous choice for the exercise.
    pub fn set(&mut self, topic_title: &str, ordinal: usize, option_index: usize) {
        self.answers
            .entry(topic_title.to_owned())
            .or_default()
            .insert(ordinal, option_index);
    }

    /// Like [`AnswerStore::set`], but checks the ordinal and option against the topic.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` when the exercise or option does not exist.
    pub fn record(
        &mut self,
        topic: &Topic,
        ordinal: usize,
        option_index: usize,
    ) -> Result<(), AnswerError> {
        let exercise = topic
            .exercises
            .get(ordinal)
            .ok_or_else(|| AnswerError::UnknownExercise {
                topic: topic.title.clone(),
                number: ordinal + 1,
            })?;
        if option_index >= exercise.options.len() {
            return Err(AnswerError::UnknownOption {
                topic: topic.title.clone(),
                number: ordinal + 1,
                option_index,
            });
        }
        self.set(&topic.title, ordinal, option_index);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, topic_title: &str, ordinal: usize) -> Option<usize> {
        self.answers
            .get(topic_title)
            .and_then(|by_ordinal| by_ordinal.get(&ordinal))
            .copied()
    }

    /// Ordinals of the topic's exercises that have no answer yet.
    #[must_use]
    pub fn missing(&self, topic: &Topic) -> Vec<usize> {
        (0..topic.exercise_count())
            .filter(|ordinal| self.get(&topic.title, *ordinal).is_none())
            .collect()
    }

    #[must_use]
    pub fn answered_count(&self, topic: &Topic) -> usize {
        topic.exercise_count() - self.missing(topic).len()
    }

    /// True iff every exercise of the topic has an answer.
    #[must_use]
    pub fn is_complete(&self, topic: &Topic) -> bool {
        self.missing(topic).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::topic;

    #[test]
    fn set_overwrites_previous_choice() {
        let mut store = AnswerStore::new();
        store.set("Suma", 0, 1);
        store.set("Suma", 0, 3);
        assert_eq!(store.get("Suma", 0), Some(3));
        assert_eq!(store.get("Suma", 1), None);
        assert_eq!(store.get("Resta", 0), None);
    }

    #[test]
    fn completeness_requires_every_ordinal() {
        let t = topic("Suma", &["A", "B", "C"]);
        let mut store = AnswerStore::new();
        store.set("Suma", 0, 0);
        store.set("Suma", 2, 0);
        assert!(!store.is_complete(&t));
        assert_eq!(store.missing(&t), vec![1]);
        assert_eq!(store.answered_count(&t), 2);

        store.set("Suma", 1, 2);
        assert!(store.is_complete(&t));
    }

    #[test]
    fn answers_for_other_topics_do_not_count() {
        let t = topic("Suma", &["A"]);
        let mut store = AnswerStore::new();
        store.set("Resta", 0, 0);
        assert!(!store.is_complete(&t));
    }

    #[test]
    fn record_checks_bounds() {
        let t = topic("Suma", &["A", "B"]);
        let mut store = AnswerStore::new();
        assert!(store.record(&t, 1, 3).is_ok());
        assert_eq!(
            store.record(&t, 2, 0),
            Err(AnswerError::UnknownExercise {
                topic: "Suma".into(),
                number: 3
            })
        );
        assert!(matches!(
            store.record(&t, 0, 4),
            Err(AnswerError::UnknownOption { option_index: 4, .. })
        ));
        assert_eq!(store.get("Suma", 0), None);
    }
}
