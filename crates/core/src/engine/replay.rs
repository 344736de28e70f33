//! Restores a session from a previously submitted result.

use crate::engine::{AnswerStore, RunningTotals};
use crate::model::{DiagnosticConfig, DiagnosticResult};

/// State rebuilt from a prior result, without scoring anything again.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplayOutcome {
    pub answers: AnswerStore,
    /// Completion per topic, in config order.
    pub completed: Vec<bool>,
    pub totals: RunningTotals,
}

impl ReplayOutcome {
    /// Index of the first topic not yet completed.
    #[must_use]
    pub fn first_open_topic(&self) -> Option<usize> {
        self.completed.iter().position(|done| !done)
    }

    #[must_use]
    pub fn any_completed(&self) -> bool {
        self.completed.iter().any(|done| *done)
    }
}

/// Replays a prior result onto a config.
///
/// Answers are mapped back to option indexes by case-insensitive text match,
/// falling back to the persisted index when the text matches no option. A
/// topic counts as completed when the prior result holds a subject with the
/// same title; totals are rebuilt from those subjects in config order.
#[must_use]
pub fn replay_prior(config: &DiagnosticConfig, prior: &DiagnosticResult) -> ReplayOutcome {
    let mut answers = AnswerStore::new();
    let mut by_topic: Vec<Vec<&crate::model::Answer>> = vec![Vec::new(); config.topic_count()];

    for answer in &prior.answers {
        let (topic_index, ordinal) = match config.locate_exercise(&answer.exercise_id) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(
                    target: "assess::data_quality",
                    diagnostic = %config.id,
                    error = %err,
                    "skipping persisted answer"
                );
                continue;
            }
        };
        let topic = &config.topics[topic_index];
        let exercise = &topic.exercises[ordinal];
        let option = exercise.option_index_of(&answer.selected_answer).or_else(|| {
            answer
                .selected_option_index
                .filter(|index| *index < exercise.options.len())
        });
        match option {
            Some(option) => answers.set(&topic.title, ordinal, option),
            None => tracing::warn!(
                target: "assess::data_quality",
                exercise = %answer.exercise_id,
                selected = %answer.selected_answer,
                "persisted answer matches no option"
            ),
        }
        by_topic[topic_index].push(answer);
    }

    let mut completed = vec![false; config.topic_count()];
    let mut totals = RunningTotals::new();
    for (index, topic) in config.topics.iter().enumerate() {
        let Some(subject) = prior.subjects.iter().find(|s| s.title == topic.title) else {
            continue;
        };
        completed[index] = true;
        totals = totals.fold(
            subject.clone(),
            by_topic[index].iter().map(|a| (*a).clone()).collect(),
        );
    }

    ReplayOutcome {
        answers,
        completed,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{config, topic};
    use crate::model::{Answer, Identity, Rating, SubjectResult};

    fn prior(subjects: Vec<SubjectResult>, answers: Vec<Answer>) -> DiagnosticResult {
        DiagnosticResult {
            diagnostic_id: "diag-1".into(),
            student: Identity::new("Ana", "u-1"),
            teacher: Identity::new("Profesora", "t-1"),
            group: "3A".to_string(),
            good_answers: 0,
            wrong_answers: 0,
            rating: Rating::NeedsImprovement,
            subjects,
            answers,
        }
    }

    fn answer(id: &str, text: &str, index: Option<usize>, is_correct: bool) -> Answer {
        Answer {
            exercise_id: id.to_string(),
            selected_option_index: index,
            selected_answer: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn text_match_restores_option_and_completion() {
        let cfg = config(vec![topic("Suma", &["C", "A"]), topic("Resta", &["A"])]);
        let prior = prior(
            vec![SubjectResult::new("Suma", 5.0)],
            vec![
                answer("Suma_ex1", "TRES", None, true),
                answer("Suma_ex2", "dos", None, false),
            ],
        );

        let outcome = replay_prior(&cfg, &prior);

        assert_eq!(outcome.answers.get("Suma", 0), Some(2));
        assert_eq!(outcome.answers.get("Suma", 1), Some(1));
        assert_eq!(outcome.completed, vec![true, false]);
        assert_eq!(outcome.first_open_topic(), Some(1));
        assert_eq!(outcome.totals.good_answers(), 1);
        assert_eq!(outcome.totals.wrong_answers(), 1);
        assert_eq!(outcome.totals.subjects()[0].title, "Suma");
    }

    #[test]
    fn unknown_text_falls_back_to_the_persisted_index() {
        let cfg = config(vec![topic("Suma", &["A"])]);
        let prior = prior(vec![], vec![answer("Suma_ex1", "borrado", Some(3), false)]);
        let outcome = replay_prior(&cfg, &prior);
        assert_eq!(outcome.answers.get("Suma", 0), Some(3));
        assert!(!outcome.any_completed());
    }

    #[test]
    fn unmatched_answers_and_titles_are_skipped() {
        let cfg = config(vec![topic("Suma", &["A"])]);
        let prior = prior(
            vec![SubjectResult::new("Geometría", 10.0)],
            vec![
                answer("Geometría_ex1", "uno", Some(0), true),
                answer("Suma_ex1", "nada", Some(9), false),
            ],
        );
        let outcome = replay_prior(&cfg, &prior);
        assert_eq!(outcome.answers.get("Suma", 0), None);
        assert_eq!(outcome.completed, vec![false]);
        assert!(outcome.totals.subjects().is_empty());
    }

    #[test]
    fn totals_follow_config_order() {
        let cfg = config(vec![topic("Suma", &["A"]), topic("Resta", &["A"])]);
        let prior = prior(
            vec![
                SubjectResult::new("Resta", 10.0),
                SubjectResult::new("Suma", 0.0),
            ],
            vec![
                answer("Resta_ex1", "uno", Some(0), true),
                answer("Suma_ex1", "dos", Some(1), false),
            ],
        );
        let outcome = replay_prior(&cfg, &prior);
        let titles: Vec<_> = outcome
            .totals
            .subjects()
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, ["Suma", "Resta"]);
        assert_eq!(outcome.totals.answers()[0].exercise_id, "Suma_ex1");
        assert_eq!(outcome.first_open_topic(), None);
    }
}
