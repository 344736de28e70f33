use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{DiagnosticId, Identity};
use crate::model::letter::letter_to_index;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseIdError {
    #[error("exercise id `{0}` does not belong to any topic")]
    UnknownTopic(String),

    #[error("exercise id `{0}` has no valid ordinal")]
    InvalidOrdinal(String),
}

/// Builds the stable id of an exercise: `<topicTitle>_ex<ordinal + 1>`.
#[must_use]
pub fn exercise_id(topic_title: &str, ordinal: usize) -> String {
    format!("{topic_title}_ex{}", ordinal + 1)
}

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub statement: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Letter of the correct option, `"A"` for the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: String,
}

impl Exercise {
    /// Zero-based index of the correct option.
    ///
    /// Returns `None` when the key is absent or not a letter in `A..=F`.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        let key = self.correct_answer.as_deref()?.trim();
        key.chars().next().and_then(letter_to_index)
    }

    /// Option index whose text matches `text`, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn option_index_of(&self, text: &str) -> Option<usize> {
        let wanted = text.trim().to_lowercase();
        self.options
            .iter()
            .position(|option| option.trim().to_lowercase() == wanted)
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// One gradeable unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Completion as stored with the content. Only carried through on the
    /// wire: sessions start every topic open and track completion themselves,
    /// from scoring or from a replayed prior result.
    #[serde(default)]
    pub completed: bool,
    /// Time allotted to the topic, in minutes. Zero means untimed.
    #[serde(default)]
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Topic {
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn exercise_id(&self, ordinal: usize) -> String {
        exercise_id(&self.title, ordinal)
    }
}

//
// ─── DIAGNOSTIC CONFIG ─────────────────────────────────────────────────────────
//

/// Read-only description of an assessment: a diagnostic, a module's exercise
/// set, or a timed simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticConfig {
    pub id: DiagnosticId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub group: String,
    /// Owner of the diagnostic, copied into submitted results.
    #[serde(default)]
    pub teacher: Identity,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl DiagnosticConfig {
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    #[must_use]
    pub fn topic_index(&self, title: &str) -> Option<usize> {
        self.topics.iter().position(|topic| topic.title == title)
    }

    /// Sum of topic durations. Zero for untimed assessments.
    #[must_use]
    pub fn time_budget(&self) -> Duration {
        let minutes: i64 = self.topics.iter().map(|t| i64::from(t.duration)).sum();
        Duration::minutes(minutes)
    }

    /// Splits an exercise id back into `(topic_index, ordinal)`.
    ///
    /// Titles may themselves contain `_ex`, so the longest title that prefixes
    /// the id wins.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseIdError::UnknownTopic` when no title prefixes the id and
    /// `ExerciseIdError::InvalidOrdinal` when the suffix is not a 1-based number
    /// within the topic.
    pub fn locate_exercise(&self, id: &str) -> Result<(usize, usize), ExerciseIdError> {
        let (topic_index, suffix) = self
            .topics
            .iter()
            .enumerate()
            .filter_map(|(index, topic)| {
                id.strip_prefix(topic.title.as_str())
                    .and_then(|rest| rest.strip_prefix("_ex"))
                    .map(|suffix| (index, topic.title.len(), suffix))
            })
            .max_by_key(|(_, title_len, _)| *title_len)
            .map(|(index, _, suffix)| (index, suffix))
            .ok_or_else(|| ExerciseIdError::UnknownTopic(id.to_owned()))?;

        let number: usize = suffix
            .parse()
            .map_err(|_| ExerciseIdError::InvalidOrdinal(id.to_owned()))?;
        let exercise_count = self.topics[topic_index].exercise_count();
        if number == 0 || number > exercise_count {
            return Err(ExerciseIdError::InvalidOrdinal(id.to_owned()));
        }
        Ok((topic_index, number - 1))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn exercise(options: &[&str], correct: Option<&str>) -> Exercise {
        Exercise {
            statement: "Pick one".to_string(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
            correct_answer: correct.map(str::to_owned),
            explanation: String::new(),
        }
    }

    /// Topic whose exercises have four options and the given answer keys.
    pub(crate) fn topic(title: &str, keys: &[&str]) -> Topic {
        Topic {
            title: title.to_string(),
            description: format!("About {title}"),
            exercises: keys
                .iter()
                .map(|k| exercise(&["uno", "dos", "tres", "cuatro"], Some(k)))
                .collect(),
            completed: false,
            duration: 10,
            image: None,
        }
    }

    pub(crate) fn config(topics: Vec<Topic>) -> DiagnosticConfig {
        DiagnosticConfig {
            id: DiagnosticId::new("diag-1"),
            title: "Diagnóstico".to_string(),
            description: String::new(),
            group: "3A".to_string(),
            teacher: Identity::new("Profesora", "t-1"),
            topics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{config, exercise, topic};
    use super::*;

    #[test]
    fn correct_index_reads_the_letter_key() {
        assert_eq!(exercise(&["a", "b"], Some("B")).correct_index(), Some(1));
        assert_eq!(exercise(&["a", "b"], Some(" C ")).correct_index(), Some(2));
    }

    #[test]
    fn missing_or_bad_key_has_no_index() {
        assert_eq!(exercise(&["a"], None).correct_index(), None);
        assert_eq!(exercise(&["a"], Some("")).correct_index(), None);
        assert_eq!(exercise(&["a"], Some("z")).correct_index(), None);
    }

    #[test]
    fn option_text_matches_case_insensitively() {
        let ex = exercise(&["Rojo", "Verde", "Azul"], Some("A"));
        assert_eq!(ex.option_index_of("AZUL"), Some(2));
        assert_eq!(ex.option_index_of("  verde "), Some(1));
        assert_eq!(ex.option_index_of("negro"), None);
    }

    #[test]
    fn exercise_ids_are_one_based() {
        assert_eq!(exercise_id("Fracciones", 0), "Fracciones_ex1");
        assert_eq!(topic("Álgebra", &["A"]).exercise_id(3), "Álgebra_ex4");
    }

    #[test]
    fn locate_exercise_prefers_the_longest_title() {
        let cfg = config(vec![
            topic("Suma", &["A", "B"]),
            topic("Suma_extra", &["A", "B", "C"]),
        ]);
        assert_eq!(cfg.locate_exercise("Suma_ex2"), Ok((0, 1)));
        assert_eq!(cfg.locate_exercise("Suma_extra_ex3"), Ok((1, 2)));
    }

    #[test]
    fn locate_exercise_rejects_unknown_or_out_of_range() {
        let cfg = config(vec![topic("Suma", &["A", "B"])]);
        assert!(matches!(
            cfg.locate_exercise("Resta_ex1"),
            Err(ExerciseIdError::UnknownTopic(_))
        ));
        assert!(matches!(
            cfg.locate_exercise("Suma_ex3"),
            Err(ExerciseIdError::InvalidOrdinal(_))
        ));
        assert!(matches!(
            cfg.locate_exercise("Suma_ex0"),
            Err(ExerciseIdError::InvalidOrdinal(_))
        ));
    }

    #[test]
    fn time_budget_sums_topic_minutes() {
        let cfg = config(vec![topic("A", &["A"]), topic("B", &["B"])]);
        assert_eq!(cfg.time_budget(), Duration::minutes(20));
    }

    #[test]
    fn config_deserializes_from_camel_case_payload() {
        let json = r#"{
            "id": "diag-9",
            "title": "Matemáticas",
            "group": "2B",
            "teacher": { "name": "Luis", "userId": "t-9" },
            "topics": [{
                "title": "Fracciones",
                "exercises": [{
                    "statement": "1/2 + 1/2",
                    "options": ["1", "2"],
                    "correctAnswer": "A"
                }]
            }]
        }"#;
        let cfg: DiagnosticConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.id.as_str(), "diag-9");
        assert_eq!(cfg.teacher.user_id.as_str(), "t-9");
        assert_eq!(cfg.topics[0].exercises[0].correct_index(), Some(0));
        assert!(!cfg.topics[0].completed);
    }
}
