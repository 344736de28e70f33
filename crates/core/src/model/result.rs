use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ids::{DiagnosticId, Identity};

/// Points a single topic is worth.
pub const MAX_POINTS: f64 = 10.0;

/// Placeholder value of the unused reporting buckets.
pub const EMPTY_BUCKET: &str = "0%";

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// A scored answer to one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// `<topicTitle>_ex<n>`, see [`crate::model::exercise_id`].
    pub exercise_id: String,
    #[serde(default)]
    pub selected_option_index: Option<usize>,
    /// Text of the selected option, used to restore answers on resume.
    #[serde(default)]
    pub selected_answer: String,
    pub is_correct: bool,
}

//
// ─── SUBJECT RESULT ────────────────────────────────────────────────────────────
//

/// Per-topic score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    pub title: String,
    pub points: f64,
    pub max_points: f64,
    pub percentage: f64,
    #[serde(rename = "N1", default = "empty_bucket")]
    pub n1: String,
    #[serde(rename = "N2", default = "empty_bucket")]
    pub n2: String,
    #[serde(rename = "N3", default = "empty_bucket")]
    pub n3: String,
    #[serde(rename = "N4", default = "empty_bucket")]
    pub n4: String,
}

fn empty_bucket() -> String {
    EMPTY_BUCKET.to_string()
}

impl SubjectResult {
    /// Result worth [`MAX_POINTS`] with empty reporting buckets.
    #[must_use]
    pub fn new(title: impl Into<String>, points: f64) -> Self {
        Self {
            title: title.into(),
            points,
            max_points: MAX_POINTS,
            percentage: points / MAX_POINTS * 100.0,
            n1: empty_bucket(),
            n2: empty_bucket(),
            n3: empty_bucket(),
            n4: empty_bucket(),
        }
    }
}

//
// ─── RATING ────────────────────────────────────────────────────────────────────
//

/// Coarse label for an aggregate percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    /// 90% and above.
    #[serde(rename = "Excelente")]
    Excellent,
    /// 70% up to 90%.
    #[serde(rename = "Bueno")]
    Good,
    /// 50% up to 70%.
    #[serde(rename = "Regular")]
    Fair,
    /// Below 50%.
    #[serde(rename = "Necesita Mejorar")]
    NeedsImprovement,
}

impl Rating {
    /// Classifies a percentage. Thresholds are inclusive lower bounds.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::Excellent
        } else if percentage >= 70.0 {
            Self::Good
        } else if percentage >= 50.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excelente",
            Self::Good => "Bueno",
            Self::Fair => "Regular",
            Self::NeedsImprovement => "Necesita Mejorar",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── DIAGNOSTIC RESULT ─────────────────────────────────────────────────────────
//

/// Payload handed to the submission endpoint once all topics are scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub diagnostic_id: DiagnosticId,
    pub student: Identity,
    pub teacher: Identity,
    #[serde(default)]
    pub group: String,
    pub good_answers: u32,
    pub wrong_answers: u32,
    pub rating: Rating,
    #[serde(default)]
    pub subjects: Vec<SubjectResult>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Answer of the "check prior result" request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorResult {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_result: Option<DiagnosticResult>,
}

impl PriorResult {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn found(result: DiagnosticResult) -> Self {
        Self {
            exists: true,
            diagnostic_result: Some(result),
        }
    }

    /// The prior result, if the lookup reported one.
    #[must_use]
    pub fn into_result(self) -> Option<DiagnosticResult> {
        if self.exists { self.diagnostic_result } else { None }
    }
}
