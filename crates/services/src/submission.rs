//! Boundary to the result persistence endpoint.

use std::sync::Arc;

use assess_core::engine::RunningTotals;
use assess_core::model::{DiagnosticConfig, DiagnosticResult, Identity};
use storage::repository::ResultRepository;

use crate::error::{AssessmentError, MissingField};

/// Assembles results and hands them to a `ResultRepository`.
///
/// One call is one attempt: there is no retry or backoff here.
#[derive(Clone)]
pub struct SubmissionAdapter {
    results: Arc<dyn ResultRepository>,
}

impl SubmissionAdapter {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Build the payload from the config, the student, and a snapshot of the totals.
    ///
    /// Teacher and group are copied from the config.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::MissingContext` when the diagnostic id is
    /// blank or the student identity is incomplete.
    pub fn assemble(
        config: &DiagnosticConfig,
        student: &Identity,
        totals: &RunningTotals,
    ) -> Result<DiagnosticResult, AssessmentError> {
        if config.id.is_blank() {
            tracing::warn!(title = %config.title, "submission skipped: no diagnostic id");
            return Err(AssessmentError::MissingContext(MissingField::DiagnosticId));
        }
        if student.is_incomplete() {
            tracing::warn!(diagnostic = %config.id, "submission skipped: no authenticated student");
            return Err(AssessmentError::MissingContext(MissingField::Student));
        }

        Ok(DiagnosticResult {
            diagnostic_id: config.id.clone(),
            student: student.clone(),
            teacher: config.teacher.clone(),
            group: config.group.clone(),
            good_answers: totals.good_answers(),
            wrong_answers: totals.wrong_answers(),
            rating: totals.rating(),
            subjects: totals.subjects().to_vec(),
            answers: totals.answers().to_vec(),
        })
    }

    /// Send an assembled result.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Transport` (or `Parsing`) when the repository fails.
    pub async fn submit(&self, result: &DiagnosticResult) -> Result<(), AssessmentError> {
        tracing::info!(
            diagnostic = %result.diagnostic_id,
            student = %result.student.user_id,
            rating = %result.rating,
            "submitting diagnostic result"
        );
        match self.results.submit_result(result).await {
            Ok(()) => {
                tracing::info!(diagnostic = %result.diagnostic_id, "diagnostic result submitted");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    diagnostic = %result.diagnostic_id,
                    error = %err,
                    "diagnostic result submission failed"
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{Answer, DiagnosticId, Rating, SubjectResult};

    fn build_config(id: &str) -> DiagnosticConfig {
        DiagnosticConfig {
            id: DiagnosticId::new(id),
            title: "Ciencias".to_string(),
            description: String::new(),
            group: "5C".to_string(),
            teacher: Identity::new("Rosa", "t-3"),
            topics: Vec::new(),
        }
    }

    fn build_totals() -> RunningTotals {
        RunningTotals::new().fold(
            SubjectResult::new("Células", 5.0),
            vec![
                Answer {
                    exercise_id: "Células_ex1".into(),
                    selected_option_index: Some(0),
                    selected_answer: "núcleo".into(),
                    is_correct: true,
                },
                Answer {
                    exercise_id: "Células_ex2".into(),
                    selected_option_index: Some(1),
                    selected_answer: "pared".into(),
                    is_correct: false,
                },
            ],
        )
    }

    #[test]
    fn assemble_copies_context_and_totals() {
        let result = SubmissionAdapter::assemble(
            &build_config("d-5"),
            &Identity::new("Ana", "u-1"),
            &build_totals(),
        )
        .unwrap();

        assert_eq!(result.diagnostic_id.as_str(), "d-5");
        assert_eq!(result.teacher, Identity::new("Rosa", "t-3"));
        assert_eq!(result.group, "5C");
        assert_eq!(result.good_answers, 1);
        assert_eq!(result.wrong_answers, 1);
        assert_eq!(result.rating, Rating::Fair);
        assert_eq!(result.subjects.len(), 1);
        assert_eq!(result.answers.len(), 2);
    }

    #[test]
    fn empty_diagnostic_id_is_missing_context() {
        let err = SubmissionAdapter::assemble(
            &build_config(""),
            &Identity::new("Ana", "u-1"),
            &build_totals(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssessmentError::MissingContext(MissingField::DiagnosticId)
        ));
    }

    #[test]
    fn anonymous_student_is_missing_context() {
        let err = SubmissionAdapter::assemble(
            &build_config("d-5"),
            &Identity::default(),
            &build_totals(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssessmentError::MissingContext(MissingField::Student)
        ));
    }
}
