use crate::engine::TopicScore;
use crate::model::{Answer, Rating, SubjectResult};

/// Totals folded across every topic scored in a session.
///
/// Append-only: folding never removes or reorders earlier entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunningTotals {
    good_answers: u32,
    wrong_answers: u32,
    subjects: Vec<SubjectResult>,
    answers: Vec<Answer>,
}

impl RunningTotals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the totals with one more topic folded in.
    #[must_use]
    pub fn fold(mut self, subject: SubjectResult, answers: Vec<Answer>) -> Self {
        for answer in &answers {
            if answer.is_correct {
                self.good_answers = self.good_answers.saturating_add(1);
            } else {
                self.wrong_answers = self.wrong_answers.saturating_add(1);
            }
        }
        self.subjects.push(subject);
        self.answers.extend(answers);
        self
    }

    #[must_use]
    pub fn fold_score(self, score: TopicScore) -> Self {
        self.fold(score.subject, score.answers)
    }

    #[must_use]
    pub fn good_answers(&self) -> u32 {
        self.good_answers
    }

    #[must_use]
    pub fn wrong_answers(&self) -> u32 {
        self.wrong_answers
    }

    #[must_use]
    pub fn subjects(&self) -> &[SubjectResult] {
        &self.subjects
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Points over max points across all subjects, as a percentage.
    ///
    /// Every subject counts at full weight, including a topic without
    /// exercises, which scores 0 of [`crate::model::MAX_POINTS`]. Zero when
    /// nothing has been scored.
    #[must_use]
    pub fn cumulative_percentage(&self) -> f64 {
        let (points, max_points) = self
            .subjects
            .iter()
            .fold((0.0, 0.0), |(p, m), s| (p + s.points, m + s.max_points));
        if max_points <= 0.0 {
            0.0
        } else {
            points / max_points * 100.0
        }
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        Rating::from_percentage(self.cumulative_percentage())
    }
}
