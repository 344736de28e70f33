//! Mapping between the host's flat step counter and assessment phases.

use thiserror::Error;

/// One semantic position in the assessment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Intro,
    TopicDescription(usize),
    TopicExercises(usize),
    Summary,
    Chat,
}

impl Phase {
    /// Topic index for the per-topic phases.
    #[must_use]
    pub fn topic_index(self) -> Option<usize> {
        match self {
            Phase::TopicDescription(i) | Phase::TopicExercises(i) => Some(i),
            _ => None,
        }
    }
}

/// How the host numbers its steps.
///
/// Both conventions give each topic a description phase followed by an
/// exercises phase; they differ only in where the counter starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepConvention {
    /// Intro at step 0, topic `i` at steps `2i + 1` (description) and `2i + 2`.
    #[default]
    DescriptionFirst,
    /// Same sequence shifted by one: intro at step 1.
    OneBased,
}

impl StepConvention {
    #[must_use]
    pub fn offset(self) -> usize {
        match self {
            StepConvention::DescriptionFirst => 0,
            StepConvention::OneBased => 1,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    #[error("step {step} is outside [{first}, {last}]")]
    InvalidStep { step: usize, first: usize, last: usize },

    #[error("topic {index} does not exist (topic count {topic_count})")]
    UnknownTopic { index: usize, topic_count: usize },

    #[error("cannot move before the intro")]
    BeforeIntro,

    #[error("cannot move past the chat")]
    PastChat,
}

/// Pure step ↔ phase resolver for one convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepIndexer {
    convention: StepConvention,
}

impl StepIndexer {
    #[must_use]
    pub fn new(convention: StepConvention) -> Self {
        Self { convention }
    }

    #[must_use]
    pub fn convention(&self) -> StepConvention {
        self.convention
    }

    /// Step of the intro phase.
    #[must_use]
    pub fn first_step(&self) -> usize {
        self.convention.offset()
    }

    /// Step of the chat phase, the last one.
    #[must_use]
    pub fn last_step(&self, topic_count: usize) -> usize {
        self.convention.offset() + 2 * topic_count + 2
    }

    /// Number of distinct steps, summary and chat included.
    #[must_use]
    pub fn total_steps(topic_count: usize) -> usize {
        2 * topic_count + 3
    }

    /// Resolves a step to its phase.
    ///
    /// # Errors
    ///
    /// Returns `StepError::InvalidStep` when `step` lies outside
    /// `[first_step, last_step]`.
    pub fn resolve(&self, step: usize, topic_count: usize) -> Result<Phase, StepError> {
        let first = self.first_step();
        let last = self.last_step(topic_count);
        if step < first || step > last {
            return Err(StepError::InvalidStep { step, first, last });
        }

        let relative = step - first;
        let summary = 2 * topic_count + 1;
        let phase = if relative == 0 {
            Phase::Intro
        } else if relative == summary {
            Phase::Summary
        } else if relative == summary + 1 {
            Phase::Chat
        } else {
            let topic = (relative - 1) / 2;
            if relative % 2 == 1 {
                Phase::TopicDescription(topic)
            } else {
                Phase::TopicExercises(topic)
            }
        };
        Ok(phase)
    }

    /// Inverse of [`StepIndexer::resolve`].
    ///
    /// # Errors
    ///
    /// Returns `StepError::UnknownTopic` for a per-topic phase whose index is
    /// not below `topic_count`.
    pub fn step_for(&self, phase: Phase, topic_count: usize) -> Result<usize, StepError> {
        let relative = match phase {
            Phase::Intro => 0,
            Phase::TopicDescription(i) | Phase::TopicExercises(i) if i >= topic_count => {
                return Err(StepError::UnknownTopic {
                    index: i,
                    topic_count,
                });
            }
            Phase::TopicDescription(i) => 2 * i + 1,
            Phase::TopicExercises(i) => 2 * i + 2,
            Phase::Summary => 2 * topic_count + 1,
            Phase::Chat => 2 * topic_count + 2,
        };
        Ok(self.first_step() + relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phases(indexer: StepIndexer, topic_count: usize) -> Vec<Phase> {
        (indexer.first_step()..=indexer.last_step(topic_count))
            .map(|s| indexer.resolve(s, topic_count).unwrap())
            .collect()
    }

    #[test]
    fn description_first_layout_for_two_topics() {
        let got = phases(StepIndexer::default(), 2);
        assert_eq!(
            got,
            vec![
                Phase::Intro,
                Phase::TopicDescription(0),
                Phase::TopicExercises(0),
                Phase::TopicDescription(1),
                Phase::TopicExercises(1),
                Phase::Summary,
                Phase::Chat,
            ]
        );
    }

    #[test]
    fn content_phases_precede_one_summary_and_one_chat() {
        for topic_count in 0..8 {
            let got = phases(StepIndexer::default(), topic_count);
            let summary_at = got.iter().position(|p| *p == Phase::Summary).unwrap();
            assert_eq!(summary_at, 2 * topic_count + 1);
            let content: std::collections::HashSet<_> = got[..summary_at].iter().collect();
            assert_eq!(content.len(), 2 * topic_count + 1);
            assert_eq!(got.iter().filter(|p| **p == Phase::Summary).count(), 1);
            assert_eq!(got.iter().filter(|p| **p == Phase::Chat).count(), 1);
            assert_eq!(got.last(), Some(&Phase::Chat));
        }
    }

    #[test]
    fn one_based_convention_is_shifted_by_one() {
        let zero = StepIndexer::new(StepConvention::DescriptionFirst);
        let one = StepIndexer::new(StepConvention::OneBased);
        for step in 0..=zero.last_step(3) {
            assert_eq!(zero.resolve(step, 3), one.resolve(step + 1, 3));
        }
        assert!(matches!(
            one.resolve(0, 3),
            Err(StepError::InvalidStep { first: 1, .. })
        ));
    }

    #[test]
    fn steps_outside_the_range_are_rejected() {
        let indexer = StepIndexer::default();
        assert_eq!(
            indexer.resolve(9, 3),
            Err(StepError::InvalidStep {
                step: 9,
                first: 0,
                last: 8
            })
        );
        assert!(indexer.resolve(8, 3).is_ok());
    }

    #[test]
    fn zero_topics_go_from_intro_to_summary() {
        assert_eq!(
            phases(StepIndexer::default(), 0),
            vec![Phase::Intro, Phase::Summary, Phase::Chat]
        );
    }

    #[test]
    fn resolve_is_idempotent_and_inverted_by_step_for() {
        for convention in [StepConvention::DescriptionFirst, StepConvention::OneBased] {
            let indexer = StepIndexer::new(convention);
            for step in indexer.first_step()..=indexer.last_step(4) {
                let phase = indexer.resolve(step, 4).unwrap();
                assert_eq!(indexer.resolve(step, 4).unwrap(), phase);
                assert_eq!(indexer.step_for(phase, 4), Ok(step));
            }
        }
    }

    #[test]
    fn step_for_rejects_unknown_topics() {
        assert!(matches!(
            StepIndexer::default().step_for(Phase::TopicExercises(2), 2),
            Err(StepError::UnknownTopic { index: 2, .. })
        ));
    }
}
