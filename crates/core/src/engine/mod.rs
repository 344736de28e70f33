//! Synchronous pieces of the stepwise assessment engine.

mod aggregate;
mod answers;
mod replay;
pub mod scorer;
mod settings;
mod step;
mod validator;

pub use aggregate::RunningTotals;
pub use answers::{AnswerError, AnswerStore};
pub use replay::{ReplayOutcome, replay_prior};
pub use scorer::{TopicScore, points_per_exercise, score};
pub use settings::EngineSettings;
pub use step::{Phase, StepConvention, StepError, StepIndexer};
pub use validator::{IncompleteAnswers, can_advance};
