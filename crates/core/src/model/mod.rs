mod diagnostic;
mod ids;
pub mod letter;
mod result;

pub use diagnostic::{DiagnosticConfig, Exercise, ExerciseIdError, Topic, exercise_id};
pub use ids::{DiagnosticId, Identity, UserId};
pub use letter::{index_to_letter, letter_to_index};
pub use result::{
    Answer, DiagnosticResult, EMPTY_BUCKET, MAX_POINTS, PriorResult, Rating, SubjectResult,
};

#[cfg(test)]
pub(crate) use diagnostic::fixtures;
