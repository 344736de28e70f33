#![forbid(unsafe_code)]

pub mod error;
pub mod remote;
pub mod sessions;
pub mod submission;

pub use assess_core::Clock;

pub use error::{AssessmentError, MissingField};
pub use remote::{ApiConfig, RemoteRepository};
pub use sessions::{AdvanceOutcome, AssessmentLoopService, AssessmentSession, SessionProgress};
pub use submission::SubmissionAdapter;
