mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::AssessmentError;
pub use progress::SessionProgress;
pub use service::AssessmentSession;
pub use workflow::{AdvanceOutcome, AssessmentLoopService};
