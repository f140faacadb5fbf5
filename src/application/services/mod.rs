//! Business logic services for the application layer.

pub mod run;
pub mod submission;

pub use run::{RunError, RunService};
pub use submission::SubmissionService;
