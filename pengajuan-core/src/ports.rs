mod application;
mod file;
mod requirement;
mod submission;

pub use application::Application;
pub use file::FileRepository;
pub use requirement::RequirementRepository;
pub use submission::{SubmissionRepository, TransitionFailure, TransitionRequest};

/// The base trait shared by every repository port.
///
/// Implementations report storage failures through `Error`; expected
/// domain outcomes (a missing record, a stale status) are returned in the
/// `Ok` value instead.
pub trait Repository {
    /// The error type for underlying storage failures
    type Error: std::error::Error + Send + Sync + 'static;
}
