use crate::models::{DateTime, FileId, Session, SubmissionId};
use crate::ports::{FileRepository, RequirementRepository, SubmissionRepository};
use std::future::Future;

/// The integration point of an application.
///
/// An application pairs a repository with the pieces that are a matter of
/// deployment rather than workflow: the clock, identifier generation, and
/// how a request's credentials become a [`Session`].
pub trait Application {
    /// The credentials carried by a request (e.g. a bearer token)
    type Context;

    /// The storage backend
    type Repository: SubmissionRepository + FileRepository + RequirementRepository;

    /// Access the repository.
    fn database(&self) -> &Self::Repository;

    /// The current time.
    fn now(&self) -> DateTime;

    /// A fresh submission id.
    fn generate_submission_id(&self) -> SubmissionId;

    /// A fresh file id.
    fn generate_file_id(&self) -> FileId;

    /// Resolve the session behind the request, or `None` if the credentials
    /// are missing or invalid.
    fn session(&self, context: &Self::Context) -> impl Future<Output = Option<Session>> + Send;
}
