use crate::models::{
    DateTime, EventQuery, OfficeId, Page, Session, SubmissionData, SubmissionEvent,
    SubmissionId, SubmissionRecord, SubmissionStatus, UserId,
};
use crate::workflow::{Action, WorkflowError};
use std::future::Future;

/// Why a conditional write did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionFailure {
    /// No submission has the given id
    DoesNotExist,
    /// The submission is no longer in the expected status
    Conflict(SubmissionStatus),
    /// The workflow refuses the write against the record as it is now,
    /// e.g. a file was rejected after the caller last read it
    Refused(WorkflowError),
}

impl From<WorkflowError> for TransitionFailure {
    fn from(value: WorkflowError) -> Self {
        Self::Refused(value)
    }
}

/// An action to apply to a submission.
///
/// The repository re-authorizes it against the record and the required
/// lists read inside its write transaction, and applies it only if the
/// record is still in `from`. The resulting status comes from that check.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    /// The action being recorded in the history log
    pub action: Action,
    /// The status the caller's decision was made against
    pub from: SubmissionStatus,
    /// Who performs it
    pub session: Session,
    /// Notes supplied with the action
    pub notes: Option<String>,
    /// When it happens
    pub as_of: DateTime,
}

/// Repository interface for submission records and their transition log.
pub trait SubmissionRepository: super::Repository {
    /// Create a new draft owned by `office_id`.
    fn create_submission(
        &self,
        submission_id: SubmissionId,
        office_id: OfficeId,
        data: SubmissionData,
        created_by: UserId,
        as_of: DateTime,
    ) -> impl Future<Output = Result<SubmissionRecord, Self::Error>> + Send;

    /// Retrieve a submission together with its file metadata.
    fn get_submission(
        &self,
        submission_id: SubmissionId,
    ) -> impl Future<Output = Result<Option<SubmissionRecord>, Self::Error>> + Send;

    /// List submissions, newest first, optionally restricted to one office
    /// and one status.
    fn query_submissions(
        &self,
        office_id: Option<OfficeId>,
        status: Option<SubmissionStatus>,
    ) -> impl Future<Output = Result<Vec<SubmissionRecord>, Self::Error>> + Send;

    /// Overwrite the editable part of a submission, provided it is still in
    /// `expected` status and `session` may still edit it.
    fn update_submission(
        &self,
        submission_id: SubmissionId,
        expected: SubmissionStatus,
        session: &Session,
        data: SubmissionData,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<SubmissionRecord, TransitionFailure>, Self::Error>> + Send;

    /// Apply a status change and append it to the history log in one
    /// transaction.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(Some(record))) with the updated record
    /// - Ok(Ok(None)) if the record was deleted
    /// - Ok(Err(failure)) if the record is missing, its status moved on, or
    ///   the workflow no longer allows the action
    /// - Err(error) on storage failure
    fn transition(
        &self,
        submission_id: SubmissionId,
        request: TransitionRequest,
    ) -> impl Future<
        Output = Result<Result<Option<SubmissionRecord>, TransitionFailure>, Self::Error>,
    > + Send;

    /// Retrieve the transition log of a submission, newest first.
    ///
    /// The log is kept after the submission is deleted.
    fn get_history(
        &self,
        submission_id: SubmissionId,
        query: EventQuery,
        limit: usize,
    ) -> impl Future<Output = Result<Page<SubmissionEvent>, Self::Error>> + Send;
}
