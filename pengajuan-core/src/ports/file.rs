use super::TransitionFailure;
use crate::models::{
    DateTime, FileAttachment, FileContent, FileId, NewFile, Session, SubmissionId,
    VerificationUpdate,
};
use std::future::Future;

/// Repository interface for attached files.
///
/// Every method is scoped to a submission; a file id that belongs to a
/// different submission is treated as missing.
pub trait FileRepository: super::Repository {
    /// Attach a file, or replace the content of the file with the same key
    /// and category.
    ///
    /// Either way the file's verification resets to pending. `file_id` is
    /// only used when no file with that key exists yet.
    ///
    /// Returns `None` if the submission does not exist.
    fn put_file(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
        file: NewFile,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Option<FileAttachment>, Self::Error>> + Send;

    /// Replace the content of an existing file, resetting it to pending.
    fn replace_file(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
        file_name: String,
        content: Vec<u8>,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Option<FileAttachment>, Self::Error>> + Send;

    /// Set the verification state of a file, provided the submission is in a
    /// status where `session` may verify files of its category.
    ///
    /// Notes are left untouched when the update carries none.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(Some(file))) with the updated file
    /// - Ok(Ok(None)) if the file does not exist
    /// - Ok(Err(failure)) if the submission is missing or the workflow
    ///   refuses the verification
    /// - Err(error) on storage failure
    fn verify_file(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
        update: VerificationUpdate,
        session: &Session,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<Option<FileAttachment>, TransitionFailure>, Self::Error>>
    + Send;

    /// Retrieve the stored content of a file.
    fn get_file_content(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
    ) -> impl Future<Output = Result<Option<FileContent>, Self::Error>> + Send;
}
