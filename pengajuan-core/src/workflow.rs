use crate::models::{
    FileCategory, RequiredFiles, Role, Session, SubmissionRecord, SubmissionStatus,
    VerificationStatus,
};
use thiserror::Error;

mod aggregate;
mod transition;

pub use aggregate::{
    VerificationSummary, all_required_approved, all_required_present, any_rejected, has_pending,
};
pub use transition::{Action, TRANSITIONS, Transition, can_transition, transition};

/// The file-based precondition an action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardFailure {
    /// A required file of the category has not been uploaded
    #[error("required {0} documents are missing")]
    MissingRequired(FileCategory),
    /// A required file of the category is not approved
    #[error("not every required {0} document is approved")]
    NotAllApproved(FileCategory),
    /// No required file of the category is rejected
    #[error("no required {0} document is rejected")]
    NothingRejected(FileCategory),
    /// A required file of the category is rejected
    #[error("a required {0} document is rejected")]
    RejectedPresent(FileCategory),
    /// A required file is waiting for (re-)verification
    #[error("a required document is awaiting verification")]
    PendingVerification,
}

/// Why a workflow operation is not permitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The role may not perform the operation at all
    #[error("{role} may not {operation}")]
    Forbidden {
        /// The acting role
        role: Role,
        /// What was attempted
        operation: String,
    },
    /// The operation targets a record of another office
    #[error("submission belongs to another office")]
    NotOwner,
    /// The operation is not available in the record's current status
    #[error("cannot {operation} a submission that is {status}")]
    InvalidStatus {
        /// The record's current status
        status: SubmissionStatus,
        /// What was attempted
        operation: String,
    },
    /// A file-based precondition failed
    #[error(transparent)]
    Guard(#[from] GuardFailure),
    /// Verification can only move a file to approved or rejected
    #[error("a file cannot be set back to {0}")]
    InvalidVerification(VerificationStatus),
}

fn check_role(session: &Session, roles: &[Role], operation: &str) -> Result<(), WorkflowError> {
    if roles.contains(&session.role) {
        Ok(())
    } else {
        Err(WorkflowError::Forbidden {
            role: session.role,
            operation: operation.to_owned(),
        })
    }
}

fn check_owner(session: &Session, record: &SubmissionRecord) -> Result<(), WorkflowError> {
    if session.role == Role::User && !session.owns(record) {
        Err(WorkflowError::NotOwner)
    } else {
        Ok(())
    }
}

fn check_status(
    record: &SubmissionRecord,
    allowed: &[SubmissionStatus],
    operation: &str,
) -> Result<(), WorkflowError> {
    if allowed.contains(&record.status) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidStatus {
            status: record.status,
            operation: operation.to_owned(),
        })
    }
}

fn guard(condition: bool, failure: GuardFailure) -> Result<(), WorkflowError> {
    if condition { Ok(()) } else { Err(failure.into()) }
}

fn check_guard(
    action: Action,
    record: &SubmissionRecord,
    required: &RequiredFiles,
) -> Result<(), WorkflowError> {
    use FileCategory::{AdminWilayah, Kabupaten};

    let files = record.files.as_slice();
    match action {
        Action::Resubmit if record.status == SubmissionStatus::Draft => guard(
            all_required_present(files, required, Kabupaten),
            GuardFailure::MissingRequired(Kabupaten),
        ),
        Action::Resubmit | Action::Delete => guard(
            !has_pending(files, required),
            GuardFailure::PendingVerification,
        ),
        Action::Approve => guard(
            all_required_approved(files, required, Kabupaten),
            GuardFailure::NotAllApproved(Kabupaten),
        ),
        Action::Reject => guard(
            any_rejected(files, required, Kabupaten),
            GuardFailure::NothingRejected(Kabupaten),
        ),
        Action::SubmitToCentral => {
            guard(
                all_required_present(files, required, AdminWilayah),
                GuardFailure::MissingRequired(AdminWilayah),
            )?;
            guard(
                !any_rejected(files, required, AdminWilayah),
                GuardFailure::RejectedPresent(AdminWilayah),
            )
        }
        Action::AdminWilayahApprove | Action::FinalApprove => guard(
            all_required_approved(files, required, AdminWilayah),
            GuardFailure::NotAllApproved(AdminWilayah),
        ),
        Action::AdminWilayahReject | Action::FinalReject => guard(
            any_rejected(files, required, AdminWilayah),
            GuardFailure::NothingRejected(AdminWilayah),
        ),
    }
}

/// Decide whether `session` may perform `action` on `record`.
///
/// Checks, in order: the role against the transition table, ownership for
/// office operators, the record's current status, and the file-based guard.
/// On success returns the status the record moves to (`None` for delete).
pub fn authorize(
    action: Action,
    session: &Session,
    record: &SubmissionRecord,
    required: &RequiredFiles,
) -> Result<Option<SubmissionStatus>, WorkflowError> {
    let row = transition(action);
    check_role(session, row.roles, action.as_str())?;
    check_owner(session, record)?;
    check_status(record, row.from, action.as_str())?;
    check_guard(action, record, required)?;
    Ok(row.to)
}

/// The actions `session` may perform on `record` right now.
///
/// These are exactly the actions for which [`authorize`] succeeds, which is
/// what decides the buttons a client offers.
pub fn available_actions(
    session: &Session,
    record: &SubmissionRecord,
    required: &RequiredFiles,
) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|action| authorize(*action, session, record, required).is_ok())
        .collect()
}

/// Decide whether `session` may edit the record's employee snapshot, job
/// type and notes.
pub fn authorize_edit(
    session: &Session,
    record: &SubmissionRecord,
    required: &RequiredFiles,
) -> Result<(), WorkflowError> {
    check_role(session, &[Role::User, Role::Admin], "edit")?;
    check_owner(session, record)?;
    check_status(
        record,
        &[SubmissionStatus::Draft, SubmissionStatus::Rejected],
        "edit",
    )?;
    guard(
        !has_pending(&record.files, required),
        GuardFailure::PendingVerification,
    )
}

/// Decide whether `session` may set a file of `category` to `target`.
///
/// Only approved and rejected are valid targets: a file returns to pending
/// only when its content is replaced.
pub fn authorize_verification(
    session: &Session,
    record: &SubmissionRecord,
    category: FileCategory,
    target: VerificationStatus,
) -> Result<(), WorkflowError> {
    if target == VerificationStatus::Pending {
        return Err(WorkflowError::InvalidVerification(target));
    }
    let operation = format!("verify {category} documents");
    match category {
        FileCategory::Kabupaten => {
            check_role(session, &[Role::AdminWilayah, Role::Admin], &operation)?;
            check_status(
                record,
                &[
                    SubmissionStatus::Submitted,
                    SubmissionStatus::Resubmitted,
                    SubmissionStatus::Rejected,
                ],
                &operation,
            )
        }
        FileCategory::AdminWilayah => {
            check_role(session, &[Role::Admin], &operation)?;
            check_status(
                record,
                &[
                    SubmissionStatus::AdminWilayahSubmitted,
                    SubmissionStatus::AdminWilayahApproved,
                ],
                &operation,
            )
        }
    }
}

/// Decide whether `session` may upload or replace a file of `category`.
pub fn authorize_upload(
    session: &Session,
    record: &SubmissionRecord,
    category: FileCategory,
) -> Result<(), WorkflowError> {
    let operation = format!("upload {category} documents");
    match category {
        FileCategory::Kabupaten => {
            check_role(session, &[Role::User, Role::Admin], &operation)?;
            check_owner(session, record)?;
            check_status(
                record,
                &[SubmissionStatus::Draft, SubmissionStatus::Rejected],
                &operation,
            )
        }
        FileCategory::AdminWilayah => {
            check_role(session, &[Role::AdminWilayah, Role::Admin], &operation)?;
            check_status(
                record,
                &[
                    SubmissionStatus::Approved,
                    SubmissionStatus::AdminWilayahRejected,
                ],
                &operation,
            )
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{file, record, session};
    use super::*;
    use crate::models::{FileAttachment, OfficeId};
    use rstest::rstest;

    use FileCategory::{AdminWilayah as W, Kabupaten as K};
    use SubmissionStatus as S;
    use VerificationStatus::{Approved as A, Pending as P, Rejected as R};

    fn required() -> RequiredFiles {
        RequiredFiles {
            kabupaten: vec!["sk_pangkat".into(), "ijazah".into()],
            admin_wilayah: vec!["rekomendasi".into()],
        }
    }

    #[test]
    fn draft_with_pending_file_cannot_be_deleted_or_edited() {
        let record = record(S::Draft, vec![file("sk_pangkat", K, P), file("ijazah", K, P)]);
        let owner = session(Role::User);

        assert_eq!(
            authorize(Action::Delete, &owner, &record, &required()),
            Err(GuardFailure::PendingVerification.into())
        );
        assert_eq!(
            authorize_edit(&owner, &record, &required()),
            Err(GuardFailure::PendingVerification.into())
        );
        assert!(!available_actions(&owner, &record, &required()).contains(&Action::Delete));
    }

    #[test]
    fn empty_draft_can_be_deleted_but_not_submitted() {
        let record = record(S::Draft, vec![]);
        let owner = session(Role::User);

        assert_eq!(authorize(Action::Delete, &owner, &record, &required()), Ok(None));
        assert_eq!(
            authorize(Action::Resubmit, &owner, &record, &required()),
            Err(GuardFailure::MissingRequired(K).into())
        );
    }

    #[test]
    fn complete_draft_is_submitted_by_its_office() {
        let record = record(S::Draft, vec![file("sk_pangkat", K, P), file("ijazah", K, P)]);

        assert_eq!(
            available_actions(&session(Role::User), &record, &required()),
            vec![Action::Resubmit]
        );

        let mut stranger = session(Role::User);
        stranger.office_id = Some(OfficeId(uuid::Uuid::from_u128(7)));
        assert_eq!(
            authorize(Action::Resubmit, &stranger, &record, &required()),
            Err(WorkflowError::NotOwner)
        );
    }

    #[test]
    fn rejected_record_waits_for_reverification_before_resubmit() {
        let owner = session(Role::User);
        let corrected = record(S::Rejected, vec![file("sk_pangkat", K, A), file("ijazah", K, P)]);
        assert_eq!(
            authorize(Action::Resubmit, &owner, &corrected, &required()),
            Err(GuardFailure::PendingVerification.into())
        );

        let reverified = record(S::Rejected, vec![file("sk_pangkat", K, A), file("ijazah", K, A)]);
        assert_eq!(
            authorize(Action::Resubmit, &owner, &reverified, &required()),
            Ok(Some(S::Submitted))
        );
    }

    #[rstest]
    #[case::all_approved(vec![file("sk_pangkat", K, A), file("ijazah", K, A)], vec![Action::Approve])]
    #[case::one_rejected(vec![file("sk_pangkat", K, A), file("ijazah", K, R)], vec![Action::Reject])]
    #[case::one_missing(vec![file("sk_pangkat", K, A)], vec![])]
    fn regional_review_buttons(#[case] files: Vec<FileAttachment>, #[case] expected: Vec<Action>) {
        let record = record(S::Submitted, files);
        assert_eq!(
            available_actions(&session(Role::AdminWilayah), &record, &required()),
            expected
        );
        assert!(available_actions(&session(Role::User), &record, &required()).is_empty());
    }

    #[test]
    fn final_decision_is_gated_on_regional_files() {
        let admin = session(Role::Admin);
        let office_files = vec![file("sk_pangkat", K, A), file("ijazah", K, A)];

        let mut files = office_files.clone();
        files.push(file("rekomendasi", W, A));
        let approved = record(S::AdminWilayahApproved, files);
        assert_eq!(
            available_actions(&admin, &approved, &required()),
            vec![Action::FinalApprove]
        );
        assert_eq!(
            authorize(Action::FinalApprove, &session(Role::AdminWilayah), &approved, &required()),
            Err(WorkflowError::Forbidden {
                role: Role::AdminWilayah,
                operation: "final-approve".into()
            })
        );

        let mut files = office_files;
        files.push(file("rekomendasi", W, R));
        let refused = record(S::AdminWilayahApproved, files);
        assert_eq!(
            available_actions(&admin, &refused, &required()),
            vec![Action::FinalReject]
        );
    }

    #[test]
    fn submit_to_central_needs_regional_files() {
        let regional = session(Role::AdminWilayah);
        let office_files = vec![file("sk_pangkat", K, A), file("ijazah", K, A)];

        let missing = record(S::Approved, office_files.clone());
        assert_eq!(
            authorize(Action::SubmitToCentral, &regional, &missing, &required()),
            Err(GuardFailure::MissingRequired(W).into())
        );

        let mut files = office_files;
        files.push(file("rekomendasi", W, P));
        let ready = record(S::Approved, files);
        assert_eq!(
            authorize(Action::SubmitToCentral, &regional, &ready, &required()),
            Ok(Some(S::AdminWilayahSubmitted))
        );
    }

    #[test]
    fn wrong_status_is_reported_after_role() {
        let record = record(S::FinalApproved, vec![]);
        assert_eq!(
            authorize(Action::Approve, &session(Role::AdminWilayah), &record, &required()),
            Err(WorkflowError::InvalidStatus {
                status: S::FinalApproved,
                operation: "approve".into()
            })
        );
    }

    #[rstest]
    #[case(Role::AdminWilayah, K, S::Submitted, true)]
    #[case(Role::AdminWilayah, K, S::Rejected, true)]
    #[case(Role::AdminWilayah, K, S::Draft, false)]
    #[case(Role::User, K, S::Submitted, false)]
    #[case(Role::AdminWilayah, W, S::AdminWilayahSubmitted, false)]
    #[case(Role::Admin, W, S::AdminWilayahSubmitted, true)]
    #[case(Role::Admin, W, S::Approved, false)]
    fn verification_permissions(
        #[case] role: Role,
        #[case] category: FileCategory,
        #[case] status: SubmissionStatus,
        #[case] allowed: bool,
    ) {
        let record = record(status, vec![]);
        assert_eq!(
            authorize_verification(&session(role), &record, category, A).is_ok(),
            allowed
        );
    }

    #[test]
    fn verification_cannot_return_to_pending() {
        let record = record(S::Submitted, vec![]);
        assert_eq!(
            authorize_verification(&session(Role::Admin), &record, K, P),
            Err(WorkflowError::InvalidVerification(P))
        );
    }

    #[rstest]
    #[case(Role::User, K, S::Draft, true)]
    #[case(Role::User, K, S::Submitted, false)]
    #[case(Role::User, W, S::Approved, false)]
    #[case(Role::AdminWilayah, W, S::Approved, true)]
    #[case(Role::AdminWilayah, W, S::AdminWilayahRejected, true)]
    #[case(Role::AdminWilayah, K, S::Draft, false)]
    fn upload_permissions(
        #[case] role: Role,
        #[case] category: FileCategory,
        #[case] status: SubmissionStatus,
        #[case] allowed: bool,
    ) {
        let record = record(status, vec![]);
        assert_eq!(authorize_upload(&session(role), &record, category).is_ok(), allowed);
    }
}
