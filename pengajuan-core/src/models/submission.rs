use super::{DateTime, FileAttachment, OfficeId, SubmissionId, SubmissionStatus, UserId};
use serde::{Deserialize, Serialize};

/// A snapshot of the employee the submission is about.
///
/// This is copied into the record when it is created or edited, so later
/// changes to the employee registry do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Employee {
    /// Full name
    pub name: String,
    /// Current position
    pub position: String,
    /// National civil-servant ID number (NIP)
    pub nip: String,
}

/// Who moved a record into a status, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct ActorStamp {
    /// When it happened
    pub at: DateTime,
    /// Who did it
    pub by: UserId,
}

/// The most recent actor stamp for each status a record has entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct Stamps {
    /// Sent for review
    pub submitted: Option<ActorStamp>,
    /// Office files accepted
    pub approved: Option<ActorStamp>,
    /// Office files refused
    pub rejected: Option<ActorStamp>,
    /// Forwarded to the central administrator
    pub admin_wilayah_submitted: Option<ActorStamp>,
    /// Regional files accepted
    pub admin_wilayah_approved: Option<ActorStamp>,
    /// Regional files refused
    pub admin_wilayah_rejected: Option<ActorStamp>,
    /// Granted
    pub final_approved: Option<ActorStamp>,
    /// Refused
    pub final_rejected: Option<ActorStamp>,
}

impl Stamps {
    /// Record that the record entered `status`.
    ///
    /// `Draft` has no stamp (creation is tracked separately) and
    /// `Resubmitted` shares the `submitted` slot.
    pub fn record(&mut self, status: SubmissionStatus, stamp: ActorStamp) {
        let slot = match status {
            SubmissionStatus::Draft => return,
            SubmissionStatus::Submitted | SubmissionStatus::Resubmitted => &mut self.submitted,
            SubmissionStatus::Approved => &mut self.approved,
            SubmissionStatus::Rejected => &mut self.rejected,
            SubmissionStatus::AdminWilayahSubmitted => &mut self.admin_wilayah_submitted,
            SubmissionStatus::AdminWilayahApproved => &mut self.admin_wilayah_approved,
            SubmissionStatus::AdminWilayahRejected => &mut self.admin_wilayah_rejected,
            SubmissionStatus::FinalApproved => &mut self.final_approved,
            SubmissionStatus::FinalRejected => &mut self.final_rejected,
        };
        *slot = Some(stamp);
    }
}

/// The editable part of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct SubmissionData {
    /// The employee the request is about
    pub employee: Employee,
    /// The target position category; selects the required office files
    pub job_type: String,
    /// Free-text notes from the originating office
    #[serde(default)]
    pub notes: Option<String>,
}

/// One employee's transfer/promotion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct SubmissionRecord {
    /// Identifier of the submission
    pub id: SubmissionId,
    /// The originating office that owns the record
    pub office_id: OfficeId,
    /// The target position category
    pub job_type: String,
    /// Employee snapshot
    pub employee: Employee,
    /// Free-text notes from the originating office
    #[serde(default)]
    pub notes: Option<String>,
    /// Reason given with the most recent rejection, cleared on re-submission
    #[serde(default)]
    pub rejection_reason: Option<String>,
    /// Current lifecycle state
    pub status: SubmissionStatus,
    /// Timestamp and actor for each status entered
    #[serde(default)]
    pub stamps: Stamps,
    /// Who created the record
    pub created_by: UserId,
    /// When the record was created
    pub created_at: DateTime,
    /// When the record last changed
    pub updated_at: DateTime,
    /// Attached files
    #[serde(default)]
    pub files: Vec<FileAttachment>,
}

impl SubmissionRecord {
    /// Find an attached file by id.
    pub fn file(&self, file_id: super::FileId) -> Option<&FileAttachment> {
        self.files.iter().find(|file| file.id == file_id)
    }
}
