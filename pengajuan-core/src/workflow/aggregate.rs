//! Completeness predicates over a record's files.
//!
//! A required key is matched by an attachment with the same key and
//! category. A key with no matching attachment is "not approved" but is
//! never "rejected": documents that were never uploaded are incomplete, not
//! a problem the verifier flagged.

use crate::models::{FileAttachment, FileCategory, RequiredFiles, VerificationStatus};

fn matching<'a>(
    files: &'a [FileAttachment],
    file_type: &'a str,
    category: FileCategory,
) -> impl Iterator<Item = &'a FileAttachment> {
    files
        .iter()
        .filter(move |file| file.matches(file_type, category))
}

/// Every required key of `category` has an approved attachment.
pub fn all_required_approved(
    files: &[FileAttachment],
    required: &RequiredFiles,
    category: FileCategory,
) -> bool {
    required.for_category(category).iter().all(|key| {
        matching(files, key, category)
            .any(|file| file.verification_status == VerificationStatus::Approved)
    })
}

/// Some required key of `category` has an attachment that is rejected.
pub fn any_rejected(
    files: &[FileAttachment],
    required: &RequiredFiles,
    category: FileCategory,
) -> bool {
    required.for_category(category).iter().any(|key| {
        matching(files, key, category)
            .any(|file| file.verification_status == VerificationStatus::Rejected)
    })
}

/// Some required attachment, in either category, is still pending.
pub fn has_pending(files: &[FileAttachment], required: &RequiredFiles) -> bool {
    required.iter().any(|(category, key)| {
        matching(files, key, category)
            .any(|file| file.verification_status == VerificationStatus::Pending)
    })
}

/// Every required key of `category` has an attachment, whatever its status.
pub fn all_required_present(
    files: &[FileAttachment],
    required: &RequiredFiles,
    category: FileCategory,
) -> bool {
    required
        .for_category(category)
        .iter()
        .all(|key| matching(files, key, category).next().is_some())
}

/// The aggregate predicates for both categories, computed in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct VerificationSummary {
    /// All office files approved
    pub kabupaten_approved: bool,
    /// Some office file rejected
    pub kabupaten_rejected: bool,
    /// All regional files approved
    pub admin_wilayah_approved: bool,
    /// Some regional file rejected
    pub admin_wilayah_rejected: bool,
    /// Some required file pending
    pub has_pending: bool,
}

impl VerificationSummary {
    /// Compute the summary for a set of files.
    pub fn compute(files: &[FileAttachment], required: &RequiredFiles) -> Self {
        Self {
            kabupaten_approved: all_required_approved(files, required, FileCategory::Kabupaten),
            kabupaten_rejected: any_rejected(files, required, FileCategory::Kabupaten),
            admin_wilayah_approved: all_required_approved(
                files,
                required,
                FileCategory::AdminWilayah,
            ),
            admin_wilayah_rejected: any_rejected(files, required, FileCategory::AdminWilayah),
            has_pending: has_pending(files, required),
        }
    }
}
