//! Row types used to map query results onto the core models.
//!
//! Identifiers are stored as UUID blobs, timestamps as UTC text, enums as
//! their wire strings and the employee snapshot and actor stamps as JSON.

use pengajuan_core::models::{
    Employee, FileAttachment, FileCategory, FileContent, Stamps, SubmissionEvent,
    SubmissionRecord, SubmissionStatus, VerificationStatus,
};
use sqlx::types::Json;
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

mod datetime;
pub(crate) use datetime::Timestamp;

/// Parse a stored enum value, reporting garbage as a decode error.
pub(crate) fn decode<T>(column: &str, value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|err: T::Err| sqlx::Error::ColumnDecode {
        index: column.to_owned(),
        source: err.to_string().into(),
    })
}

#[derive(sqlx::FromRow)]
pub(crate) struct SubmissionRow {
    pub id: Uuid,
    pub office_id: Uuid,
    pub job_type: String,
    pub employee: Json<Employee>,
    pub notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub status: String,
    pub stamps: Json<Stamps>,
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SubmissionRow {
    pub fn status(&self) -> Result<SubmissionStatus, sqlx::Error> {
        decode("status", &self.status)
    }

    pub fn into_record(self, files: Vec<FileAttachment>) -> Result<SubmissionRecord, sqlx::Error> {
        Ok(SubmissionRecord {
            status: self.status()?,
            id: self.id.into(),
            office_id: self.office_id.into(),
            job_type: self.job_type,
            employee: self.employee.0,
            notes: self.notes,
            rejection_reason: self.rejection_reason,
            stamps: self.stamps.0,
            created_by: self.created_by.into(),
            created_at: self.created_at.datetime(),
            updated_at: self.updated_at.datetime(),
            files,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FileRow {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub file_type: String,
    pub category: String,
    pub file_name: String,
    pub size: i64,
    pub verification_status: String,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<Timestamp>,
    pub verification_notes: Option<String>,
    pub uploaded_at: Timestamp,
}

impl TryFrom<FileRow> for FileAttachment {
    type Error = sqlx::Error;

    fn try_from(row: FileRow) -> Result<Self, Self::Error> {
        Ok(FileAttachment {
            id: row.id.into(),
            file_type: row.file_type,
            category: decode::<FileCategory>("category", &row.category)?,
            file_name: row.file_name,
            size: u64::try_from(row.size).map_err(|err| sqlx::Error::ColumnDecode {
                index: "size".to_owned(),
                source: Box::new(err),
            })?,
            verification_status: decode::<VerificationStatus>(
                "verification_status",
                &row.verification_status,
            )?,
            verified_by: row.verified_by.map(Into::into),
            verified_at: row.verified_at.map(Timestamp::datetime),
            verification_notes: row.verification_notes,
            uploaded_at: row.uploaded_at.datetime(),
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ContentRow {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl From<ContentRow> for FileContent {
    fn from(row: ContentRow) -> Self {
        FileContent {
            file_name: row.file_name,
            content: row.content,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct EventRow {
    pub seq: i64,
    pub action: String,
    pub from_status: String,
    pub to_status: Option<String>,
    pub actor: Uuid,
    pub notes: Option<String>,
    pub as_of: Timestamp,
}

impl TryFrom<EventRow> for SubmissionEvent {
    type Error = sqlx::Error;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(SubmissionEvent {
            seq: row.seq,
            action: decode("action", &row.action)?,
            from_status: decode("from_status", &row.from_status)?,
            to_status: row
                .to_status
                .as_deref()
                .map(|status| decode("to_status", status))
                .transpose()?,
            actor: row.actor.into(),
            notes: row.notes,
            as_of: row.as_of.datetime(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pengajuan_core::models::DateTime;

    fn file_row(size: i64) -> FileRow {
        let uploaded_at = Timestamp::from(DateTime::now());
        FileRow {
            id: Uuid::new_v4(),
            submission_id: Uuid::new_v4(),
            file_type: "ijazah".into(),
            category: "kabupaten".into(),
            file_name: "ijazah.pdf".into(),
            size,
            verification_status: "pending".into(),
            verified_by: None,
            verified_at: None,
            verification_notes: None,
            uploaded_at,
        }
    }

    #[test]
    fn file_rows_keep_their_size() {
        let file = FileAttachment::try_from(file_row(2048)).unwrap();
        assert_eq!(file.size, 2048);
        assert_eq!(file.category, FileCategory::Kabupaten);
    }

    #[test]
    fn a_negative_size_is_a_decode_error() {
        let err = FileAttachment::try_from(file_row(-1)).unwrap_err();
        assert!(
            matches!(&err, sqlx::Error::ColumnDecode { index, .. } if index == "size"),
            "{err:?}"
        );
    }

    #[test]
    fn garbage_enums_are_decode_errors() {
        let mut row = file_row(1);
        row.verification_status = "maybe".into();
        let err = FileAttachment::try_from(row).unwrap_err();
        assert!(
            matches!(&err, sqlx::Error::ColumnDecode { index, .. } if index == "verification_status"),
            "{err:?}"
        );
    }
}
