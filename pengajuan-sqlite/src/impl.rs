//! Repository trait implementations for the SQLite database.

use crate::{
    Db,
    types::{FileRow, SubmissionRow, decode},
};
use pengajuan_core::{
    models::{FileAttachment, FileCategory, RequiredFiles, SubmissionId, SubmissionRecord},
    ports::Repository,
};
use sqlx::SqliteConnection;

mod file;
mod requirement;
mod submission;

impl Repository for Db {
    type Error = sqlx::Error;
}

const SUBMISSION_COLUMNS: &str = "id, office_id, job_type, employee, notes, rejection_reason, \
     status, stamps, created_by, created_at, updated_at";

const FILE_COLUMNS: &str = "id, submission_id, file_type, category, file_name, size, \
     verification_status, verified_by, verified_at, verification_notes, uploaded_at";

/// Load a submission and its file metadata.
///
/// Inside a write transaction this sees the record exactly as the
/// transaction will change it.
async fn fetch_record(
    conn: &mut SqliteConnection,
    submission_id: SubmissionId,
) -> Result<Option<SubmissionRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, SubmissionRow>(&format!(
        "select {SUBMISSION_COLUMNS} from submission where id = ?1"
    ))
    .bind(submission_id.0)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let files = sqlx::query_as::<_, FileRow>(&format!(
        "select {FILE_COLUMNS} from submission_file where submission_id = ?1 order by uploaded_at, rowid"
    ))
    .bind(submission_id.0)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(FileAttachment::try_from)
    .collect::<Result<Vec<_>, _>>()?;

    row.into_record(files).map(Some)
}

/// Load both required lists of a job type.
async fn fetch_required(
    conn: &mut SqliteConnection,
    job_type: &str,
) -> Result<RequiredFiles, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        select
            category, file_type
        from
            required_file
        where
            job_type = ?1
        order by
            position
        "#,
    )
    .bind(job_type)
    .fetch_all(&mut *conn)
    .await?;

    let mut required = RequiredFiles::default();
    for (category, file_type) in rows {
        match decode::<FileCategory>("category", &category)? {
            FileCategory::Kabupaten => required.kabupaten.push(file_type),
            FileCategory::AdminWilayah => required.admin_wilayah.push(file_type),
        }
    }
    Ok(required)
}
