use super::{FILE_COLUMNS, fetch_record};
use crate::{
    Db,
    types::{ContentRow, FileRow, Timestamp},
};
use pengajuan_core::{
    models::{
        DateTime, FileAttachment, FileContent, FileId, NewFile, Session, SubmissionId,
        VerificationUpdate,
    },
    ports::{FileRepository, TransitionFailure},
    workflow,
};

/// The stored size of some content.
///
/// SQLite integers are signed; content too large for one is refused rather
/// than recorded with a wrong size.
fn stored_size(content: &[u8]) -> Result<i64, sqlx::Error> {
    i64::try_from(content.len()).map_err(|err| sqlx::Error::Encode(Box::new(err)))
}

impl Db {
    async fn touch(
        tx: &mut sqlx::SqliteConnection,
        submission_id: SubmissionId,
        as_of: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("update submission set updated_at = ?2 where id = ?1")
            .bind(submission_id.0)
            .bind(as_of)
            .execute(&mut *tx)
            .await?;
        Ok(())
    }
}

impl FileRepository for Db {
    async fn put_file(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
        file: NewFile,
        as_of: DateTime,
    ) -> Result<Option<FileAttachment>, Self::Error> {
        let as_of = Timestamp::from(as_of);
        let size = stored_size(&file.content)?;
        let mut tx = self.writer.begin().await?;

        // The `where exists` keeps the foreign key from turning a missing
        // submission into a constraint error.
        let row = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            insert into
                submission_file (id, submission_id, file_type, category, file_name, size, content, verification_status, uploaded_at)
            select
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', ?8
            where
                exists (select 1 from submission where id = ?2)
            on conflict (submission_id, file_type, category) do update set
                file_name = excluded.file_name,
                size = excluded.size,
                content = excluded.content,
                verification_status = 'pending',
                verified_by = null,
                verified_at = null,
                uploaded_at = excluded.uploaded_at
            returning
                {FILE_COLUMNS}
            "#
        ))
        .bind(file_id.0)
        .bind(submission_id.0)
        .bind(file.file_type)
        .bind(file.category.as_str())
        .bind(file.file_name)
        .bind(size)
        .bind(file.content)
        .bind(as_of)
        .fetch_optional(&mut *tx)
        .await?;

        if row.is_some() {
            Self::touch(&mut tx, submission_id, as_of).await?;
        }
        tx.commit().await?;

        row.map(FileAttachment::try_from).transpose()
    }

    async fn replace_file(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
        file_name: String,
        content: Vec<u8>,
        as_of: DateTime,
    ) -> Result<Option<FileAttachment>, Self::Error> {
        let as_of = Timestamp::from(as_of);
        let size = stored_size(&content)?;
        let mut tx = self.writer.begin().await?;

        let row = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            update
                submission_file
            set
                file_name = ?3,
                size = ?4,
                content = ?5,
                verification_status = 'pending',
                verified_by = null,
                verified_at = null,
                uploaded_at = ?6
            where
                id = ?1
            and
                submission_id = ?2
            returning
                {FILE_COLUMNS}
            "#
        ))
        .bind(file_id.0)
        .bind(submission_id.0)
        .bind(file_name)
        .bind(size)
        .bind(content)
        .bind(as_of)
        .fetch_optional(&mut *tx)
        .await?;

        if row.is_some() {
            Self::touch(&mut tx, submission_id, as_of).await?;
        }
        tx.commit().await?;

        row.map(FileAttachment::try_from).transpose()
    }

    async fn verify_file(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
        update: VerificationUpdate,
        session: &Session,
        as_of: DateTime,
    ) -> Result<Result<Option<FileAttachment>, TransitionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let Some(record) = fetch_record(&mut tx, submission_id).await? else {
            return Ok(Err(TransitionFailure::DoesNotExist));
        };
        let Some(category) = record.file(file_id).map(|file| file.category) else {
            return Ok(Ok(None));
        };
        if let Err(err) = workflow::authorize_verification(
            session,
            &record,
            category,
            update.verification_status,
        ) {
            return Ok(Err(err.into()));
        }

        let row = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            update
                submission_file
            set
                verification_status = ?3,
                verification_notes = coalesce(?4, verification_notes),
                verified_by = ?5,
                verified_at = ?6
            where
                id = ?1
            and
                submission_id = ?2
            returning
                {FILE_COLUMNS}
            "#
        ))
        .bind(file_id.0)
        .bind(submission_id.0)
        .bind(update.verification_status.as_str())
        .bind(update.verification_notes)
        .bind(session.user_id.0)
        .bind(Timestamp::from(as_of))
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;

        row.map(FileAttachment::try_from).transpose().map(Ok)
    }

    async fn get_file_content(
        &self,
        submission_id: SubmissionId,
        file_id: FileId,
    ) -> Result<Option<FileContent>, Self::Error> {
        let row = sqlx::query_as::<_, ContentRow>(
            "select file_name, content from submission_file where id = ?1 and submission_id = ?2",
        )
        .bind(file_id.0)
        .bind(submission_id.0)
        .fetch_optional(&self.reader)
        .await?;

        Ok(row.map(Into::into))
    }
}
