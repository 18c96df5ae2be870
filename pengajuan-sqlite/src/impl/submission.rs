use super::{FILE_COLUMNS, SUBMISSION_COLUMNS, fetch_record, fetch_required};
use crate::{
    Db,
    types::{EventRow, FileRow, SubmissionRow, Timestamp},
};
use pengajuan_core::{
    models::{
        ActorStamp, DateTime, EventQuery, FileAttachment, OfficeId, Page, Session, SubmissionData,
        SubmissionEvent, SubmissionId, SubmissionRecord, SubmissionStatus, UserId,
    },
    ports::{SubmissionRepository, TransitionFailure, TransitionRequest},
    workflow,
};
use sqlx::types::Json;
use std::collections::HashMap;
use uuid::Uuid;

impl SubmissionRepository for Db {
    async fn create_submission(
        &self,
        submission_id: SubmissionId,
        office_id: OfficeId,
        data: SubmissionData,
        created_by: UserId,
        as_of: DateTime,
    ) -> Result<SubmissionRecord, Self::Error> {
        let as_of = Timestamp::from(as_of);
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            insert into
                submission (id, office_id, job_type, employee, notes, status, stamps, created_by, created_at, updated_at)
            values
                (?1, ?2, ?3, ?4, ?5, 'draft', '{{}}', ?6, ?7, ?7)
            returning
                {SUBMISSION_COLUMNS}
            "#
        ))
        .bind(submission_id.0)
        .bind(office_id.0)
        .bind(data.job_type)
        .bind(Json(data.employee))
        .bind(data.notes)
        .bind(created_by.0)
        .bind(as_of)
        .fetch_one(&self.writer)
        .await?;

        row.into_record(Vec::new())
    }

    async fn get_submission(
        &self,
        submission_id: SubmissionId,
    ) -> Result<Option<SubmissionRecord>, Self::Error> {
        let mut conn = self.reader.acquire().await?;
        fetch_record(&mut conn, submission_id).await
    }

    async fn query_submissions(
        &self,
        office_id: Option<OfficeId>,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<SubmissionRecord>, Self::Error> {
        let office_id = office_id.map(|id| id.0);
        let status = status.map(|status| status.as_str());

        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            select
                {SUBMISSION_COLUMNS}
            from
                submission
            where
                (?1 is null or office_id = ?1)
            and
                (?2 is null or status = ?2)
            order by
                created_at desc, rowid desc
            "#
        ))
        .bind(office_id)
        .bind(status)
        .fetch_all(&self.reader)
        .await?;

        // One query for the files of every matching submission, grouped here
        let file_rows = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            select
                {FILE_COLUMNS}
            from
                submission_file
            where
                submission_id in (
                    select id from submission
                    where (?1 is null or office_id = ?1) and (?2 is null or status = ?2)
                )
            order by
                uploaded_at, rowid
            "#
        ))
        .bind(office_id)
        .bind(status)
        .fetch_all(&self.reader)
        .await?;

        let mut files: HashMap<Uuid, Vec<FileAttachment>> = HashMap::new();
        for row in file_rows {
            let submission_id = row.submission_id;
            files
                .entry(submission_id)
                .or_default()
                .push(FileAttachment::try_from(row)?);
        }

        rows.into_iter()
            .map(|row| {
                let attached = files.remove(&row.id).unwrap_or_default();
                row.into_record(attached)
            })
            .collect()
    }

    async fn update_submission(
        &self,
        submission_id: SubmissionId,
        expected: SubmissionStatus,
        session: &Session,
        data: SubmissionData,
        as_of: DateTime,
    ) -> Result<Result<SubmissionRecord, TransitionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let record = match locked_record(&mut tx, submission_id, expected).await? {
            Ok(record) => record,
            Err(failure) => return Ok(Err(failure)),
        };
        let required = fetch_required(&mut tx, &record.job_type).await?;
        if let Err(err) = workflow::authorize_edit(session, &record, &required) {
            return Ok(Err(err.into()));
        }

        sqlx::query(
            r#"
            update
                submission
            set
                job_type = ?2,
                employee = ?3,
                notes = ?4,
                updated_at = ?5
            where
                id = ?1
            "#,
        )
        .bind(submission_id.0)
        .bind(data.job_type)
        .bind(Json(data.employee))
        .bind(data.notes)
        .bind(Timestamp::from(as_of))
        .execute(&mut *tx)
        .await?;

        let updated = fetch_record(&mut tx, submission_id).await?;
        tx.commit().await?;

        Ok(updated.ok_or(TransitionFailure::DoesNotExist))
    }

    async fn transition(
        &self,
        submission_id: SubmissionId,
        request: TransitionRequest,
    ) -> Result<Result<Option<SubmissionRecord>, TransitionFailure>, Self::Error> {
        let mut tx = self.writer.begin().await?;

        let record = match locked_record(&mut tx, submission_id, request.from).await? {
            Ok(record) => record,
            Err(failure) => return Ok(Err(failure)),
        };
        let required = fetch_required(&mut tx, &record.job_type).await?;
        let to = match workflow::authorize(request.action, &request.session, &record, &required)
        {
            Ok(to) => to,
            Err(err) => return Ok(Err(err.into())),
        };

        let current = record.status;
        let actor = request.session.user_id;
        let as_of = Timestamp::from(request.as_of);

        match to {
            Some(to) => {
                let mut stamps = record.stamps;
                stamps.record(
                    to,
                    ActorStamp {
                        at: request.as_of,
                        by: actor,
                    },
                );

                let rejection_reason = if to.is_rejection() {
                    request.notes.clone()
                } else if matches!(
                    to,
                    SubmissionStatus::Submitted | SubmissionStatus::AdminWilayahSubmitted
                ) {
                    None
                } else {
                    record.rejection_reason
                };

                sqlx::query(
                    r#"
                    update
                        submission
                    set
                        status = ?2,
                        stamps = ?3,
                        rejection_reason = ?4,
                        updated_at = ?5
                    where
                        id = ?1
                    "#,
                )
                .bind(submission_id.0)
                .bind(to.as_str())
                .bind(Json(stamps))
                .bind(rejection_reason)
                .bind(as_of)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("delete from submission where id = ?1")
                    .bind(submission_id.0)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query(
            r#"
            insert into
                submission_event (submission_id, action, from_status, to_status, actor, notes, as_of)
            values
                (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(submission_id.0)
        .bind(request.action.as_str())
        .bind(current.as_str())
        .bind(to.map(|status| status.as_str()))
        .bind(actor.0)
        .bind(request.notes)
        .bind(as_of)
        .execute(&mut *tx)
        .await?;

        let updated = match to {
            Some(_) => fetch_record(&mut tx, submission_id).await?,
            None => None,
        };
        tx.commit().await?;

        Ok(Ok(updated))
    }

    async fn get_history(
        &self,
        submission_id: SubmissionId,
        query: EventQuery,
        limit: usize,
    ) -> Result<Page<SubmissionEvent>, Self::Error> {
        let limit_p1 = i64::try_from(limit)
            .map_err(|err| sqlx::Error::Encode(Box::new(err)))?
            .saturating_add(1);
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            select
                seq, action, from_status, to_status, actor, notes, as_of
            from
                submission_event
            where
                submission_id = ?1
            and
                (?2 is null or seq < ?2)
            order by
                seq desc
            limit ?3
            "#,
        )
        .bind(submission_id.0)
        .bind(query.before)
        .bind(limit_p1) // +1 to check if there are more results
        .fetch_all(&self.reader)
        .await?;

        let mut results = rows
            .into_iter()
            .map(SubmissionEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        // We paginate by fetching one extra row, dropping it, and pointing
        // the next query just past the last row we keep
        let more = if results.len() > limit {
            results.truncate(limit);
            results.last().map(|event| EventQuery {
                before: Some(event.seq),
            })
        } else {
            None
        };

        Ok(Page { results, more })
    }
}

/// Read a record inside `tx`, provided it is still in `expected` status.
async fn locked_record(
    tx: &mut sqlx::SqliteConnection,
    submission_id: SubmissionId,
    expected: SubmissionStatus,
) -> Result<Result<SubmissionRecord, TransitionFailure>, sqlx::Error> {
    Ok(match fetch_record(tx, submission_id).await? {
        None => Err(TransitionFailure::DoesNotExist),
        Some(record) if record.status != expected => {
            Err(TransitionFailure::Conflict(record.status))
        }
        Some(record) => Ok(record),
    })
}
