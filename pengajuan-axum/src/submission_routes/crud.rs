use super::{Id, load_visible};
use crate::{ApiApplication, ApiError, session};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use pengajuan_core::{
    models::{Envelope, OfficeId, Role, SubmissionData, SubmissionRecord, SubmissionStatus},
    ports::{SubmissionRepository as _, TransitionRequest},
    workflow::Action,
};
use tracing::{Level, event};

/// Query parameters for listing submissions.
#[derive(serde::Deserialize, schemars::JsonSchema)]
pub(crate) struct ListQuery {
    /// Only return submissions in this status
    #[serde(default)]
    status: Option<SubmissionStatus>,
    /// Only return submissions of this office (ignored for office operators)
    #[serde(default)]
    office_id: Option<OfficeId>,
}

/// Request body for creating a submission.
#[derive(serde::Deserialize, schemars::JsonSchema)]
pub(crate) struct CreateSubmission {
    /// The owning office; required when the central administrator creates
    /// a record on an office's behalf, ignored for office operators
    #[serde(default)]
    office_id: Option<OfficeId>,
    #[serde(flatten)]
    data: SubmissionData,
}

/// List the submissions visible to the session, newest first.
///
/// # Authorization
///
/// Office operators see their own office's records; administrators see
/// everything and may filter by office.
///
/// # Returns
///
/// - `200 OK`: The matching submissions
/// - `401 Unauthorized`: Missing or invalid token
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn query_submissions<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<SubmissionRecord>>>, ApiError> {
    let session = session(&app, auth).await?;
    let office_id = session.office_scope(query.office_id);

    let records = app
        .database()
        .query_submissions(office_id, query.status)
        .await
        .map_err(ApiError::storage("failed to query submissions"))?;

    Ok(Json(Envelope::ok(records)))
}

/// Create a new draft.
///
/// # Authorization
///
/// Office operators create records for their own office. The central
/// administrator may create a record for any office by naming it.
///
/// # Returns
///
/// - `201 Created`: The new draft
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: Regional administrators do not create records
/// - `422 Unprocessable Entity`: No office given
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn create_submission<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Json(body): Json<CreateSubmission>,
) -> Result<(StatusCode, Json<Envelope<SubmissionRecord>>), ApiError> {
    let session = session(&app, auth).await?;

    let office_id = match session.role {
        Role::User => session.office_id,
        Role::Admin => body.office_id,
        Role::AdminWilayah => {
            return Err(ApiError::forbidden(
                "regional administrators do not create submissions",
            ));
        }
    }
    .ok_or_else(|| ApiError::unprocessable("an office is required"))?;

    let record = app
        .database()
        .create_submission(
            app.generate_submission_id(),
            office_id,
            body.data,
            session.user_id,
            app.now(),
        )
        .await
        .map_err(ApiError::storage("failed to create submission"))?;

    event!(
        Level::INFO,
        submission = %record.id,
        office = %office_id,
        "submission created"
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(record).with_message("draft created")),
    ))
}

/// Retrieve a submission with its files.
///
/// # Returns
///
/// - `200 OK`: The submission
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The submission belongs to another office
/// - `404 Not Found`: Submission does not exist
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn get_submission<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(Id { submission_id }): Path<Id>,
) -> Result<Json<Envelope<SubmissionRecord>>, ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;
    Ok(Json(Envelope::ok(record)))
}

/// Edit the employee snapshot, job type and notes of a draft or a rejected
/// submission.
///
/// # Returns
///
/// - `200 OK`: The updated submission
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: Not the owning office (or an administrator)
/// - `404 Not Found`: Submission does not exist
/// - `409 Conflict`: The submission is no longer editable
/// - `422 Unprocessable Entity`: Files are awaiting verification
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn update_submission<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(Id { submission_id }): Path<Id>,
    Json(data): Json<SubmissionData>,
) -> Result<Json<Envelope<SubmissionRecord>>, ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;

    let updated = app
        .database()
        .update_submission(submission_id, record.status, &session, data, app.now())
        .await
        .map_err(ApiError::storage(format!(
            "failed to update submission {submission_id}"
        )))??;

    Ok(Json(
        Envelope::ok(updated).with_message("submission updated"),
    ))
}

/// Delete a draft.
///
/// The transition log of the submission is kept.
///
/// # Returns
///
/// - `200 OK`: The submission was deleted
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: Not the owning office (or an administrator)
/// - `404 Not Found`: Submission does not exist
/// - `409 Conflict`: The submission is not a draft
/// - `422 Unprocessable Entity`: Files are awaiting verification
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn delete_submission<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(Id { submission_id }): Path<Id>,
) -> Result<Json<Envelope<SubmissionRecord>>, ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;

    app.database()
        .transition(
            submission_id,
            TransitionRequest {
                action: Action::Delete,
                from: record.status,
                session,
                notes: None,
                as_of: app.now(),
            },
        )
        .await
        .map_err(ApiError::storage(format!(
            "failed to delete submission {submission_id}"
        )))??;

    event!(Level::INFO, submission = %submission_id, "submission deleted");

    Ok(Json(Envelope {
        success: true,
        message: Some(Action::Delete.success_message().to_owned()),
        data: None,
    }))
}
