use super::load_visible;
use crate::{ApiApplication, ApiError, config::AxumConfig, session};

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use pengajuan_core::{
    models::{
        Envelope, EventQuery, Page, Role, SubmissionEvent, SubmissionId, SubmissionRecord,
    },
    ports::{SubmissionRepository as _, TransitionRequest},
    workflow::Action,
};
use std::sync::Arc;
use tracing::{Level, event};

/// Path parameters for the action endpoint.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
pub(crate) struct ActionPath {
    /// The unique identifier of the submission
    submission_id: SubmissionId,
    /// The action to perform
    action: Action,
}

/// Body of an action request.
#[derive(serde::Deserialize, schemars::JsonSchema)]
pub(crate) struct ActionRequest {
    /// Notes recorded with the transition; for rejections this becomes the
    /// record's rejection reason
    #[serde(default)]
    notes: Option<String>,
}

/// Move a submission through the workflow.
///
/// The caller's role and ownership, the record's current status and the
/// file-based guard of the action are checked in the same transaction that
/// changes the status. A concurrent transition makes this one fail with a
/// conflict; a file verified in between is seen by the guard.
///
/// # Returns
///
/// - `200 OK`: The updated submission (absent after a delete)
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The caller's role or office may not perform the action
/// - `404 Not Found`: Submission does not exist
/// - `409 Conflict`: The action is not valid from the current status
/// - `422 Unprocessable Entity`: The files do not satisfy the action's guard
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn run_action<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(ActionPath {
        submission_id,
        action,
    }): Path<ActionPath>,
    Json(ActionRequest { notes }): Json<ActionRequest>,
) -> Result<Json<Envelope<SubmissionRecord>>, ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;
    let actor = session.user_id;

    let updated = app
        .database()
        .transition(
            submission_id,
            TransitionRequest {
                action,
                from: record.status,
                session,
                notes,
                as_of: app.now(),
            },
        )
        .await
        .map_err(ApiError::storage(format!(
            "failed to {action} submission {submission_id}"
        )))??;

    event!(
        Level::INFO,
        submission = %submission_id,
        action = action.as_str(),
        from = record.status.as_str(),
        to = updated.as_ref().map(|record| record.status.as_str()),
        %actor,
        "submission transitioned"
    );

    Ok(Json(Envelope {
        success: true,
        message: Some(action.success_message().to_owned()),
        data: updated,
    }))
}

/// Retrieve the transition log of a submission, newest first.
///
/// The log outlives the record: after a draft is deleted its history stays
/// readable by the central administrator.
///
/// # Returns
///
/// - `200 OK`: A page of events, with the query for the next page if any
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The submission belongs to another office
/// - `404 Not Found`: Submission does not exist
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn get_history<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Extension(config): Extension<Arc<AxumConfig>>,
    Path(super::Id { submission_id }): Path<super::Id>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Envelope<Page<SubmissionEvent>>>, ApiError> {
    let session = session(&app, auth).await?;

    let record = app
        .database()
        .get_submission(submission_id)
        .await
        .map_err(ApiError::storage(format!(
            "failed to get submission {submission_id}"
        )))?;

    match record {
        Some(record) if !session.can_view(&record) => {
            return Err(ApiError::forbidden("submission belongs to another office"));
        }
        Some(_) => {}
        None if session.role == Role::Admin => {}
        None => {
            return Err(ApiError::not_found(format!(
                "unknown submission {submission_id}"
            )));
        }
    }

    let page = app
        .database()
        .get_history(submission_id, query, config.page_limit)
        .await
        .map_err(ApiError::storage(format!(
            "failed to get history of submission {submission_id}"
        )))?;

    Ok(Json(Envelope::ok(page)))
}
