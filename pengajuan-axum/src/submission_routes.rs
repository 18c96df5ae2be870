//! REST API endpoints for submissions.
//!
//! Records are created as drafts by an originating office, move through the
//! approval workflow by way of the action endpoint, and carry the uploaded
//! documents that the workflow's guards inspect.

use crate::{ApiApplication, ApiError};
use aide::axum::{
    ApiRouter,
    routing::{get, post, put},
};
use pengajuan_core::{
    models::{RequiredFiles, Session, SubmissionId, SubmissionRecord},
    ports::{RequirementRepository as _, SubmissionRepository as _},
};

mod actions;
mod crud;
mod files;
mod report;

/// Creates a router with submission-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/",
            get(crud::query_submissions::<T>).post(crud::create_submission::<T>),
            |route| route.security_requirement("jwt").tag("submission"),
        )
        .api_route_with(
            "/{submission_id}",
            get(crud::get_submission::<T>)
                .put(crud::update_submission::<T>)
                .delete(crud::delete_submission::<T>),
            |route| route.security_requirement("jwt").tag("submission"),
        )
        .api_route_with(
            "/{submission_id}/action/{action}",
            post(actions::run_action::<T>),
            |route| route.security_requirement("jwt").tag("workflow"),
        )
        .api_route_with(
            "/{submission_id}/history",
            get(actions::get_history::<T>),
            |route| route.security_requirement("jwt").tag("workflow"),
        )
        .api_route_with(
            "/{submission_id}/admin-wilayah-required-files",
            get(files::get_admin_wilayah_required_files::<T>),
            |route| route.security_requirement("jwt").tag("requirement"),
        )
        .api_route_with(
            "/{submission_id}/file/{file_id}/verify",
            put(files::verify_file::<T>),
            |route| route.security_requirement("jwt").tag("file"),
        )
        // Raw bodies and non-JSON responses are served outside the OpenAPI description
        .route(
            "/{submission_id}/report",
            axum::routing::get(report::get_report::<T>),
        )
        .route(
            "/{submission_id}/file",
            axum::routing::post(files::upload_file::<T>),
        )
        .route(
            "/{submission_id}/file/{file_id}/replace",
            axum::routing::post(files::replace_file::<T>),
        )
        .route(
            "/{submission_id}/file/{file_id}/content",
            axum::routing::get(files::get_file_content::<T>),
        )
}

/// Path parameter for submission-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
pub(crate) struct Id {
    /// The unique identifier of the submission
    submission_id: SubmissionId,
}

/// Load a record the session is allowed to see.
async fn load_visible<T: ApiApplication>(
    app: &T,
    session: &Session,
    submission_id: SubmissionId,
) -> Result<SubmissionRecord, ApiError> {
    let record = app
        .database()
        .get_submission(submission_id)
        .await
        .map_err(ApiError::storage(format!(
            "failed to get submission {submission_id}"
        )))?
        .ok_or_else(|| ApiError::not_found(format!("unknown submission {submission_id}")))?;

    if session.can_view(&record) {
        Ok(record)
    } else {
        Err(ApiError::forbidden("submission belongs to another office"))
    }
}

/// The required lists that apply to a record.
async fn required_for<T: ApiApplication>(
    app: &T,
    record: &SubmissionRecord,
) -> Result<RequiredFiles, ApiError> {
    app.database()
        .get_required_files(&record.job_type)
        .await
        .map_err(ApiError::storage(format!(
            "failed to get required files for {}",
            record.job_type
        )))
}
