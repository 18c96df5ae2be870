//! REST API endpoints for the per-job-type required-file configuration.

use crate::{ApiApplication, ApiError, session};
use aide::axum::{ApiRouter, routing::get};
use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use pengajuan_core::{
    models::{Envelope, RequiredFiles, Role},
    ports::RequirementRepository as _,
};
use tracing::{Level, event};

/// Creates a router with requirement-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new().api_route_with(
        "/{job_type}/required-files",
        get(get_required_files::<T>).put(set_required_files::<T>),
        |route| route.security_requirement("jwt").tag("requirement"),
    )
}

/// Path parameter for job-type endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct JobType {
    /// The target-position category
    job_type: String,
}

/// The two required lists of a job type.
///
/// # Returns
///
/// - `200 OK`: The required lists (empty for an unconfigured job type)
/// - `401 Unauthorized`: Missing or invalid token
/// - `500 Internal Server Error`: Database query failed
async fn get_required_files<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(JobType { job_type }): Path<JobType>,
) -> Result<Json<Envelope<RequiredFiles>>, ApiError> {
    session(&app, auth).await?;

    let required = app
        .database()
        .get_required_files(&job_type)
        .await
        .map_err(ApiError::storage(format!(
            "failed to get required files for {job_type}"
        )))?;

    Ok(Json(Envelope::ok(required)))
}

/// Replace the two required lists of a job type.
///
/// # Authorization
///
/// Central administrator only.
///
/// # Returns
///
/// - `200 OK`: The stored lists
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The caller is not the central administrator
/// - `500 Internal Server Error`: Database operation failed
async fn set_required_files<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(JobType { job_type }): Path<JobType>,
    Json(required): Json<RequiredFiles>,
) -> Result<Json<Envelope<RequiredFiles>>, ApiError> {
    let session = session(&app, auth).await?;
    if session.role != Role::Admin {
        return Err(ApiError::forbidden(
            "only the central administrator configures required files",
        ));
    }

    app.database()
        .set_required_files(&job_type, required.clone())
        .await
        .map_err(ApiError::storage(format!(
            "failed to set required files for {job_type}"
        )))?;

    event!(
        Level::INFO,
        job_type = job_type.as_str(),
        kabupaten = required.kabupaten.len(),
        admin_wilayah = required.admin_wilayah.len(),
        "required files updated"
    );

    Ok(Json(
        Envelope::ok(required).with_message("required files updated"),
    ))
}
