use super::{Id, load_visible, required_for};
use crate::{ApiApplication, ApiError, session};

use axum::{
    extract::{Path, State},
    response::Html,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use pengajuan_core::report::render_report;

/// A printable HTML summary of a submission.
///
/// # Returns
///
/// - `200 OK`: The report
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The submission belongs to another office
/// - `404 Not Found`: Submission does not exist
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn get_report<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(Id { submission_id }): Path<Id>,
) -> Result<Html<String>, ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;
    let required = required_for(&app, &record).await?;

    Ok(Html(render_report(
        &record,
        &required,
        &session.name,
        app.now(),
    )))
}
