use super::{Id, load_visible, required_for};
use crate::{ApiApplication, ApiError, session};

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use pengajuan_core::{
    models::{
        Envelope, FileAttachment, FileCategory, FileId, NewFile, SubmissionId, SubmissionRecord,
        VerificationUpdate,
    },
    ports::FileRepository as _,
    workflow::authorize_upload,
};
use tracing::{Level, event};

/// Path parameters for file-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
pub(crate) struct FilePath {
    /// The unique identifier of the submission
    submission_id: SubmissionId,
    /// The unique identifier of the file
    file_id: FileId,
}

/// Query parameters of an upload.
#[derive(serde::Deserialize)]
pub(crate) struct UploadQuery {
    file_type: String,
    #[serde(default)]
    category: Option<FileCategory>,
    file_name: String,
}

/// Query parameters of a replacement.
#[derive(serde::Deserialize)]
pub(crate) struct ReplaceQuery {
    file_name: String,
}

fn find_file(record: &SubmissionRecord, file_id: FileId) -> Result<&FileAttachment, ApiError> {
    record
        .file(file_id)
        .ok_or_else(|| ApiError::not_found(format!("unknown file {file_id}")))
}

/// The regional administrator's required list for a submission.
///
/// # Returns
///
/// - `200 OK`: The required `file_type` keys
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The submission belongs to another office
/// - `404 Not Found`: Submission does not exist
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn get_admin_wilayah_required_files<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(Id { submission_id }): Path<Id>,
) -> Result<Json<Envelope<Vec<String>>>, ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;
    let required = required_for(&app, &record).await?;
    Ok(Json(Envelope::ok(required.admin_wilayah)))
}

/// Mark a file as approved or rejected.
///
/// # Returns
///
/// - `200 OK`: The updated file
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The caller's role may not verify this file
/// - `404 Not Found`: Submission or file does not exist
/// - `409 Conflict`: The submission is not under review for this category
/// - `422 Unprocessable Entity`: Pending was requested
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn verify_file<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(FilePath {
        submission_id,
        file_id,
    }): Path<FilePath>,
    Json(update): Json<VerificationUpdate>,
) -> Result<Json<Envelope<FileAttachment>>, ApiError> {
    let session = session(&app, auth).await?;
    load_visible(&app, &session, submission_id).await?;

    // Role and status are checked against the record as the write sees it
    let status = update.verification_status;
    let file = app
        .database()
        .verify_file(submission_id, file_id, update, &session, app.now())
        .await
        .map_err(ApiError::storage(format!("failed to verify file {file_id}")))??
        .ok_or_else(|| ApiError::not_found(format!("unknown file {file_id}")))?;

    event!(
        Level::INFO,
        submission = %submission_id,
        file = %file_id,
        status = status.as_str(),
        "file verified"
    );

    Ok(Json(
        Envelope::ok(file).with_message("verification status updated"),
    ))
}

/// Attach a document to a submission.
///
/// The request body is the raw file content. Uploading a `file_type` that
/// is already attached in the same category replaces it, and the file goes
/// back to pending verification.
///
/// # Returns
///
/// - `201 Created`: The attached file
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The caller may not supply files of this category
/// - `404 Not Found`: Submission does not exist
/// - `409 Conflict`: The submission does not accept files of this category now
/// - `413 Payload Too Large`: The body exceeds the upload limit
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn upload_file<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(Id { submission_id }): Path<Id>,
    Query(query): Query<UploadQuery>,
    content: Bytes,
) -> Result<(StatusCode, Json<Envelope<FileAttachment>>), ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;
    let category = query.category.unwrap_or_default();

    authorize_upload(&session, &record, category)?;

    let file = app
        .database()
        .put_file(
            submission_id,
            app.generate_file_id(),
            NewFile {
                file_type: query.file_type,
                category,
                file_name: query.file_name,
                content: content.to_vec(),
            },
            app.now(),
        )
        .await
        .map_err(ApiError::storage(format!(
            "failed to upload file to submission {submission_id}"
        )))?
        .ok_or_else(|| ApiError::not_found(format!("unknown submission {submission_id}")))?;

    event!(
        Level::INFO,
        submission = %submission_id,
        file = %file.id,
        file_type = file.file_type.as_str(),
        category = category.as_str(),
        size = file.size,
        "file uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(file).with_message("file uploaded")),
    ))
}

/// Replace the content of an attached document.
///
/// # Returns
///
/// - `200 OK`: The file, back to pending verification
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The caller may not supply files of this category
/// - `404 Not Found`: Submission or file does not exist
/// - `409 Conflict`: The submission does not accept files of this category now
/// - `413 Payload Too Large`: The body exceeds the upload limit
/// - `500 Internal Server Error`: Database operation failed
pub(crate) async fn replace_file<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(FilePath {
        submission_id,
        file_id,
    }): Path<FilePath>,
    Query(query): Query<ReplaceQuery>,
    content: Bytes,
) -> Result<Json<Envelope<FileAttachment>>, ApiError> {
    let session = session(&app, auth).await?;
    let record = load_visible(&app, &session, submission_id).await?;
    let file = find_file(&record, file_id)?;

    authorize_upload(&session, &record, file.category)?;

    let file = app
        .database()
        .replace_file(
            submission_id,
            file_id,
            query.file_name,
            content.to_vec(),
            app.now(),
        )
        .await
        .map_err(ApiError::storage(format!("failed to replace file {file_id}")))?
        .ok_or_else(|| ApiError::not_found(format!("unknown file {file_id}")))?;

    event!(Level::INFO, submission = %submission_id, file = %file_id, "file replaced");

    Ok(Json(Envelope::ok(file).with_message("file replaced")))
}

// Header values must stay within visible ASCII and must not close the
// quoted filename early.
fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

/// Download the stored content of a file.
///
/// # Returns
///
/// - `200 OK`: The raw content
/// - `401 Unauthorized`: Missing or invalid token
/// - `403 Forbidden`: The submission belongs to another office
/// - `404 Not Found`: Submission or file does not exist
/// - `500 Internal Server Error`: Database query failed
pub(crate) async fn get_file_content<T: ApiApplication>(
    State(app): State<T>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(FilePath {
        submission_id,
        file_id,
    }): Path<FilePath>,
) -> Result<impl IntoResponse, ApiError> {
    let session = session(&app, auth).await?;
    load_visible(&app, &session, submission_id).await?;

    let file = app
        .database()
        .get_file_content(submission_id, file_id)
        .await
        .map_err(ApiError::storage(format!("failed to read file {file_id}")))?
        .ok_or_else(|| ApiError::not_found(format!("unknown file {file_id}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(&file.file_name),
            ),
        ],
        file.content,
    ))
}
