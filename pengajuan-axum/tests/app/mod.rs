mod application;
mod credentials;

pub use application::TestApp;
pub use credentials::Credentials;

use axum::body::Bytes;
use axum_test::{TestResponse, TestServer};
use pengajuan_axum::{config::AxumConfig, router};
use pengajuan_core::{
    models::{
        Envelope, FileAttachment, FileCategory, FileId, RequiredFiles, SubmissionId,
        SubmissionRecord, VerificationStatus,
    },
    ports::RequirementRepository as _,
};
use pengajuan_sqlite::{Db, config::SqliteConfig};
use serde::de::DeserializeOwned;
use serde_json::json;

pub const JOB_TYPE: &str = "jabatan_fungsional";

/// A server over a fresh in-memory database, with one job type configured.
pub async fn server_with(config: AxumConfig) -> TestServer {
    let db = Db::open(&SqliteConfig::default()).await.unwrap();
    db.set_required_files(
        JOB_TYPE,
        RequiredFiles {
            kabupaten: vec!["ijazah".into(), "sk_pangkat".into()],
            admin_wilayah: vec!["rekomendasi".into()],
        },
    )
    .await
    .unwrap();
    TestServer::new(router(TestApp(db), config)).unwrap()
}

pub async fn server() -> TestServer {
    server_with(AxumConfig::default()).await
}

pub fn submission_body(name: &str) -> serde_json::Value {
    json!({
        "employee": {
            "name": name,
            "position": "Penata Muda",
            "nip": "199001012015031001",
        },
        "job_type": JOB_TYPE,
    })
}

/// The payload of a successful envelope.
pub fn data<T: DeserializeOwned>(response: &TestResponse) -> T {
    let envelope = response.json::<Envelope<T>>();
    assert!(envelope.success);
    envelope.data.unwrap()
}

/// The message of a failed envelope.
pub fn message(response: &TestResponse) -> String {
    let envelope = response.json::<Envelope<serde_json::Value>>();
    assert!(!envelope.success);
    envelope.message.unwrap()
}

pub async fn create(server: &TestServer, who: &Credentials, name: &str) -> SubmissionRecord {
    let response = server
        .post("/submission")
        .authorization_bearer(who)
        .json(&submission_body(name))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    data(&response)
}

pub async fn upload(
    server: &TestServer,
    who: &Credentials,
    submission_id: SubmissionId,
    file_type: &str,
    category: FileCategory,
) -> TestResponse {
    server
        .post(&format!("/submission/{submission_id}/file"))
        .authorization_bearer(who)
        .add_query_param("file_type", file_type)
        .add_query_param("category", category.as_str())
        .add_query_param("file_name", format!("{file_type}.pdf"))
        .bytes(Bytes::from_static(b"%PDF-1.4 test document"))
        .await
}

pub async fn uploaded(
    server: &TestServer,
    who: &Credentials,
    submission_id: SubmissionId,
    file_type: &str,
    category: FileCategory,
) -> FileAttachment {
    let response = upload(server, who, submission_id, file_type, category).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    data(&response)
}

pub async fn verify(
    server: &TestServer,
    who: &Credentials,
    submission_id: SubmissionId,
    file_id: FileId,
    status: VerificationStatus,
) -> TestResponse {
    server
        .put(&format!("/submission/{submission_id}/file/{file_id}/verify"))
        .authorization_bearer(who)
        .json(&json!({ "verification_status": status.as_str() }))
        .await
}

pub async fn act(
    server: &TestServer,
    who: &Credentials,
    submission_id: SubmissionId,
    action: &str,
    notes: Option<&str>,
) -> TestResponse {
    server
        .post(&format!("/submission/{submission_id}/action/{action}"))
        .authorization_bearer(who)
        .json(&json!({ "notes": notes }))
        .await
}
