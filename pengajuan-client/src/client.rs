use crate::ClientError;
use pengajuan_core::{
    models::{
        Envelope, FileAttachment, FileCategory, FileId, RequiredFiles, Session, SubmissionData,
        SubmissionId, SubmissionRecord, VerificationUpdate,
    },
    workflow::Action,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{Level, event};

/// A connection to the portal's REST API on behalf of one bearer token.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl Client {
    /// Create a client for the API at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, token)
    }

    /// Create a client that reuses an existing `reqwest` client.
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The base url extended by `segments`, each percent-encoded on its own
    /// so that free text such as a job type stays one path segment.
    fn segments_url(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let invalid = || ClientError::Address(self.base_url.clone());
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ClientError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }

    /// Send a request and unwrap the envelope of the response.
    async fn envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let (status, body) = self.send(request).await?;
        let result = match serde_json::from_slice::<Envelope<T>>(&body) {
            Ok(envelope) if envelope.success && status.is_success() => Ok(envelope),
            Ok(envelope) => Err(ClientError::Rejected {
                status,
                message: envelope.message.unwrap_or_else(|| status.to_string()),
            }),
            Err(_) if !status.is_success() => Err(rejection(status, &body)),
            Err(err) => Err(ClientError::Malformed(err.to_string())),
        };
        if let Err(err) = &result {
            event!(Level::WARN, status = status.as_u16(), err = err.to_string());
        }
        result
    }

    /// Send a request and return the payload of the envelope.
    async fn data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.envelope(request)
            .await?
            .data
            .ok_or_else(|| ClientError::Malformed("the response carried no data".to_owned()))
    }

    /// The session behind the token.
    pub async fn session(&self) -> Result<Session, ClientError> {
        self.data(self.http.get(self.url("/session"))).await
    }

    /// The submissions visible to the session.
    pub async fn submissions(&self) -> Result<Vec<SubmissionRecord>, ClientError> {
        self.data(self.http.get(self.url("/submission"))).await
    }

    /// A submission with its files.
    pub async fn submission(&self, id: SubmissionId) -> Result<SubmissionRecord, ClientError> {
        self.data(self.http.get(self.url(&format!("/submission/{id}"))))
            .await
    }

    /// Create a draft for the session's own office.
    pub async fn create_submission(
        &self,
        data: &SubmissionData,
    ) -> Result<SubmissionRecord, ClientError> {
        self.data(self.http.post(self.url("/submission")).json(data))
            .await
    }

    /// Both required lists of a job type.
    pub async fn required_files(&self, job_type: &str) -> Result<RequiredFiles, ClientError> {
        let url = self.segments_url(&["job-type", job_type, "required-files"])?;
        self.data(self.http.get(url)).await
    }

    /// The regional administrator's required list for a submission.
    pub async fn admin_wilayah_required_files(
        &self,
        id: SubmissionId,
    ) -> Result<Vec<String>, ClientError> {
        self.data(
            self.http
                .get(self.url(&format!("/submission/{id}/admin-wilayah-required-files"))),
        )
        .await
    }

    /// Perform a workflow action.
    ///
    /// Returns the server's envelope: its message is the notice to show, its
    /// data the updated record (absent after a delete).
    pub async fn run_action(
        &self,
        id: SubmissionId,
        action: Action,
        notes: Option<&str>,
    ) -> Result<Envelope<SubmissionRecord>, ClientError> {
        let request = match action {
            Action::Delete => self.http.delete(self.url(&format!("/submission/{id}"))),
            action => self
                .http
                .post(self.url(&format!("/submission/{id}/action/{action}")))
                .json(&serde_json::json!({ "notes": notes })),
        };
        self.envelope(request).await
    }

    /// Set the verification state of a file.
    pub async fn verify_file(
        &self,
        id: SubmissionId,
        file_id: FileId,
        update: &VerificationUpdate,
    ) -> Result<FileAttachment, ClientError> {
        self.data(
            self.http
                .put(self.url(&format!("/submission/{id}/file/{file_id}/verify")))
                .json(update),
        )
        .await
    }

    /// Attach a document, replacing any file with the same key and category.
    pub async fn upload_file(
        &self,
        id: SubmissionId,
        file_type: &str,
        category: FileCategory,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<FileAttachment, ClientError> {
        self.data(
            self.http
                .post(self.url(&format!("/submission/{id}/file")))
                .query(&[
                    ("file_type", file_type),
                    ("category", category.as_str()),
                    ("file_name", file_name),
                ])
                .body(content),
        )
        .await
    }

    /// Replace the content of an attached document.
    pub async fn replace_file(
        &self,
        id: SubmissionId,
        file_id: FileId,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<FileAttachment, ClientError> {
        self.data(
            self.http
                .post(self.url(&format!("/submission/{id}/file/{file_id}/replace")))
                .query(&[("file_name", file_name)])
                .body(content),
        )
        .await
    }

    /// Download the stored content of a file as an opaque blob.
    pub async fn file_content(
        &self,
        id: SubmissionId,
        file_id: FileId,
    ) -> Result<Vec<u8>, ClientError> {
        let (status, body) = self
            .send(
                self.http
                    .get(self.url(&format!("/submission/{id}/file/{file_id}/content"))),
            )
            .await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(rejection(status, &body))
        }
    }

    /// The printable HTML report of a submission.
    pub async fn report(&self, id: SubmissionId) -> Result<String, ClientError> {
        let (status, body) = self
            .send(self.http.get(self.url(&format!("/submission/{id}/report"))))
            .await?;
        if status.is_success() {
            String::from_utf8(body).map_err(|err| ClientError::Malformed(err.to_string()))
        } else {
            Err(rejection(status, &body))
        }
    }
}

/// Interpret an error response, which may or may not carry an envelope.
fn rejection(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_owned();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| status.to_string());
    ClientError::Rejected { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        StatusCode::CONFLICT,
        br#"{"success":false,"message":"cannot approve a submission that is draft"}"#.as_slice(),
        "cannot approve a submission that is draft"
    )]
    #[case(
        StatusCode::BAD_REQUEST,
        b"Header of type `authorization` was malformed".as_slice(),
        "Header of type `authorization` was malformed"
    )]
    #[case(StatusCode::BAD_GATEWAY, b"".as_slice(), "502 Bad Gateway")]
    fn rejections_carry_the_best_available_message(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        let err = rejection(status, body);
        assert_eq!(err.status(), Some(status));
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = Client::new("http://localhost:8080/", "token");
        assert_eq!(
            client.url("/submission"),
            "http://localhost:8080/submission"
        );
    }

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/job-type/pns%2Fpppk/required-files")]
    #[case(
        "http://localhost:8080/api/",
        "http://localhost:8080/api/job-type/pns%2Fpppk/required-files"
    )]
    fn job_types_stay_one_path_segment(#[case] base_url: &str, #[case] expected: &str) {
        let client = Client::new(base_url, "token");
        let url = client
            .segments_url(&["job-type", "pns/pppk", "required-files"])
            .unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn unusable_base_urls_are_reported() {
        let client = Client::new("localhost", "token");
        let err = client.segments_url(&["job-type"]).unwrap_err();
        assert!(matches!(err, ClientError::Address(_)), "{err:?}");
    }
}
