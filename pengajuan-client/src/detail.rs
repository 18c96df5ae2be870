//! The state behind a submission's detail page.

use crate::{Client, ClientError};
use pengajuan_core::{
    models::{
        FileAttachment, FileId, RequiredFiles, Session, StatusDisplay, SubmissionId,
        SubmissionRecord, VerificationStatus, VerificationUpdate, status_display,
    },
    workflow::{Action, VerificationSummary, authorize_edit, available_actions},
};
use tracing::{Level, event};

/// One submission as seen by one session.
///
/// Everything derived (the verification summary, the offered actions, the
/// status badge) is recomputed from the current record on every call.
pub struct DetailPage {
    client: Client,
    session: Session,
    record: SubmissionRecord,
    required: RequiredFiles,
    submitting: bool,
    deleted: bool,
    error: Option<String>,
    notice: Option<String>,
}

/// A verification toggle that has been applied locally but not yet
/// confirmed by the server.
///
/// Holds the file as it was before the patch, so the patch can be undone.
#[derive(Debug, Clone)]
pub struct PendingToggle {
    original: FileAttachment,
    update: VerificationUpdate,
}

impl PendingToggle {
    /// The file being toggled.
    pub fn file_id(&self) -> FileId {
        self.original.id
    }

    /// The requested verification state.
    pub fn target(&self) -> VerificationStatus {
        self.update.verification_status
    }
}

impl DetailPage {
    /// Load the session, the record and both required lists.
    pub async fn load(client: Client, id: SubmissionId) -> Result<Self, ClientError> {
        let session = client.session().await?;
        let (record, required) = fetch(&client, id).await?;
        Ok(Self {
            client,
            session,
            record,
            required,
            submitting: false,
            deleted: false,
            error: None,
            notice: None,
        })
    }

    /// The record as last fetched (or as optimistically patched).
    pub fn record(&self) -> &SubmissionRecord {
        &self.record
    }

    /// The required lists that apply to the record.
    pub fn required(&self) -> &RequiredFiles {
        &self.required
    }

    /// Who is looking at the page.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether an action request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the record was deleted from this page.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// The error to show in the banner, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The success notice to show, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Clear the error banner.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Clear the success notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// The status badge of the record.
    pub fn status(&self) -> StatusDisplay {
        status_display(self.record.status.as_str())
    }

    /// The verification predicates over the current files.
    pub fn summary(&self) -> VerificationSummary {
        VerificationSummary::compute(&self.record.files, &self.required)
    }

    /// The actions to offer as buttons.
    pub fn actions(&self) -> Vec<Action> {
        if self.deleted {
            return Vec::new();
        }
        available_actions(&self.session, &self.record, &self.required)
    }

    /// Whether the edit form should be enabled.
    pub fn can_edit(&self) -> bool {
        !self.deleted && authorize_edit(&self.session, &self.record, &self.required).is_ok()
    }

    /// Refetch the record and its required lists.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let (record, required) = fetch(&self.client, self.record.id).await?;
        self.record = record;
        self.required = required;
        Ok(())
    }

    fn fail(&mut self, err: &ClientError) {
        event!(
            Level::WARN,
            submission = %self.record.id,
            err = err.to_string()
        );
        self.error = Some(err.to_string());
    }

    /// Perform an action and refetch the record.
    ///
    /// On success the server's message becomes the notice; on failure its
    /// message becomes the error and the record is left as it was. Returns
    /// whether the action succeeded.
    pub async fn run(&mut self, action: Action, notes: Option<&str>) -> bool {
        self.submitting = true;
        self.error = None;
        self.notice = None;

        let result = self.client.run_action(self.record.id, action, notes).await;
        let succeeded = match result {
            Ok(envelope) => {
                self.notice = envelope.message;
                if action == Action::Delete {
                    self.deleted = true;
                } else if let Err(err) = self.refresh().await {
                    self.fail(&err);
                }
                true
            }
            Err(err) => {
                self.fail(&err);
                false
            }
        };

        self.submitting = false;
        succeeded
    }

    /// Patch a file's verification state locally, before asking the server.
    ///
    /// Notes are left as they are. Returns `None` if the page has no such
    /// file.
    pub fn begin_toggle(&mut self, file_id: FileId, approved: bool) -> Option<PendingToggle> {
        let file = self.record.files.iter_mut().find(|file| file.id == file_id)?;
        let target = if approved {
            VerificationStatus::Approved
        } else {
            VerificationStatus::Rejected
        };
        let toggle = PendingToggle {
            original: file.clone(),
            update: VerificationUpdate {
                verification_status: target,
                verification_notes: None,
            },
        };
        file.verification_status = target;
        Some(toggle)
    }

    fn replace_file(&mut self, replacement: FileAttachment) {
        if let Some(file) = self
            .record
            .files
            .iter_mut()
            .find(|file| file.id == replacement.id)
        {
            *file = replacement;
        }
    }

    /// Settle a toggle with the server's answer: keep the server's copy of
    /// the file, or restore the file as it was and surface the error.
    pub fn complete_toggle(
        &mut self,
        toggle: PendingToggle,
        result: Result<FileAttachment, ClientError>,
    ) -> bool {
        match result {
            Ok(confirmed) => {
                self.replace_file(confirmed);
                true
            }
            Err(err) => {
                self.replace_file(toggle.original);
                self.fail(&err);
                false
            }
        }
    }

    /// Flip a file between approved and rejected.
    ///
    /// The file changes locally at once; the server's answer then either
    /// confirms the change or rolls it back. Returns whether the server
    /// accepted it.
    pub async fn toggle_verification(&mut self, file_id: FileId, approved: bool) -> bool {
        let Some(toggle) = self.begin_toggle(file_id, approved) else {
            self.error = Some(format!("unknown file {file_id}"));
            return false;
        };
        let result = self
            .client
            .verify_file(self.record.id, file_id, &toggle.update)
            .await;
        self.complete_toggle(toggle, result)
    }

    /// Download a file's content.
    pub async fn download(&mut self, file_id: FileId) -> Option<Vec<u8>> {
        match self.client.file_content(self.record.id, file_id).await {
            Ok(content) => Some(content),
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }
}

async fn fetch(
    client: &Client,
    id: SubmissionId,
) -> Result<(SubmissionRecord, RequiredFiles), ClientError> {
    let record = client.submission(id).await?;
    // Both lists come from one configuration entry keyed by the job type
    let required = client.required_files(&record.job_type).await?;
    Ok((record, required))
}
