use super::Credentials;
use headers::{Authorization, authorization::Bearer};
use pengajuan_core::{
    models::{DateTime, FileId, Session, SubmissionId},
    ports::Application,
};
use pengajuan_sqlite::Db;

#[derive(Clone)]
pub struct TestApp(pub Db);

impl TestApp {
    /// Decode the plain-text session carried by the bearer token.
    fn credentials(&self, context: &Authorization<Bearer>) -> Option<Credentials> {
        context.0.token().parse().ok()
    }
}

impl Application for TestApp {
    type Context = Authorization<Bearer>;
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.0
    }

    fn now(&self) -> DateTime {
        DateTime::now()
    }

    fn generate_submission_id(&self) -> SubmissionId {
        SubmissionId(uuid::Uuid::new_v4())
    }

    fn generate_file_id(&self) -> FileId {
        FileId(uuid::Uuid::new_v4())
    }

    async fn session(&self, context: &Self::Context) -> Option<Session> {
        self.credentials(context).map(Session::from)
    }
}
