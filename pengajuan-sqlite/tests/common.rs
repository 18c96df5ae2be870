#![allow(dead_code)]

use pengajuan_core::{
    models::{
        DateTime, Employee, FileCategory, FileId, NewFile, OfficeId, RequiredFiles, Role,
        Session, SubmissionData, SubmissionId, UserId,
    },
    ports::{Application, RequirementRepository as _},
};
use pengajuan_sqlite::{Db, config::SqliteConfig};

pub struct TestApp(pub Db);

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Ok(Self(Db::open(&SqliteConfig::default()).await?))
    }
}

impl Application for TestApp {
    type Context = Session;
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.0
    }

    fn now(&self) -> DateTime {
        DateTime::now()
    }

    fn generate_submission_id(&self) -> SubmissionId {
        uuid::Uuid::new_v4().into()
    }

    fn generate_file_id(&self) -> FileId {
        uuid::Uuid::new_v4().into()
    }

    async fn session(&self, context: &Self::Context) -> Option<Session> {
        Some(context.clone())
    }
}

pub fn office() -> OfficeId {
    OfficeId(uuid::Uuid::new_v4())
}

/// An operator of `office_id`.
pub fn operator(office_id: OfficeId) -> Session {
    Session {
        user_id: UserId(uuid::Uuid::new_v4()),
        name: "Operator Kabupaten".to_owned(),
        role: Role::User,
        office_id: Some(office_id),
    }
}

/// An administrator without an office.
pub fn staff(role: Role) -> Session {
    Session {
        user_id: UserId(uuid::Uuid::new_v4()),
        name: String::new(),
        role,
        office_id: None,
    }
}

/// Require the given office documents for the job type used by [`data`].
pub async fn require_kabupaten(db: &Db, keys: &[&str]) -> anyhow::Result<()> {
    let required = RequiredFiles {
        kabupaten: keys.iter().map(|key| (*key).to_owned()).collect(),
        admin_wilayah: vec![],
    };
    db.set_required_files("jabatan_fungsional", required).await?;
    Ok(())
}

pub fn data(name: &str) -> SubmissionData {
    SubmissionData {
        employee: Employee {
            name: name.to_owned(),
            position: "Penata Muda".to_owned(),
            nip: "199001012015031001".to_owned(),
        },
        job_type: "jabatan_fungsional".to_owned(),
        notes: None,
    }
}

pub fn upload(file_type: &str, category: FileCategory, content: &[u8]) -> NewFile {
    NewFile {
        file_type: file_type.to_owned(),
        category,
        file_name: format!("{file_type}.pdf"),
        content: content.to_vec(),
    }
}
