use super::{OfficeId, SubmissionRecord, UserId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The role a person acts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// An operator of an originating (kabupaten) office
    User,
    /// A regional administrator
    AdminWilayah,
    /// The central administrator
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::AdminWilayah => "admin_wilayah",
            Self::Admin => "admin",
        })
    }
}

/// The identity behind a request.
///
/// Resolved once per request from the transport's credentials and passed
/// explicitly to everything that makes authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Session {
    /// Who is acting
    pub user_id: UserId,
    /// Display name, used in reports
    #[serde(default)]
    pub name: String,
    /// The role they act in
    pub role: Role,
    /// The office of a `user`; administrators usually have none
    #[serde(default)]
    pub office_id: Option<OfficeId>,
}

impl Session {
    /// Whether this session belongs to the office that owns the record.
    pub fn owns(&self, record: &SubmissionRecord) -> bool {
        self.office_id == Some(record.office_id)
    }

    /// Whether this session may see the record at all.
    pub fn can_view(&self, record: &SubmissionRecord) -> bool {
        match self.role {
            Role::User => self.owns(record),
            Role::AdminWilayah | Role::Admin => true,
        }
    }

    /// The office filter to apply when listing records.
    ///
    /// Office operators only ever see their own office; administrators see
    /// everything unless they ask for a specific office.
    pub fn office_scope(&self, requested: Option<OfficeId>) -> Option<OfficeId> {
        match self.role {
            Role::User => self.office_id,
            Role::AdminWilayah | Role::Admin => requested,
        }
    }
}
