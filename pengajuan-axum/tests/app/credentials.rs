use pengajuan_core::models::{OfficeId, Role, Session, UserId};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

// To exercise the role and office checks of the endpoints without minting
// real tokens, the tests put a plain-text description of the session in the
// `Authorization: Bearer <...>` header.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: UserId,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub office_id: Option<OfficeId>,
}

impl Credentials {
    fn new(name: &str, role: Role, office_id: Option<OfficeId>) -> Self {
        Self {
            user_id: UserId(uuid::Uuid::new_v4()),
            name: name.to_owned(),
            role,
            office_id,
        }
    }

    /// An operator of `office`.
    pub fn user(office_id: OfficeId) -> Self {
        Self::new("Operator Kabupaten", Role::User, Some(office_id))
    }

    pub fn admin_wilayah() -> Self {
        Self::new("Admin Wilayah", Role::AdminWilayah, None)
    }

    pub fn admin() -> Self {
        Self::new("Admin Pusat", Role::Admin, None)
    }
}

impl From<Credentials> for Session {
    fn from(value: Credentials) -> Self {
        Session {
            user_id: value.user_id,
            name: value.name,
            role: value.role,
            office_id: value.office_id,
        }
    }
}

impl Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", serde_html_form::to_string(self).unwrap())
    }
}

impl FromStr for Credentials {
    type Err = serde_html_form::de::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let deserializer = serde_html_form::Deserializer::new(form_urlencoded::parse(s.as_bytes()));
        Self::deserialize(deserializer)
    }
}
