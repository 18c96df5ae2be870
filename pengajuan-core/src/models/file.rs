use super::{DateTime, FileId, UserId};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

/// The verification state of one attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Uploaded (or replaced) and not yet looked at
    Pending,
    /// Accepted by a verifier
    Approved,
    /// Refused by a verifier
    Rejected,
}

impl VerificationStatus {
    /// The wire value of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown verification status: {other}")),
        }
    }
}

/// Who is responsible for supplying a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    /// The originating office
    #[default]
    Kabupaten,
    /// The regional administrator
    AdminWilayah,
}

impl FileCategory {
    /// The wire value of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kabupaten => "kabupaten",
            Self::AdminWilayah => "admin_wilayah",
        }
    }
}

impl Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kabupaten" => Ok(Self::Kabupaten),
            "admin_wilayah" => Ok(Self::AdminWilayah),
            other => Err(format!("unknown file category: {other}")),
        }
    }
}

// Older records carry no category at all (or an explicit null); both mean
// the file came from the originating office.
fn category_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FileCategory, D::Error> {
    Ok(Option::<FileCategory>::deserialize(deserializer)?.unwrap_or_default())
}

/// One uploaded document attached to a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct FileAttachment {
    /// Identifier of the file
    pub id: FileId,
    /// The required-document-type key this file satisfies
    pub file_type: String,
    /// Who supplied the file
    #[serde(default, deserialize_with = "category_or_default")]
    pub category: FileCategory,
    /// Display name of the file
    pub file_name: String,
    /// Size of the content in bytes
    pub size: u64,
    /// Current verification state
    pub verification_status: VerificationStatus,
    /// Who last verified the file
    #[serde(default)]
    pub verified_by: Option<UserId>,
    /// When the file was last verified
    #[serde(default)]
    pub verified_at: Option<DateTime>,
    /// Notes left by the verifier
    #[serde(default)]
    pub verification_notes: Option<String>,
    /// When the current content was uploaded
    pub uploaded_at: DateTime,
}

impl FileAttachment {
    /// Whether this attachment satisfies the given required key in the given category.
    pub fn matches(&self, file_type: &str, category: FileCategory) -> bool {
        self.file_type == file_type && self.category == category
    }
}

/// A request to set a file's verification state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct VerificationUpdate {
    /// The new state; only approved or rejected are accepted
    pub verification_status: VerificationStatus,
    /// Notes for the office; existing notes are kept when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_notes: Option<String>,
}

/// A file upload, before it is stored.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// The required-document-type key
    pub file_type: String,
    /// Who supplies the file
    pub category: FileCategory,
    /// Display name
    pub file_name: String,
    /// Raw content
    pub content: Vec<u8>,
}

/// The stored content of a file, treated as an opaque blob.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Display name, used for the download file name
    pub file_name: String,
    /// Raw content
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment_json(category: &str) -> String {
        format!(
            r#"{{
                "id": "00000000-0000-0000-0000-000000000001",
                "file_type": "sk_pangkat",
                {category}
                "file_name": "sk.pdf",
                "size": 10,
                "verification_status": "pending",
                "uploaded_at": "2024-05-01T08:00:00Z"
            }}"#
        )
    }

    #[test]
    fn missing_or_null_category_means_kabupaten() {
        let missing: FileAttachment = serde_json::from_str(&attachment_json("")).unwrap();
        assert_eq!(missing.category, FileCategory::Kabupaten);

        let null: FileAttachment =
            serde_json::from_str(&attachment_json(r#""category": null,"#)).unwrap();
        assert_eq!(null.category, FileCategory::Kabupaten);

        let regional: FileAttachment =
            serde_json::from_str(&attachment_json(r#""category": "admin_wilayah","#)).unwrap();
        assert_eq!(regional.category, FileCategory::AdminWilayah);
    }
}
