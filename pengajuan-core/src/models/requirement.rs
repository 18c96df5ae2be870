use super::FileCategory;
use serde::{Deserialize, Serialize};

/// The required-document-type keys for a job type.
///
/// One list is supplied by the originating office, the other by the regional
/// administrator. Both are server-side configuration and read-only for the
/// workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct RequiredFiles {
    /// Keys the originating office must supply
    #[serde(default)]
    pub kabupaten: Vec<String>,
    /// Keys the regional administrator must supply
    #[serde(default)]
    pub admin_wilayah: Vec<String>,
}

impl RequiredFiles {
    /// The required keys for one category.
    pub fn for_category(&self, category: FileCategory) -> &[String] {
        match category {
            FileCategory::Kabupaten => &self.kabupaten,
            FileCategory::AdminWilayah => &self.admin_wilayah,
        }
    }

    /// Every required key together with its category.
    pub fn iter(&self) -> impl Iterator<Item = (FileCategory, &str)> {
        let kabupaten = self
            .kabupaten
            .iter()
            .map(|key| (FileCategory::Kabupaten, key.as_str()));
        let admin_wilayah = self
            .admin_wilayah
            .iter()
            .map(|key| (FileCategory::AdminWilayah, key.as_str()));
        kabupaten.chain(admin_wilayah)
    }
}
