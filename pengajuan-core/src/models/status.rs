use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// The lifecycle state of a submission.
///
/// The string values are used verbatim on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Created by the originating office, not yet sent for review
    Draft,
    /// Waiting for the regional administrator to verify the office's files
    Submitted,
    /// The office's files were accepted
    Approved,
    /// At least one of the office's files was rejected
    Rejected,
    /// Sent again after a rejection; reviewed like `Submitted`
    Resubmitted,
    /// The central administrator accepted the regional administrator's files
    AdminWilayahApproved,
    /// The central administrator rejected the regional administrator's files
    AdminWilayahRejected,
    /// The regional administrator forwarded the record to the central administrator
    AdminWilayahSubmitted,
    /// Terminal: granted
    FinalApproved,
    /// Terminal: refused
    FinalRejected,
}

impl SubmissionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [SubmissionStatus; 10] = [
        Self::Draft,
        Self::Submitted,
        Self::Approved,
        Self::Rejected,
        Self::Resubmitted,
        Self::AdminWilayahApproved,
        Self::AdminWilayahRejected,
        Self::AdminWilayahSubmitted,
        Self::FinalApproved,
        Self::FinalRejected,
    ];

    /// The wire value of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Resubmitted => "resubmitted",
            Self::AdminWilayahApproved => "admin_wilayah_approved",
            Self::AdminWilayahRejected => "admin_wilayah_rejected",
            Self::AdminWilayahSubmitted => "admin_wilayah_submitted",
            Self::FinalApproved => "final_approved",
            Self::FinalRejected => "final_rejected",
        }
    }

    /// Whether entering this status records a rejection reason.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::AdminWilayahRejected | Self::FinalRejected
        )
    }

    /// Whether the record can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FinalApproved | Self::FinalRejected)
    }
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known status values.
#[derive(Debug, Error)]
#[error("unknown submission status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_owned()))
    }
}

/// The visual treatment of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum BadgeStyle {
    /// Gray; also used for unknown statuses
    Neutral,
    /// Blue
    Info,
    /// Amber
    Warning,
    /// Green
    Success,
    /// Red
    Danger,
}

impl BadgeStyle {
    /// The CSS classes used to render the badge.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Neutral => "bg-gray-100 text-gray-800",
            Self::Info => "bg-blue-100 text-blue-800",
            Self::Warning => "bg-yellow-100 text-yellow-800",
            Self::Success => "bg-green-100 text-green-800",
            Self::Danger => "bg-red-100 text-red-800",
        }
    }
}

/// A status rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct StatusDisplay {
    /// Human readable label
    pub label: String,
    /// Badge treatment
    pub style: BadgeStyle,
}

const STATUS_TABLE: [(&str, &str, BadgeStyle); 10] = [
    ("draft", "Draft", BadgeStyle::Neutral),
    ("submitted", "Diajukan", BadgeStyle::Info),
    ("approved", "Disetujui", BadgeStyle::Success),
    ("rejected", "Ditolak", BadgeStyle::Danger),
    ("resubmitted", "Diajukan Ulang", BadgeStyle::Info),
    (
        "admin_wilayah_approved",
        "Disetujui Admin Wilayah",
        BadgeStyle::Success,
    ),
    (
        "admin_wilayah_rejected",
        "Ditolak Admin Wilayah",
        BadgeStyle::Danger,
    ),
    (
        "admin_wilayah_submitted",
        "Diajukan Admin Wilayah",
        BadgeStyle::Warning,
    ),
    ("final_approved", "Disetujui Final", BadgeStyle::Success),
    ("final_rejected", "Ditolak Final", BadgeStyle::Danger),
];

/// Map a raw status string to its label and badge style.
///
/// Unknown statuses fall back to the uppercased raw string with the neutral
/// style, so whatever the server sends can always be rendered.
pub fn status_display(status: &str) -> StatusDisplay {
    STATUS_TABLE
        .iter()
        .find(|(key, _, _)| *key == status)
        .map(|(_, label, style)| StatusDisplay {
            label: (*label).to_owned(),
            style: *style,
        })
        .unwrap_or_else(|| StatusDisplay {
            label: status.to_uppercase(),
            style: BadgeStyle::Neutral,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn every_status_has_a_display_entry() {
        for status in SubmissionStatus::ALL {
            assert!(
                STATUS_TABLE.iter().any(|(key, _, _)| *key == status.as_str()),
                "missing display entry for {status}"
            );
        }
    }

    #[rstest]
    #[case("draft", "Draft", BadgeStyle::Neutral)]
    #[case("approved", "Disetujui", BadgeStyle::Success)]
    #[case("final_rejected", "Ditolak Final", BadgeStyle::Danger)]
    #[case("admin_wilayah_submitted", "Diajukan Admin Wilayah", BadgeStyle::Warning)]
    fn known_statuses(#[case] raw: &str, #[case] label: &str, #[case] style: BadgeStyle) {
        let display = status_display(raw);
        assert_eq!(display.label, label);
        assert_eq!(display.style, style);
    }

    #[test]
    fn unknown_status_is_uppercased_and_neutral() {
        let display = status_display("foo");
        assert_eq!(display.label, "FOO");
        assert_eq!(display.style, BadgeStyle::Neutral);
        assert_eq!(display, status_display("foo"));
    }

    #[test]
    fn wire_values_roundtrip() {
        for status in SubmissionStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().to_owned()));
            assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
        }
        assert!("foo".parse::<SubmissionStatus>().is_err());
    }
}
