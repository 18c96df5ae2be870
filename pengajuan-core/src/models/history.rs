use super::{DateTime, SubmissionStatus, UserId};
use crate::workflow::Action;
use serde::{Deserialize, Serialize};

/// One entry in a submission's transition log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct SubmissionEvent {
    /// Monotonic sequence number, used as the pagination cursor
    pub seq: i64,
    /// What was done
    pub action: Action,
    /// The status before the action
    pub from_status: SubmissionStatus,
    /// The status after the action (absent when the record was deleted)
    #[serde(default)]
    pub to_status: Option<SubmissionStatus>,
    /// Who did it
    pub actor: UserId,
    /// Notes supplied with the action
    #[serde(default)]
    pub notes: Option<String>,
    /// When it happened
    pub as_of: DateTime,
}

/// A cursor into a newest-first log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct EventQuery {
    /// Only return events strictly older than this sequence number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
}

/// A page of results together with the query for the next page, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Page<T> {
    /// The results on this page
    pub results: Vec<T>,
    /// The query for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more: Option<EventQuery>,
}
