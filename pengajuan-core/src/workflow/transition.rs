//! The transition table.
//!
//! Each row says which action moves a record from which statuses to which
//! status, and which roles may perform it. Ownership and file-based guards
//! are layered on top in [`super::authorize`].

use crate::models::{Role, SubmissionStatus};
use std::{fmt::Display, str::FromStr};

use SubmissionStatus as S;

/// An action that changes a submission's status (or removes it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Send a draft or a rejected record for review
    Resubmit,
    /// Accept the originating office's files
    Approve,
    /// Refuse the originating office's files
    Reject,
    /// Forward the record, with the regional files, to the central administrator
    SubmitToCentral,
    /// Accept the regional administrator's files
    AdminWilayahApprove,
    /// Refuse the regional administrator's files
    AdminWilayahReject,
    /// Grant the request
    FinalApprove,
    /// Refuse the request
    FinalReject,
    /// Remove a draft
    Delete,
}

impl Action {
    /// Every action, in the order they are offered.
    pub const ALL: [Action; 9] = [
        Self::Resubmit,
        Self::Approve,
        Self::Reject,
        Self::SubmitToCentral,
        Self::AdminWilayahApprove,
        Self::AdminWilayahReject,
        Self::FinalApprove,
        Self::FinalReject,
        Self::Delete,
    ];

    /// The wire value of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resubmit => "resubmit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SubmitToCentral => "submit-to-central",
            Self::AdminWilayahApprove => "admin-wilayah-approve",
            Self::AdminWilayahReject => "admin-wilayah-reject",
            Self::FinalApprove => "final-approve",
            Self::FinalReject => "final-reject",
            Self::Delete => "delete",
        }
    }

    /// The message shown after the action succeeds.
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Resubmit => "submission sent for review",
            Self::Approve => "submission approved",
            Self::Reject => "submission rejected",
            Self::SubmitToCentral => "submission forwarded to the central administrator",
            Self::AdminWilayahApprove => "regional documents approved",
            Self::AdminWilayahReject => "regional documents rejected",
            Self::FinalApprove => "submission granted",
            Self::FinalReject => "submission refused",
            Self::Delete => "submission deleted",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown action: {s}"))
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    /// The action
    pub action: Action,
    /// The statuses it may start from
    pub from: &'static [SubmissionStatus],
    /// The resulting status; `None` removes the record
    pub to: Option<SubmissionStatus>,
    /// The roles that may perform it
    pub roles: &'static [Role],
}

/// The complete transition table.
pub const TRANSITIONS: &[Transition] = &[
    Transition {
        action: Action::Resubmit,
        from: &[S::Draft, S::Rejected],
        to: Some(S::Submitted),
        roles: &[Role::User, Role::Admin],
    },
    Transition {
        action: Action::Approve,
        from: &[S::Submitted, S::Resubmitted],
        to: Some(S::Approved),
        roles: &[Role::AdminWilayah, Role::Admin],
    },
    Transition {
        action: Action::Reject,
        from: &[S::Submitted, S::Resubmitted],
        to: Some(S::Rejected),
        roles: &[Role::AdminWilayah, Role::Admin],
    },
    Transition {
        action: Action::SubmitToCentral,
        from: &[S::Approved, S::AdminWilayahRejected],
        to: Some(S::AdminWilayahSubmitted),
        roles: &[Role::AdminWilayah, Role::Admin],
    },
    Transition {
        action: Action::AdminWilayahApprove,
        from: &[S::AdminWilayahSubmitted],
        to: Some(S::AdminWilayahApproved),
        roles: &[Role::Admin],
    },
    Transition {
        action: Action::AdminWilayahReject,
        from: &[S::AdminWilayahSubmitted],
        to: Some(S::AdminWilayahRejected),
        roles: &[Role::Admin],
    },
    Transition {
        action: Action::FinalApprove,
        from: &[S::AdminWilayahApproved],
        to: Some(S::FinalApproved),
        roles: &[Role::Admin],
    },
    Transition {
        action: Action::FinalReject,
        from: &[S::AdminWilayahApproved],
        to: Some(S::FinalRejected),
        roles: &[Role::Admin],
    },
    Transition {
        action: Action::Delete,
        from: &[S::Draft],
        to: None,
        roles: &[Role::User, Role::Admin],
    },
];

/// The table row for an action.
pub fn transition(action: Action) -> &'static Transition {
    TRANSITIONS
        .iter()
        .find(|row| row.action == action)
        .unwrap_or_else(|| unreachable!("every action has a row in the transition table"))
}

/// Whether some action lets `role` move a record from `from` to `to`.
///
/// This consults the table only; it knows nothing about ownership or files.
pub fn can_transition(from: SubmissionStatus, to: SubmissionStatus, role: Role) -> bool {
    TRANSITIONS.iter().any(|row| {
        row.to == Some(to) && row.from.contains(&from) && row.roles.contains(&role)
    })
}
