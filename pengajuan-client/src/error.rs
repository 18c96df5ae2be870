use reqwest::StatusCode;

/// Everything that can go wrong talking to the server.
///
/// The display string is what a page shows in its error banner.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a failure envelope (or a bare error status)
    #[error("{message}")]
    Rejected {
        /// The HTTP status of the response
        status: StatusCode,
        /// The server's explanation
        message: String,
    },

    /// The server answered successfully but not with what was expected
    #[error("unexpected response from the server: {0}")]
    Malformed(String),

    /// The configured base url cannot be extended with a path
    #[error("invalid server address {0}")]
    Address(String),
}

impl ClientError {
    /// The HTTP status, when the server refused the request.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Malformed(_) | Self::Address(_) => None,
        }
    }
}
