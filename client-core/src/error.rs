use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),

    #[error("Request failed with status {status}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Workspace {0} is not in the accessible hierarchy")]
    UnknownWorkspace(String),

    #[error("A workspace switch is already in progress")]
    SwitchInProgress,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Status code of the failed response, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(anyhow::Error::new(err))
    }
}
