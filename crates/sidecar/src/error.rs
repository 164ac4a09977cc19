use thiserror::Error;

/// Errors returned by sidecar API calls
#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected status {status} during {operation}: {body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// The actor method itself failed inside the actor runtime
    #[error("Actor method {actor_type}/{actor_id}/{method} failed: {message}")]
    ActorMethodInvocation {
        actor_type: String,
        actor_id: String,
        method: String,
        error_code: Option<String>,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SidecarResult<T> = std::result::Result<T, SidecarError>;

impl SidecarError {
    /// Whether an actor method failed because it is not implemented
    pub fn is_not_implemented(&self) -> bool {
        match self {
            SidecarError::ActorMethodInvocation { message, .. } => {
                message.contains("NotImplemented") || message.contains("not implemented")
            }
            _ => false,
        }
    }

    /// Build a status error from an operation name and reply
    pub(crate) fn unexpected_status(operation: impl Into<String>, status: u16, body: String) -> Self {
        SidecarError::UnexpectedStatus {
            operation: operation.into(),
            status,
            body,
        }
    }
}
