/// Failures surfaced by the article and auth ports.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("remote service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Message shown to the person waiting on the operation.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(message) => message.clone(),
            ServiceError::NotFound(_) => "Article not found".to_string(),
            ServiceError::Unauthorized => "You are not signed in as admin".to_string(),
            ServiceError::Remote { message, .. } if !message.is_empty() => message.clone(),
            ServiceError::Remote { .. } | ServiceError::Decode(_) => {
                "The server could not complete the request".to_string()
            }
            ServiceError::Transport(_) => "The server is not reachable".to_string(),
        }
    }
}
