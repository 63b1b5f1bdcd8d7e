use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::error::ServiceError;

/// The body the servers send with error responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            tracing::debug!("{:?}", e);
            Self::Transport(e.to_string())
        }
    }
}

/// Maps a non-success status to the error taxonomy. `what` names the
/// requested resource for not-found errors.
pub(crate) async fn check_status(response: Response, what: &str) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(ServiceError::NotFound(what.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ServiceError::Unauthorized),
        _ => {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or_default();
            tracing::error!("{} answered {}: {}", what, status, text);
            Err(ServiceError::Remote {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Checks the status and decodes a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, ServiceError> {
    let response = check_status(response, what).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(format!("{what}: {e}")))
}
