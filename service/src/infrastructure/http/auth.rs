use crate::domain::error::ServiceError;
use crate::domain::{AuthService, LoginOutcome, SessionStatus};
use crate::infrastructure::http::ApiClient;
use crate::infrastructure::http::api::{check_status, read_json};
use crate::infrastructure::http::dto::{AuthCheckRecord, LoginRecord, LoginRequest};

/// Auth server client. The session lives in the client's cookie store.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl AuthService for HttpAuthService {
    async fn login(&self, password: &str) -> Result<LoginOutcome, ServiceError> {
        let response = self
            .api
            .post(&["auth", "login"])
            .json(&LoginRequest { password })
            .send()
            .await?;
        // a rejected password still carries {success, message}
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let record: LoginRecord = response.json().await?;
            return Ok(record.into());
        }
        let record: LoginRecord = read_json(response, "login").await?;
        Ok(record.into())
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        let response = self.api.post(&["auth", "logout"]).send().await?;
        check_status(response, "logout").await?;
        Ok(())
    }

    async fn check(&self) -> Result<SessionStatus, ServiceError> {
        let response = self.api.get(&["auth", "check"]).send().await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(SessionStatus::default());
        }
        let record: AuthCheckRecord = read_json(response, "session check").await?;
        Ok(record.into())
    }
}
