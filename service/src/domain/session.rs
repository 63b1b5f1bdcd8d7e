use crate::domain::error::ServiceError;
use crate::domain::{AuthService, LoginOutcome, SessionCache, SessionStatus};

pub const UNCONFIRMED_LOGIN_MESSAGE: &str = "Login was not confirmed by the server";

/// Result of asking the server for the session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Confirmed(SessionStatus),
    /// The local mirror claimed admin but the server did not agree. The
    /// mirror was cleared and everything derived from it must be rebuilt.
    Resync,
}

/// Admin session as seen by this client. Access decisions read the last
/// status confirmed by the server; the cache only survives restarts.
#[derive(Debug)]
pub struct SessionContext<A: AuthService, C: SessionCache> {
    auth: A,
    cache: C,
    status: SessionStatus,
}

impl<A: AuthService, C: SessionCache> SessionContext<A, C> {
    pub fn new(auth: A, cache: C) -> Self {
        Self {
            auth,
            cache,
            status: SessionStatus::default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.status.is_admin
    }

    /// What the local mirror remembers from the previous run.
    pub fn cached_admin(&self) -> bool {
        self.cache.load()
    }

    pub async fn refresh(&mut self) -> RefreshOutcome {
        let cached = self.cache.load();
        let status = match self.auth.check().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("session check failed: {}", e);
                SessionStatus::default()
            }
        };
        self.status = status;

        if cached && !status.is_admin {
            tracing::info!("cached admin session is no longer valid");
            self.cache.clear();
            return RefreshOutcome::Resync;
        }
        self.mirror(status);
        RefreshOutcome::Confirmed(status)
    }

    /// Logs in and confirms the session with a follow-up check.
    pub async fn login(&mut self, password: &str) -> Result<LoginOutcome, ServiceError> {
        let outcome = self.auth.login(password).await?;
        if !outcome.success {
            tracing::info!("login rejected: {}", outcome.message);
            return Ok(outcome);
        }

        let status = self.auth.check().await?;
        self.status = status;
        self.mirror(status);
        if !status.is_admin {
            tracing::warn!("login succeeded but the session check disagrees");
            return Ok(LoginOutcome {
                success: false,
                message: UNCONFIRMED_LOGIN_MESSAGE.to_string(),
            });
        }
        Ok(outcome)
    }

    /// Ends the session. Local state is dropped even when the server call fails.
    pub async fn logout(&mut self) -> Result<(), ServiceError> {
        let result = self.auth.logout().await;
        self.status = SessionStatus::default();
        self.cache.clear();
        result
    }

    fn mirror(&self, status: SessionStatus) {
        let result = if status.is_admin {
            self.cache.store(true)
        } else {
            self.cache.clear();
            Ok(())
        };
        if let Err(e) = result {
            tracing::warn!("failed to persist the session flag: {:#}", e);
        }
    }
}
