use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use yokai_common::articles::{Article, ArticleFields};
use yokai_common::{ArticleId, CategoryId};

use crate::domain::error::ServiceError;
use crate::domain::{
    ArticleService, AuthService, LikeState, LoginOutcome, QuickSearchHit, SessionCache,
    SessionStatus,
};
use crate::infrastructure::memory::InMemoryArticleService;

#[derive(Debug, Default)]
struct Script {
    failing: HashSet<&'static str>,
    delays: HashMap<String, Duration>,
    calls: Vec<String>,
}

/// In-memory article service that records calls and can be told to fail
/// or to answer slowly.
#[derive(Clone, Debug)]
pub struct ScriptedArticleService {
    inner: InMemoryArticleService,
    script: Arc<Mutex<Script>>,
}

impl ScriptedArticleService {
    pub fn new(inner: InMemoryArticleService) -> Self {
        Self {
            inner,
            script: Arc::default(),
        }
    }

    pub fn fail(&self, operation: &'static str) {
        self.script.lock().unwrap().failing.insert(operation);
    }

    /// Delays the answer of every call whose argument equals `detail`.
    pub fn delay(&self, detail: &str, delay: Duration) {
        self.script.lock().unwrap().delays.insert(detail.to_string(), delay);
    }

    /// Calls as `operation:argument`, in issue order.
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    async fn enter(&self, operation: &'static str, detail: &str) -> Result<(), ServiceError> {
        let (delay, failing) = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(format!("{operation}:{detail}"));
            (script.delays.get(detail).copied(), script.failing.contains(operation))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if failing {
            return Err(ServiceError::Transport(format!("{operation} failed")));
        }
        Ok(())
    }
}

impl ArticleService for ScriptedArticleService {
    async fn popular(&self) -> Result<Vec<Article>, ServiceError> {
        self.enter("popular", "").await?;
        self.inner.popular().await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Article, ServiceError> {
        self.enter("find_by_slug", slug).await?;
        self.inner.find_by_slug(slug).await
    }

    async fn increment_views(&self, slug: &str) -> Result<(), ServiceError> {
        self.enter("increment_views", slug).await?;
        self.inner.increment_views(slug).await
    }

    async fn toggle_like(&self, slug: &str) -> Result<LikeState, ServiceError> {
        self.enter("toggle_like", slug).await?;
        self.inner.toggle_like(slug).await
    }

    async fn like_status(&self, slug: &str) -> Result<bool, ServiceError> {
        self.enter("like_status", slug).await?;
        self.inner.like_status(slug).await
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Article>, ServiceError> {
        self.enter("list", &format!("{page}/{limit}")).await?;
        self.inner.list(page, limit).await
    }

    async fn quick_search(&self, query: &str, limit: u32) -> Result<Vec<QuickSearchHit>, ServiceError> {
        self.enter("quick_search", query).await?;
        self.inner.quick_search(query, limit).await
    }

    async fn count(&self, category: Option<&CategoryId>) -> Result<u64, ServiceError> {
        let detail = category.map(|c| c.to_string()).unwrap_or_default();
        self.enter("count", &detail).await?;
        self.inner.count(category).await
    }

    async fn create(&self, fields: ArticleFields) -> Result<Article, ServiceError> {
        self.enter("create", &fields.title).await?;
        self.inner.create(fields).await
    }

    async fn update(&self, id: &ArticleId, fields: ArticleFields) -> Result<Article, ServiceError> {
        self.enter("update", id.as_ref()).await?;
        self.inner.update(id, fields).await
    }

    async fn delete(&self, id: &ArticleId) -> Result<(), ServiceError> {
        self.enter("delete", id.as_ref()).await?;
        self.inner.delete(id).await
    }
}

/// Auth server double answering with a fixed session status.
#[derive(Clone, Debug)]
pub struct StubAuthService {
    state: Arc<Mutex<StubAuthState>>,
}

#[derive(Debug)]
struct StubAuthState {
    password: String,
    logged_in: bool,
    check_fails: bool,
}

impl StubAuthService {
    pub fn new(password: &str, logged_in: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(StubAuthState {
                password: password.to_string(),
                logged_in,
                check_fails: false,
            })),
        }
    }

    pub fn fail_checks(&self) {
        self.state.lock().unwrap().check_fails = true;
    }

    /// Server side session expiry.
    pub fn expire(&self) {
        self.state.lock().unwrap().logged_in = false;
    }
}

impl AuthService for StubAuthService {
    async fn login(&self, password: &str) -> Result<LoginOutcome, ServiceError> {
        let mut state = self.state.lock().unwrap();
        if state.password == password {
            state.logged_in = true;
            Ok(LoginOutcome { success: true, message: "Login successful".to_string() })
        } else {
            Ok(LoginOutcome { success: false, message: "Invalid password".to_string() })
        }
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        self.state.lock().unwrap().logged_in = false;
        Ok(())
    }

    async fn check(&self) -> Result<SessionStatus, ServiceError> {
        let state = self.state.lock().unwrap();
        if state.check_fails {
            return Err(ServiceError::Transport("auth server unreachable".to_string()));
        }
        Ok(SessionStatus { is_admin: state.logged_in })
    }
}

/// Session cache kept in memory.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    is_admin: Mutex<bool>,
}

impl MemorySessionCache {
    pub fn with_admin(is_admin: bool) -> Self {
        Self { is_admin: Mutex::new(is_admin) }
    }
}

impl SessionCache for MemorySessionCache {
    fn load(&self) -> bool {
        *self.is_admin.lock().unwrap()
    }

    fn store(&self, is_admin: bool) -> Result<(), anyhow::Error> {
        *self.is_admin.lock().unwrap() = is_admin;
        Ok(())
    }

    fn clear(&self) {
        *self.is_admin.lock().unwrap() = false;
    }
}
