use std::future::Future;

use serde::{Deserialize, Serialize};
use yokai_common::articles::{Article, ArticleFields};
use yokai_common::{ArticleId, Categories, CategoryId};

use crate::domain::error::ServiceError;

pub mod draft;
pub mod error;
pub mod reader;
pub mod routes;
pub mod search;
pub mod session;
pub mod store;
pub mod workflow;

/// Remote collaborator owning the articles. The admin workflow and the
/// reader only ever talk to articles through this port.
pub trait ArticleService: Clone + Send + Sync + 'static {
    /// most liked articles, best first
    fn popular(&self) -> impl Future<Output = Result<Vec<Article>, ServiceError>> + Send;

    /// one article by its slug, `NotFound` on miss
    fn find_by_slug(&self, slug: &str) -> impl Future<Output = Result<Article, ServiceError>> + Send;

    fn increment_views(&self, slug: &str) -> impl Future<Output = Result<(), ServiceError>> + Send;

    fn toggle_like(&self, slug: &str) -> impl Future<Output = Result<LikeState, ServiceError>> + Send;

    fn like_status(&self, slug: &str) -> impl Future<Output = Result<bool, ServiceError>> + Send;

    /// one page of articles, pages start at 1
    fn list(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Article>, ServiceError>> + Send;

    fn quick_search(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<QuickSearchHit>, ServiceError>> + Send;

    /// total number of articles, optionally within one category
    fn count(
        &self,
        category: Option<&CategoryId>,
    ) -> impl Future<Output = Result<u64, ServiceError>> + Send;

    fn create(
        &self,
        fields: ArticleFields,
    ) -> impl Future<Output = Result<Article, ServiceError>> + Send;

    fn update(
        &self,
        id: &ArticleId,
        fields: ArticleFields,
    ) -> impl Future<Output = Result<Article, ServiceError>> + Send;

    fn delete(&self, id: &ArticleId) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Remote collaborator owning the admin session. Its answer is the only
/// source of truth for access decisions.
pub trait AuthService: Clone + Send + Sync + 'static {
    fn login(&self, password: &str) -> impl Future<Output = Result<LoginOutcome, ServiceError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;

    fn check(&self) -> impl Future<Output = Result<SessionStatus, ServiceError>> + Send;
}

/// Local persistent mirror of the admin flag. A cache, never an authority.
pub trait SessionCache: Send + Sync + 'static {
    fn load(&self) -> bool;
    fn store(&self, is_admin: bool) -> Result<(), anyhow::Error>;
    fn clear(&self);
}

/// The application state handed to every command.
pub trait AppState: Clone + Send + Sync + 'static {
    type A: ArticleService;
    type U: AuthService;
    fn articles(&self) -> &Self::A;
    fn auth(&self) -> Option<&Self::U>;
    fn categories(&self) -> &'static dyn Categories;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub likes: u64,
    pub liked: bool,
}

/// Partial article returned by the quick search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuickSearchHit {
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pub is_admin: bool,
}
