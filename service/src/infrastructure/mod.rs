use std::path::Path;

use yokai_common::articles::{Article, ArticleFields};
use yokai_common::{ArticleId, Categories, CategoryId};

use crate::domain::error::ServiceError;
use crate::domain::{AppState, ArticleService, LikeState, QuickSearchHit};
use crate::infrastructure::http::{ApiClient, HttpArticleService, HttpAuthService, HttpClientConfig};
use crate::infrastructure::memory::InMemoryArticleService;
use crate::infrastructure::settings::{BackendMode, Settings};

pub mod http;
pub mod memory;
pub mod session_cache;
pub mod settings;

/// The article service selected by configuration.
#[derive(Clone, Debug)]
pub enum ArticleBackend {
    Remote(HttpArticleService),
    Local(InMemoryArticleService),
}

impl ArticleService for ArticleBackend {
    async fn popular(&self) -> Result<Vec<Article>, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.popular().await,
            ArticleBackend::Local(service) => service.popular().await,
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Article, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.find_by_slug(slug).await,
            ArticleBackend::Local(service) => service.find_by_slug(slug).await,
        }
    }

    async fn increment_views(&self, slug: &str) -> Result<(), ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.increment_views(slug).await,
            ArticleBackend::Local(service) => service.increment_views(slug).await,
        }
    }

    async fn toggle_like(&self, slug: &str) -> Result<LikeState, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.toggle_like(slug).await,
            ArticleBackend::Local(service) => service.toggle_like(slug).await,
        }
    }

    async fn like_status(&self, slug: &str) -> Result<bool, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.like_status(slug).await,
            ArticleBackend::Local(service) => service.like_status(slug).await,
        }
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Article>, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.list(page, limit).await,
            ArticleBackend::Local(service) => service.list(page, limit).await,
        }
    }

    async fn quick_search(&self, query: &str, limit: u32) -> Result<Vec<QuickSearchHit>, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.quick_search(query, limit).await,
            ArticleBackend::Local(service) => service.quick_search(query, limit).await,
        }
    }

    async fn count(&self, category: Option<&CategoryId>) -> Result<u64, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.count(category).await,
            ArticleBackend::Local(service) => service.count(category).await,
        }
    }

    async fn create(&self, fields: ArticleFields) -> Result<Article, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.create(fields).await,
            ArticleBackend::Local(service) => service.create(fields).await,
        }
    }

    async fn update(&self, id: &ArticleId, fields: ArticleFields) -> Result<Article, ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.update(id, fields).await,
            ArticleBackend::Local(service) => service.update(id, fields).await,
        }
    }

    async fn delete(&self, id: &ArticleId) -> Result<(), ServiceError> {
        match self {
            ArticleBackend::Remote(service) => service.delete(id).await,
            ArticleBackend::Local(service) => service.delete(id).await,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppStateImpl {
    articles: ArticleBackend,
    auth: Option<HttpAuthService>,
    categories: &'static dyn Categories,
}

impl AppStateImpl {
    pub fn new(
        articles: ArticleBackend,
        auth: Option<HttpAuthService>,
        categories: &'static dyn Categories,
    ) -> Self {
        Self {
            articles,
            auth,
            categories,
        }
    }

    /// Wires the services described by `settings`. The local backend has no
    /// auth server.
    pub fn from_settings(
        settings: &Settings,
        categories: &'static dyn Categories,
    ) -> anyhow::Result<Self> {
        match settings.backend {
            BackendMode::Remote => {
                let api = ApiClient::new(HttpClientConfig {
                    base_url: &settings.api.base_url,
                    timeout: settings.api.timeout(),
                })?;
                tracing::info!("using article server at {}", settings.api.base_url);
                Ok(Self::new(
                    ArticleBackend::Remote(HttpArticleService::new(api.clone(), categories)),
                    Some(HttpAuthService::new(api)),
                    categories,
                ))
            }
            BackendMode::Local => {
                let service = match &settings.local.seed_path {
                    Some(path) => InMemoryArticleService::load_seed(Path::new(path), categories)?,
                    None => InMemoryArticleService::new(categories),
                };
                tracing::info!("using in-memory articles, changes last for this run only");
                Ok(Self::new(ArticleBackend::Local(service), None, categories))
            }
        }
    }
}

impl AppState for AppStateImpl {
    type A = ArticleBackend;
    type U = HttpAuthService;

    fn articles(&self) -> &Self::A {
        &self.articles
    }

    fn auth(&self) -> Option<&Self::U> {
        self.auth.as_ref()
    }

    fn categories(&self) -> &'static dyn Categories {
        self.categories
    }
}
