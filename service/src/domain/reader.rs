use yokai_common::articles::Article;

use crate::domain::error::ServiceError;
use crate::domain::{ArticleService, LikeState};

/// An article as shown to a reader, with the like state of this client.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenedArticle {
    pub article: Article,
    pub liked: bool,
}

/// Public reading surface: open an article, like it, browse popular ones.
#[derive(Clone, Debug)]
pub struct ArticleReader<S: ArticleService> {
    service: S,
}

impl<S: ArticleService> ArticleReader<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Loads an article by slug and records the view.
    ///
    /// View counting and like status are best effort: their failures are
    /// logged and the article is still returned.
    pub async fn open(&self, slug: &str) -> Result<OpenedArticle, ServiceError> {
        let mut article = self.service.find_by_slug(slug).await?;

        let (viewed, liked) = futures::join!(
            self.service.increment_views(slug),
            self.service.like_status(slug)
        );
        match viewed {
            Ok(()) => article.views += 1,
            Err(e) => tracing::warn!("failed to record a view of {}: {}", slug, e),
        }
        let liked = liked.unwrap_or_else(|e| {
            tracing::warn!("failed to read like status of {}: {}", slug, e);
            false
        });

        Ok(OpenedArticle { article, liked })
    }

    pub async fn toggle_like(&self, slug: &str) -> Result<LikeState, ServiceError> {
        let state = self.service.toggle_like(slug).await?;
        tracing::debug!("{} now has {} likes (liked: {})", slug, state.likes, state.liked);
        Ok(state)
    }

    pub async fn popular(&self) -> Result<Vec<Article>, ServiceError> {
        self.service.popular().await
    }
}
