use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use itertools::Itertools;
use tokio::sync::Mutex;
use yokai_common::articles::{Article, ArticleFields, CategoryRef};
use yokai_common::{ArticleId, Categories, CategoryId};

use crate::domain::error::ServiceError;
use crate::domain::{ArticleService, LikeState, QuickSearchHit};
use crate::infrastructure::http::dto::ArticleRecord;

/// Number of articles returned by the popular listing.
pub const POPULAR_LIMIT: usize = 6;

/// Article service kept in process memory. Identifiers are generated on the
/// client from the current time in milliseconds.
#[derive(Clone, Debug)]
pub struct InMemoryArticleService {
    state: Arc<Mutex<MemoryState>>,
    categories: &'static dyn Categories,
}

#[derive(Debug, Default)]
struct MemoryState {
    articles: Vec<Article>,
    liked: HashSet<String>,
    last_id: i64,
}

impl InMemoryArticleService {
    pub fn new(categories: &'static dyn Categories) -> Self {
        Self::with_articles(Vec::new(), categories)
    }

    pub fn with_articles(articles: Vec<Article>, categories: &'static dyn Categories) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                articles,
                ..MemoryState::default()
            })),
            categories,
        }
    }

    /// Seeds the collection from a JSON array of articles in the wire format.
    pub fn load_seed(path: &Path, categories: &'static dyn Categories) -> Result<Self, anyhow::Error> {
        let path_str = path.to_string_lossy().into_owned();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed articles '{}'", path_str))?;
        let records = serde_json::from_str::<Vec<ArticleRecord>>(&content)
            .with_context(|| format!("failed to parse seed articles '{}'", path_str))?;
        let articles = records
            .into_iter()
            .map(|record| record.into_article(categories))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("invalid seed article in '{}'", path_str))?;

        tracing::info!("seeded {} articles from {}", articles.len(), path_str);
        Ok(Self::with_articles(articles, categories))
    }

    pub async fn snapshot(&self) -> Vec<Article> {
        self.state.lock().await.articles.clone()
    }
}

impl MemoryState {
    fn next_id(&mut self) -> Result<ArticleId, ServiceError> {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        ArticleId::try_new(id.to_string()).map_err(|e| ServiceError::Validation(e.to_string()))
    }

    fn by_slug_mut(&mut self, slug: &str) -> Result<&mut Article, ServiceError> {
        self.articles
            .iter_mut()
            .find(|article| article.slug.as_ref() == slug)
            .ok_or_else(|| ServiceError::NotFound(slug.to_string()))
    }
}

impl ArticleService for InMemoryArticleService {
    async fn popular(&self) -> Result<Vec<Article>, ServiceError> {
        let state = self.state.lock().await;
        Ok(state
            .articles
            .iter()
            .sorted_by(|a, b| b.likes.cmp(&a.likes))
            .take(POPULAR_LIMIT)
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Article, ServiceError> {
        let mut state = self.state.lock().await;
        state.by_slug_mut(slug).map(|article| article.clone())
    }

    async fn increment_views(&self, slug: &str) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        let article = state.by_slug_mut(slug)?;
        article.views += 1;
        Ok(())
    }

    async fn toggle_like(&self, slug: &str) -> Result<LikeState, ServiceError> {
        let mut state = self.state.lock().await;
        let liked = !state.liked.contains(slug);
        let article = state.by_slug_mut(slug)?;
        article.likes = if liked {
            article.likes + 1
        } else {
            article.likes.saturating_sub(1)
        };
        let likes = article.likes;

        if liked {
            state.liked.insert(slug.to_string());
        } else {
            state.liked.remove(slug);
        }
        Ok(LikeState { likes, liked })
    }

    async fn like_status(&self, slug: &str) -> Result<bool, ServiceError> {
        let mut state = self.state.lock().await;
        state.by_slug_mut(slug)?;
        Ok(state.liked.contains(slug))
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Article>, ServiceError> {
        let state = self.state.lock().await;
        let offset = (page.max(1) as usize - 1) * limit as usize;
        Ok(state
            .articles
            .iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn quick_search(&self, query: &str, limit: u32) -> Result<Vec<QuickSearchHit>, ServiceError> {
        let needle = query.trim().to_lowercase();
        let state = self.state.lock().await;
        Ok(state
            .articles
            .iter()
            .filter(|article| article.title.to_lowercase().contains(&needle))
            .take(limit as usize)
            .map(|article| QuickSearchHit {
                id: article.id.clone(),
                title: article.title.clone(),
                slug: article.slug.to_string(),
                excerpt: Some(article.excerpt.clone()),
            })
            .collect())
    }

    async fn count(&self, category: Option<&CategoryId>) -> Result<u64, ServiceError> {
        let state = self.state.lock().await;
        let count = state
            .articles
            .iter()
            .filter(|article| category.is_none_or(|id| article.category.id == *id))
            .count();
        Ok(count as u64)
    }

    async fn create(&self, fields: ArticleFields) -> Result<Article, ServiceError> {
        let category = CategoryRef::resolve(&fields.category, self.categories);
        let mut state = self.state.lock().await;
        let id = state.next_id()?;
        let article = fields.into_article(id, category, Utc::now());
        state.articles.insert(0, article.clone());
        Ok(article)
    }

    async fn update(&self, id: &ArticleId, fields: ArticleFields) -> Result<Article, ServiceError> {
        let category = CategoryRef::resolve(&fields.category, self.categories);
        let mut state = self.state.lock().await;
        let article = state
            .articles
            .iter_mut()
            .find(|article| article.id == *id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        fields.apply_to(article, category, Utc::now());
        Ok(article.clone())
    }

    async fn delete(&self, id: &ArticleId) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        let index = state
            .articles
            .iter()
            .position(|article| article.id == *id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        state.articles.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use yokai_common::Slug;
    use yokai_common::test_utils::{SimpleCategories, make_article, make_category};

    use super::*;

    fn categories() -> &'static dyn Categories {
        SimpleCategories::new(vec![make_category("oni", "Oni")]).leak()
    }

    fn fields(title: &str) -> ArticleFields {
        ArticleFields {
            title: title.to_string(),
            slug: yokai_common::derived::generate_slug(title),
            content: "content".to_string(),
            excerpt: String::new(),
            author: "Admin".to_string(),
            category: CategoryId::try_new("oni").unwrap(),
            image_url: None,
            sources: vec![],
            reading_time: 1,
            views: 0,
            likes: 0,
        }
    }

    #[tokio::test]
    async fn toggling_twice_restores_like_state() {
        let mut kitsune = make_article("1", "Kitsune");
        kitsune.likes = 10;
        let service = InMemoryArticleService::with_articles(vec![kitsune], categories());

        let first = service.toggle_like("kitsune").await.unwrap();
        assert_eq!(first, LikeState { likes: 11, liked: true });
        assert!(service.like_status("kitsune").await.unwrap());

        let second = service.toggle_like("kitsune").await.unwrap();
        assert_eq!(second, LikeState { likes: 10, liked: false });
        assert!(!service.like_status("kitsune").await.unwrap());
    }

    #[tokio::test]
    async fn created_ids_are_unique_and_newest_first() {
        let service = InMemoryArticleService::new(categories());

        let first = service.create(fields("Oni")).await.unwrap();
        let second = service.create(fields("Aka Oni")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.category.name, "Oni");
        let titles: Vec<_> = service.snapshot().await.into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["Aka Oni", "Oni"]);
    }

    #[tokio::test]
    async fn popular_ranks_by_likes() {
        let articles = (1..=8)
            .map(|n| {
                let mut article = make_article(&n.to_string(), &format!("Yokai {n}"));
                article.likes = n * 3 % 8;
                article
            })
            .collect();
        let service = InMemoryArticleService::with_articles(articles, categories());

        let popular = service.popular().await.unwrap();

        assert_eq!(popular.len(), POPULAR_LIMIT);
        assert!(popular.windows(2).all(|pair| pair[0].likes >= pair[1].likes));
    }

    #[tokio::test]
    async fn count_filters_by_category() {
        let mut oni = make_article("1", "Oni");
        oni.category = CategoryRef::from(&make_category("oni", "Oni"));
        let service =
            InMemoryArticleService::with_articles(vec![oni, make_article("2", "Kitsune")], categories());

        assert_eq!(service.count(None).await.unwrap(), 2);
        assert_eq!(service.count(Some(&CategoryId::try_new("oni").unwrap())).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_slug_is_not_found() {
        let service = InMemoryArticleService::new(categories());
        assert!(matches!(service.find_by_slug("nue").await, Err(ServiceError::NotFound(_))));
        assert!(service.increment_views("nue").await.is_err());
        assert!(service.like_status("nue").await.is_err());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let service = InMemoryArticleService::new(categories());
        let id = ArticleId::try_new("404").unwrap();
        assert!(matches!(service.update(&id, fields("Oni")).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete(&id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn quick_search_limits_hits() {
        let articles = (1..=10)
            .map(|n| make_article(&n.to_string(), &format!("Kitsune {n}")))
            .collect();
        let service = InMemoryArticleService::with_articles(articles, categories());

        let hits = service.quick_search("KITSUNE", 8).await.unwrap();

        assert_eq!(hits.len(), 8);
        assert_eq!(hits[0].slug, "kitsune-1");
    }

    #[tokio::test]
    async fn load_seed_reads_wire_articles() {
        let seed = r#"[{
            "_id": "1",
            "title": "Kappa",
            "slug": "kappa",
            "content": "River imp",
            "excerpt": "Water yokai",
            "author": "Admin",
            "category": "oni",
            "views": 5,
            "likes": 2,
            "readingTime": 1,
            "imageUrl": "",
            "sources": ["https://yokai.com/kappa"],
            "createdAt": "2024-05-01T12:00:00.000Z",
            "updatedAt": "2024-05-01T12:00:00.000Z",
            "publishedAt": "2024-05-01T12:00:00.000Z"
        }]"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(seed.as_bytes()).unwrap();

        let service = InMemoryArticleService::load_seed(file.path(), categories()).unwrap();

        let kappa = service.find_by_slug("kappa").await.unwrap();
        assert_eq!(kappa.slug, Slug::new("kappa"));
        assert_eq!(kappa.category.name, "Oni");
        assert_eq!(kappa.image_url, None);
    }
}
