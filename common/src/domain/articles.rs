use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::categories::Category;
use crate::domain::{ArticleId, Categories, CategoryId, Slug};

/// A persisted encyclopedia article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub slug: Slug,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub category: CategoryRef,
    pub image_url: Option<String>,
    pub views: u64,
    pub likes: u64,
    pub sources: Vec<String>,
    pub reading_time: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

/// Category as embedded into an article. Always expanded, even when the
/// server only sent an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
}

impl CategoryRef {
    /// Expands a bare category id through the catalog. Ids missing from the
    /// catalog keep the id as display name.
    pub fn resolve(id: &CategoryId, categories: &dyn Categories) -> Self {
        match categories.get(id) {
            Some(category) => Self::from(category),
            None => {
                tracing::debug!("category {} is not in the catalog", id);
                Self {
                    id: id.clone(),
                    name: id.to_string(),
                    slug: None,
                    description: String::new(),
                }
            }
        }
    }
}

impl From<&Category> for CategoryRef {
    fn from(value: &Category) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            slug: Some(value.id.to_string()),
            description: value.description.clone(),
        }
    }
}

/// Editable article fields, with slug, reading time and sources already
/// derived. Sent on create and on update.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFields {
    pub title: String,
    pub slug: Slug,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub category: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub sources: Vec<String>,
    pub reading_time: u32,
    pub views: u64,
    pub likes: u64,
}

impl ArticleFields {
    /// Materializes a new record. All three timestamps are set to `now`.
    pub fn into_article(self, id: ArticleId, category: CategoryRef, now: DateTime<Utc>) -> Article {
        Article {
            id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            author: self.author,
            category,
            image_url: self.image_url,
            views: self.views,
            likes: self.likes,
            sources: self.sources,
            reading_time: self.reading_time,
            created_at: now,
            updated_at: now,
            published_at: now,
        }
    }

    /// Merges the fields into an existing record, keeping its identity and
    /// creation/publication instants.
    pub fn apply_to(self, article: &mut Article, category: CategoryRef, now: DateTime<Utc>) {
        article.title = self.title;
        article.slug = self.slug;
        article.content = self.content;
        article.excerpt = self.excerpt;
        article.author = self.author;
        article.category = category;
        article.image_url = self.image_url;
        article.sources = self.sources;
        article.reading_time = self.reading_time;
        article.views = self.views;
        article.likes = self.likes;
        article.updated_at = now;
    }
}
