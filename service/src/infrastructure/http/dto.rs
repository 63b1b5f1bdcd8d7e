use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use yokai_common::articles::{Article, CategoryRef};
use yokai_common::derived::calculate_reading_time;
use yokai_common::{ArticleId, Categories, CategoryId, Slug};

use crate::domain::error::ServiceError;
use crate::domain::{LoginOutcome, QuickSearchHit, SessionStatus};

/// Article as sent by the article server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    slug: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    author: String,
    category: CategoryField,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    reading_time: Option<u32>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

/// Older records carry the category as a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CategoryField {
    Expanded(CategoryRecord),
    Legacy(String),
}

#[derive(Debug, Clone, Deserialize)]
struct CategoryRecord {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: String,
}

impl CategoryField {
    fn into_category_ref(self, categories: &dyn Categories) -> Result<CategoryRef, ServiceError> {
        match self {
            CategoryField::Expanded(record) => Ok(CategoryRef {
                id: parse_category_id(&record.id)?,
                name: record.name,
                slug: record.slug,
                description: record.description,
            }),
            CategoryField::Legacy(value) => {
                let legacy = value.trim();
                let by_name = categories.iterate().find(|category| {
                    category.id.as_ref().eq_ignore_ascii_case(legacy)
                        || category.name.eq_ignore_ascii_case(legacy)
                        || category.english_name.eq_ignore_ascii_case(legacy)
                });
                match by_name {
                    Some(category) => Ok(CategoryRef::from(category)),
                    None => Ok(CategoryRef::resolve(&parse_category_id(&value)?, categories)),
                }
            }
        }
    }
}

fn parse_category_id(value: &str) -> Result<CategoryId, ServiceError> {
    CategoryId::try_new(value)
        .map_err(|e| ServiceError::Decode(format!("invalid category '{}': {}", value, e)))
}

impl ArticleRecord {
    pub fn into_article(self, categories: &dyn Categories) -> Result<Article, ServiceError> {
        let id = ArticleId::try_new(self.id.as_str())
            .map_err(|e| ServiceError::Decode(format!("invalid article id: {}", e)))?;
        let category = self.category.into_category_ref(categories)?;
        let image_url = self.image_url.filter(|url| !url.trim().is_empty());
        let reading_time = self
            .reading_time
            .filter(|minutes| *minutes > 0)
            .unwrap_or_else(|| calculate_reading_time(&self.content));

        Ok(Article {
            id,
            title: self.title,
            slug: Slug::new(self.slug),
            content: self.content,
            excerpt: self.excerpt,
            author: self.author,
            category,
            image_url,
            views: self.views,
            likes: self.likes,
            sources: self.sources,
            reading_time,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
            published_at: self.published_at.unwrap_or(self.created_at),
        })
    }
}

/// Partial article returned by the quick search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickSearchRecord {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    slug: String,
    #[serde(default)]
    excerpt: Option<String>,
}

impl TryFrom<QuickSearchRecord> for QuickSearchHit {
    type Error = ServiceError;

    fn try_from(value: QuickSearchRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ArticleId::try_new(value.id.as_str())
                .map_err(|e| ServiceError::Decode(format!("invalid article id: {}", e)))?,
            title: value.title,
            slug: value.slug,
            excerpt: value.excerpt,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LikeStatusRecord {
    pub liked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountRecord {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRecord {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl From<LoginRecord> for LoginOutcome {
    fn from(value: LoginRecord) -> Self {
        Self {
            success: value.success,
            message: value.message,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthCheckRecord {
    #[serde(default)]
    pub is_admin: bool,
}

impl From<AuthCheckRecord> for SessionStatus {
    fn from(value: AuthCheckRecord) -> Self {
        Self {
            is_admin: value.is_admin,
        }
    }
}
