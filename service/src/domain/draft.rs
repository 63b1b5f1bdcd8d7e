use serde::Deserialize;
use yokai_common::articles::{Article, ArticleFields};
use yokai_common::derived::{
    calculate_reading_time, generate_slug, parse_sources, stringify_sources, validate_url,
};
use yokai_common::{Categories, CategoryId, DEFAULT_AUTHOR, Slug};

use crate::domain::error::ServiceError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and content are required!";
pub const REQUIRED_CATEGORY_MESSAGE: &str = "Category is required!";

/// Whether a draft must carry an explicit category or may fall back to the
/// catalog's default one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryPolicy {
    #[default]
    Required,
    Optional,
}

/// A field whose value does not look like an absolute URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldHint {
    ImageUrl,
    Source { line: usize },
}

/// Working copy of an article while the editor is open.
#[derive(Clone, Debug, PartialEq)]
pub struct ArticleDraft {
    title: String,
    slug: String,
    slug_overridden: bool,
    original_title: Option<String>,
    original_slug: Option<String>,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub category: Option<CategoryId>,
    pub image_url: String,
    pub sources_text: String,
    pub views: u64,
    pub likes: u64,
}

impl ArticleDraft {
    /// Empty draft for a new article.
    pub fn new(categories: &dyn Categories) -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            slug_overridden: false,
            original_title: None,
            original_slug: None,
            content: String::new(),
            excerpt: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            category: categories.default_category().map(|category| category.id.clone()),
            image_url: String::new(),
            sources_text: String::new(),
            views: 0,
            likes: 0,
        }
    }

    /// Draft populated from a stored article, sources back to one per line.
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            slug: article.slug.to_string(),
            slug_overridden: false,
            original_title: Some(article.title.clone()),
            original_slug: Some(article.slug.to_string()),
            content: article.content.clone(),
            excerpt: article.excerpt.clone(),
            author: article.author.clone(),
            category: Some(article.category.id.clone()),
            image_url: article.image_url.clone().unwrap_or_default(),
            sources_text: stringify_sources(&article.sources),
            views: article.views,
            likes: article.likes,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current slug preview.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn slug_overridden(&self) -> bool {
        self.slug_overridden
    }

    /// Sets the title; the slug follows it unless it was typed explicitly.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if !self.slug_overridden {
            self.slug = self.follow_title();
        }
    }

    /// Slug shown while the title drives it: the stored one for the stored
    /// title, the derived one otherwise.
    fn follow_title(&self) -> String {
        match (&self.original_title, &self.original_slug) {
            (Some(title), Some(slug)) if *title == self.title => slug.clone(),
            _ => generate_slug(&self.title).to_string(),
        }
    }

    /// Explicit slug. A blank value hands the slug back to the title.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        let slug = slug.into();
        if slug.trim().is_empty() {
            self.slug_overridden = false;
            self.slug = self.follow_title();
        } else {
            self.slug_overridden = true;
            self.slug = slug;
        }
    }

    pub fn reading_time(&self) -> u32 {
        calculate_reading_time(&self.content)
    }

    pub fn sources(&self) -> Vec<String> {
        parse_sources(&self.sources_text)
    }

    /// Fields that do not look like URLs. Informational, submission still works.
    pub fn hints(&self) -> Vec<FieldHint> {
        let mut hints = Vec::new();
        if !self.image_url.trim().is_empty() && !validate_url(&self.image_url) {
            hints.push(FieldHint::ImageUrl);
        }
        for (line, source) in self.sources().iter().enumerate() {
            if !validate_url(source) {
                hints.push(FieldHint::Source { line });
            }
        }
        hints
    }

    /// The slug that will be stored.
    ///
    /// An explicit slug wins. An unchanged title keeps the stored slug.
    /// Otherwise the slug is derived from the title.
    pub fn resolved_slug(&self) -> Slug {
        let slug = if self.slug_overridden {
            self.slug.clone()
        } else {
            self.follow_title()
        };
        if slug.trim().is_empty() {
            generate_slug(&self.title)
        } else {
            generate_slug(&slug)
        }
    }

    /// Validates the draft and derives the fields to send.
    pub fn to_fields(
        &self,
        categories: &dyn Categories,
        policy: CategoryPolicy,
    ) -> Result<ArticleFields, ServiceError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(ServiceError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }

        let category = match (&self.category, policy) {
            (Some(category), _) => category.clone(),
            (None, CategoryPolicy::Optional) => categories
                .default_category()
                .map(|category| category.id.clone())
                .ok_or_else(|| ServiceError::Validation(REQUIRED_CATEGORY_MESSAGE.to_string()))?,
            (None, CategoryPolicy::Required) => {
                return Err(ServiceError::Validation(REQUIRED_CATEGORY_MESSAGE.to_string()));
            }
        };

        let author = match self.author.trim() {
            "" => DEFAULT_AUTHOR.to_string(),
            author => author.to_string(),
        };
        let image_url = Some(self.image_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_owned);

        Ok(ArticleFields {
            title: self.title.clone(),
            slug: self.resolved_slug(),
            content: self.content.clone(),
            excerpt: self.excerpt.clone(),
            author,
            category,
            image_url,
            sources: self.sources(),
            reading_time: self.reading_time(),
            views: self.views,
            likes: self.likes,
        })
    }
}
