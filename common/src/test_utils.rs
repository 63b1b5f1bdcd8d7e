use chrono::{TimeZone, Utc};

use crate::domain::articles::{Article, CategoryRef};
use crate::domain::categories::Category;
use crate::domain::derived::{calculate_reading_time, generate_slug};
use crate::domain::{ArticleId, Categories, CategoryId};

/// Simple catalog storing a few categories in memory.
///
/// Public so that other crates can reuse it for their own tests.
#[derive(Debug)]
pub struct SimpleCategories {
    pub categories: Vec<Category>,
}

impl SimpleCategories {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Leaks the catalog so it can be used where a `'static` registry is expected.
    pub fn leak(self) -> &'static dyn Categories {
        Box::leak(Box::new(self))
    }
}

impl Categories for SimpleCategories {
    fn iterate(&self) -> Box<dyn Iterator<Item = &Category> + '_> {
        Box::new(self.categories.iter())
    }

    fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == *id)
    }
}

pub fn make_category(id: &str, name: &str) -> Category {
    Category {
        id: CategoryId::try_new(id).unwrap(),
        name: name.to_string(),
        english_name: name.to_string(),
        description: format!("{} description", name),
        color: None,
    }
}

/// Builds a persisted article with a derived slug and fixed timestamps.
pub fn make_article(id: &str, title: &str) -> Article {
    let content = format!("{} is a yokai from Japanese folklore.", title);
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Article {
        id: ArticleId::try_new(id).unwrap(),
        title: title.to_string(),
        slug: generate_slug(title),
        reading_time: calculate_reading_time(&content),
        content,
        excerpt: format!("About {}", title),
        author: "Admin".to_string(),
        category: CategoryRef::from(&make_category("yokai-animals", "Animal Yokai")),
        image_url: None,
        views: 0,
        likes: 0,
        sources: Vec::new(),
        created_at,
        updated_at: created_at,
        published_at: created_at,
    }
}
