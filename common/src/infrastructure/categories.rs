use std::{collections::HashSet, path::Path, sync::{Arc, OnceLock}};

use anyhow::{Context, anyhow};
use serde::Deserialize;

use crate::domain::{Categories, CategoryId, categories::Category, is_eligible_id};

/// Loads the category catalog once and hands out a process-wide reference.
pub fn load(catalog_path: &str) -> Result<&'static dyn Categories, anyhow::Error> {
    let loaded = CategoriesAdapter::load(Path::new(catalog_path))?;
    CATEGORIES_REGISTRY
        .set(Arc::new(loaded))
        .map_err(|_| anyhow!("categories catalog is already loaded"))?;
    // get reference to Categories trait with static lifetime
    let categories: &'static dyn Categories = CATEGORIES_REGISTRY
        .get()
        .map(|registry| registry.as_ref())
        .ok_or_else(|| anyhow!("categories catalog is not loaded"))?;
    Ok(categories)
}

const MAX_ID_LEN: usize = 64;

static CATEGORIES_REGISTRY: OnceLock<Arc<dyn Categories>> = OnceLock::new();

#[derive(Debug)]
struct CategoriesAdapter {
    categories: Vec<Category>,
}

impl Categories for CategoriesAdapter {
    fn iterate(&self) -> Box<dyn Iterator<Item = &Category> + '_> {
        Box::new(self.categories.iter())
    }

    fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == *id)
    }
}

impl CategoriesAdapter {
    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let path_str = path.to_string_lossy().into_owned();

        tracing::debug!("Loading categories from {}", path_str);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read categories catalog '{}'", path_str))?;

        Self::parse(&content).with_context(|| format!("failed to parse categories catalog '{}'", path_str))
    }

    fn parse(content: &str) -> Result<Self, anyhow::Error> {
        let record = serde_json::from_str::<CatalogRecord>(content)?;

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(record.categories.len());
        for category in record.categories {
            let category = Category::try_from(category)?;
            if !seen.insert(category.id.clone()) {
                return Err(anyhow!("duplicate category id '{}'", category.id));
            }
            categories.push(category);
        }

        if categories.is_empty() {
            return Err(anyhow!("categories catalog is empty"));
        }

        Ok(Self { categories })
    }
}

// internal structs for Deserializing

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    categories: Vec<CategoryRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRecord {
    id: String,
    name: String,
    english_name: Option<String>,
    #[serde(default)]
    description: String,
    color: Option<String>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = anyhow::Error;

    fn try_from(value: CategoryRecord) -> Result<Self, Self::Error> {
        let normalized = value.id.trim().to_lowercase();
        if normalized.chars().count() > MAX_ID_LEN || !is_eligible_id(&normalized) {
            return Err(anyhow!("invalid category id '{}'", value.id));
        }
        let id = CategoryId::try_new(normalized)
            .with_context(|| format!("invalid category id '{}'", value.id))?;
        let english_name = value.english_name.unwrap_or_else(|| value.name.clone());
        Ok(Category {
            id,
            name: value.name,
            english_name,
            description: value.description,
            color: value.color,
        })
    }
}
