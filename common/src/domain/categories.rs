use std::borrow::Borrow;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::domain::CategoryId;

/// A yōkai category from the closed reference catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    /// localized display name
    pub name: String,
    pub english_name: String,
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl Category {
    /// Label used by pickers, e.g. `Animal Yokai (Zvieracie yokai)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.english_name, self.name)
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Category {}

impl PartialEq<CategoryId> for Category {
    fn eq(&self, other: &CategoryId) -> bool {
        self.id == *other
    }
}

impl Borrow<CategoryId> for Category {
    fn borrow(&self) -> &CategoryId {
        &self.id
    }
}

impl Hash for Category {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
