use std::fmt::Debug;
use std::sync::LazyLock;
use nutype::nutype;
use regex::Regex;
use crate::domain::categories::Category;

pub mod articles;
pub mod categories;
pub mod derived;

pub trait Categories: Send + Sync + Debug + 'static {
    /// iterate all categories in catalog order
    fn iterate(&self) -> Box<dyn Iterator<Item = &Category> + '_>;
    /// find category by its id
    fn get(&self, id: &CategoryId) -> Option<&Category>;
    /// the category new drafts start with
    fn default_category(&self) -> Option<&Category> {
        self.iterate().next()
    }
}

// A regex for catalog category ids: ASCII letters, digits, underscore and hyphen.
// Example: "yokai-animals" or "64f0c2" is valid; "yokai animals" is not.
pub const ELIGIBLE_SYMBOLS_REGEX: &str = r"^[A-Za-z0-9_-]+$";

static ELIGIBLE_SYMBOLS_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ELIGIBLE_SYMBOLS_REGEX).expect("ELIGIBLE_SYMBOLS_REGEX must be a valid regex")
});

pub fn is_eligible_id(id: &str) -> bool {
    ELIGIBLE_SYMBOLS_REGEX_COMPILED.is_match(id)
}

/// Opaque identifier assigned to a persisted article.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct ArticleId(String);

/// Opaque category identifier. Catalog ids are additionally held to
/// [`is_eligible_id`] by the catalog loader; ids coming from the server are
/// kept as sent.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct CategoryId(String);

/// URL segment of an article. Not checked for uniqueness on the client.
#[nutype(
    sanitize(trim),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct Slug(String);

impl Slug {
    pub fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }
}
