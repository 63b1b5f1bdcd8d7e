pub mod domain;
mod infrastructure;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Derived field tuning

pub const WORDS_PER_MINUTE: usize = 200;
pub const DEFAULT_AUTHOR: &'static str = "Admin";

// expose domain module

pub use domain::*;
pub use infrastructure::categories::load as load_categories;
