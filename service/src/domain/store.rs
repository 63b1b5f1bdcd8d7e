use yokai_common::ArticleId;
use yokai_common::articles::Article;

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// The articles currently known to the admin dashboard: either the whole
/// local collection or the page last fetched from the server.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    articles: Vec<Article>,
    search_term: String,
    current_page: u32,
    page_size: u32,
    total_count: u64,
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ArticleStore {
    pub fn new(page_size: u32) -> Self {
        Self {
            articles: Vec::new(),
            search_term: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
            total_count: 0,
        }
    }

    /// A fully local store holding every article.
    pub fn with_articles(articles: Vec<Article>, page_size: u32) -> Self {
        let mut store = Self::new(page_size);
        store.total_count = articles.len() as u64;
        store.articles = articles;
        store
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    // filtering

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Articles whose title, excerpt or author contain the search term,
    /// ignoring case. Keeps the stored order.
    pub fn filtered(&self) -> Vec<&Article> {
        let needle = self.search_term.to_lowercase();
        self.articles
            .iter()
            .filter(|article| matches(article, &needle))
            .collect()
    }

    // mutations by identity

    pub fn find(&self, id: &ArticleId) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == *id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.slug.as_ref() == slug)
    }

    pub fn prepend(&mut self, article: Article) {
        self.articles.insert(0, article);
        self.total_count += 1;
    }

    /// Replaces the record with the same id. Returns false when it is not held.
    pub fn replace(&mut self, article: Article) -> bool {
        match self.articles.iter_mut().find(|held| held.id == article.id) {
            Some(held) => {
                *held = article;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ArticleId) -> Option<Article> {
        let index = self.articles.iter().position(|article| article.id == *id)?;
        self.total_count = self.total_count.saturating_sub(1);
        Some(self.articles.remove(index))
    }

    // paging

    pub fn replace_page(&mut self, page: u32, articles: Vec<Article>) {
        self.current_page = page.max(1);
        self.articles = articles;
    }

    pub fn set_total_count(&mut self, total_count: u64) {
        self.total_count = total_count;
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(self.page_size as u64) as u32
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

fn matches(article: &Article, needle: &str) -> bool {
    needle.is_empty()
        || [&article.title, &article.excerpt, &article.author]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}
