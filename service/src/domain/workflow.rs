use yokai_common::articles::Article;
use yokai_common::{ArticleId, Categories};

use crate::domain::ArticleService;
use crate::domain::draft::{ArticleDraft, CategoryPolicy};
use crate::domain::error::ServiceError;
use crate::domain::store::ArticleStore;

/// The single editor of the admin dashboard.
#[derive(Clone, Debug, Default)]
pub enum Editor {
    #[default]
    Idle,
    Creating {
        draft: ArticleDraft,
    },
    Updating {
        target: Article,
        draft: ArticleDraft,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Creating,
    Updating,
}

/// Admin dashboard controller: list + search + one form editor on top of an
/// [`ArticleService`].
#[derive(Debug)]
pub struct AdminWorkflow<S: ArticleService> {
    service: S,
    categories: &'static dyn Categories,
    policy: CategoryPolicy,
    store: ArticleStore,
    editor: Editor,
    pending_delete: Option<ArticleId>,
    notice: Option<String>,
    loading: bool,
}

impl<S: ArticleService> AdminWorkflow<S> {
    pub fn new(
        service: S,
        categories: &'static dyn Categories,
        policy: CategoryPolicy,
        store: ArticleStore,
    ) -> Self {
        Self {
            service,
            categories,
            policy,
            store,
            editor: Editor::Idle,
            pending_delete: None,
            notice: None,
            loading: false,
        }
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn mode(&self) -> EditorMode {
        match self.editor {
            Editor::Idle => EditorMode::Idle,
            Editor::Creating { .. } => EditorMode::Creating,
            Editor::Updating { .. } => EditorMode::Updating,
        }
    }

    pub fn draft(&self) -> Option<&ArticleDraft> {
        match &self.editor {
            Editor::Idle => None,
            Editor::Creating { draft } | Editor::Updating { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut ArticleDraft> {
        match &mut self.editor {
            Editor::Idle => None,
            Editor::Creating { draft } | Editor::Updating { draft, .. } => Some(draft),
        }
    }

    /// User-visible message left by the last failed operation.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending_delete(&self) -> Option<&ArticleId> {
        self.pending_delete.as_ref()
    }

    // editor transitions

    pub fn start_create(&mut self) {
        self.notice = None;
        self.editor = Editor::Creating {
            draft: ArticleDraft::new(self.categories),
        };
    }

    pub fn start_edit(&mut self, article: &Article) {
        self.notice = None;
        self.editor = Editor::Updating {
            target: article.clone(),
            draft: ArticleDraft::from_article(article),
        };
    }

    /// Opens the editor for a quick search hit. Looks in the loaded articles
    /// first and asks the service otherwise.
    pub async fn edit_by_slug(&mut self, slug: &str) -> Result<(), ServiceError> {
        let article = match self.store.find_by_slug(slug) {
            Some(article) => article.clone(),
            None => self
                .service
                .find_by_slug(slug)
                .await
                .inspect_err(|err| self.notice = Some(err.user_message()))?,
        };
        self.start_edit(&article);
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.editor = Editor::Idle;
        self.notice = None;
    }

    /// Validates the draft and creates or updates the article.
    ///
    /// On failure the editor stays open with the draft untouched.
    pub async fn submit(&mut self) -> Result<Article, ServiceError> {
        let request = match &self.editor {
            Editor::Idle => Err(ServiceError::Validation("The editor is not open".to_string())),
            Editor::Creating { draft } => draft
                .to_fields(self.categories, self.policy)
                .map(|fields| (None, fields)),
            Editor::Updating { target, draft } => draft
                .to_fields(self.categories, self.policy)
                .map(|fields| (Some(target.id.clone()), fields)),
        };
        let (target, fields) = request.inspect_err(|err| self.notice = Some(err.user_message()))?;

        self.loading = true;
        let result = match &target {
            None => self.service.create(fields).await,
            Some(id) => self.service.update(id, fields).await,
        };
        self.loading = false;

        let article = result.inspect_err(|err| {
            tracing::error!("failed to save article: {}", err);
            self.notice = Some(err.user_message());
        })?;

        match target {
            None => self.store.prepend(article.clone()),
            Some(_) => {
                if !self.store.replace(article.clone()) {
                    tracing::debug!("updated article {} is not on the loaded page", article.id);
                }
            }
        }
        tracing::info!("saved article {} ({})", article.id, article.slug);

        self.editor = Editor::Idle;
        self.notice = None;
        Ok(article)
    }

    // deletion

    /// First step of a deletion. Nothing is removed until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: &ArticleId) -> bool {
        if self.store.find(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the article awaiting confirmation, if any.
    pub async fn confirm_delete(&mut self) -> Result<Option<Article>, ServiceError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(None);
        };

        self.loading = true;
        let result = self.service.delete(&id).await;
        self.loading = false;

        result.inspect_err(|err| {
            tracing::error!("failed to delete article {}: {}", id, err);
            self.notice = Some(err.user_message());
        })?;

        let removed = self.store.remove(&id);
        if let Editor::Updating { target, .. } = &self.editor {
            if target.id == id {
                self.editor = Editor::Idle;
            }
        }
        Ok(removed)
    }

    // list

    pub fn search(&mut self, term: impl Into<String>) {
        self.store.set_search_term(term);
    }

    pub fn filtered(&self) -> Vec<&Article> {
        self.store.filtered()
    }

    /// Fetches one page and the total count. A failed count keeps the
    /// previous total.
    pub async fn load_page(&mut self, page: u32) -> Result<(), ServiceError> {
        let page = page.max(1);
        self.loading = true;
        let (articles, count) = futures::join!(
            self.service.list(page, self.store.page_size()),
            self.service.count(None)
        );
        self.loading = false;

        let articles = articles.inspect_err(|err| {
            tracing::error!("failed to fetch articles: {}", err);
            self.notice = Some(err.user_message());
        })?;
        self.store.replace_page(page, articles);

        match count {
            Ok(total) => self.store.set_total_count(total),
            Err(err) => tracing::warn!("failed to fetch article count: {}", err),
        }
        Ok(())
    }
}
