use anyhow::{Context, anyhow, bail};
use yokai_common::articles::Article;
use yokai_common::{ArticleId, Categories, CategoryId};

use crate::cli::{ArticleArgs, Commands};
use crate::domain::draft::{ArticleDraft, FieldHint};
use crate::domain::error::ServiceError;
use crate::domain::reader::ArticleReader;
use crate::domain::routes::{Navigation, Route, resolve};
use crate::domain::search::{QuickSearch, SearchOutcome};
use crate::domain::session::{RefreshOutcome, SessionContext};
use crate::domain::store::ArticleStore;
use crate::domain::workflow::AdminWorkflow;
use crate::domain::{AppState, ArticleService, AuthService};
use crate::infrastructure::session_cache::FileSessionCache;
use crate::infrastructure::settings::Settings;

/// Runs one command against the configured services.
pub async fn run<S: AppState>(
    command: Commands,
    password: Option<String>,
    state: S,
    settings: &Settings,
) -> anyhow::Result<()> {
    match command {
        Commands::Popular => popular(&state).await,
        Commands::Read { slug } => read(&state, &slug).await,
        Commands::Like { slug } => like(&state, &slug).await,
        Commands::Quick { term } => quick(&state, settings, &term).await,
        Commands::Route { path } => route(&state, settings, &path).await,
        Commands::Login => login(&state, settings, password).await,
        Commands::Logout => logout(&state, settings).await,
        Commands::Whoami => whoami(&state, settings).await,
        Commands::List { page, search } => {
            list(&mut admin(&state, settings, password).await?, page, search).await
        }
        Commands::Search { term, page } => {
            list(&mut admin(&state, settings, password).await?, page, Some(term)).await
        }
        Commands::Create { fields } => {
            create(&mut admin(&state, settings, password).await?, fields).await
        }
        Commands::Edit { slug, fields } => {
            edit(&mut admin(&state, settings, password).await?, &slug, fields).await
        }
        Commands::Delete { id, yes } => {
            delete(&mut admin(&state, settings, password).await?, &id, yes).await
        }
    }
}

/// Admin dashboard for one command, after the session was confirmed.
async fn admin<S: AppState>(
    state: &S,
    settings: &Settings,
    password: Option<String>,
) -> anyhow::Result<AdminWorkflow<S::A>> {
    require_admin(state, settings, password.as_deref()).await?;
    Ok(AdminWorkflow::new(
        state.articles().clone(),
        state.categories(),
        settings.admin.category_policy,
        ArticleStore::new(settings.admin.page_size),
    ))
}

// reader

async fn popular<S: AppState>(state: &S) -> anyhow::Result<()> {
    let articles = ArticleReader::new(state.articles().clone())
        .popular()
        .await
        .map_err(user_error)?;
    if articles.is_empty() {
        println!("No articles yet");
    }
    for article in &articles {
        println!("{:>5} likes  {}  /article/{}", article.likes, article.title, article.slug);
    }
    Ok(())
}

async fn read<S: AppState>(state: &S, slug: &str) -> anyhow::Result<()> {
    let opened = ArticleReader::new(state.articles().clone())
        .open(slug)
        .await
        .map_err(user_error)?;
    let article = &opened.article;
    let category = state
        .categories()
        .get(&article.category.id)
        .map(|category| category.label())
        .unwrap_or_else(|| article.category.name.clone());

    println!("{}", article.title);
    println!(
        "{} | {} | {} min read | {} views | {} likes{}",
        category,
        article.author,
        article.reading_time,
        article.views,
        article.likes,
        if opened.liked { " (liked)" } else { "" }
    );
    println!("published {}", article.published_at.format("%Y-%m-%d"));
    if let Some(image_url) = &article.image_url {
        println!("image: {}", image_url);
    }
    println!();
    println!("{}", article.content);
    if !article.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &article.sources {
            println!("  - {}", source);
        }
    }
    Ok(())
}

async fn like<S: AppState>(state: &S, slug: &str) -> anyhow::Result<()> {
    let like = ArticleReader::new(state.articles().clone())
        .toggle_like(slug)
        .await
        .map_err(user_error)?;
    let verb = if like.liked { "Liked" } else { "Unliked" };
    println!("{} {}, {} likes", verb, slug, like.likes);
    Ok(())
}

async fn quick<S: AppState>(state: &S, settings: &Settings, term: &str) -> anyhow::Result<()> {
    let search = QuickSearch::new(
        state.articles().clone(),
        settings.quick_search.debounce(),
        settings.quick_search.limit,
    );
    match search.query(term).await.map_err(user_error)? {
        SearchOutcome::Results(hits) if hits.is_empty() => println!("No matches"),
        SearchOutcome::Results(hits) => {
            for hit in hits {
                println!("{}  /article/{}", hit.title, hit.slug);
                if let Some(excerpt) = hit.excerpt.filter(|e| !e.is_empty()) {
                    println!("    {}", excerpt);
                }
            }
        }
        SearchOutcome::Cleared | SearchOutcome::Superseded => {}
    }
    Ok(())
}

// session

fn session<U: AuthService>(auth: &U, settings: &Settings) -> SessionContext<U, FileSessionCache> {
    SessionContext::new(
        auth.clone(),
        FileSessionCache::new(&settings.session.cache_path),
    )
}

/// Admin commands need a session confirmed by the server. The local backend
/// has no auth server and is always writable.
async fn require_admin<S: AppState>(
    state: &S,
    settings: &Settings,
    password: Option<&str>,
) -> anyhow::Result<()> {
    let Some(auth) = state.auth() else {
        return Ok(());
    };
    let mut session = session(auth, settings);

    if let Some(password) = password {
        let outcome = session.login(password).await.map_err(user_error)?;
        if !outcome.success {
            bail!(outcome.message);
        }
        return Ok(());
    }

    match session.refresh().await {
        RefreshOutcome::Confirmed(status) if status.is_admin => Ok(()),
        RefreshOutcome::Confirmed(_) => Err(user_error(ServiceError::Unauthorized)),
        RefreshOutcome::Resync => bail!("The admin session has expired, log in again"),
    }
}

async fn login<S: AppState>(
    state: &S,
    settings: &Settings,
    password: Option<String>,
) -> anyhow::Result<()> {
    let auth = state
        .auth()
        .ok_or_else(|| anyhow!("The local backend has no admin login"))?;
    let password = password.context("pass the admin password with --password")?;

    let outcome = session(auth, settings)
        .login(&password)
        .await
        .map_err(user_error)?;
    if !outcome.success {
        bail!(outcome.message);
    }
    println!("{}", outcome.message);
    Ok(())
}

async fn logout<S: AppState>(state: &S, settings: &Settings) -> anyhow::Result<()> {
    let Some(auth) = state.auth() else {
        println!("Nothing to log out of");
        return Ok(());
    };
    session(auth, settings).logout().await.map_err(user_error)?;
    println!("Logged out");
    Ok(())
}

async fn is_admin<S: AppState>(state: &S, settings: &Settings) -> bool {
    match state.auth() {
        Some(auth) => match session(auth, settings).refresh().await {
            RefreshOutcome::Confirmed(status) => status.is_admin,
            RefreshOutcome::Resync => {
                println!("The cached admin session was stale and has been cleared");
                false
            }
        },
        None => true,
    }
}

async fn whoami<S: AppState>(state: &S, settings: &Settings) -> anyhow::Result<()> {
    if is_admin(state, settings).await {
        println!("admin");
    } else {
        println!("visitor");
    }
    Ok(())
}

async fn route<S: AppState>(state: &S, settings: &Settings, path: &str) -> anyhow::Result<()> {
    let route = Route::parse(path);
    let is_admin = !route.requires_admin() || is_admin(state, settings).await;
    match resolve(route, is_admin) {
        Navigation::Show(Route::NotFound) => println!("not found"),
        Navigation::Show(route) => println!("show {}", route),
        Navigation::RedirectHome => println!("redirect {}", Route::Home),
    }
    Ok(())
}

// admin

async fn list<S: ArticleService>(
    workflow: &mut AdminWorkflow<S>,
    page: u32,
    search: Option<String>,
) -> anyhow::Result<()> {
    workflow.load_page(page).await.map_err(|e| notice(workflow, e))?;
    if let Some(term) = search {
        workflow.search(term);
    }

    let store = workflow.store();
    for article in workflow.filtered() {
        println!(
            "{}  {}  /article/{}  [{}]",
            article.id, article.title, article.slug, article.category.name
        );
    }
    println!(
        "page {} of {} ({} articles){}{}",
        store.current_page(),
        store.total_pages().max(1),
        store.total_count(),
        if store.has_previous_page() { ", --page for previous" } else { "" },
        if store.has_next_page() { ", more on next page" } else { "" }
    );
    Ok(())
}

async fn create<S: ArticleService>(
    workflow: &mut AdminWorkflow<S>,
    fields: ArticleArgs,
) -> anyhow::Result<()> {
    workflow.start_create();
    fill_draft(workflow, fields)?;
    let article = workflow.submit().await.map_err(|e| notice(workflow, e))?;
    println!("Created {} ({})", article.title, article.id);
    print_saved(&article);
    Ok(())
}

async fn edit<S: ArticleService>(
    workflow: &mut AdminWorkflow<S>,
    slug: &str,
    fields: ArticleArgs,
) -> anyhow::Result<()> {
    workflow.edit_by_slug(slug).await.map_err(|e| notice(workflow, e))?;
    fill_draft(workflow, fields)?;
    let article = workflow.submit().await.map_err(|e| notice(workflow, e))?;
    println!("Updated {} ({})", article.title, article.id);
    print_saved(&article);
    Ok(())
}

async fn delete<S: ArticleService>(
    workflow: &mut AdminWorkflow<S>,
    id: &str,
    confirmed: bool,
) -> anyhow::Result<()> {
    let id = ArticleId::try_new(id).map_err(|e| anyhow!("invalid article id: {}", e))?;

    // the article has to be on a loaded page before it can be deleted
    let mut page = 1;
    loop {
        workflow.load_page(page).await.map_err(|e| notice(workflow, e))?;
        if workflow.request_delete(&id) {
            break;
        }
        if !workflow.store().has_next_page() {
            bail!(ServiceError::NotFound(id.to_string()).user_message());
        }
        page += 1;
    }

    let title = workflow
        .store()
        .find(&id)
        .map(|article| article.title.clone())
        .unwrap_or_default();
    if !confirmed {
        workflow.dismiss_delete();
        println!("Would delete '{}' ({}). Re-run with --yes to confirm.", title, id);
        return Ok(());
    }

    workflow.confirm_delete().await.map_err(|e| notice(workflow, e))?;
    println!("Deleted '{}' ({})", title, id);
    Ok(())
}

fn fill_draft<S: ArticleService>(
    workflow: &mut AdminWorkflow<S>,
    fields: ArticleArgs,
) -> anyhow::Result<()> {
    let category = fields
        .category
        .map(|category| {
            CategoryId::try_new(category.trim().to_lowercase())
                .map_err(|e| anyhow!("invalid category '{}': {}", category, e))
        })
        .transpose()?;
    let draft = workflow
        .draft_mut()
        .ok_or_else(|| anyhow!("The editor is not open"))?;

    if let Some(title) = fields.title {
        draft.set_title(title);
    }
    if let Some(slug) = fields.new_slug {
        draft.set_slug(slug);
    }
    if let Some(content) = fields.content {
        draft.content = content;
    }
    if let Some(excerpt) = fields.excerpt {
        draft.excerpt = excerpt;
    }
    if let Some(author) = fields.author {
        draft.author = author;
    }
    if category.is_some() {
        draft.category = category;
    }
    if let Some(image_url) = fields.image_url {
        draft.image_url = image_url;
    }
    if !fields.sources.is_empty() {
        draft.sources_text = fields.sources.join("\n");
    }

    print_hints(draft);
    Ok(())
}

fn print_hints(draft: &ArticleDraft) {
    let sources = draft.sources();
    for hint in draft.hints() {
        match hint {
            FieldHint::ImageUrl => println!("note: image url '{}' is not a full URL", draft.image_url),
            FieldHint::Source { line } => {
                let source = sources.get(line).map(String::as_str).unwrap_or_default();
                println!("note: source '{}' is not a URL", source)
            }
        }
    }
}

fn print_saved(article: &Article) {
    println!(
        "/article/{}  {} min read  category {}",
        article.slug, article.reading_time, article.category.name
    );
}

/// The notice the dashboard shows for a failed workflow step.
fn notice<S: ArticleService>(workflow: &AdminWorkflow<S>, error: ServiceError) -> anyhow::Error {
    tracing::debug!("{:?}", error);
    let message = workflow
        .notice()
        .map(str::to_owned)
        .unwrap_or_else(|| error.user_message());
    anyhow!(message)
}

fn user_error(error: ServiceError) -> anyhow::Error {
    tracing::debug!("{:?}", error);
    anyhow!(error.user_message())
}
