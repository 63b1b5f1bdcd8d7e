use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "yokai-admin", version, about = "Yokai encyclopedia reader and admin tool")]
pub struct Cli {
    /// Admin password. Admin commands log in with it before running.
    #[arg(long, global = true, env = "YOKAI_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the most liked articles.
    Popular,
    /// Open an article and count the view.
    Read {
        slug: String,
    },
    /// Like an article, or take the like back.
    Like {
        slug: String,
    },
    /// List one page of articles for the admin dashboard.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only show articles whose title, excerpt or author contain this.
        #[arg(long)]
        search: Option<String>,
    },
    /// Filter the loaded page by title, excerpt or author.
    Search {
        term: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Debounced title search against the article service.
    Quick {
        term: String,
    },
    /// Create an article.
    Create {
        #[command(flatten)]
        fields: ArticleArgs,
    },
    /// Edit the article with the given slug. Omitted fields keep their value.
    Edit {
        slug: String,
        #[command(flatten)]
        fields: ArticleArgs,
    },
    /// Delete an article by id.
    Delete {
        id: String,
        /// Confirm the deletion. Without it only the article to delete is shown.
        #[arg(long)]
        yes: bool,
    },
    /// Log in as admin.
    Login,
    /// Log out.
    Logout,
    /// Show whether the session is an admin session.
    Whoami,
    /// Resolve a client path the way the web client would.
    Route {
        path: String,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ArticleArgs {
    #[arg(long)]
    pub title: Option<String>,
    /// Explicit slug; derived from the title when omitted. Pass "" to go
    /// back to the derived one.
    #[arg(long = "slug", value_name = "SLUG")]
    pub new_slug: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub excerpt: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    /// Category id from the catalog.
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Source reference, repeat for several.
    #[arg(long = "source")]
    pub sources: Vec<String>,
}
