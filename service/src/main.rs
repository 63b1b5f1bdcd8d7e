use clap::Parser;
use yokai_common::load_categories;

use crate::cli::Cli;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::settings::Settings;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod domain;
mod infrastructure;
#[cfg(test)]
mod test_support;

/// Used when `RUST_LOG` is unset: dependencies stay at warn.
const DEFAULT_LOG_FILTER: &str = "warn,yokai_admin=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let categories = load_categories(&settings.categories_path)?;
    tracing::debug!("category catalog loaded from {}", settings.categories_path);

    let state = AppStateImpl::from_settings(&settings, categories)?;

    commands::run(cli.command, cli.password, state, &settings).await
}
