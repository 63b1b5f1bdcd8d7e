use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::domain::draft::CategoryPolicy;
use crate::domain::search::{DEFAULT_DEBOUNCE, DEFAULT_LIMIT};
use crate::domain::store::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub categories_path: String,
    pub backend: BackendMode,
    pub api: ApiSettings,
    pub admin: AdminSettings,
    #[serde(default)]
    pub quick_search: QuickSearchSettings,
    #[serde(default)]
    pub local: LocalSettings,
    pub session: SessionSettings,
}

/// Where articles live: a remote server or process memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Remote,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub category_policy: CategoryPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickSearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_quick_search_limit")]
    pub limit: u32,
}

impl Default for QuickSearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            limit: default_quick_search_limit(),
        }
    }
}

impl QuickSearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalSettings {
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub cache_path: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        let run_mode = load_env("RUN_MODE", "development");
        Self::load(Path::new("./config"), &run_mode)
    }

    /// Layers `default`, then `{run_mode}`, then `APP_` variables where `__`
    /// separates nested keys (`APP_API__BASE_URL`).
    pub fn load(config_dir: &Path, run_mode: &str) -> anyhow::Result<Self> {
        let s = Config::builder()
            .add_source(File::from(config_dir.join("default")))
            .add_source(File::from(config_dir.join(run_mode)).required(false))
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize().with_context(|| "failed to read config")
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_quick_search_limit() -> u32 {
    DEFAULT_LIMIT
}

fn load_env(key: &str, default_value: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default_value.into())
}
