use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;

use crate::domain::SessionCache;

const ADMIN_MARKER: &str = "true";

/// Keeps the admin flag in a small file between runs. Absence of the file
/// means "not admin".
#[derive(Debug, Clone)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionCache for FileSessionCache {
    fn load(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(content) => content.trim() == ADMIN_MARKER,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!("failed to read session cache {}: {}", self.path.display(), e);
                false
            }
        }
    }

    fn store(&self, is_admin: bool) -> Result<(), anyhow::Error> {
        if !is_admin {
            self.clear();
            return Ok(());
        }
        fs::write(&self.path, ADMIN_MARKER)
            .with_context(|| format!("failed to write session cache {}", self.path.display()))
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("session cache {} cleared", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to clear session cache {}: {}", self.path.display(), e),
        }
    }
}
