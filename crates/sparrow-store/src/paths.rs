use crate::error::{Result, StoreError};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "SPARROW_HOME";

/// Works out where Sparrow keeps its key files.
///
/// Resolution order: an explicit [`with_data_dir`](Self::with_data_dir),
/// then `$SPARROW_HOME`, then `<home>/.sparrow`.
#[derive(Debug, Clone)]
pub struct StorageResolver {
    home_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
}

impl Default for StorageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageResolver {
    pub fn new() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            data_dir: env::var_os(DATA_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_home<P: Into<PathBuf>>(mut self, home: P) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn home_dir(&self) -> Result<&Path> {
        self.home_dir.as_deref().ok_or(StoreError::NoHomeDirectory)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref data_dir) = self.data_dir {
            return Ok(data_dir.clone());
        }

        let home = self.home_dir()?;
        Ok(home.join(".sparrow"))
    }

    /// File backing a storage key.
    pub fn key_file(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir()?.join(key))
    }

    pub fn exists(&self) -> bool {
        self.data_dir().map(|p| p.is_dir()).unwrap_or(false)
    }
}

/// Keys become file names, so only `[A-Za-z0-9_.-]` is allowed and the
/// key may not start with a dot.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

mod dirs {
    use super::*;

    pub fn home_dir() -> Option<PathBuf> {
        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    }
}
