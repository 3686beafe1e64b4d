// mysqltool/src/utils/temp.rs
use std::path::PathBuf;

use tempfile::{Builder, TempPath};

use crate::errors::{PluginError, Result};

/// Hands out unique, writable temporary files.
///
/// The returned [`TempPath`] deletes the file when dropped, so a dump or
/// restore never leaves its scratch copy behind.
pub trait TempFileProvider: Send + Sync {
    fn create_temporary_file(&self, prefix: &str) -> Result<TempPath>;
}

/// Creates files in the system temp directory, or in `root` when set.
#[derive(Debug, Clone, Default)]
pub struct SystemTempFiles {
    root: Option<PathBuf>,
}

impl SystemTempFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl TempFileProvider for SystemTempFiles {
    fn create_temporary_file(&self, prefix: &str) -> Result<TempPath> {
        let mut builder = Builder::new();
        builder.prefix(prefix);
        let file = match &self.root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| PluginError::file(root, e))?;
                builder
                    .tempfile_in(root)
                    .map_err(|e| PluginError::file(root, e))?
            }
            None => builder.tempfile()?,
        };
        Ok(file.into_temp_path())
    }
}
