// mysqltool/src/storage/mod.rs
pub mod archive;

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::errors::{PluginError, Result};

/// Flat, name-addressed byte storage inside one backup.
pub trait Storage: Send + Sync {
    /// Writes the whole stream under `name`, replacing any previous content.
    fn put_stream(&mut self, name: &str, data: &mut dyn Read) -> Result<u64>;

    fn read(&self, name: &str) -> Result<Box<dyn Read + Send>>;

    fn has(&self, name: &str) -> bool;
}

/// Stores each name as a file directly inside `root`.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Opens (and creates if needed) the storage directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| PluginError::file(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(PluginError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl Storage for DirectoryStorage {
    fn put_stream(&mut self, name: &str, data: &mut dyn Read) -> Result<u64> {
        let path = self.path_for(name)?;
        let mut file = File::create(&path).map_err(|e| PluginError::file(&path, e))?;
        let written = io::copy(data, &mut file).map_err(|e| PluginError::file(&path, e))?;
        file.sync_all().map_err(|e| PluginError::file(&path, e))?;
        tracing::debug!("Stored {} bytes as {}", written, path.display());
        Ok(written)
    }

    fn read(&self, name: &str) -> Result<Box<dyn Read + Send>> {
        let path = self.path_for(name)?;
        match File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(PluginError::MissingArtifact(name.to_string()))
            }
            Err(e) => Err(PluginError::file(&path, e)),
        }
    }

    fn has(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }
}
