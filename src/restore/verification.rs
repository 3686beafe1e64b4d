// mysqltool/src/restore/verification.rs
use crate::errors::{PluginError, Result};
use crate::storage::Storage;

/// Fails before any scratch file or process is created when the backup
/// does not contain `name`.
pub fn ensure_artifact(source: &dyn Storage, name: &str) -> Result<()> {
    if !source.has(name) {
        return Err(PluginError::MissingArtifact(name.to_string()));
    }
    tracing::debug!("Found {} in source storage", name);
    Ok(())
}
