// mysqltool/src/storage/archive.rs
//! Packs named storage entries into a `.tar.gz` and back.
use chrono::Local;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, Seek};
use std::path::{Path, PathBuf};
use tar::{Builder, EntryType, Header};

use super::Storage;
use crate::errors::{PluginError, Result};

/// `mysql_backup_<timestamp>.tar.gz` inside `dir`.
pub fn timestamped_archive_path(dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H_%M_%S");
    dir.join(format!("mysql_backup_{}.tar.gz", timestamp))
}

/// Writes each of `names` from `source` as a top-level archive entry.
///
/// Every entry is spooled to an anonymous temp file first, since a tar
/// header needs the size before the data.
pub fn pack_storage(source: &dyn Storage, names: &[&str], archive_path: &Path) -> Result<PathBuf> {
    if let Some(parent) = archive_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PluginError::file(parent, e))?;
        }
    }

    tracing::info!("Packing {} entries into {}", names.len(), archive_path.display());

    let archive_file = File::create(archive_path).map_err(|e| PluginError::file(archive_path, e))?;
    let mut builder = Builder::new(GzEncoder::new(archive_file, Compression::default()));

    for name in names {
        let mut data = source.read(name)?;
        let mut spool = tempfile::tempfile()?;
        let size = io::copy(&mut data, &mut spool)?;
        spool.rewind()?;

        let mut header = Header::new_gnu();
        header.set_size(size);
        header.set_mode(0o644);
        header.set_mtime(Local::now().timestamp().max(0) as u64);
        builder
            .append_data(&mut header, name, spool)
            .map_err(|e| PluginError::file(archive_path, e))?;
        tracing::debug!("Packed {} ({} bytes)", name, size);
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| PluginError::file(archive_path, e))?;
    encoder.finish().map_err(|e| PluginError::file(archive_path, e))?;

    Ok(archive_path.to_path_buf())
}

/// Stores every regular file of the archive into `destination` under its
/// entry name. Entries nested in directories are rejected.
pub fn unpack_into_storage(archive_path: &Path, destination: &mut dyn Storage) -> Result<Vec<String>> {
    tracing::info!("Unpacking {}", archive_path.display());

    let archive_file = File::open(archive_path).map_err(|e| PluginError::file(archive_path, e))?;
    let mut archive = tar::Archive::new(GzDecoder::new(archive_file));
    let mut unpacked = Vec::new();

    for entry in archive.entries().map_err(|e| PluginError::file(archive_path, e))? {
        let mut entry = entry.map_err(|e| PluginError::file(archive_path, e))?;
        match entry.header().entry_type() {
            EntryType::Regular | EntryType::Continuous => {}
            EntryType::Directory => continue,
            other => {
                tracing::debug!("Skipping archive entry of type {:?}", other);
                continue;
            }
        }

        let path = entry.path().map_err(|e| PluginError::file(archive_path, e))?;
        let name = path.to_string_lossy().into_owned();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(PluginError::InvalidName(name));
        }

        destination.put_stream(&name, &mut entry)?;
        unpacked.push(name);
    }

    Ok(unpacked)
}
