// mysqltool/src/backup/mod.rs
//! Export flow: `mysqldump` into a scratch file, then into the backup storage.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::command::build_dump_command;
use crate::config::options::ConnectionParameters;
use crate::errors::{PluginError, Result};
use crate::plugin::{DUMP_FILE_NAME, MysqlPlugin, TEMP_FILE_PREFIX};
use crate::storage::Storage;

/// Dumps the database and stores it as `dump.sql` in `destination`.
///
/// Returns the number of bytes stored. The scratch file is removed whether
/// or not the dump succeeds.
pub async fn run_backup(
    plugin: &MysqlPlugin,
    destination: &mut dyn Storage,
    params: &ConnectionParameters,
) -> Result<u64> {
    let shown = build_dump_command(params, Path::new(DUMP_FILE_NAME));
    plugin.output.writeln(&format!("  * {}", shown.render(true)));

    let temp_file = plugin.temp_files.create_temporary_file(TEMP_FILE_PREFIX)?;
    let command = build_dump_command(params, &temp_file);
    info!("Dumping database {} to {}", params.database, temp_file.display());
    plugin.runner.run(&command, &plugin.limits).await?;

    let mut dump = File::open(&temp_file).map_err(|e| PluginError::file(&*temp_file, e))?;
    let written = destination.put_stream(DUMP_FILE_NAME, &mut dump)?;
    info!("✓ Stored {} bytes of {} as {}", written, params.database, DUMP_FILE_NAME);
    Ok(written)
}
