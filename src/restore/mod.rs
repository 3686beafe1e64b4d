// mysqltool/src/restore/mod.rs
//! Import flow: copy `dump.sql` out of the backup, then feed it to `mysql`.

pub(crate) mod verification;

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::info;

use crate::command::build_restore_command;
use crate::config::options::ConnectionParameters;
use crate::errors::{PluginError, Result};
use crate::plugin::{DUMP_FILE_NAME, MysqlPlugin, TEMP_FILE_PREFIX};
use crate::storage::Storage;

/// Restores `dump.sql` from `source` into the configured database.
pub async fn run_restore(
    plugin: &MysqlPlugin,
    source: &dyn Storage,
    params: &ConnectionParameters,
) -> Result<()> {
    verification::ensure_artifact(source, DUMP_FILE_NAME)?;

    let temp_file = plugin.temp_files.create_temporary_file(TEMP_FILE_PREFIX)?;
    let copied = {
        let mut reader = source.read(DUMP_FILE_NAME)?;
        let mut file = File::create(&temp_file).map_err(|e| PluginError::file(&*temp_file, e))?;
        io::copy(&mut reader, &mut file).map_err(|e| PluginError::file(&*temp_file, e))?
    };
    info!("Copied {} bytes of {} to {}", copied, DUMP_FILE_NAME, temp_file.display());

    let shown = build_restore_command(params, Path::new(DUMP_FILE_NAME));
    plugin.output.writeln(&format!("  * {}", shown.render(true)));

    let command = build_restore_command(params, &temp_file);
    plugin.runner.run(&command, &plugin.limits).await?;
    info!("✓ Restored {} into {}", DUMP_FILE_NAME, params.database);
    Ok(())
}
