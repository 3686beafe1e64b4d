// mysqltool/src/plugin.rs
//! The plugin contract the backup host drives, and its MySQL implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::backup;
use crate::config::options::{
    ConnectionParameters, DATABASE, DATABASE_URL, EXPORT_OPTIONS, HOST, IMPORT_OPTIONS,
    OptionSchema, PASSWORD, PORT, RawOptions, USERNAME,
};
use crate::errors::Result;
use crate::process::{ProcessRunner, SystemProcessRunner, WaitLimits};
use crate::restore;
use crate::storage::Storage;
use crate::utils::{OutputSink, TempFileProvider};

/// Name of the artifact inside the backup storage.
pub const DUMP_FILE_NAME: &str = "dump.sql";

/// Prefix for the scratch file holding the dump.
pub const TEMP_FILE_PREFIX: &str = "mysql";

/// Per-backup key/value store kept by the host. MySQL does not use it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupDatabase {
    values: HashMap<String, String>,
}

impl BackupDatabase {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[async_trait]
pub trait Plugin: Send + Sync {
    fn declare_options(&self, schema: &mut OptionSchema);

    async fn backup(
        &self,
        source: &dyn Storage,
        destination: &mut dyn Storage,
        database: Option<&mut BackupDatabase>,
        options: &RawOptions,
    ) -> Result<()>;

    async fn restore(
        &self,
        source: &dyn Storage,
        destination: &mut dyn Storage,
        database: Option<&BackupDatabase>,
        options: &RawOptions,
    ) -> Result<()>;
}

/// Checks `options` against the schema the plugin declares.
pub fn check_options(plugin: &dyn Plugin, options: &RawOptions) -> Result<OptionSchema> {
    let mut schema = OptionSchema::new();
    plugin.declare_options(&mut schema);
    schema.check(options)?;
    Ok(schema)
}

/// Dumps with `mysqldump` and restores with `mysql`.
pub struct MysqlPlugin {
    pub(crate) output: Arc<dyn OutputSink>,
    pub(crate) temp_files: Arc<dyn TempFileProvider>,
    pub(crate) runner: Arc<dyn ProcessRunner>,
    pub(crate) limits: WaitLimits,
}

impl MysqlPlugin {
    pub fn new(output: Arc<dyn OutputSink>, temp_files: Arc<dyn TempFileProvider>) -> Self {
        Self {
            output,
            temp_files,
            runner: Arc::new(SystemProcessRunner),
            limits: WaitLimits::default(),
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_limits(mut self, limits: WaitLimits) -> Self {
        self.limits = limits;
        self
    }
}

#[async_trait]
impl Plugin for MysqlPlugin {
    fn declare_options(&self, schema: &mut OptionSchema) {
        schema.require(&[USERNAME, DATABASE]).optional(&[
            DATABASE_URL,
            PASSWORD,
            HOST,
            PORT,
            EXPORT_OPTIONS,
            IMPORT_OPTIONS,
        ]);
    }

    async fn backup(
        &self,
        _source: &dyn Storage,
        destination: &mut dyn Storage,
        _database: Option<&mut BackupDatabase>,
        options: &RawOptions,
    ) -> Result<()> {
        let params = ConnectionParameters::resolve(options)?;
        backup::run_backup(self, destination, &params).await?;
        Ok(())
    }

    async fn restore(
        &self,
        source: &dyn Storage,
        _destination: &mut dyn Storage,
        _database: Option<&BackupDatabase>,
        options: &RawOptions,
    ) -> Result<()> {
        let params = ConnectionParameters::resolve(options)?;
        restore::run_restore(self, source, &params).await
    }
}
