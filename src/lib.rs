//! MySQL backup plugin
//!
//! Dumps and restores a single MySQL database with `mysqldump` and `mysql`
//! on behalf of a backup host.

pub mod backup;
pub mod command;
pub mod config;
pub mod errors;
pub mod plugin;
pub mod process;
pub mod restore;
pub mod storage;
pub mod utils;

pub use config::options::{ConnectionParameters, OptionSchema, RawOptions};
pub use errors::{PluginError, Result};
pub use plugin::{BackupDatabase, DUMP_FILE_NAME, MysqlPlugin, Plugin, check_options};
pub use process::{ProcessRunner, SystemProcessRunner, WaitLimits};
pub use storage::{DirectoryStorage, Storage};
