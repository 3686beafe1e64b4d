use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Missing required option: {0}")]
    MissingRequiredOption(String),

    #[error("Invalid value for option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("Undefined option '{name}', declared options are: {declared}")]
    UndefinedOption { name: String, declared: String },

    #[error("{program} executable not found in PATH. Please ensure the MySQL client tools are installed and in your PATH.")]
    ToolNotFound { program: String },

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {stderr}", describe_exit(.code))]
    ProcessFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} did not finish within {}s and was killed", .after.as_secs_f64())]
    TimedOut { program: String, after: Duration },

    #[error("{program} was cancelled and killed")]
    Cancelled { program: String },

    #[error("Backup artifact '{0}' not found in source storage")]
    MissingArtifact(String),

    #[error("Invalid storage name '{0}'")]
    InvalidName(String),

    #[error("I/O error on {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl PluginError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        PluginError::InvalidOption {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PluginError::File {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;
