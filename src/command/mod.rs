// mysqltool/src/command/mod.rs
//! Builds the `mysqldump` and `mysql` invocations.
//!
//! A [`CommandLine`] is executed from its argument vector, never through a
//! shell. The shell-style rendering exists only for display:
//!
//! ```text
//! mysqldump -u<username>[ -p<password>][ -h <host>][ -P <port>][ <exportOptions>] <database> > <file>
//! mysql -u<username>[ -p<password>][ -h <host>][ -P <port>][ <importOptions>] <database> < <file>
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::options::{ConnectionParameters, EXPORT_OPTIONS, IMPORT_OPTIONS};
use crate::errors::{PluginError, Result};

pub const DUMP_PROGRAM: &str = "mysqldump";
pub const RESTORE_PROGRAM: &str = "mysql";

/// Shown in place of the password in redacted renderings.
pub const PASSWORD_MASK: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Plain(String),
    /// `-p<password>`. Quoted when rendered, masked when redacted.
    Password(String),
    /// Passed through verbatim from the option named `name`
    /// (`exportOptions` / `importOptions`). Rendered as written, split into
    /// words for execution.
    Options { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// The tool's stdout is written to this file (dump).
    StdoutTo(PathBuf),
    /// The tool's stdin is read from this file (restore).
    StdinFrom(PathBuf),
}

#[derive(Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<Arg>,
    redirect: Redirect,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, redirect: Redirect) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            redirect,
        }
    }

    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn redirect(&self) -> &Redirect {
        &self.redirect
    }

    /// The argument vector handed to the OS, password included.
    ///
    /// Fails when pass-through options cannot be split into words, so the
    /// tool never runs with fewer arguments than the rendered line shows.
    pub fn argv(&self) -> Result<Vec<String>> {
        let mut argv = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg {
                Arg::Plain(value) => argv.push(value.clone()),
                Arg::Password(password) => argv.push(format!("-p{}", password)),
                Arg::Options { name, value } => {
                    let words = shlex::split(value)
                        .ok_or_else(|| PluginError::invalid(name, "unbalanced quotes"))?;
                    argv.extend(words);
                }
            }
        }
        Ok(argv)
    }

    /// Shell-style rendering. With `redact` the password becomes `***`.
    pub fn render(&self, redact: bool) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            match arg {
                Arg::Plain(value) | Arg::Options { value, .. } => line.push_str(value),
                Arg::Password(_) if redact => {
                    line.push_str("-p");
                    line.push_str(PASSWORD_MASK);
                }
                Arg::Password(password) => {
                    line.push_str("-p");
                    line.push_str(&quote(password));
                }
            }
        }
        match &self.redirect {
            Redirect::StdoutTo(path) => line.push_str(&format!(" > {}", path.display())),
            Redirect::StdinFrom(path) => line.push_str(&format!(" < {}", path.display())),
        }
        line
    }
}

impl fmt::Display for CommandLine {
    /// Always redacted, so a command can be logged with `{}` safely.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandLine").field(&self.render(true)).finish()
    }
}

/// POSIX single quoting: `it's` becomes `'it'\''s'`.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

fn connection_args(
    mut command: CommandLine,
    params: &ConnectionParameters,
    options: Option<(&'static str, &str)>,
) -> CommandLine {
    command = command.arg(Arg::Plain(format!("-u{}", params.username)));
    if let Some(password) = &params.password {
        command = command.arg(Arg::Password(password.clone()));
    }
    if let Some(host) = &params.host {
        command = command
            .arg(Arg::Plain("-h".to_string()))
            .arg(Arg::Plain(host.clone()));
    }
    if let Some(port) = params.port {
        command = command
            .arg(Arg::Plain("-P".to_string()))
            .arg(Arg::Plain(port.to_string()));
    }
    if let Some((name, value)) = options {
        command = command.arg(Arg::Options {
            name,
            value: value.to_string(),
        });
    }
    command.arg(Arg::Plain(params.database.clone()))
}

/// `mysqldump ... <database> > <file>`
pub fn build_dump_command(params: &ConnectionParameters, file: &Path) -> CommandLine {
    connection_args(
        CommandLine::new(DUMP_PROGRAM, Redirect::StdoutTo(file.to_path_buf())),
        params,
        params.export_options.as_deref().map(|o| (EXPORT_OPTIONS, o)),
    )
}

/// `mysql ... <database> < <file>`
pub fn build_restore_command(params: &ConnectionParameters, file: &Path) -> CommandLine {
    connection_args(
        CommandLine::new(RESTORE_PROGRAM, Redirect::StdinFrom(file.to_path_buf())),
        params,
        params.import_options.as_deref().map(|o| (IMPORT_OPTIONS, o)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParameters {
        ConnectionParameters {
            username: "root".to_string(),
            password: Some("p@ss".to_string()),
            host: None,
            port: None,
            database: "app".to_string(),
            export_options: None,
            import_options: None,
        }
    }

    #[test]
    fn test_dump_command_minimal() {
        let command = build_dump_command(&params(), Path::new("/tmp/mysql1"));
        assert_eq!(command.render(false), "mysqldump -uroot -p'p@ss' app > /tmp/mysql1");
        assert_eq!(command.render(true), "mysqldump -uroot -p*** app > /tmp/mysql1");
    }

    #[test]
    fn test_dump_command_all_fields() {
        let params = ConnectionParameters {
            host: Some("db.internal".to_string()),
            port: Some(3307),
            export_options: Some("--single-transaction --routines".to_string()),
            ..params()
        };
        let command = build_dump_command(&params, Path::new("dump.sql"));
        assert_eq!(
            command.render(false),
            "mysqldump -uroot -p'p@ss' -h db.internal -P 3307 --single-transaction --routines app > dump.sql"
        );
        assert_eq!(
            command.render(true),
            "mysqldump -uroot -p*** -h db.internal -P 3307 --single-transaction --routines app > dump.sql"
        );
    }

    #[test]
    fn test_absent_fields_leave_no_whitespace() {
        let params = ConnectionParameters {
            password: None,
            ..params()
        };
        let dump = build_dump_command(&params, Path::new("dump.sql"));
        assert_eq!(dump.render(false), "mysqldump -uroot app > dump.sql");
        assert_eq!(dump.render(true), "mysqldump -uroot app > dump.sql");

        let restore = build_restore_command(&params, Path::new("dump.sql"));
        assert_eq!(restore.render(false), "mysql -uroot app < dump.sql");
    }

    #[test]
    fn test_restore_command_uses_import_options_and_quotes_password() {
        let params = ConnectionParameters {
            password: Some("it's secret".to_string()),
            port: Some(3306),
            export_options: Some("--no-data".to_string()),
            import_options: Some("--force".to_string()),
            ..params()
        };
        let command = build_restore_command(&params, Path::new("/tmp/mysql2"));
        assert_eq!(
            command.render(false),
            "mysql -uroot -p'it'\\''s secret' -P 3306 --force app < /tmp/mysql2"
        );
        assert_eq!(
            command.render(true),
            "mysql -uroot -p*** -P 3306 --force app < /tmp/mysql2"
        );
    }

    #[test]
    fn test_redacted_rendering_never_contains_password() {
        let params = ConnectionParameters {
            password: Some("hunter2".to_string()),
            ..params()
        };
        for command in [
            build_dump_command(&params, Path::new("dump.sql")),
            build_restore_command(&params, Path::new("dump.sql")),
        ] {
            let redacted = command.render(true);
            assert!(!redacted.contains("hunter2"));
            assert!(redacted.contains("-p***"));
            assert_eq!(command.to_string(), redacted);
            assert!(!format!("{:?}", command).contains("hunter2"));
        }
    }

    #[test]
    fn test_argv_has_no_shell_quoting() -> anyhow::Result<()> {
        let params = ConnectionParameters {
            password: Some("it's secret".to_string()),
            host: Some("db.internal".to_string()),
            export_options: Some("--where='id > 10' --skip-lock-tables".to_string()),
            ..params()
        };
        let command = build_dump_command(&params, Path::new("/tmp/out.sql"));
        assert_eq!(command.program(), "mysqldump");
        assert_eq!(
            command.argv()?,
            vec![
                "-uroot",
                "-pit's secret",
                "-h",
                "db.internal",
                "--where=id > 10",
                "--skip-lock-tables",
                "app",
            ]
        );
        assert_eq!(
            command.redirect(),
            &Redirect::StdoutTo(PathBuf::from("/tmp/out.sql"))
        );
        Ok(())
    }

    #[test]
    fn test_argv_rejects_unbalanced_options() {
        let params = ConnectionParameters {
            password: None,
            export_options: Some("--where='id > 1 --single-transaction".to_string()),
            import_options: Some("--init-command=\"SET x=1".to_string()),
            ..params()
        };

        let dump = build_dump_command(&params, Path::new("/tmp/x"));
        assert_eq!(
            dump.render(false),
            "mysqldump -uroot --where='id > 1 --single-transaction app > /tmp/x"
        );
        assert!(matches!(
            dump.argv(),
            Err(PluginError::InvalidOption { ref name, .. }) if name == "exportOptions"
        ));

        let restore = build_restore_command(&params, Path::new("/tmp/x"));
        assert!(matches!(
            restore.argv(),
            Err(PluginError::InvalidOption { ref name, .. }) if name == "importOptions"
        ));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("a'b"), "'a'\\''b'");
        assert_eq!(quote("$(rm -rf /)"), "'$(rm -rf /)'");
    }
}
