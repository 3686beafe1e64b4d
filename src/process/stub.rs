// mysqltool/src/process/stub.rs
//! A runner that pretends to be the MySQL tools.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{ProcessRunner, WaitLimits};
use crate::command::{CommandLine, Redirect};
use crate::errors::{PluginError, Result};

#[derive(Debug, Default)]
struct Calls {
    commands: Vec<CommandLine>,
    restored_inputs: Vec<Vec<u8>>,
}

/// Writes `dump` for dump commands, records stdin for restore commands,
/// then exits with `exit_code`.
#[derive(Debug)]
pub struct StubRunner {
    dump: Vec<u8>,
    exit_code: i32,
    calls: Mutex<Calls>,
}

impl StubRunner {
    pub fn succeeding(dump: &[u8]) -> Self {
        Self {
            dump: dump.to_vec(),
            exit_code: 0,
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn failing(exit_code: i32) -> Self {
        Self {
            dump: b"-- partial dump".to_vec(),
            exit_code,
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().commands.clone()
    }

    pub fn restored_inputs(&self) -> Vec<Vec<u8>> {
        self.calls.lock().unwrap().restored_inputs.clone()
    }
}

#[async_trait]
impl ProcessRunner for StubRunner {
    async fn run(&self, command: &CommandLine, _limits: &WaitLimits) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.commands.push(command.clone());
        match command.redirect() {
            Redirect::StdoutTo(path) => std::fs::write(path, &self.dump)?,
            Redirect::StdinFrom(path) => calls.restored_inputs.push(std::fs::read(path)?),
        }
        if self.exit_code != 0 {
            return Err(PluginError::ProcessFailed {
                program: command.program().to_string(),
                code: Some(self.exit_code),
                stderr: "ERROR 1045 (28000): Access denied".to_string(),
            });
        }
        Ok(())
    }
}
