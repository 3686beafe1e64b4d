// mysqltool/src/utils/output.rs
use std::sync::{Arc, Mutex};

/// Where the plugin reports the (redacted) commands it runs.
pub trait OutputSink: Send + Sync {
    fn writeln(&self, line: &str);
}

/// Prints to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn writeln(&self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps every line in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl OutputSink for MemoryOutput {
    fn writeln(&self, line: &str) {
        let mut lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.push(line.to_string());
    }
}
