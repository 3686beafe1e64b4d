pub mod output;
pub mod temp;

pub use output::{ConsoleOutput, MemoryOutput, OutputSink};
pub use temp::{SystemTempFiles, TempFileProvider};
