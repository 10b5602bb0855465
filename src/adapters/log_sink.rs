//! Cooling log adapters.
//!
//! Implement [`CoolingLog`] by appending record lines to a file or
//! printing them on stdout.  The file is reopened for every write so
//! external log rotation needs no coordination.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::app::events::{CoolingStart, line_suffix};
use crate::app::ports::CoolingLog;
use crate::error::LogError;

/// Appends each record to a file, creating it on first use.
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append(&self, text: &str) -> Result<(), LogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        file.sync_data()?;
        Ok(())
    }
}

impl CoolingLog for FileLog {
    fn begin(&mut self, start: &CoolingStart) -> Result<(), LogError> {
        self.append(&start.line_prefix())
    }

    fn finish(&mut self, temp_after: Option<f64>) -> Result<(), LogError> {
        self.append(&line_suffix(temp_after))
    }
}

/// Prints each record on stdout.
pub struct StdoutLog;

impl StdoutLog {
    fn print(text: &str) -> Result<(), LogError> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

impl CoolingLog for StdoutLog {
    fn begin(&mut self, start: &CoolingStart) -> Result<(), LogError> {
        Self::print(&start.line_prefix())
    }

    fn finish(&mut self, temp_after: Option<f64>) -> Result<(), LogError> {
        Self::print(&line_suffix(temp_after))
    }
}

/// Destination picked from configuration.
pub enum LogSink {
    File(FileLog),
    Stdout(StdoutLog),
}

impl LogSink {
    /// File if a path is configured, stdout otherwise.
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::File(FileLog::new(p)),
            None => Self::Stdout(StdoutLog),
        }
    }
}

impl CoolingLog for LogSink {
    fn begin(&mut self, start: &CoolingStart) -> Result<(), LogError> {
        match self {
            Self::File(f) => f.begin(start),
            Self::Stdout(s) => s.begin(start),
        }
    }

    fn finish(&mut self, temp_after: Option<f64>) -> Result<(), LogError> {
        match self {
            Self::File(f) => f.finish(temp_after),
            Self::Stdout(s) => s.finish(temp_after),
        }
    }
}
