use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::ResultRow;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// Every emit replaces the file.
    Truncate,
    /// Every emit adds rows at the end of the file.
    Append,
}

/// A whitespace separated data file read back by gnuplot.
///
/// The header is written as a `#` comment, the only kind of line allowed to
/// start with `#`.
#[derive(Debug, Clone)]
pub struct ResultSink {
    path: PathBuf,
    mode: SinkMode,
    header: &'static str,
}

impl ResultSink {
    pub fn new(path: impl Into<PathBuf>, mode: SinkMode, header: &'static str) -> Self {
        Self {
            path: path.into(),
            mode,
            header,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn emit(&self, row: &ResultRow) -> Result<()> {
        let file = match self.mode {
            SinkMode::Truncate => self.open_truncated(),
            SinkMode::Append => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|source| self.error(source)),
        }?;
        let mut out = BufWriter::new(file);
        if self.mode == SinkMode::Truncate {
            writeln!(out, "# {}", self.header).map_err(|e| self.error(e))?;
        }
        row.write_lines(&mut out).map_err(|e| self.error(e))?;
        out.flush().map_err(|e| self.error(e))
    }

    /// Empties the file, leaving only the header.
    pub fn reset(&self) -> Result<()> {
        let mut file = self.open_truncated()?;
        writeln!(file, "# {}", self.header).map_err(|e| self.error(e))
    }

    fn open_truncated(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| self.error(source))
    }

    fn error(&self, source: std::io::Error) -> SimError {
        SimError::Sink {
            path: self.path.clone(),
            source,
        }
    }
}
