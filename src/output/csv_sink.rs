//! CSV file sink
//!
//! The file is truncated and the header written once at creation; after that
//! every row is appended and flushed immediately so a later failure leaves
//! all rows found so far on disk.

use crate::output::traits::{OutputRow, RowSink, SinkResult};
use csv::{Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Append-only CSV writer for artifact rows
pub struct CsvSink {
    writer: Writer<File>,
    path: PathBuf,
    rows_written: u64,
}

impl CsvSink {
    /// Creates (or truncates) the file at `path` and writes the header row
    ///
    /// # Arguments
    ///
    /// * `path` - Destination CSV file
    /// * `header` - Column names, written exactly once
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - File created and header flushed
    /// * `Err(SinkError)` - The file could not be created or written
    pub fn create<S: AsRef<str>>(path: &Path, header: &[S]) -> SinkResult<Self> {
        let file = File::create(path)?;
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(file);

        writer.write_record(header.iter().map(|column| AsRef::<str>::as_ref(column)))?;
        writer.flush()?;

        tracing::debug!("Created output file {}", path.display());

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows_written: 0,
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows appended so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl RowSink for CsvSink {
    fn write_row(&mut self, row: &OutputRow) -> SinkResult<()> {
        let size = row.artifact_size.to_string();
        self.writer.write_record([
            row.source_url.as_str(),
            row.artifact_name.as_str(),
            size.as_str(),
        ])?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
