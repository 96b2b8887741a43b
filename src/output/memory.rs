//! In-memory sink retaining rows for callers that post-process the inventory.

use crate::output::traits::{OutputRow, RowSink, SinkResult};

#[derive(Debug, Default)]
pub struct MemorySink {
    header: Vec<String>,
    rows: Vec<OutputRow>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_header<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|c| AsRef::<str>::as_ref(c).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<OutputRow> {
        self.rows
    }
}

impl RowSink for MemorySink {
    fn write_row(&mut self, row: &OutputRow) -> SinkResult<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}
