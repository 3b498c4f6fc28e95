//! Tab-separated table storage
//!
//! All cached artifacts are newline-row, tab-field tables. Writes go to a
//! temporary file in the destination directory and are renamed into place,
//! so a concurrent reader sees either the old table or the new one, never a
//! torn write.

use crate::error::Result;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::NamedTempFile;

/// An ordered sequence of rows, each an ordered sequence of string fields.
///
/// A zero-row table is valid and means "no data yet"; whether the backing
/// file exists at all is a separate question owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Parse tab-separated content: split on newline, then on tab.
    pub fn parse(content: &str) -> Self {
        let rows = content
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();
        Self { rows }
    }

    /// Parse a table from any reader.
    pub fn from_reader(reader: &mut impl Read) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(Self::parse(&content))
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Serialize back to tab-separated text. A non-empty table always ends
    /// with a trailing newline.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.join("\t"));
            out.push('\n');
        }
        out
    }
}

/// Read a table from a file. The file must exist; existence checks and the
/// distinct "no data yet" signal belong to the caller.
pub fn read_table(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)?;
    Ok(Table::parse(&content))
}

/// Replace the table at `path` atomically.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    write_atomic(path, table.to_tsv().as_bytes())
}

/// Write `content` to `path` via a same-directory temp file and rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let tmp = NamedTempFile::new_in(dir)?;
    fs::write(tmp.path(), content)?;
    tmp.persist(path)
        .map_err(|e| crate::error::MapdiffError::Io(e.error))?;
    Ok(())
}
