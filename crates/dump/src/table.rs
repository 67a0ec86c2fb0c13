//! Header-delimited tabular dumps.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::{BufRead, Lines};

/// Column separator used by every tabular dump.
pub const DELIMITER: char = '\t';

/// Row counters for a tabular dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Data rows read (header excluded).
    pub rows: usize,
    /// Data rows dropped for having too few columns.
    pub skipped: usize,
}

/// A single data row, split on [`DELIMITER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<String>,
}
impl Row {
    fn parse(line: &str) -> Self {
        Self {
            fields: line.trim().split(DELIMITER).map(str::to_string).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Take ownership of a field, leaving an empty string in its place.
    pub fn take(&mut self, index: usize) -> Option<String> {
        self.fields.get_mut(index).map(std::mem::take)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Streams the rows of a tab-separated dump whose first line is a header.
///
/// Lines are trimmed of surrounding whitespace before splitting, so trailing
/// empty columns disappear and a row may come back shorter than the header.
pub struct TableReader<R> {
    lines: Lines<R>,
    header: Vec<String>,
    line: usize,
}
impl<R: BufRead> TableReader<R> {
    /// Read the header eagerly. An empty dump has an empty header and no rows.
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => Row::parse(&line.or_raise(|| ErrorKind::Read(1))?).fields,
            None => Vec::new(),
        };
        Ok(Self { lines, header, line: 1 })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Position of the first header column called `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }
}
impl<R: BufRead> Iterator for TableReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line.map(|line| Row::parse(&line)).or_raise(|| ErrorKind::Read(self.line)))
    }
}
