/*!
 * Minimal CSV table reader.
 *
 * Reads a header row followed by data rows into loosely typed records keyed by
 * lowercase column name. Quoted fields may contain commas, doubled quotes and
 * line breaks. Cells that look like a plain decimal number are typed as
 * numbers but keep their raw text.
 */

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::file_utils::FileManager;

// @const: Plain decimal number, optionally signed, optional exponent
static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap()
});

/// A loosely typed table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Cell text parsed as a number
    Number { value: f64, raw: String },
    /// Any other cell text, quotes removed
    Text(String),
}

impl Cell {
    /// Type a raw cell value
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NUMBER_REGEX.is_match(trimmed) {
            if let Ok(value) = trimmed.parse::<f64>() {
                return Cell::Number {
                    value,
                    raw: raw.to_string(),
                };
            }
        }
        Cell::Text(raw.to_string())
    }

    /// Original text of the cell
    pub fn as_text(&self) -> &str {
        match self {
            Cell::Number { raw, .. } => raw,
            Cell::Text(text) => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_text().trim().is_empty()
    }
}

/// One data row of a table
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    // @field: 1-based position among data rows
    pub row_number: usize,

    cells: HashMap<String, Cell>,
}

impl TableRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: HashMap::new(),
        }
    }

    /// Set a cell; the column name is normalized to lowercase
    pub fn insert(&mut self, column: &str, cell: Cell) {
        self.cells.insert(normalize_header(column), cell);
    }

    /// Look up a cell by column name, ignoring case
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(&normalize_header(column))
    }

    /// Whether every cell of the row is blank
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(Cell::is_empty)
    }
}

fn normalize_header(column: &str) -> String {
    column.trim().to_lowercase()
}

/// Read and parse a CSV file
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Vec<TableRow>> {
    let content = FileManager::read_to_string(path)?;
    parse_table(&content)
}

/// Parse CSV text into rows keyed by the header columns
pub fn parse_table(content: &str) -> Result<Vec<TableRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let records = split_records(content)?;

    let mut records = records.into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };
    let columns: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();

    let mut rows = Vec::new();
    for values in records {
        let mut row = TableRow::new(rows.len() + 1);
        for (column, value) in columns.iter().zip(values.iter()) {
            if column.is_empty() {
                continue;
            }
            row.insert(column, Cell::from_raw(value));
        }

        // Separator-only rows carry no line
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

// Split CSV text into records of raw field values
fn split_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                // Treat \r\n and \n\r as a single break
                if let Some(&next) = chars.peek() {
                    if (c == '\r' && next == '\n') || (c == '\n' && next == '\r') {
                        chars.next();
                    }
                }
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(anyhow!("Unterminated quoted field starting before line {}", line));
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    // A record consisting of a single empty field is a blank line
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));

    Ok(records)
}
