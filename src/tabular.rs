//! # Tabular Parser Module
//!
//! Quote-aware splitting of delimited text into rows of fields. Every ingestion
//! path (recipes, shipments, sales, sales details, uploaded sales files) goes
//! through this parser.
//!
//! The parser never fails: unbalanced quotes simply keep the rest of the line
//! inside the current field.

use log::{debug, trace};

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ',';

const QUOTE: char = '"';

/// Splits delimited text into ordered rows of fields
#[derive(Debug, Clone, Copy)]
pub struct TableParser {
    delimiter: char,
}

impl TableParser {
    /// Create a parser for comma-delimited text
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Create a parser for a custom delimiter (e.g. `'\t'` or `';'`)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inventory_intelligence::tabular::TableParser;
    ///
    /// let rows = TableParser::with_delimiter(';').parse("Beef;40\nPork;30");
    /// assert_eq!(rows[1], vec!["Pork".to_string(), "30".to_string()]);
    /// ```
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Parse the whole text into rows
    ///
    /// Lines are split on `\n` (a trailing `\r` is dropped) and blank lines are
    /// skipped. The header row, if any, is returned like any other row.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inventory_intelligence::tabular::TableParser;
    ///
    /// let rows = TableParser::new().parse("Item Name,Amount\nBeef Ramen,\"$3,500\"\n\n");
    /// assert_eq!(rows.len(), 2);
    /// assert_eq!(rows[1][1], "$3,500");
    /// ```
    pub fn parse(&self, text: &str) -> Vec<Vec<String>> {
        let rows: Vec<Vec<String>> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_line(line))
            .collect();

        debug!("Parsed {} rows from delimited text", rows.len());
        rows
    }

    /// Parse a single line into fields
    pub fn parse_line(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == QUOTE {
                if in_quotes && chars.peek() == Some(&QUOTE) {
                    // "" inside a quoted field is a literal quote
                    chars.next();
                    current.push(QUOTE);
                } else {
                    in_quotes = !in_quotes;
                }
            } else if ch == self.delimiter && !in_quotes {
                fields.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        fields.push(current);

        if in_quotes {
            trace!("Unterminated quote in line: '{}'", line);
        }

        fields
    }
}

impl Default for TableParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse comma-delimited text with the default parser
pub fn parse_table(text: &str) -> Vec<Vec<String>> {
    TableParser::new().parse(text)
}

/// Fetch a cell by column index, `None` when the row is too short
pub fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(String::as_str)
}
