use std::collections::HashMap;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A single spreadsheet cell.
///
/// Variant order gives the sort order used by the detector's intermediate
/// sorts: missing cells first, then numbers, then text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    Missing,
    Number(OrderedFloat<f64>),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn number(n: f64) -> Self {
        Self::Number(OrderedFloat(n))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Uppercase-text normalization. Numbers are rendered as text first;
    /// missing stays missing (never the literal "nan").
    pub fn to_uppercase_text(&self) -> Cell {
        match self {
            Self::Missing => Self::Missing,
            Self::Number(n) => Self::Text(format_number(n.into_inner())),
            Self::Text(s) => Self::Text(s.to_uppercase()),
        }
    }

    /// Canonical text form for key comparisons. A numeric cell and its
    /// string form compare equal: integer-valued floats render without the
    /// trailing ".0" artifact. Missing has no key text.
    pub fn key_text(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Number(n) => Some(format_number(n.into_inner())),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Missing => serializer.serialize_unit(),
            Self::Number(n) => serializer.serialize_f64(n.into_inner()),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Number(n) => write!(f, "{}", format_number(n.into_inner())),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Integer-valued floats render without decimals ("9876543210", not
/// "9876543210.0") so numeric identifiers match their text form.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// An ordered header list plus row-major cells. Each pipeline stage consumes
/// its input table and produces a new one; nothing is mutated in place once
/// a stage hands its table on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a table from pre-assembled rows, rejecting ragged input.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, ReconError> {
        for row in &rows {
            if row.len() != columns.len() {
                return Err(ReconError::Schema(format!(
                    "row has {} cells, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Append a row, padding short rows with missing cells (spreadsheet
    /// ranges are often ragged at the right edge).
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str, stage: &str) -> Result<usize, ReconError> {
        self.column_index(name).ok_or_else(|| ReconError::MissingColumn {
            column: name.to_string(),
            stage: stage.to_string(),
        })
    }

    /// Cell at (row, column name), if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Total rows in the duplicate-customer table.
    pub duplicate_rows: usize,
    /// Distinct duplicated key values.
    pub duplicate_customers: usize,
    /// Rows per duplicated key, for the human summary.
    pub repeat_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResult {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    /// The duplicate-customer rows joined against delivery events.
    pub report: Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_text_strips_integer_float_artifact() {
        assert_eq!(Cell::number(9876543210.0).key_text().unwrap(), "9876543210");
        assert_eq!(Cell::number(1.5).key_text().unwrap(), "1.5");
        assert_eq!(Cell::text("555-0001").key_text().unwrap(), "555-0001");
        assert_eq!(Cell::Missing.key_text(), None);
    }

    #[test]
    fn uppercase_keeps_missing_as_sentinel() {
        assert_eq!(Cell::text("ab12x").to_uppercase_text(), Cell::text("AB12X"));
        assert_eq!(Cell::number(42.0).to_uppercase_text(), Cell::text("42"));
        assert_eq!(Cell::Missing.to_uppercase_text(), Cell::Missing);
    }

    #[test]
    fn cell_ordering_is_missing_number_text() {
        assert!(Cell::Missing < Cell::number(-1e9));
        assert!(Cell::number(2.0) < Cell::number(10.0));
        assert!(Cell::number(1e12) < Cell::text("0"));
        assert!(Cell::text("A") < Cell::text("B"));
    }

    #[test]
    fn with_rows_rejects_ragged_input() {
        let err = Table::with_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::text("x")]],
        )
        .unwrap_err();
        assert!(matches!(err, ReconError::Schema(_)));
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut t = Table::new(vec!["a".into(), "b".into(), "c".into()]);
        t.push_row(vec![Cell::text("x")]);
        assert_eq!(t.rows()[0], vec![Cell::text("x"), Cell::Missing, Cell::Missing]);
    }
}
