use std::collections::BTreeMap;

use crate::config::ReportConfig;
use crate::error::ReconError;
use crate::model::{Cell, Table};

const STAGE: &str = "duplicate detection";

/// Find customers whose key column value recurs in the consolidated DB1
/// table, projected and ranked by recurrence.
///
/// Rows whose key cell is missing take no part in duplicate detection: a
/// blank mobile number is not evidence that two shipments share a customer.
pub fn detect_duplicates(primary: &Table, config: &ReportConfig) -> Result<Table, ReconError> {
    let barcode_idx = primary.require_column(&config.barcode_column, STAGE)?;
    let key_idx = primary.require_column(&config.key_column, STAGE)?;
    let projection: Vec<usize> = config
        .primary_columns
        .iter()
        .map(|name| primary.require_column(name, STAGE))
        .collect::<Result<_, _>>()?;

    // Positions of the key and date columns inside the projection.
    let key_pos = projection_pos(config, &config.key_column)?;
    let date_pos = projection_pos(config, &config.date_column)?;

    // Normalize the barcode column, drop mostly-empty rows, and coerce the
    // key to text so equality is exact string comparison.
    let threshold = primary.column_count() as f64 / 6.0;
    let mut cleaned: Vec<Vec<Cell>> = Vec::new();
    for row in primary.rows() {
        let non_missing = row.iter().filter(|c| !c.is_missing()).count();
        if (non_missing as f64) < threshold {
            continue;
        }
        let mut row = row.to_vec();
        row[barcode_idx] = row[barcode_idx].to_uppercase_text();
        if let Some(key) = row[key_idx].key_text() {
            row[key_idx] = Cell::Text(key);
        }
        cleaned.push(row);
    }

    // Distinct key values with two or more occurrences, order-independent.
    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &cleaned {
        if let Cell::Text(key) = &row[key_idx] {
            *occurrences.entry(key.as_str()).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<Vec<Cell>> = cleaned
        .iter()
        .filter(|row| match &row[key_idx] {
            Cell::Text(key) => occurrences.get(key.as_str()).copied().unwrap_or(0) >= 2,
            _ => false,
        })
        .map(|row| projection.iter().map(|&i| row[i].clone()).collect())
        .collect();

    // Intermediate ascending (key, date) sort keeps grouping deterministic.
    rows.sort_by(|a, b| {
        a[key_pos]
            .cmp(&b[key_pos])
            .then_with(|| a[date_pos].cmp(&b[date_pos]))
    });

    // Per-group constant row count, over the filtered table.
    let mut group_sizes: BTreeMap<&Cell, usize> = BTreeMap::new();
    for row in &rows {
        *group_sizes.entry(&row[key_pos]).or_insert(0) += 1;
    }
    let counts: Vec<f64> = rows
        .iter()
        .map(|row| group_sizes[&row[key_pos]] as f64)
        .collect();
    for (row, count) in rows.iter_mut().zip(counts) {
        row.push(Cell::number(count));
    }
    let count_pos = config.primary_columns.len();

    // Most-recurring customers first; ties broken by descending key.
    rows.sort_by(|a, b| {
        b[count_pos]
            .cmp(&a[count_pos])
            .then_with(|| b[key_pos].cmp(&a[key_pos]))
    });

    let mut columns = config.primary_columns.clone();
    columns.push(config.repeat_count_column.clone());
    Table::with_rows(columns, rows)
}

fn projection_pos(config: &ReportConfig, column: &str) -> Result<usize, ReconError> {
    config
        .primary_columns
        .iter()
        .position(|c| c == column)
        .ok_or_else(|| {
            ReconError::ConfigValidation(format!("primary_columns must contain '{column}'"))
        })
}
