use std::collections::HashSet;

use crate::error::ReconError;
use crate::model::{Cell, Table};

/// Merge per-file tables of one family into a single table.
///
/// Rows are concatenated in file order; exact element-wise duplicates keep
/// their first occurrence only. Every file must carry the same column set as
/// the first; column order may differ and is normalized to the first file's.
pub fn consolidate(family: &str, tables: &[Table]) -> Result<Table, ReconError> {
    if tables.is_empty() {
        return Err(ReconError::EmptyInput { family: family.to_string() });
    }

    let columns = tables[0].columns().to_vec();
    let mut seen: HashSet<Vec<Cell>> = HashSet::new();
    let mut out = Table::new(columns.clone());

    for (file_idx, table) in tables.iter().enumerate() {
        let mapping = column_mapping(family, file_idx, &columns, table)?;
        for row in table.rows() {
            let aligned: Vec<Cell> = mapping.iter().map(|&i| row[i].clone()).collect();
            if seen.insert(aligned.clone()) {
                out.push_row(aligned);
            }
        }
    }

    Ok(out)
}

/// For each expected column, its index in `table`. Extra or missing columns
/// mean a mis-exported file.
fn column_mapping(
    family: &str,
    file_idx: usize,
    expected: &[String],
    table: &Table,
) -> Result<Vec<usize>, ReconError> {
    let mut mapping = Vec::with_capacity(expected.len());
    for name in expected {
        let idx = table.column_index(name).ok_or_else(|| {
            ReconError::Schema(format!(
                "{family} file #{}: missing column '{name}'",
                file_idx + 1
            ))
        })?;
        mapping.push(idx);
    }
    if table.column_count() != expected.len() {
        let extra = table
            .columns()
            .iter()
            .find(|c| !expected.contains(c))
            .map(String::as_str)
            .unwrap_or("?");
        return Err(ReconError::Schema(format!(
            "{family} file #{}: unexpected column '{extra}'",
            file_idx + 1
        )));
    }
    Ok(mapping)
}
