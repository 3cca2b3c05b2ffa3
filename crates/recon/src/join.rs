use std::collections::HashMap;

use crate::config::ReportConfig;
use crate::error::ReconError;
use crate::model::{Cell, Table};

const STAGE: &str = "report join";

/// Left-join the duplicate-customer table against the consolidated DB2
/// delivery events on barcode = article number.
///
/// Every left row appears at least once: once per matching event when there
/// are matches (in DB2 order), once with missing event columns when there
/// are none. Left row order is preserved.
pub fn join_report(
    duplicates: &Table,
    secondary: &Table,
    config: &ReportConfig,
) -> Result<Table, ReconError> {
    let left_key = duplicates.require_column(&config.barcode_column, STAGE)?;
    let right_key = secondary.require_column(&config.article_column, STAGE)?;
    let projection: Vec<usize> = config
        .secondary_columns
        .iter()
        .map(|name| secondary.require_column(name, STAGE))
        .collect::<Result<_, _>>()?;

    // Event rows by normalized article text, preserving DB2 order per key.
    let mut by_article: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, row) in secondary.rows().iter().enumerate() {
        if let Some(article) = row[right_key].key_text() {
            by_article.entry(article).or_default().push(idx);
        }
    }

    let mut columns = duplicates.columns().to_vec();
    columns.extend(config.secondary_columns.iter().cloned());
    let mut out = Table::new(columns);

    for row in duplicates.rows() {
        let matches = row[left_key]
            .key_text()
            .and_then(|barcode| by_article.get(&barcode));
        match matches {
            Some(indices) => {
                for &idx in indices {
                    let event = &secondary.rows()[idx];
                    let mut joined = row.clone();
                    joined.extend(projection.iter().map(|&p| event[p].clone()));
                    out.push_row(joined);
                }
            }
            None => {
                let mut joined = row.clone();
                joined.extend(std::iter::repeat(Cell::Missing).take(projection.len()));
                out.push_row(joined);
            }
        }
    }

    Ok(out)
}
