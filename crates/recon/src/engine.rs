use std::collections::HashMap;

use crate::config::ReportConfig;
use crate::detect::detect_duplicates;
use crate::error::ReconError;
use crate::join::join_report;
use crate::model::{ReportMeta, ReportResult, ReportSummary, Table};

/// Run the full pipeline over the two consolidated tables.
///
/// One sequential batch computation: detect duplicate customers in DB1,
/// join them against DB2 delivery events, summarize. Any stage failure
/// aborts the whole run; there is no partial report.
pub fn run(
    primary: &Table,
    secondary: &Table,
    config: &ReportConfig,
) -> Result<ReportResult, ReconError> {
    config.validate()?;

    let duplicates = detect_duplicates(primary, config)?;
    let summary = summarize(&duplicates, config)?;
    let report = join_report(&duplicates, secondary, config)?;

    Ok(ReportResult {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        report,
    })
}

/// Summary counts come from the pre-join duplicate table, so a customer
/// with many delivery events is still counted once per DB1 row.
fn summarize(duplicates: &Table, config: &ReportConfig) -> Result<ReportSummary, ReconError> {
    let key_idx = duplicates.require_column(&config.key_column, "summary")?;

    let mut repeat_counts: HashMap<String, usize> = HashMap::new();
    for row in duplicates.rows() {
        if let Some(key) = row[key_idx].key_text() {
            *repeat_counts.entry(key).or_insert(0) += 1;
        }
    }

    Ok(ReportSummary {
        duplicate_rows: duplicates.row_count(),
        duplicate_customers: repeat_counts.len(),
        repeat_counts,
    })
}
