//! Excel import (xlsx, xls, xlsb, ods) from in-memory payloads and report
//! export (xlsx only).
//!
//! Import reads exactly one named sheet per payload: the first row is the
//! header, every following row becomes a table row. The core never touches
//! files itself; callers hand bytes in and get a `Table` back.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use dupetrace_recon::model::{Cell, Table};
use dupetrace_recon::ReconError;

/// Parse one named sheet of a spreadsheet payload into a table.
pub fn read_sheet(bytes: &[u8], file_name: &str, sheet_name: &str) -> Result<Table, ReconError> {
    let mut workbook: Sheets<_> =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| ReconError::FileParse {
            file: file_name.to_string(),
            detail: e.to_string(),
        })?;

    if !workbook.sheet_names().iter().any(|s| s == sheet_name) {
        return Err(ReconError::SheetNotFound {
            file: file_name.to_string(),
            sheet: sheet_name.to_string(),
        });
    }

    let range = workbook.worksheet_range(sheet_name).map_err(|e| ReconError::FileParse {
        file: file_name.to_string(),
        detail: format!("sheet '{sheet_name}': {e}"),
    })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| {
        ReconError::Schema(format!("'{file_name}': sheet '{sheet_name}' has no header row"))
    })?;
    let columns: Vec<String> = header.iter().map(header_text).collect();

    let mut table = Table::new(columns);
    for row in rows {
        // Bounding boxes can include fully blank rows; skip them.
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        table.push_row(row.iter().map(to_cell).collect());
    }

    Ok(table)
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::String(s) if s.trim().is_empty() => Cell::Missing,
        Data::String(s) => Cell::text(s.clone()),
        Data::Float(n) => Cell::number(*n),
        Data::Int(n) => Cell::number(*n as f64),
        Data::Bool(b) => Cell::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => Cell::text(format!("#{e:?}")),
        // Keep the raw serial; the detector's text coercion handles the rest.
        Data::DateTime(dt) => Cell::number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::text(s.clone()),
        Data::DurationIso(s) => Cell::text(s.clone()),
    }
}

/// Write the final report as a single-sheet workbook with a bold header row.
pub fn export_report(report: &Table, path: &Path) -> Result<(), ReconError> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name("Report")
        .map_err(|e| ReconError::Io(e.to_string()))?;

    let header_format = Format::new().set_bold();
    for (col, name) in report.columns().iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, name.as_str(), &header_format)
            .map_err(|e| ReconError::Io(e.to_string()))?;
    }

    for (r, row) in report.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (row_idx, col_idx) = ((r + 1) as u32, c as u16);
            match cell {
                Cell::Missing => {}
                Cell::Number(n) => {
                    worksheet
                        .write_number(row_idx, col_idx, n.into_inner())
                        .map_err(|e| ReconError::Io(e.to_string()))?;
                }
                Cell::Text(s) => {
                    worksheet
                        .write_string(row_idx, col_idx, s)
                        .map_err(|e| ReconError::Io(e.to_string()))?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| ReconError::Io(format!("cannot write {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an xlsx payload with one sheet holding the given header + rows.
    fn workbook_bytes(sheet: &str, header: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
        let mut workbook = XlsxWorkbook::new();
        let worksheet = workbook.add_worksheet().set_name(sheet).unwrap();
        for (col, name) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Missing => {}
                    Cell::Number(n) => {
                        worksheet.write_number((r + 1) as u32, c as u16, n.into_inner()).unwrap();
                    }
                    Cell::Text(s) => {
                        worksheet.write_string((r + 1) as u32, c as u16, s.as_str()).unwrap();
                    }
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn reads_header_and_typed_cells() {
        let bytes = workbook_bytes(
            "Consolidated",
            &["BARCODE NO", "RECEIVER MOBILE NO", "RECEIVER CITY"],
            &[
                vec![Cell::text("a1"), Cell::number(9876543210.0), Cell::text("Pune")],
                vec![Cell::text("a2"), Cell::Missing, Cell::Missing],
            ],
        );
        let table = read_sheet(&bytes, "db1.xlsx", "Consolidated").unwrap();
        assert_eq!(
            table.columns(),
            &["BARCODE NO".to_string(), "RECEIVER MOBILE NO".into(), "RECEIVER CITY".into()]
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "RECEIVER MOBILE NO"), Some(&Cell::number(9876543210.0)));
        assert_eq!(table.cell(1, "RECEIVER MOBILE NO"), Some(&Cell::Missing));
    }

    #[test]
    fn missing_sheet_is_reported_with_file_context() {
        let bytes = workbook_bytes("Sheet1", &["a"], &[]);
        let err = read_sheet(&bytes, "db2.xlsx", "Data").unwrap_err();
        match err {
            ReconError::SheetNotFound { file, sheet } => {
                assert_eq!(file, "db2.xlsx");
                assert_eq!(sheet, "Data");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_payload_is_a_parse_error() {
        let err = read_sheet(b"not a spreadsheet", "junk.xlsx", "Data").unwrap_err();
        assert!(matches!(err, ReconError::FileParse { .. }), "{err}");
    }

    #[test]
    fn export_then_reimport_round_trips() {
        let report = Table::with_rows(
            vec!["BARCODE NO".into(), "PHONE_REPEAT_COUNT".into(), "event-code".into()],
            vec![
                vec![Cell::text("A1"), Cell::number(2.0), Cell::text("DLV")],
                vec![Cell::text("A2"), Cell::number(2.0), Cell::Missing],
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_report(&report, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let back = read_sheet(&bytes, "report.xlsx", "Report").unwrap();
        assert_eq!(back, report);
    }
}
