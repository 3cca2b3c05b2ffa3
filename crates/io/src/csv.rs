//! CSV ingestion. Some sources export the same tables as CSV; the first
//! record is the header, fields parse to numbers when they look numeric.

use dupetrace_recon::model::{Cell, Table};
use dupetrace_recon::ReconError;

/// Parse a CSV payload into a table.
pub fn read_csv(bytes: &[u8], file_name: &str) -> Result<Table, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::FileParse {
            file: file_name.to_string(),
            detail: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::FileParse {
            file: file_name.to_string(),
            detail: e.to_string(),
        })?;
        table.push_row(record.iter().map(parse_field).collect());
    }

    Ok(table)
}

fn parse_field(field: &str) -> Cell {
    let field = field.trim();
    if field.is_empty() {
        return Cell::Missing;
    }
    // "nan"/"inf" parse as f64 but are placeholders, not data
    match field.parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::number(n),
        _ => Cell::text(field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_and_mixed_fields() {
        let data = "\
BARCODE NO,RECEIVER MOBILE NO,RECEIVER CITY
a1,9876543210,Pune
a2,,
";
        let table = read_csv(data.as_bytes(), "db1.csv").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "RECEIVER MOBILE NO"), Some(&Cell::number(9876543210.0)));
        assert_eq!(table.cell(0, "RECEIVER CITY"), Some(&Cell::text("Pune")));
        assert_eq!(table.cell(1, "RECEIVER MOBILE NO"), Some(&Cell::Missing));
    }

    #[test]
    fn short_records_pad_with_missing() {
        let data = "a,b,c\n1,2\n";
        let table = read_csv(data.as_bytes(), "t.csv").unwrap();
        assert_eq!(table.cell(0, "c"), Some(&Cell::Missing));
    }

    #[test]
    fn nan_text_stays_text() {
        let data = "a\nnan\n";
        let table = read_csv(data.as_bytes(), "t.csv").unwrap();
        assert_eq!(table.cell(0, "a"), Some(&Cell::text("nan")));
    }
}
