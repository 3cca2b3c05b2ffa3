// Spreadsheet ingestion (xlsx/xls/ods, CSV) and report export (xlsx only)

pub mod csv;
pub mod xlsx;
