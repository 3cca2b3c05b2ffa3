use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// A required file collection (DB1 or DB2) is empty.
    EmptyInput { family: String },
    /// A file cannot be parsed as a spreadsheet.
    FileParse { file: String, detail: String },
    /// The required sheet is absent from a workbook.
    SheetNotFound { file: String, sheet: String },
    /// A column required by a pipeline stage is absent.
    MissingColumn { column: String, stage: String },
    /// Structurally invalid input (column set mismatch, ragged data, etc.).
    Schema(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (projection omits key column, etc.).
    ConfigValidation(String),
    /// IO error (report write, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput { family } => write!(f, "no {family} files provided"),
            Self::FileParse { file, detail } => write!(f, "cannot parse '{file}': {detail}"),
            Self::SheetNotFound { file, sheet } => {
                write!(f, "'{file}': sheet '{sheet}' not found")
            }
            Self::MissingColumn { column, stage } => {
                write!(f, "{stage}: missing column '{column}'")
            }
            Self::Schema(msg) => write!(f, "schema error: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
