use serde::Deserialize;

use crate::error::ReconError;

/// Sheet and column names for one report run.
///
/// The defaults match the courier export contract (DB1 "Consolidated"
/// shipment sheets, DB2 "Data" delivery-event sheets); a TOML config can
/// override any of them for sources with renamed columns.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Sheet name read from every DB1 workbook.
    #[serde(default = "default_primary_sheet")]
    pub primary_sheet: String,
    /// Sheet name read from every DB2 workbook.
    #[serde(default = "default_secondary_sheet")]
    pub secondary_sheet: String,
    /// Duplicate-detection key.
    #[serde(default = "default_key_column")]
    pub key_column: String,
    /// DB1 side of the join, normalized to uppercase text.
    #[serde(default = "default_barcode_column")]
    pub barcode_column: String,
    /// Tie-break column for the intermediate per-key sort.
    #[serde(default = "default_date_column")]
    pub date_column: String,
    /// DB2 side of the join.
    #[serde(default = "default_article_column")]
    pub article_column: String,
    /// Name of the derived per-key row-count column.
    #[serde(default = "default_repeat_count_column")]
    pub repeat_count_column: String,
    /// DB1 columns kept in the duplicate-customer table.
    #[serde(default = "default_primary_columns")]
    pub primary_columns: Vec<String>,
    /// DB2 columns appended by the join.
    #[serde(default = "default_secondary_columns")]
    pub secondary_columns: Vec<String>,
}

fn default_primary_sheet() -> String {
    "Consolidated".into()
}

fn default_secondary_sheet() -> String {
    "Data".into()
}

fn default_key_column() -> String {
    "RECEIVER MOBILE NO".into()
}

fn default_barcode_column() -> String {
    "BARCODE NO".into()
}

fn default_date_column() -> String {
    "Date".into()
}

fn default_article_column() -> String {
    "article-number".into()
}

fn default_repeat_count_column() -> String {
    "PHONE_REPEAT_COUNT".into()
}

fn default_primary_columns() -> Vec<String> {
    [
        "Date",
        "BARCODE NO",
        "RECEIVER CITY",
        "RECEIVER PINCODE",
        "RECEIVER NAME",
        "RECEIVER ADD LINE 1",
        "RECEIVER ADD LINE 2",
        "RECEIVER ADD LINE 3",
        "RECEIVER MOBILE NO",
    ]
    .map(String::from)
    .to_vec()
}

fn default_secondary_columns() -> Vec<String> {
    [
        "article-number",
        "booking-date-time",
        "event-code",
        "event-description",
        "non-delivery-reason-description",
        "event-office-name",
    ]
    .map(String::from)
    .to_vec()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            primary_sheet: default_primary_sheet(),
            secondary_sheet: default_secondary_sheet(),
            key_column: default_key_column(),
            barcode_column: default_barcode_column(),
            date_column: default_date_column(),
            article_column: default_article_column(),
            repeat_count_column: default_repeat_count_column(),
            primary_columns: default_primary_columns(),
            secondary_columns: default_secondary_columns(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self, ReconError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The projection must carry the columns later stages key on.
    pub fn validate(&self) -> Result<(), ReconError> {
        for required in [&self.key_column, &self.barcode_column, &self.date_column] {
            if !self.primary_columns.contains(required) {
                return Err(ReconError::ConfigValidation(format!(
                    "primary_columns must contain '{required}'"
                )));
            }
        }
        if !self.secondary_columns.contains(&self.article_column) {
            return Err(ReconError::ConfigValidation(format!(
                "secondary_columns must contain '{}'",
                self.article_column
            )));
        }
        if self.primary_columns.contains(&self.repeat_count_column) {
            return Err(ReconError::ConfigValidation(format!(
                "repeat_count_column '{}' collides with a primary column",
                self.repeat_count_column
            )));
        }
        Ok(())
    }
}
