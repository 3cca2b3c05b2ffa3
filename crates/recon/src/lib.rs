//! `dupetrace-recon` — duplicate-customer reconciliation engine.
//!
//! Pure engine crate: receives pre-parsed tables, returns the ranked
//! duplicate report. No file or network IO dependencies.

pub mod config;
pub mod consolidate;
pub mod detect;
pub mod engine;
pub mod error;
pub mod join;
pub mod model;

pub use config::ReportConfig;
pub use consolidate::consolidate;
pub use engine::run;
pub use error::ReconError;
pub use model::{Cell, ReportResult, ReportSummary, Table};
