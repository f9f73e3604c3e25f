//! `crosscheck-recon` — two-source financial reconciliation engine.
//!
//! Pure engine crate: loads two delimited exports, normalizes their
//! heterogeneous column layouts, and reports where they disagree — either
//! as a key/amount comparison or as a fund-allocation consistency check.
//! No CLI concerns; the binary crate owns argument parsing and exit codes.

pub mod config;
pub mod engine;
pub mod error;
pub mod fund;
pub mod load;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;

pub use config::ReportConfig;
pub use engine::{run_compare, run_fund_check};
pub use error::ReconError;
pub use model::{CompareReport, FundCheckReport, SourceKind, Table};
pub use report::RunStamp;
