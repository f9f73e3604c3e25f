use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Raw tables
// ---------------------------------------------------------------------------

/// A delimited file loaded as-is: ordered header plus raw string cells.
///
/// Cells are always strings at this stage; numeric interpretation happens
/// during normalization, never at load time.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl Table {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Source classification
// ---------------------------------------------------------------------------

/// Which record-keeping system a table was exported from.
///
/// The ledger export is recognized by its distinguishing fund-id column;
/// the other input is assumed to be the CRM export. Classification is
/// explicit — ambiguous inputs fail instead of being silently mislabeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Ledger,
    Crm,
}

impl SourceKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ledger => "ledger",
            Self::Crm => "crm",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Normalized compare input
// ---------------------------------------------------------------------------

/// One row reduced to its canonical join key and canonical amount.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareRow {
    pub key: String,
    pub amount: f64,
}

/// A table normalized for simple comparison, tagged with its source.
#[derive(Debug, Clone)]
pub struct CompareTable {
    pub source: SourceKind,
    pub rows: Vec<CompareRow>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a standard comparison run.
///
/// `missing` holds keys present in exactly one table, left table's
/// exclusive keys first. `variances` maps keys present in both tables to
/// the unsigned difference (larger minus smaller) of their canonical
/// amounts; equal amounts never appear. The two key sets are disjoint by
/// construction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompareReport {
    pub missing: Vec<String>,
    pub variances: BTreeMap<String, f64>,
}

impl CompareReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.variances.is_empty()
    }
}

/// Identifier → distinct fund labels seen for it, within one dataset.
/// BTreeMap keeps iteration deterministic; label order is insertion order.
pub type LabelMap = BTreeMap<String, Vec<String>>;

/// Outcome of a fund-analysis run.
///
/// `confirmed` is the second-pass inconsistency set: payment-side
/// identifiers whose fund allocations still disagree with the pledge data
/// after re-deriving funds through shared payment ids. The not-found lists
/// are informational only — a counterpart identifier being absent is never
/// an error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FundCheckReport {
    pub pledge_flags: Vec<String>,
    pub payment_flags: Vec<String>,
    pub confirmed: Vec<String>,
    pub pledge_not_found: Vec<String>,
    pub payment_not_found: Vec<String>,
}

impl FundCheckReport {
    pub fn is_clean(&self) -> bool {
        self.pledge_flags.is_empty() && self.confirmed.is_empty()
    }
}
