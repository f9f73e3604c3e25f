use std::collections::HashMap;

use crate::config::CompareConfig;
use crate::error::ReconError;
use crate::model::{CompareRow, CompareTable, SourceKind, Table};

// ---------------------------------------------------------------------------
// Pure string normalization
// ---------------------------------------------------------------------------

/// Header normalization shared by both modes: trim, lowercase, spaces → `_`.
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Derive a canonical join key from a raw identifier.
///
/// Pipeline: trim, collapse dash-with-space variants (`" - "`, `"- "`,
/// `" -"`) to a bare dash, dash → underscore, space → underscore,
/// lowercase. Later steps run on the output of earlier ones; the order of
/// the dash-variant replacements matters because `" - "` contains both of
/// the shorter variants.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .replace(" - ", "-")
        .replace("- ", "-")
        .replace(" -", "-")
        .replace('-', "_")
        .replace(' ', "_")
        .to_lowercase()
}

/// Derive a canonical amount from a raw cell: strip the `USD` token,
/// currency symbol, and thousands separators, parse, round to 2 decimals.
/// Returns `None` for values that remain non-numeric after stripping.
pub fn normalize_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace("USD", "").replace('$', "").replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().map(round2)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Source classification
// ---------------------------------------------------------------------------

/// Classify the two inputs by the presence of the marker column.
///
/// Exactly one table must carry it (after header normalization); that one
/// is the ledger export. Zero or two marker tables is an error rather than
/// a silent misclassification.
pub fn classify_sources(
    first: &Table,
    second: &Table,
    marker: &str,
) -> Result<(SourceKind, SourceKind), ReconError> {
    let has_marker =
        |t: &Table| t.columns.iter().any(|c| normalize_header(c) == marker);

    match (has_marker(first), has_marker(second)) {
        (true, false) => Ok((SourceKind::Ledger, SourceKind::Crm)),
        (false, true) => Ok((SourceKind::Crm, SourceKind::Ledger)),
        (true, true) => Err(ReconError::SourceDetect(format!(
            "both inputs carry the distinguishing column '{marker}'"
        ))),
        (false, false) => Err(ReconError::SourceDetect(format!(
            "neither input carries the distinguishing column '{marker}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Simple-compare normalization
// ---------------------------------------------------------------------------

/// Normalize one classified table down to canonical (key, amount) rows.
///
/// Ledger exports get the configured rename applied so their header lines
/// up with the CRM export; CRM exports get the repeated aggregate columns
/// dropped. Either way the configured key and amount columns must exist
/// afterwards.
pub fn normalize_for_compare(
    table: &Table,
    kind: SourceKind,
    config: &CompareConfig,
) -> Result<CompareTable, ReconError> {
    // Normalized header → original header, with per-source adjustments.
    let mut header_map: HashMap<String, String> = HashMap::new();
    for column in &table.columns {
        let mut name = normalize_header(column);
        match kind {
            SourceKind::Ledger => {
                if let Some(renamed) = config.rename.get(&name) {
                    name = renamed.clone();
                }
            }
            SourceKind::Crm => {
                if config.drop.iter().any(|d| *d == name) {
                    continue;
                }
            }
        }
        header_map.insert(name, column.clone());
    }

    let source_column = |name: &str| -> Result<String, ReconError> {
        header_map
            .get(name)
            .cloned()
            .ok_or_else(|| ReconError::MissingColumn {
                source: kind.tag().into(),
                column: name.into(),
            })
    };

    let key_column = source_column(&config.key_column)?;
    let amount_column = source_column(&config.amount_column)?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let raw_key = row.get(&key_column).map(String::as_str).unwrap_or("");
        let raw_amount = row.get(&amount_column).map(String::as_str).unwrap_or("");
        let key = normalize_key(raw_key);
        let amount =
            normalize_amount(raw_amount).ok_or_else(|| ReconError::AmountParse {
                source: kind.tag().into(),
                key: key.clone(),
                value: raw_amount.into(),
            })?;
        rows.push(CompareRow { key, amount });
    }

    Ok(CompareTable { source: kind, rows })
}

// ---------------------------------------------------------------------------
// Fund-analysis normalization
// ---------------------------------------------------------------------------

/// Fund-mode normalization: headers lowercased with underscores, and any
/// column whose name contains "fund" has its values lowercased. No join
/// key is derived here; raw identifier columns are used directly
/// downstream.
pub fn normalize_for_funds(table: &Table) -> Table {
    let columns: Vec<String> = table.columns.iter().map(|c| normalize_header(c)).collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut out = HashMap::with_capacity(row.len());
            for (original, normalized) in table.columns.iter().zip(&columns) {
                let value = row.get(original).cloned().unwrap_or_default();
                let value = if normalized.contains("fund") {
                    value.to_lowercase()
                } else {
                    value
                };
                out.insert(normalized.clone(), value);
            }
            out
        })
        .collect();

    Table { columns, rows }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareConfig;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|cells| {
                columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().map(|v| v.to_string()))
                    .collect()
            })
            .collect();
        Table { columns, rows }
    }

    #[test]
    fn key_normalization() {
        assert_eq!(normalize_key("Proj - 01"), "proj_01");
        assert_eq!(normalize_key(" Fund 7 "), "fund_7");
        assert_eq!(normalize_key("X-1"), "x_1");
        assert_eq!(normalize_key("abc- def"), "abc_def");
        assert_eq!(normalize_key("abc -def"), "abc_def");
        assert_eq!(normalize_key("plain"), "plain");
    }

    #[test]
    fn amount_normalization() {
        assert_eq!(normalize_amount("$1,234.50"), Some(1234.50));
        assert_eq!(normalize_amount("1200 USD"), Some(1200.00));
        assert_eq!(normalize_amount("500"), Some(500.0));
        assert_eq!(normalize_amount(" 1,000 USD "), Some(1000.0));
        assert_eq!(normalize_amount("12.3456"), Some(12.35));
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("n/a"), None);
    }

    #[test]
    fn classify_by_marker_column() {
        let ledger = table(&["Fund ID", "Total"], &[]);
        let crm = table(&["project_id", "sum_of_amount.5"], &[]);
        let (a, b) = classify_sources(&ledger, &crm, "fund_id").unwrap();
        assert_eq!(a, SourceKind::Ledger);
        assert_eq!(b, SourceKind::Crm);

        let (a, b) = classify_sources(&crm, &ledger, "fund_id").unwrap();
        assert_eq!(a, SourceKind::Crm);
        assert_eq!(b, SourceKind::Ledger);
    }

    #[test]
    fn classify_rejects_ambiguity() {
        let ledger = table(&["fund_id"], &[]);
        let err = classify_sources(&ledger, &ledger.clone(), "fund_id").unwrap_err();
        assert!(err.to_string().contains("both inputs"));

        let crm = table(&["project_id"], &[]);
        let err = classify_sources(&crm, &crm.clone(), "fund_id").unwrap_err();
        assert!(err.to_string().contains("neither input"));
    }

    #[test]
    fn ledger_rename_produces_canonical_rows() {
        let ledger = table(
            &["Fund ID", "Gift Count", "Total"],
            &[&["Proj - 01", "3", "$1,234.50"]],
        );
        let out =
            normalize_for_compare(&ledger, SourceKind::Ledger, &CompareConfig::default())
                .unwrap();
        assert_eq!(out.source, SourceKind::Ledger);
        assert_eq!(out.rows, vec![CompareRow { key: "proj_01".into(), amount: 1234.50 }]);
    }

    #[test]
    fn crm_aggregate_columns_are_dropped() {
        // The dropped sum_of_amount column must not shadow the kept `.5` one.
        let crm = table(
            &["Project ID", "Sum of Amount", "Sum of Amount.5"],
            &[&["X-1", "999", "100"]],
        );
        let out = normalize_for_compare(&crm, SourceKind::Crm, &CompareConfig::default())
            .unwrap();
        assert_eq!(out.rows[0].amount, 100.0);
    }

    #[test]
    fn missing_amount_column_is_fatal() {
        let crm = table(&["Project ID"], &[&["X-1"]]);
        let err = normalize_for_compare(&crm, SourceKind::Crm, &CompareConfig::default())
            .unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { .. }));
        assert!(err.to_string().contains("sum_of_amount.5"));
    }

    #[test]
    fn unparsable_amount_is_fatal() {
        let crm = table(
            &["Project ID", "Sum of Amount.5"],
            &[&["X-1", "pending"]],
        );
        let err = normalize_for_compare(&crm, SourceKind::Crm, &CompareConfig::default())
            .unwrap_err();
        assert!(matches!(err, ReconError::AmountParse { .. }));
    }

    #[test]
    fn fund_mode_lowercases_fund_values_only() {
        let raw = table(
            &["Gift ID", "Fund ID", "Amount"],
            &[&["G1", "FUND_A", "Ten"]],
        );
        let out = normalize_for_funds(&raw);
        assert_eq!(out.columns, vec!["gift_id", "fund_id", "amount"]);
        assert_eq!(out.rows[0]["fund_id"], "fund_a");
        // non-fund columns keep their case
        assert_eq!(out.rows[0]["amount"], "Ten");
    }
}
