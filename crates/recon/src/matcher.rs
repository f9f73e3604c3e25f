use std::collections::{HashMap, HashSet};

use crate::model::{CompareReport, CompareRow, CompareTable};
use crate::normalize::round2;

/// Compare two normalized tables on their canonical keys.
///
/// The missing set is the symmetric difference of the key sets: the left
/// table's exclusive keys first, then the right table's, duplicates
/// suppressed. The variance map covers the inner join; when a key repeats
/// within a table every pairing is considered (cartesian semantics) and
/// later pairs overwrite earlier ones, matching the dict-update behavior
/// the reports have always had. Keys with equal amounts are excluded, so
/// the missing set and variance keys are disjoint by construction.
pub fn compare_tables(left: &CompareTable, right: &CompareTable) -> CompareReport {
    let left_keys: HashSet<&str> = left.rows.iter().map(|r| r.key.as_str()).collect();
    let right_keys: HashSet<&str> = right.rows.iter().map(|r| r.key.as_str()).collect();

    let mut missing = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for row in &left.rows {
        if !right_keys.contains(row.key.as_str()) && seen.insert(row.key.as_str()) {
            missing.push(row.key.clone());
        }
    }
    for row in &right.rows {
        if !left_keys.contains(row.key.as_str()) && seen.insert(row.key.as_str()) {
            missing.push(row.key.clone());
        }
    }

    let mut right_by_key: HashMap<&str, Vec<&CompareRow>> = HashMap::new();
    for row in &right.rows {
        right_by_key.entry(row.key.as_str()).or_default().push(row);
    }

    let mut report = CompareReport {
        missing,
        ..Default::default()
    };

    for left_row in &left.rows {
        let Some(matches) = right_by_key.get(left_row.key.as_str()) else {
            continue;
        };
        for right_row in matches {
            if left_row.amount != right_row.amount {
                let (larger, smaller) = if left_row.amount > right_row.amount {
                    (left_row.amount, right_row.amount)
                } else {
                    (right_row.amount, left_row.amount)
                };
                report
                    .variances
                    .insert(left_row.key.clone(), round2(larger - smaller));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceKind;

    fn side(kind: SourceKind, rows: &[(&str, f64)]) -> CompareTable {
        CompareTable {
            source: kind,
            rows: rows
                .iter()
                .map(|(key, amount)| CompareRow {
                    key: key.to_string(),
                    amount: *amount,
                })
                .collect(),
        }
    }

    #[test]
    fn equal_amounts_produce_no_variance() {
        let left = side(SourceKind::Ledger, &[("x_1", 100.0)]);
        let right = side(SourceKind::Crm, &[("x_1", 100.0), ("y_2", 50.0)]);
        let report = compare_tables(&left, &right);
        assert_eq!(report.missing, vec!["y_2"]);
        assert!(report.variances.is_empty());
    }

    #[test]
    fn variance_is_larger_minus_smaller() {
        let left = side(SourceKind::Ledger, &[("x_1", 100.0)]);
        let right = side(SourceKind::Crm, &[("x_1", 150.0), ("y_2", 50.0)]);
        let report = compare_tables(&left, &right);
        assert_eq!(report.missing, vec!["y_2"]);
        assert_eq!(report.variances.get("x_1"), Some(&50.0));

        // same inputs flipped: variance stays positive
        let report = compare_tables(&right, &left);
        assert_eq!(report.variances.get("x_1"), Some(&50.0));
    }

    #[test]
    fn missing_lists_left_exclusives_first() {
        let left = side(SourceKind::Ledger, &[("a", 1.0), ("b", 1.0), ("a", 1.0)]);
        let right = side(SourceKind::Crm, &[("c", 1.0), ("d", 1.0)]);
        let report = compare_tables(&left, &right);
        assert_eq!(report.missing, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn missing_and_variance_keys_are_disjoint() {
        let left = side(SourceKind::Ledger, &[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let right = side(SourceKind::Crm, &[("b", 9.0), ("c", 3.0), ("z", 4.0)]);
        let report = compare_tables(&left, &right);
        for key in &report.missing {
            assert!(!report.variances.contains_key(key));
        }
        assert_eq!(report.missing, vec!["a", "z"]);
        assert_eq!(report.variances.get("b"), Some(&7.0));
    }

    #[test]
    fn matcher_is_idempotent() {
        let left = side(SourceKind::Ledger, &[("a", 1.0), ("b", 2.5)]);
        let right = side(SourceKind::Crm, &[("b", 2.0), ("c", 4.0)]);
        let first = compare_tables(&left, &right);
        let second = compare_tables(&left, &right);
        assert_eq!(first.missing, second.missing);
        assert_eq!(first.variances, second.variances);
    }

    #[test]
    fn repeated_key_keeps_cartesian_overwrite_semantics() {
        // Two right rows share the key; the later pairing wins.
        let left = side(SourceKind::Ledger, &[("a", 10.0)]);
        let right = side(SourceKind::Crm, &[("a", 12.0), ("a", 15.0)]);
        let report = compare_tables(&left, &right);
        assert!(report.missing.is_empty());
        assert_eq!(report.variances.get("a"), Some(&5.0));
    }

    #[test]
    fn later_equal_pair_does_not_clear_earlier_variance() {
        // dict-update semantics: equal pairs are skipped, not recorded.
        let left = side(SourceKind::Ledger, &[("a", 10.0)]);
        let right = side(SourceKind::Crm, &[("a", 12.0), ("a", 10.0)]);
        let report = compare_tables(&left, &right);
        assert_eq!(report.variances.get("a"), Some(&2.0));
    }
}
