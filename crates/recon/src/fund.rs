use std::collections::HashMap;

use crate::config::FundConfig;
use crate::error::ReconError;
use crate::model::{FundCheckReport, LabelMap, Table};

// ---------------------------------------------------------------------------
// Role assignment
// ---------------------------------------------------------------------------

/// Assign payment/pledge roles by row count.
///
/// The payments export always has more rows than the pledge export, so the
/// strictly larger table is payments. On a tie the second table becomes
/// payments; that tie-break is fixed and relied upon by callers.
pub fn assign_roles(first: Table, second: Table) -> (Table, Table) {
    if first.row_count() > second.row_count() {
        (first, second)
    } else {
        (second, first)
    }
}

// ---------------------------------------------------------------------------
// Label maps
// ---------------------------------------------------------------------------

/// Build identifier → distinct fund labels for one dataset.
/// Labels keep insertion order; duplicates are suppressed.
pub fn build_label_map(
    table: &Table,
    key_column: &str,
    label_column: &str,
    source: &str,
) -> Result<LabelMap, ReconError> {
    for column in [key_column, label_column] {
        if !table.has_column(column) {
            return Err(ReconError::MissingColumn {
                source: source.into(),
                column: column.into(),
            });
        }
    }

    let mut map = LabelMap::new();
    for row in &table.rows {
        let key = row.get(key_column).cloned().unwrap_or_default();
        let label = row.get(label_column).cloned().unwrap_or_default();
        let labels = map.entry(key).or_default();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// Pass 1: direct label-set comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FirstPassResult {
    pub pledge_flags: Vec<String>,
    pub payment_flags: Vec<String>,
    pub pledge_not_found: Vec<String>,
    pub payment_not_found: Vec<String>,
}

/// Check each multi-fund identifier on one side against the other side's
/// label set, in both directions. Identifiers absent from the counterpart
/// dataset are collected but never fatal.
pub fn first_pass(pledge: &LabelMap, payments: &LabelMap) -> FirstPassResult {
    let mut result = FirstPassResult::default();
    check_direction(pledge, payments, &mut result.pledge_flags, &mut result.pledge_not_found);
    check_direction(payments, pledge, &mut result.payment_flags, &mut result.payment_not_found);
    result
}

fn check_direction(
    side: &LabelMap,
    counterpart: &LabelMap,
    flags: &mut Vec<String>,
    not_found: &mut Vec<String>,
) {
    for (id, labels) in side {
        if labels.len() <= 1 {
            continue;
        }
        match counterpart.get(id) {
            Some(other) => {
                if labels.iter().any(|l| !other.contains(l)) && !flags.contains(id) {
                    flags.push(id.clone());
                }
            }
            None => not_found.push(id.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Pass 2: re-derivation through shared payment ids
// ---------------------------------------------------------------------------

/// Re-check flagged payment identifiers after widening their fund set.
///
/// A pledge's true fund set can be broader than one direct lookup shows
/// when its payments are split across records that share payment ids. For
/// each flagged identifier: gather its payment ids, take the union of fund
/// labels across all payments carrying any of those ids, and re-run the
/// pass-1 check on that wider set. Both lookups come from indexes built
/// once over the payments table rather than per-identifier scans.
pub fn second_pass(
    flagged: &[String],
    payments: &Table,
    pledge: &LabelMap,
    config: &FundConfig,
) -> Result<Vec<String>, ReconError> {
    for column in [
        config.link_column.as_str(),
        config.payment_id_column.as_str(),
        config.payment_fund_column.as_str(),
    ] {
        if !payments.has_column(column) {
            return Err(ReconError::MissingColumn {
                source: "payments".into(),
                column: column.into(),
            });
        }
    }

    let mut payment_ids_by_link: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut funds_by_payment_id: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in &payments.rows {
        let link = row.get(&config.link_column).map(String::as_str).unwrap_or("");
        let payment_id = row
            .get(&config.payment_id_column)
            .map(String::as_str)
            .unwrap_or("");
        let fund = row
            .get(&config.payment_fund_column)
            .map(String::as_str)
            .unwrap_or("");

        let ids = payment_ids_by_link.entry(link).or_default();
        if !ids.contains(&payment_id) {
            ids.push(payment_id);
        }
        let funds = funds_by_payment_id.entry(payment_id).or_default();
        if !funds.contains(&fund) {
            funds.push(fund);
        }
    }

    let mut confirmed = Vec::new();
    for id in flagged {
        let Some(payment_ids) = payment_ids_by_link.get(id.as_str()) else {
            continue;
        };
        // A single payment id cannot widen the fund set beyond pass 1.
        if payment_ids.len() <= 1 {
            continue;
        }

        let mut funds: Vec<&str> = Vec::new();
        for payment_id in payment_ids {
            if let Some(pf) = funds_by_payment_id.get(payment_id) {
                for fund in pf {
                    if !funds.contains(fund) {
                        funds.push(*fund);
                    }
                }
            }
        }
        if funds.len() <= 1 {
            continue;
        }

        if let Some(pledge_funds) = pledge.get(id.as_str()) {
            if funds.iter().any(|f| !pledge_funds.iter().any(|p| p == f))
                && !confirmed.contains(id)
            {
                confirmed.push(id.clone());
            }
        }
    }

    Ok(confirmed)
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Full fund-consistency check over two normalized tables.
pub fn check_funds(
    first: Table,
    second: Table,
    config: &FundConfig,
) -> Result<FundCheckReport, ReconError> {
    let (payments, pledge) = assign_roles(first, second);

    let payment_map = build_label_map(
        &payments,
        &config.link_column,
        &config.payment_fund_column,
        "payments",
    )?;
    let pledge_map = build_label_map(
        &pledge,
        &config.gift_column,
        &config.pledge_fund_column,
        "pledge",
    )?;

    let pass = first_pass(&pledge_map, &payment_map);
    let confirmed = second_pass(&pass.payment_flags, &payments, &pledge_map, config)?;

    Ok(FundCheckReport {
        pledge_flags: pass.pledge_flags,
        payment_flags: pass.payment_flags,
        confirmed,
        pledge_not_found: pass.pledge_not_found,
        payment_not_found: pass.payment_not_found,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
