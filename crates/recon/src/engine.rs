use std::path::Path;

use crate::config::ReportConfig;
use crate::error::ReconError;
use crate::fund;
use crate::load;
use crate::matcher;
use crate::model::{CompareReport, FundCheckReport};
use crate::normalize;

/// Standard comparison: validate, load, classify, normalize, match.
///
/// Each stage consumes the prior stage's full output; any failure aborts
/// the run. Report writing is a separate step so callers decide where (and
/// whether) results land on disk.
pub fn run_compare(
    first: &Path,
    second: &Path,
    config: &ReportConfig,
) -> Result<CompareReport, ReconError> {
    load::validate_inputs(first, second)?;
    let table_a = load::load_table(first)?;
    let table_b = load::load_table(second)?;

    let (kind_a, kind_b) =
        normalize::classify_sources(&table_a, &table_b, &config.compare.marker_column)?;
    let left = normalize::normalize_for_compare(&table_a, kind_a, &config.compare)?;
    let right = normalize::normalize_for_compare(&table_b, kind_b, &config.compare)?;

    Ok(matcher::compare_tables(&left, &right))
}

/// Fund analysis: validate, load, normalize, role-assign, two-pass check.
pub fn run_fund_check(
    first: &Path,
    second: &Path,
    config: &ReportConfig,
) -> Result<FundCheckReport, ReconError> {
    load::validate_inputs(first, second)?;
    let table_a = normalize::normalize_for_funds(&load::load_table(first)?);
    let table_b = normalize::normalize_for_funds(&load::load_table(second)?);

    fund::check_funds(table_a, table_b, &config.funds)
}
