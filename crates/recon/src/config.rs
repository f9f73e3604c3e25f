use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Column mappings for both report modes plus output settings.
///
/// Every field has a default matching the known ledger/CRM export layouts,
/// so a config file is only needed when an export schema drifts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub compare: CompareConfig,
    pub funds: FundConfig,
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Standard comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Column present only in the ledger export; drives source classification.
    pub marker_column: String,
    /// Canonical join-key column, after renames.
    pub key_column: String,
    /// Canonical amount column, after renames.
    pub amount_column: String,
    /// Ledger-export renames that align its header with the CRM export.
    pub rename: BTreeMap<String, String>,
    /// Repeated aggregate columns dropped from the CRM export.
    pub drop: Vec<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            marker_column: "fund_id".into(),
            key_column: "project_id".into(),
            amount_column: "sum_of_amount.5".into(),
            rename: BTreeMap::from([
                ("fund_id".to_string(), "project_id".to_string()),
                ("gift_count".to_string(), "record_count.5".to_string()),
                ("total".to_string(), "sum_of_amount.5".to_string()),
            ]),
            drop: vec![
                "sum_of_amount".into(),
                "record_count".into(),
                "sum_of_amount.1".into(),
                "record_count.1".into(),
                "sum_of_amount.2".into(),
                "record_count.2".into(),
                "sum_of_amount.3".into(),
                "record_count.3".into(),
                "sum_of_amount.4".into(),
                "record_count.4".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Fund analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FundConfig {
    /// Pledge-side gift identifier.
    pub gift_column: String,
    /// Pledge-side fund label.
    pub pledge_fund_column: String,
    /// Payment-side column linking a payment row back to its pledge.
    pub link_column: String,
    /// Payment-side fund label.
    pub payment_fund_column: String,
    /// Payment-side payment identifier, shared across split payments.
    pub payment_id_column: String,
}

impl Default for FundConfig {
    fn default() -> Self {
        Self {
            gift_column: "gift_id".into(),
            pledge_fund_column: "fund_id".into(),
            link_column: "usergiftid_pledge".into(),
            payment_fund_column: "fund".into(),
            payment_id_column: "paymentid".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report destination directory. Unset = current working directory.
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReportConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReportConfig =
            toml::from_str(input).map_err(|e| ReconError::Input(format!("config parse: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let required = [
            ("compare.marker_column", &self.compare.marker_column),
            ("compare.key_column", &self.compare.key_column),
            ("compare.amount_column", &self.compare.amount_column),
            ("funds.gift_column", &self.funds.gift_column),
            ("funds.pledge_fund_column", &self.funds.pledge_fund_column),
            ("funds.link_column", &self.funds.link_column),
            ("funds.payment_fund_column", &self.funds.payment_fund_column),
            ("funds.payment_id_column", &self.funds.payment_id_column),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(ReconError::Input(format!("config: {name} must not be empty")));
            }
        }

        if self.compare.key_column == self.compare.amount_column {
            return Err(ReconError::Input(
                "config: compare.key_column and compare.amount_column must differ".into(),
            ));
        }

        // The classifier's marker must resolve to the key column after renames,
        // otherwise the ledger table can never produce a join key.
        match self.compare.rename.get(&self.compare.marker_column) {
            Some(target) if *target == self.compare.key_column => Ok(()),
            _ => Err(ReconError::Input(format!(
                "config: compare.rename must map '{}' to '{}'",
                self.compare.marker_column, self.compare.key_column
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
