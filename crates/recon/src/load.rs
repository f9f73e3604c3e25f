use std::collections::HashMap;
use std::path::Path;

use crate::error::ReconError;
use crate::model::Table;

// ---------------------------------------------------------------------------
// Submission validation
// ---------------------------------------------------------------------------

/// Validate a two-file submission before any parsing happens.
///
/// Both parent directories must exist, both files must exist with a `.csv`
/// extension (case-insensitive), and the two files must be distinct.
pub fn validate_inputs(first: &Path, second: &Path) -> Result<(), ReconError> {
    for path in [first, second] {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = parent {
            if !dir.is_dir() {
                return Err(ReconError::Input(format!(
                    "'{}' is not a valid file path",
                    path.display()
                )));
            }
        }
        let is_csv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if !is_csv {
            return Err(ReconError::Input(format!(
                "'{}' is not a .csv file",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(ReconError::Input(format!(
                "'{}' does not exist",
                path.display()
            )));
        }
    }

    if first == second {
        return Err(ReconError::Input(
            "the same file was submitted twice".into(),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a CSV file into a [`Table`], preserving header order and raw cells.
pub fn load_table(path: &Path) -> Result<Table, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ReconError::Io(e.to_string()))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let mut row = HashMap::new();
        for (i, column) in columns.iter().enumerate() {
            row.insert(column.clone(), record.get(i).unwrap_or("").to_string());
        }
        rows.push(row);
    }

    Ok(Table { columns, rows })
}
