use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ReconError;
use crate::model::CompareReport;

// ---------------------------------------------------------------------------
// Run timestamp
// ---------------------------------------------------------------------------

/// Second-resolution timestamp shared by all reports of one run.
///
/// Computed once and threaded explicitly through report writing, so the
/// two files of a run always carry the same stamp and separate runs never
/// collide (within second resolution).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp(String);

impl RunStamp {
    pub fn now() -> Self {
        Self(chrono::Local::now().format("%Y-%m-%d_%H:%M:%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Report writing
// ---------------------------------------------------------------------------

/// Serialize a compare report into `missing_report_<stamp>.csv` and
/// `differ_report_<stamp>.csv` inside `dir`. Returns the written paths.
pub fn write_compare_reports(
    report: &CompareReport,
    dir: &Path,
    stamp: &RunStamp,
) -> Result<(PathBuf, PathBuf), ReconError> {
    if !dir.is_dir() {
        return Err(ReconError::Io(format!(
            "'{}' is not a writable directory",
            dir.display()
        )));
    }

    let missing_path = dir.join(format!("missing_report_{stamp}.csv"));
    let differ_path = dir.join(format!("differ_report_{stamp}.csv"));

    let mut writer = csv::Writer::from_path(&missing_path)
        .map_err(|e| ReconError::Io(e.to_string()))?;
    writer
        .write_record(["project_id"])
        .map_err(|e| ReconError::Io(e.to_string()))?;
    for key in &report.missing {
        writer
            .write_record([key.as_str()])
            .map_err(|e| ReconError::Io(e.to_string()))?;
    }
    writer.flush().map_err(|e| ReconError::Io(e.to_string()))?;

    let mut writer = csv::Writer::from_path(&differ_path)
        .map_err(|e| ReconError::Io(e.to_string()))?;
    writer
        .write_record(["project_id", "variance"])
        .map_err(|e| ReconError::Io(e.to_string()))?;
    for (key, variance) in &report.variances {
        writer
            .write_record([key.as_str(), &format!("{variance:.2}")])
            .map_err(|e| ReconError::Io(e.to_string()))?;
    }
    writer.flush().map_err(|e| ReconError::Io(e.to_string()))?;

    Ok((missing_path, differ_path))
}
