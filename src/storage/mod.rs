use std::fs;
use std::path::Path;

use crate::error::ReportError;
use crate::report::RunReport;

/// Write `report` as pretty JSON to `path`, creating parent directories.
pub fn save_report(path: &Path, report: &RunReport) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let raw = serde_json::to_string_pretty(report)?;
    fs::write(path, raw).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "report written");
    Ok(())
}
