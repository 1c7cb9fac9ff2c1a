//! CSV export of a ranked result set.
//!
//! The latest run is kept at `<EXPORT_DIR>/results.csv`. Writes go to a temp file in
//! the same directory and are renamed into place, so `/download` never sees a
//! half-written file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::screening::ranker::ResultSet;

pub const RESULTS_FILE: &str = "results.csv";
pub const CSV_HEADER: [&str; 3] = ["Resume", "Score", "Top Skills"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes `results` in rank order with columns `Resume, Score, Top Skills`.
pub fn to_csv(results: &ResultSet) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in results {
        let score = format!("{:.2}", record.similarity_score);
        let skills = record.matched_keywords.join(", ");
        writer.write_record([record.resume_name.as_str(), score.as_str(), skills.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

/// Replaces `<dir>/results.csv` with `results`. Creates `dir` if needed.
pub fn write_results(dir: &Path, results: &ResultSet) -> Result<PathBuf, ExportError> {
    let bytes = to_csv(results)?;
    std::fs::create_dir_all(dir)?;

    let target = dir.join(RESULTS_FILE);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
    Ok(target)
}

/// Reads the latest export, or `None` if no run has produced one yet.
pub fn read_results(dir: &Path) -> std::io::Result<Option<Vec<u8>>> {
    match std::fs::read(dir.join(RESULTS_FILE)) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
