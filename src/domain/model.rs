use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Literal text swap applied to the template before placeholders are filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// Per-apartment values substituted into the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeContext {
    pub flat: String,
    pub date: String,
    pub time: String,
}

/// Everything needed before rendering: the trimmed template and the parsed apartments.
#[derive(Debug, Clone)]
pub struct NoticeBatch {
    pub template: String,
    pub apartments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedNotice {
    pub apartment: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub file_name: String,
    pub text: String,
    pub document: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RenderedBatch {
    pub notices: Vec<RenderedNotice>,
    /// Folder (relative to the output root) receiving the individual documents.
    pub output_folder: String,
    /// Archive file name (relative to the output root), with extension.
    pub archive_file: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub apartment: String,
    pub date: String,
    pub time: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub count: usize,
    pub output_dir: PathBuf,
    pub archive_path: PathBuf,
    pub documents: Vec<DocumentSummary>,
    pub dry_run: bool,
}

/// One line of `history.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: NaiveDateTime,
    pub count: usize,
    pub archive: String,
}
