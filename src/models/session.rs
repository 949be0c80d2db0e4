use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A recorded judgment for one checklist item.
///
/// Category and description are snapshotted from the checklist item at record
/// time so the review screen and the report never depend on re-reading the
/// template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionResult {
    pub item_id: String,
    pub passed: bool,
    pub category: String,
    pub description: String,
}

/// A stored piece of photo evidence linked to a checklist item.
///
/// The session holds at most one current attachment per item; a newer upload
/// replaces the pointer but the superseded file stays on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub item_id: String,
    pub stored_path: PathBuf,
    pub captured_at: NaiveDateTime,
}

/// Header metadata written onto the exported report.
///
/// Free-form strings supplied by the frontend. Writer and reviewer are
/// required at export time; `inspector_id` is carried for display but the
/// template has no cell for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub writer: String,
    pub reviewer: String,
    pub inspector_id: String,
    pub lot_no: String,
    pub in_no: String,
    pub inspection_date: String,
}

/// Read-only snapshot of one inspection run, as handed to the review screen
/// and the report projector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionSession {
    pub results: HashMap<String, InspectionResult>,
    pub attachments: HashMap<String, Attachment>,
    pub header: ReportHeader,
}

/// Counters for the review screen's metrics row.
///
/// Invariants: `passed_count + failed_count` equals the number of distinct
/// judged items, and `attached_count` the number of items with a current
/// attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub passed_count: usize,
    pub failed_count: usize,
    pub attached_count: usize,
}

/// Where one run currently stands.
///
/// `Exported` does not block further edits: recording after an export moves
/// the phase back to `InProgress`, and each export reads the live session at
/// call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Empty,
    InProgress,
    Reviewed,
    Exported,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::InProgress => "in_progress",
            Self::Reviewed => "reviewed",
            Self::Exported => "exported",
        }
    }
}
