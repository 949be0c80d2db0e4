//! Judgment recording and the review screen.

use std::sync::Arc;

use serde::Serialize;
use tauri::State;

use crate::core_state::CoreState;
use crate::models::{InspectionSession, ReportHeader, SessionSummary};

use super::NO_RUN;

/// Record a pass/fail judgment for one checklist item. Returns the updated
/// summary for the frontend's metrics row.
#[tauri::command]
pub async fn record_result(
    state: State<'_, Arc<CoreState>>,
    item_id: String,
    passed: bool,
) -> Result<SessionSummary, String> {
    let mut guard = state.write_run().map_err(|e| e.to_string())?;
    let run = guard.as_mut().ok_or(NO_RUN)?;

    run.store
        .record_result(&item_id, passed)
        .map_err(|e| e.to_string())?;

    tracing::info!(item_id = %item_id, passed, "Judgment recorded");
    Ok(run.store.summary())
}

/// Store the report header metadata (writer, reviewer, lot, IN.NO, date).
#[tauri::command]
pub async fn set_header(
    state: State<'_, Arc<CoreState>>,
    header: ReportHeader,
) -> Result<(), String> {
    let mut guard = state.write_run().map_err(|e| e.to_string())?;
    let run = guard.as_mut().ok_or(NO_RUN)?;
    run.store.set_header(header);
    Ok(())
}

/// Current counters for the metrics row.
#[tauri::command]
pub async fn get_summary(state: State<'_, Arc<CoreState>>) -> Result<SessionSummary, String> {
    let guard = state.read_run().map_err(|e| e.to_string())?;
    let run = guard.as_ref().ok_or(NO_RUN)?;
    Ok(run.store.summary())
}

/// One line of the confirmation table.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRow {
    pub number: usize,
    pub category: String,
    /// Truncated for the table; the full text stays on the form screen.
    pub description: String,
    /// `可` / `否`, or `None` while unjudged.
    pub judgment: Option<String>,
    pub has_photo: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewData {
    pub rows: Vec<ReviewRow>,
    pub summary: SessionSummary,
    pub phase: String,
}

const REVIEW_DESCRIPTION_CHARS: usize = 50;

/// Read-only snapshot for the confirmation screen. Marks the run reviewed.
#[tauri::command]
pub async fn get_review_data(state: State<'_, Arc<CoreState>>) -> Result<ReviewData, String> {
    let mut guard = state.write_run().map_err(|e| e.to_string())?;
    let run = guard.as_mut().ok_or(NO_RUN)?;

    let snapshot = run.store.review_snapshot();
    let rows = review_rows(&snapshot, run.store.items().as_slice());

    Ok(ReviewData {
        rows,
        summary: run.store.summary(),
        phase: run.store.phase().as_str().to_string(),
    })
}

fn review_rows(
    snapshot: &InspectionSession,
    items: &[&crate::models::ChecklistItem],
) -> Vec<ReviewRow> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let judgment = snapshot.results.get(&item.id).map(|result| {
                if result.passed {
                    "可".to_string()
                } else {
                    "否".to_string()
                }
            });
            ReviewRow {
                number: idx + 1,
                category: item.category.clone(),
                description: item.description.chars().take(REVIEW_DESCRIPTION_CHARS).collect(),
                judgment,
                has_photo: snapshot.attachments.contains_key(&item.id),
            }
        })
        .collect()
}
