//! Report export command.

use std::sync::Arc;

use serde::Serialize;
use tauri::State;

use crate::core_state::CoreState;
use crate::report;

use super::NO_RUN;

#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub output_path: String,
    pub file_name: String,
}

/// Snapshot the live session and project it onto a fresh copy of the
/// template. Each export is independent: the session stays editable and a
/// later export produces another file.
#[tauri::command]
pub async fn export_report(state: State<'_, Arc<CoreState>>) -> Result<ExportResult, String> {
    let mut guard = state.write_run().map_err(|e| e.to_string())?;
    let run = guard.as_mut().ok_or(NO_RUN)?;

    let snapshot = run.store.snapshot();
    let output_path = report::project(
        &snapshot,
        &run.checklist,
        &run.template_path,
        state.exports_dir(),
        state.layout(),
    )
    .map_err(|e| e.to_string())?;

    run.store.mark_exported();

    let file_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::info!(
        output = %output_path.display(),
        results = snapshot.results.len(),
        "Report export complete"
    );

    Ok(ExportResult {
        output_path: output_path.to_string_lossy().into_owned(),
        file_name,
    })
}
