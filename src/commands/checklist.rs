//! Checklist loading commands.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tauri::State;

use crate::core_state::CoreState;
use crate::models::ChecklistItem;

use super::NO_RUN;

/// Load result returned to the frontend. `item_count` of zero means
/// "nothing to inspect" — the frontend halts there instead of showing an
/// empty form.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistLoadResult {
    pub items: Vec<ChecklistItem>,
    pub item_count: usize,
}

/// Load the inspection checklist from a template workbook and begin a fresh
/// run. Any previous run and its session are discarded.
#[tauri::command]
pub async fn load_checklist(
    state: State<'_, Arc<CoreState>>,
    template_path: String,
) -> Result<ChecklistLoadResult, String> {
    let path = Path::new(&template_path);

    if !path.exists() {
        return Err(format!("Template not found: {template_path}"));
    }
    if !path.is_file() {
        return Err("Template path is not a regular file".into());
    }

    let items = crate::checklist::load_checklist(path, state.template_window())
        .map_err(|e| e.to_string())?;

    if items.is_empty() {
        tracing::warn!(template = %template_path, "Template yielded no checklist items");
    }

    state
        .begin_run(path.to_path_buf(), items.clone())
        .map_err(|e| e.to_string())?;

    tracing::info!(
        template = %template_path,
        items = items.len(),
        "Inspection run started"
    );

    Ok(ChecklistLoadResult {
        item_count: items.len(),
        items,
    })
}

/// Items of the active run, in sequence order.
#[tauri::command]
pub async fn get_checklist(
    state: State<'_, Arc<CoreState>>,
) -> Result<Vec<ChecklistItem>, String> {
    let guard = state.read_run().map_err(|e| e.to_string())?;
    let run = guard.as_ref().ok_or(NO_RUN)?;
    Ok(run.checklist.clone())
}
