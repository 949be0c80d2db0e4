//! Checklist loading from the inspection template workbook.
//!
//! The template is a hand-maintained `.xlsx` manual: a fixed window of rows
//! on the first sheet carries one inspectable line each, category in one
//! column and description in another. Everything else on the sheet (title
//! block, header area, signature boxes) is layout and is ignored here.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

use crate::models::ChecklistItem;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template could not be read: {0}")]
    Read(String),

    #[error("Template workbook has no sheets")]
    NoSheets,

    #[error("Invalid template window: {0}")]
    InvalidWindow(String),
}

/// The agreed region of the first sheet that holds checklist rows.
///
/// Rows are 1-based worksheet rows, columns 0-based. This is configuration
/// data: a template revision that moves the table is a window change, not a
/// code change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateWindow {
    pub first_row: u32,
    pub last_row: u32,
    pub category_col: u32,
    pub description_col: u32,
}

impl Default for TemplateWindow {
    /// The reference manual layout: rows 11..=45, category in column A,
    /// description in column D.
    fn default() -> Self {
        Self {
            first_row: 11,
            last_row: 45,
            category_col: 0,
            description_col: 3,
        }
    }
}

/// Load the checklist from the first sheet of the template workbook.
///
/// Pure read — the template file is never modified. Rows whose description is
/// empty after trimming are excluded. A template with zero qualifying rows is
/// a valid empty checklist, not an error; callers treat it as "nothing to
/// inspect".
///
/// Item ids derive from the row's 1-based ordinal inside the window, so the
/// same template always yields the same ids across re-loads.
pub fn load_checklist(
    path: &Path,
    window: &TemplateWindow,
) -> Result<Vec<ChecklistItem>, TemplateError> {
    if window.first_row == 0 || window.first_row > window.last_row {
        return Err(TemplateError::InvalidWindow(format!(
            "rows {}..={}",
            window.first_row, window.last_row
        )));
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| TemplateError::Read(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TemplateError::NoSheets)?
        .map_err(|e| TemplateError::Read(e.to_string()))?;

    let mut items = Vec::new();
    for (offset, row) in (window.first_row..=window.last_row).enumerate() {
        let category = cell_text(&range, row, window.category_col);
        let description = cell_text(&range, row, window.description_col);

        if description.trim().is_empty() {
            continue;
        }

        items.push(ChecklistItem {
            id: format!("item_{}", offset + 1),
            sequence_index: items.len() as u32,
            category: category.trim().to_string(),
            description: description.trim().to_string(),
        });
    }

    tracing::info!(
        template = %path.display(),
        rows = window.last_row - window.first_row + 1,
        items = items.len(),
        "Checklist loaded"
    );

    Ok(items)
}

/// Text of a cell at a 1-based worksheet row, rendered uniformly across cell
/// types. Missing cells are empty.
fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    range
        .get_value((row - 1, col))
        .map(cell_to_string)
        .unwrap_or_default()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
