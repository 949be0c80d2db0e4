//! Session → report workbook projection.
//!
//! The template is opened fresh on every export and never mutated in place.
//! Every archive entry except the first worksheet is raw-copied verbatim
//! (same bytes, same compression); the worksheet itself goes through the
//! streaming patch in [`super::sheet`], which touches only the header cells
//! and the result column.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::models::{ChecklistItem, InspectionSession};

use super::layout::{CellRef, ReportLayout};
use super::sheet::{first_sheet_path, patch_worksheet};
use super::ReportError;

/// Project a session snapshot onto a copy of the template, producing a
/// timestamp-named workbook in `output_dir`.
///
/// Judged items get exactly one of the two marks at their result cell;
/// unjudged items leave their cell untouched. An item whose computed row
/// falls outside the template's result block is skipped with a warning —
/// boundary safety over spill-over into the signature area.
pub fn project(
    session: &InspectionSession,
    checklist: &[ChecklistItem],
    template_path: &Path,
    output_dir: &Path,
    layout: &ReportLayout,
) -> Result<PathBuf, ReportError> {
    if session.header.writer.trim().is_empty() {
        return Err(ReportError::MissingHeaderField("writer"));
    }
    if session.header.reviewer.trim().is_empty() {
        return Err(ReportError::MissingHeaderField("reviewer"));
    }

    let edits = collect_edits(session, checklist, layout);

    let file = std::fs::File::open(template_path)
        .map_err(|e| ReportError::Template(format!("{}: {e}", template_path.display())))?;
    let mut archive = ZipArchive::new(std::io::BufReader::new(file))
        .map_err(|e| ReportError::Template(format!("{}: {e}", template_path.display())))?;
    let sheet_path = first_sheet_path(&mut archive)?;

    std::fs::create_dir_all(output_dir)?;
    let out_path = fresh_output_path(output_dir);

    // Staged write: nothing appears at the final name until finish succeeds.
    let staging = tempfile::NamedTempFile::new_in(output_dir)?;
    let mut writer = ZipWriter::new(staging);

    for index in 0..archive.len() {
        let entry_name = archive.by_index_raw(index)?.name().to_string();
        if entry_name == sheet_path {
            let mut entry = archive.by_index(index)?;
            let mut xml = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut xml)?;
            drop(entry);

            let patched = patch_worksheet(&xml, &edits)?;
            writer.start_file(entry_name, SimpleFileOptions::default())?;
            writer.write_all(&patched)?;
        } else {
            let entry = archive.by_index_raw(index)?;
            writer.raw_copy_file(entry)?;
        }
    }

    let staging = writer.finish()?;
    staging
        .persist(&out_path)
        .map_err(|e| ReportError::Io(e.error))?;

    tracing::info!(
        output = %out_path.display(),
        results = session.results.len(),
        cells = edits.len(),
        "Report exported"
    );

    Ok(out_path)
}

/// Header and result-cell writes for one session, keyed by cell.
fn collect_edits(
    session: &InspectionSession,
    checklist: &[ChecklistItem],
    layout: &ReportLayout,
) -> BTreeMap<CellRef, String> {
    let mut edits: BTreeMap<CellRef, String> = layout
        .header_edits(&session.header)
        .into_iter()
        .collect();

    for item in checklist {
        let Some(result) = session.results.get(&item.id) else {
            continue;
        };
        match layout.result_cell(item.sequence_index) {
            Some(cell) => {
                edits.insert(cell, layout.mark(result.passed).to_string());
            }
            None => {
                tracing::warn!(
                    item_id = %item.id,
                    sequence_index = item.sequence_index,
                    row = layout.result_base_row + item.sequence_index,
                    "Checklist item falls outside the template result block; skipped"
                );
            }
        }
    }

    edits
}

/// Timestamp-named output path that never reuses an existing name, even for
/// exports landing in the same second.
fn fresh_output_path(output_dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let mut path = output_dir.join(format!("inspection_report_{stamp}.xlsx"));
    let mut counter = 1;
    while path.exists() {
        path = output_dir.join(format!("inspection_report_{stamp}_{counter}.xlsx"));
        counter += 1;
    }
    path
}
