//! Worksheet-level surgery on the template archive.
//!
//! The projector never rebuilds the workbook: it streams the original
//! worksheet XML through quick-xml and rewrites only the cells named in the
//! edit set. Every other node — rows, cells, merge ranges, print settings —
//! passes through untouched.
//!
//! Patched cells are emitted as inline strings (`t="inlineStr"`), keeping the
//! shared-strings table out of the picture; an existing cell's style
//! attribute is carried over.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use zip::ZipArchive;

use super::layout::CellRef;
use super::ReportError;

/// Edits grouped row → column → value, both ascending.
type RowEdits = BTreeMap<u32, BTreeMap<u32, String>>;

/// Apply the edit set to one worksheet's XML, returning the rewritten
/// document. Existing target cells are replaced in place; target cells or
/// rows the template lacks are inserted in order.
pub fn patch_worksheet(
    xml: &[u8],
    edits: &BTreeMap<CellRef, String>,
) -> Result<Vec<u8>, ReportError> {
    let mut pending: RowEdits = BTreeMap::new();
    for (cell, value) in edits {
        pending
            .entry(cell.row)
            .or_default()
            .insert(cell.col, value.clone());
    }

    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 512));
    let mut buf = Vec::new();

    loop {
        let ev = reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();
        match ev {
            Event::Start(e) if e.name().as_ref() == b"row" => {
                let row = row_number(&e)?;
                flush_rows_below(&mut writer, &mut pending, row)?;
                match pending.remove(&row) {
                    Some(cols) => patch_row(&mut reader, &mut writer, e, row, cols)?,
                    None => writer.write_event(Event::Start(e))?,
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"row" => {
                let row = row_number(&e)?;
                flush_rows_below(&mut writer, &mut pending, row)?;
                match pending.remove(&row) {
                    Some(cols) => {
                        writer.write_event(Event::Start(e))?;
                        write_cells(&mut writer, row, cols)?;
                        writer.write_event(Event::End(BytesEnd::new("row")))?;
                    }
                    None => writer.write_event(Event::Empty(e))?,
                }
            }
            Event::End(e) if e.name().as_ref() == b"sheetData" => {
                // Rows the template never had land at the end of the block.
                flush_rows_below(&mut writer, &mut pending, u32::MAX)?;
                writer.write_event(Event::End(e))?;
            }
            Event::Empty(e) if e.name().as_ref() == b"sheetData" && !pending.is_empty() => {
                // A sheet with no rows at all still takes the edits.
                writer.write_event(Event::Start(e))?;
                flush_rows_below(&mut writer, &mut pending, u32::MAX)?;
                writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
            }
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

/// Rewrite one `<row>` whose edit set is non-empty. Consumes reader events
/// up to and including the matching `</row>`.
fn patch_row(
    reader: &mut Reader<&[u8]>,
    writer: &mut Writer<Vec<u8>>,
    row_start: BytesStart<'static>,
    row: u32,
    mut cols: BTreeMap<u32, String>,
) -> Result<(), ReportError> {
    writer.write_event(Event::Start(row_start))?;
    let mut buf = Vec::new();

    loop {
        let ev = reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();
        match ev {
            Event::Start(c) if c.name().as_ref() == b"c" => match cell_of(&c)? {
                Some(cell) => {
                    write_cols_below(writer, row, &mut cols, cell.col)?;
                    if let Some(value) = cols.remove(&cell.col) {
                        let style = attr_value(&c, b"s")?;
                        // Drop the template cell's own content before
                        // emitting the replacement.
                        let mut skipped = Vec::new();
                        reader.read_to_end_into(QName(b"c"), &mut skipped)?;
                        write_inline_cell(writer, cell, style.as_deref(), &value)?;
                    } else {
                        writer.write_event(Event::Start(c))?;
                    }
                }
                None => writer.write_event(Event::Start(c))?,
            },
            Event::Empty(c) if c.name().as_ref() == b"c" => match cell_of(&c)? {
                Some(cell) => {
                    write_cols_below(writer, row, &mut cols, cell.col)?;
                    if let Some(value) = cols.remove(&cell.col) {
                        let style = attr_value(&c, b"s")?;
                        write_inline_cell(writer, cell, style.as_deref(), &value)?;
                    } else {
                        writer.write_event(Event::Empty(c))?;
                    }
                }
                None => writer.write_event(Event::Empty(c))?,
            },
            Event::End(e) if e.name().as_ref() == b"row" => {
                let leftover = std::mem::take(&mut cols);
                write_cells(writer, row, leftover)?;
                writer.write_event(Event::End(e))?;
                return Ok(());
            }
            Event::Eof => {
                return Err(ReportError::Template(
                    "worksheet XML ended inside a row".into(),
                ))
            }
            other => writer.write_event(other)?,
        }
    }
}

/// Emit whole `<row>` elements for every pending row strictly below `limit`.
fn flush_rows_below(
    writer: &mut Writer<Vec<u8>>,
    pending: &mut RowEdits,
    limit: u32,
) -> Result<(), ReportError> {
    while let Some((&next, _)) = pending.first_key_value() {
        if next >= limit {
            break;
        }
        let (row, cols) = pending.pop_first().expect("non-empty after first_key_value");
        let mut start = BytesStart::new("row");
        let r = row.to_string();
        start.push_attribute(("r", r.as_str()));
        writer.write_event(Event::Start(start))?;
        write_cells(writer, row, cols)?;
        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }
    Ok(())
}

/// Emit pending cells of one row with column strictly below `limit`.
fn write_cols_below(
    writer: &mut Writer<Vec<u8>>,
    row: u32,
    cols: &mut BTreeMap<u32, String>,
    limit: u32,
) -> Result<(), ReportError> {
    while let Some((&next, _)) = cols.first_key_value() {
        if next >= limit {
            break;
        }
        let (col, value) = cols.pop_first().expect("non-empty after first_key_value");
        write_inline_cell(writer, CellRef::new(row, col), None, &value)?;
    }
    Ok(())
}

fn write_cells(
    writer: &mut Writer<Vec<u8>>,
    row: u32,
    cols: BTreeMap<u32, String>,
) -> Result<(), ReportError> {
    for (col, value) in cols {
        write_inline_cell(writer, CellRef::new(row, col), None, &value)?;
    }
    Ok(())
}

fn write_inline_cell(
    writer: &mut Writer<Vec<u8>>,
    cell: CellRef,
    style: Option<&str>,
    value: &str,
) -> Result<(), ReportError> {
    let mut c = BytesStart::new("c");
    let r = cell.to_string();
    c.push_attribute(("r", r.as_str()));
    if let Some(s) = style {
        c.push_attribute(("s", s));
    }
    c.push_attribute(("t", "inlineStr"));

    writer.write_event(Event::Start(c))?;
    writer.write_event(Event::Start(BytesStart::new("is")))?;
    writer.write_event(Event::Start(BytesStart::new("t")))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new("t")))?;
    writer.write_event(Event::End(BytesEnd::new("is")))?;
    writer.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

// ── First-sheet location ────────────────────────────────────────────────────

/// Archive path of the workbook's first sheet, resolved through
/// `xl/workbook.xml` and its relationship part. The first sheet is whatever
/// the workbook lists first, not necessarily `sheet1.xml`.
pub fn first_sheet_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<String, ReportError> {
    let workbook_xml = read_entry(archive, "xl/workbook.xml")?;
    let rid = first_sheet_rid(&workbook_xml)?;
    let rels_xml = read_entry(archive, "xl/_rels/workbook.xml.rels")?;
    let target = relationship_target(&rels_xml, &rid)?;

    Ok(match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    })
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, ReportError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|_| ReportError::Template(format!("{name} missing from template archive")))?;
    let mut data = Vec::new();
    entry.read_to_end(&mut data)?;
    Ok(data)
}

fn first_sheet_rid(xml: &[u8]) -> Result<String, ReportError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"sheet" => {
                return attr_value(&e, b"r:id")?.ok_or_else(|| {
                    ReportError::Template("workbook sheet entry has no relationship id".into())
                });
            }
            Event::Eof => {
                return Err(ReportError::Template("workbook.xml lists no sheets".into()))
            }
            _ => {}
        }
        buf.clear();
    }
}

fn relationship_target(xml: &[u8], rid: &str) -> Result<String, ReportError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Relationship" => {
                if attr_value(&e, b"Id")?.as_deref() == Some(rid) {
                    return attr_value(&e, b"Target")?.ok_or_else(|| {
                        ReportError::Template(format!("relationship {rid} has no target"))
                    });
                }
            }
            Event::Eof => {
                return Err(ReportError::Template(format!(
                    "workbook relationship {rid} not found"
                )))
            }
            _ => {}
        }
        buf.clear();
    }
}

// ── Attribute helpers ───────────────────────────────────────────────────────

fn attr_value(start: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ReportError> {
    for attr in start.attributes() {
        let attr = attr
            .map_err(|e| ReportError::Template(format!("bad worksheet attribute: {e}")))?;
        if attr.key.as_ref() == name {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}

fn row_number(row: &BytesStart<'_>) -> Result<u32, ReportError> {
    let r = attr_value(row, b"r")?
        .ok_or_else(|| ReportError::Template("worksheet row without r attribute".into()))?;
    r.parse()
        .map_err(|_| ReportError::Template(format!("bad row number: {r}")))
}

fn cell_of(cell: &BytesStart<'_>) -> Result<Option<CellRef>, ReportError> {
    match attr_value(cell, b"r")? {
        Some(r) => CellRef::parse(&r)
            .map(Some)
            .ok_or(ReportError::BadCellRef(r)),
        None => Ok(None),
    }
}
