//! Test-only builder for minimal real `.xlsx` workbooks.
//!
//! Loader and projector tests need actual template archives, not mocks: the
//! loader goes through calamine and the projector through zip + quick-xml,
//! so the fixtures are genuine workbooks with content types, relationships,
//! a styles part, and one worksheet shaped like the lending-inspection
//! manual (title block up top, checklist window from row 11, pre-styled
//! empty result cell in column V).

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::report::layout::CellRef;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

// The sheet hangs off rId2 on purpose: locating it must go through the
// relationship table, not assume rId1 or sheet1 by name.
const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="貸出検査マニュアル" sheetId="1" r:id="rId2"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="游ゴシック"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf/></cellStyleXfs><cellXfs count="2"><xf/><xf applyAlignment="1"/></cellXfs></styleSheet>"#;

enum Cell {
    Inline(String),
    /// A formatted but valueless cell, serialized self-closing — how Excel
    /// leaves pre-styled result cells in the manual.
    StyledEmpty(u32),
}

pub struct TemplateSpec {
    cells: BTreeMap<CellRef, Cell>,
}

impl TemplateSpec {
    /// A manual-shaped template: title marker in A5, header labels in rows
    /// 7..=9 (the header *value* cells D7/P7/D8/P8/D9/P9 deliberately do not
    /// exist yet), checklist `(category, description)` pairs on consecutive
    /// rows from 11, and a pre-styled empty result cell at V11.
    pub fn with_items(items: &[(&str, &str)]) -> Self {
        let mut cells = BTreeMap::new();
        cells.insert(
            CellRef::parse("A5").unwrap(),
            Cell::Inline("貸出検査マニュアル".to_string()),
        );
        cells.insert(CellRef::parse("A7").unwrap(), Cell::Inline("IN.NO".to_string()));
        cells.insert(CellRef::parse("A8").unwrap(), Cell::Inline("作成者".to_string()));
        cells.insert(CellRef::parse("A9").unwrap(), Cell::Inline("検査日".to_string()));
        cells.insert(CellRef::parse("V11").unwrap(), Cell::StyledEmpty(1));

        for (i, (category, description)) in items.iter().enumerate() {
            let row = 11 + i as u32;
            if !category.is_empty() {
                cells.insert(CellRef::new(row, 0), Cell::Inline(category.to_string()));
            }
            if !description.is_empty() {
                cells.insert(CellRef::new(row, 3), Cell::Inline(description.to_string()));
            }
        }

        Self { cells }
    }

    fn sheet_xml(&self) -> String {
        let mut rows: BTreeMap<u32, Vec<(&CellRef, &Cell)>> = BTreeMap::new();
        for (cell_ref, cell) in &self.cells {
            rows.entry(cell_ref.row).or_default().push((cell_ref, cell));
        }

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
             <sheetData>",
        );
        for (row, cells) in rows {
            xml.push_str(&format!("<row r=\"{row}\">"));
            for (cell_ref, cell) in cells {
                match cell {
                    Cell::Inline(value) => {
                        let space = if value != value.trim() {
                            " xml:space=\"preserve\""
                        } else {
                            ""
                        };
                        xml.push_str(&format!(
                            "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t{space}>{}</t></is></c>",
                            escape(value)
                        ));
                    }
                    Cell::StyledEmpty(style) => {
                        xml.push_str(&format!("<c r=\"{cell_ref}\" s=\"{style}\"/>"));
                    }
                }
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

/// Serialize a spec into workbook bytes.
pub fn template_bytes(spec: &TemplateSpec) -> Vec<u8> {
    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let entries = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", WORKBOOK.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/styles.xml", STYLES.to_string()),
        ("xl/worksheets/sheet1.xml", spec.sheet_xml()),
    ];
    for (name, content) in entries {
        writer.start_file(name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Write a spec to `lending_manual.xlsx` inside a fresh temp dir.
pub fn template_file(spec: &TemplateSpec) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lending_manual.xlsx");
    std::fs::write(&path, template_bytes(spec)).unwrap();
    (dir, path)
}

/// Read one cell of a workbook's first sheet as text. `None` for absent or
/// valueless cells.
pub fn sheet_cell(path: &Path, a1: &str) -> Option<String> {
    use calamine::{open_workbook_auto, Data, Reader};

    let cell = CellRef::parse(a1).expect("valid A1 ref");
    let mut workbook = open_workbook_auto(path).expect("workbook opens");
    let range = workbook
        .worksheet_range_at(0)
        .expect("has a sheet")
        .expect("sheet readable");

    match range.get_value((cell.row - 1, cell.col)) {
        None | Some(Data::Empty) => None,
        Some(value) => Some(value.to_string()),
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
