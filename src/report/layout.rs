//! The template's cell geography, as data.
//!
//! Every coordinate the projector writes lives in this one table; a template
//! revision is a data change here, not a change to the writer code.

use std::fmt;

use crate::models::ReportHeader;

/// A single worksheet cell. `row` is the 1-based worksheet row, `col` the
/// 0-based column index (A = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse A1 notation ("D8", "AB12"). Returns `None` for anything else.
    pub fn parse(a1: &str) -> Option<Self> {
        let letters_len = a1.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        if letters_len == 0 || letters_len == a1.len() {
            return None;
        }
        let (letters, digits) = a1.split_at(letters_len);

        let mut col: u32 = 0;
        for c in letters.chars() {
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        }
        let row: u32 = digits.parse().ok()?;
        if row == 0 {
            return None;
        }
        Some(Self { row, col: col - 1 })
    }

    /// Column letters ("A", "V", "AB").
    pub fn col_letters(&self) -> String {
        let mut n = self.col + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col_letters(), self.row)
    }
}

/// Field → coordinate mapping for the report template.
///
/// Header cells carry free-form strings; each judged checklist item gets
/// exactly one of the two marks in the result column at
/// `result_base_row + sequence_index`.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub writer_cell: CellRef,
    pub reviewer_cell: CellRef,
    /// The inspection date appears twice, once under each signature box.
    pub date_cells: [CellRef; 2],
    pub in_no_cell: CellRef,
    pub lot_no_cell: CellRef,
    /// 0-based column of the result cells.
    pub result_col: u32,
    /// First worksheet row of the result block.
    pub result_base_row: u32,
    /// Last worksheet row the projector may write a result into. Items whose
    /// computed row falls past this are skipped, never spilled into the
    /// signature area below the block.
    pub result_last_row: u32,
    pub pass_mark: String,
    pub fail_mark: String,
}

impl Default for ReportLayout {
    /// The reference manual layout.
    fn default() -> Self {
        Self {
            writer_cell: CellRef::parse("D8").unwrap(),
            reviewer_cell: CellRef::parse("P8").unwrap(),
            date_cells: [CellRef::parse("D9").unwrap(), CellRef::parse("P9").unwrap()],
            in_no_cell: CellRef::parse("D7").unwrap(),
            lot_no_cell: CellRef::parse("P7").unwrap(),
            result_col: 21, // column V
            result_base_row: 11,
            result_last_row: 44,
            pass_mark: "☑可".to_string(),
            fail_mark: "☑否".to_string(),
        }
    }
}

impl ReportLayout {
    /// Header cell writes for a session's header, in template order.
    pub fn header_edits(&self, header: &ReportHeader) -> Vec<(CellRef, String)> {
        vec![
            (self.in_no_cell, header.in_no.clone()),
            (self.lot_no_cell, header.lot_no.clone()),
            (self.writer_cell, header.writer.clone()),
            (self.reviewer_cell, header.reviewer.clone()),
            (self.date_cells[0], header.inspection_date.clone()),
            (self.date_cells[1], header.inspection_date.clone()),
        ]
    }

    /// The result cell for a checklist item, or `None` when the item's row
    /// falls outside the result block.
    pub fn result_cell(&self, sequence_index: u32) -> Option<CellRef> {
        let row = self.result_base_row + sequence_index;
        if row > self.result_last_row {
            return None;
        }
        Some(CellRef::new(row, self.result_col))
    }

    pub fn mark(&self, passed: bool) -> &str {
        if passed {
            &self.pass_mark
        } else {
            &self.fail_mark
        }
    }
}
