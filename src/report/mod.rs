//! Report materialization: projecting a finished session onto a fresh copy
//! of the checklist template.

pub mod layout;
pub mod projector;
pub mod sheet;

pub use layout::{CellRef, ReportLayout};
pub use projector::project;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Template could not be read: {0}")]
    Template(String),

    #[error("Template archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Worksheet XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Required header field missing: {0}")]
    MissingHeaderField(&'static str),

    #[error("Malformed cell reference: {0}")]
    BadCellRef(String),
}
