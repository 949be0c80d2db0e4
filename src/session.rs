//! In-memory state of one inspection run.
//!
//! The store is an explicit owned object: constructed when a checklist is
//! loaded, mutated through `&mut` by the command layer, discarded at run end.
//! There is no ambient session state and nothing here touches the disk.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{
    Attachment, ChecklistItem, InspectionResult, InspectionSession, ReportHeader, SessionPhase,
    SessionSummary,
};

#[derive(Error, Debug)]
pub enum SessionError {
    /// A result or attachment was recorded against an id the loaded checklist
    /// never produced — an integration defect, rejected rather than silently
    /// absorbed into the wrong row.
    #[error("Unknown checklist item: {0}")]
    UnknownItem(String),
}

/// Mutable per-run store of judgments, attachments, and header metadata.
pub struct SessionStore {
    /// Item identity snapshotted at run start. The checklist is read-only for
    /// the rest of the run; lookups never re-parse the template.
    items: HashMap<String, ChecklistItem>,
    order: Vec<String>,
    results: HashMap<String, InspectionResult>,
    attachments: HashMap<String, Attachment>,
    header: ReportHeader,
    phase: SessionPhase,
}

impl SessionStore {
    /// Create an empty session over a loaded checklist.
    pub fn new(checklist: &[ChecklistItem]) -> Self {
        Self {
            items: checklist
                .iter()
                .map(|item| (item.id.clone(), item.clone()))
                .collect(),
            order: checklist.iter().map(|item| item.id.clone()).collect(),
            results: HashMap::new(),
            attachments: HashMap::new(),
            header: ReportHeader::default(),
            phase: SessionPhase::Empty,
        }
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.contains_key(item_id)
    }

    /// Checklist items in sequence order.
    pub fn items(&self) -> Vec<&ChecklistItem> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    /// Record a pass/fail judgment for an item.
    ///
    /// Last-write-wins: re-judging overwrites, there is no history. Recording
    /// the same value twice has no additional effect. Unknown ids are
    /// rejected and leave the session untouched.
    pub fn record_result(&mut self, item_id: &str, passed: bool) -> Result<(), SessionError> {
        let item = self
            .items
            .get(item_id)
            .ok_or_else(|| SessionError::UnknownItem(item_id.to_string()))?;

        self.results.insert(
            item_id.to_string(),
            InspectionResult {
                item_id: item_id.to_string(),
                passed,
                category: item.category.clone(),
                description: item.description.clone(),
            },
        );
        self.phase = SessionPhase::InProgress;
        Ok(())
    }

    /// Link a stored attachment to its item, returning the superseded
    /// attachment if one existed. The superseded file is not deleted.
    pub fn record_attachment(
        &mut self,
        attachment: Attachment,
    ) -> Result<Option<Attachment>, SessionError> {
        if !self.items.contains_key(&attachment.item_id) {
            return Err(SessionError::UnknownItem(attachment.item_id));
        }
        let previous = self
            .attachments
            .insert(attachment.item_id.clone(), attachment);
        self.phase = SessionPhase::InProgress;
        Ok(previous)
    }

    pub fn set_header(&mut self, header: ReportHeader) {
        self.header = header;
    }

    pub fn header(&self) -> &ReportHeader {
        &self.header
    }

    /// Counters over the current results and attachments.
    pub fn summary(&self) -> SessionSummary {
        let passed_count = self.results.values().filter(|r| r.passed).count();
        SessionSummary {
            passed_count,
            failed_count: self.results.len() - passed_count,
            attached_count: self.attachments.len(),
        }
    }

    /// Read-only deep copy of the session. Callers never observe partial
    /// export-time mutation.
    pub fn snapshot(&self) -> InspectionSession {
        InspectionSession {
            results: self.results.clone(),
            attachments: self.attachments.clone(),
            header: self.header.clone(),
        }
    }

    /// Snapshot for the confirmation screen; marks the run `Reviewed`.
    pub fn review_snapshot(&mut self) -> InspectionSession {
        self.phase = SessionPhase::Reviewed;
        self.snapshot()
    }

    /// Phase bookkeeping after a successful export. Does not block further
    /// edits; the next recording returns the run to `InProgress`.
    pub fn mark_exported(&mut self) {
        self.phase = SessionPhase::Exported;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }
}
