//! Shared application state.
//!
//! `CoreState` is the single state object managed by the Tauri runtime and
//! shared by every IPC command. The active inspection run lives behind an
//! `RwLock`: one run at a time, replaced wholesale when a new checklist is
//! loaded, `None` before the first load. Checklist, layout, and window
//! configuration are read-only after construction.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::attachments::AttachmentManager;
use crate::checklist::TemplateWindow;
use crate::config;
use crate::models::ChecklistItem;
use crate::report::ReportLayout;
use crate::session::SessionStore;

/// One loaded checklist and its live session.
pub struct InspectionRun {
    /// Source template, re-opened fresh at every export.
    pub template_path: PathBuf,
    /// Items in sequence order. Read-only for the run's duration.
    pub checklist: Vec<ChecklistItem>,
    pub store: SessionStore,
}

pub struct CoreState {
    run: RwLock<Option<InspectionRun>>,
    attachments: AttachmentManager,
    exports_dir: PathBuf,
    layout: ReportLayout,
    window: TemplateWindow,
}

impl CoreState {
    pub fn new() -> Self {
        Self::with_dirs(config::photos_dir(), config::exports_dir())
    }

    /// State rooted at explicit directories — tests point this at temp dirs.
    pub fn with_dirs(photos_dir: PathBuf, exports_dir: PathBuf) -> Self {
        Self {
            run: RwLock::new(None),
            attachments: AttachmentManager::new(photos_dir),
            exports_dir,
            layout: ReportLayout::default(),
            window: TemplateWindow::default(),
        }
    }

    /// Start a fresh run over a newly loaded checklist, replacing any
    /// previous run and its session.
    pub fn begin_run(
        &self,
        template_path: PathBuf,
        checklist: Vec<ChecklistItem>,
    ) -> Result<(), CoreError> {
        let store = SessionStore::new(&checklist);
        let mut guard = self.run.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Some(InspectionRun {
            template_path,
            checklist,
            store,
        });
        Ok(())
    }

    /// Acquire a read lock on the active run.
    pub fn read_run(&self) -> Result<RwLockReadGuard<'_, Option<InspectionRun>>, CoreError> {
        self.run.read().map_err(|_| CoreError::LockPoisoned)
    }

    /// Acquire a write lock on the active run. All recording operations and
    /// the snapshot-for-export go through here, one at a time in caller
    /// order.
    pub fn write_run(&self) -> Result<RwLockWriteGuard<'_, Option<InspectionRun>>, CoreError> {
        self.run.write().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    pub fn exports_dir(&self) -> &Path {
        &self.exports_dir
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    pub fn template_window(&self) -> &TemplateWindow {
        &self.window
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No checklist loaded. Load an inspection template first.")]
    NoActiveRun,
    #[error("Internal lock error")]
    LockPoisoned,
}
