//! IPC commands exposed to the form frontend.
//!
//! Handlers stay thin: validate input, take the run lock, call into the
//! plain modules, translate errors into user-visible strings. The message a
//! command returns in `Err` is what the operator reads in the toast.

pub mod attachments;
pub mod checklist;
pub mod prefs;
pub mod report;
pub mod session;

use serde::Serialize;

/// Liveness probe for the frontend splash screen.
#[tauri::command]
pub fn health_check() -> HealthStatus {
    HealthStatus {
        status: "ok",
        version: crate::config::APP_VERSION,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Shared "no run yet" message — every session-touching command uses the
/// same wording so the frontend can pattern-match it.
pub(crate) const NO_RUN: &str = "No checklist loaded. Load an inspection template first.";
