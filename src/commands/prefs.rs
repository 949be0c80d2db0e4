//! Recipient preference commands.

use crate::config;
use crate::prefs::{self, RecipientPreference};

/// Last-used recipient addresses, restored into the mail multiselect.
#[tauri::command]
pub async fn get_recipient_preference() -> Result<Vec<String>, String> {
    Ok(prefs::load(&config::prefs_path()).selected_emails)
}

/// Remember a recipient selection. Empty selections never overwrite the
/// slot.
#[tauri::command]
pub async fn set_recipient_preference(emails: Vec<String>) -> Result<(), String> {
    if emails.is_empty() {
        return Ok(());
    }

    prefs::save(
        &config::prefs_path(),
        &RecipientPreference {
            selected_emails: emails,
        },
    )
    .map_err(|e| e.to_string())
}
