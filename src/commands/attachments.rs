//! Photo upload command.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use tauri::State;

use crate::core_state::CoreState;

use super::NO_RUN;

#[derive(Debug, Clone, Serialize)]
pub struct PhotoStoredResult {
    pub item_id: String,
    /// Filename inside the photos directory, for the success toast.
    pub stored_file: String,
    pub stored_path: String,
}

/// Store one uploaded photo and link it to a checklist item.
///
/// The payload arrives base64-encoded from the upload widget and lands on
/// disk verbatim (no size or content validation here). The item id is
/// checked against the loaded checklist before anything is written.
#[tauri::command]
pub async fn attach_photo(
    state: State<'_, Arc<CoreState>>,
    item_id: String,
    file_name: String,
    data: String,
) -> Result<PhotoStoredResult, String> {
    let bytes = BASE64
        .decode(data.as_bytes())
        .map_err(|e| format!("Invalid photo payload: {e}"))?;

    let mut guard = state.write_run().map_err(|e| e.to_string())?;
    let run = guard.as_mut().ok_or(NO_RUN)?;

    if !run.store.contains_item(&item_id) {
        return Err(format!("Unknown checklist item: {item_id}"));
    }

    let attachment = state
        .attachments()
        .store(&item_id, &bytes, &file_name)
        .map_err(|e| e.to_string())?;
    let stored_path = attachment.stored_path.clone();

    if let Some(previous) = run
        .store
        .record_attachment(attachment)
        .map_err(|e| e.to_string())?
    {
        // Superseded file stays on disk; only the session pointer moves.
        tracing::debug!(
            item_id = %item_id,
            superseded = %previous.stored_path.display(),
            "Previous photo superseded"
        );
    }

    let stored_file = stored_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::info!(
        item_id = %item_id,
        file = %stored_file,
        size = bytes.len(),
        "Photo attached"
    );

    Ok(PhotoStoredResult {
        item_id,
        stored_file,
        stored_path: stored_path.to_string_lossy().into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_result_serializes() {
        let result = PhotoStoredResult {
            item_id: "item_3".into(),
            stored_file: "item_3_20250806_101500.jpg".into(),
            stored_path: "/home/inspector/Kensa/photos/item_3_20250806_101500.jpg".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("item_3_20250806_101500.jpg"));
        assert!(json.contains("\"item_id\":\"item_3\""));
    }

    #[test]
    fn base64_payload_roundtrip() {
        let payload = b"\xFF\xD8\xFFjpeg";
        let encoded = BASE64.encode(payload);
        assert_eq!(BASE64.decode(encoded.as_bytes()).unwrap(), payload);
    }
}
