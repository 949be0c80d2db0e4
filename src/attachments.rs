//! Photo evidence storage.
//!
//! Uploaded bytes are written verbatim — no re-encoding, no image validation
//! — into the photos directory under a name derived from the item id and the
//! capture timestamp. The manager hands back the stored path and does not
//! track which item currently owns it; linking is the session's job.

use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::models::Attachment;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Photo storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct AttachmentManager {
    root: PathBuf,
}

impl AttachmentManager {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store one uploaded file for a checklist item.
    ///
    /// Filename: `<item_id>_<YYYYmmdd_HHMMSS><ext>`, extension inferred from
    /// the original filename. Second-precision timestamps mean two uploads
    /// for the same item in the same second land on the same name; the
    /// manager does not version — the latest call is authoritative. A
    /// superseded upload's file stays on disk.
    pub fn store(
        &self,
        item_id: &str,
        bytes: &[u8],
        original_name: &str,
    ) -> Result<Attachment, StorageError> {
        let captured_at = Local::now();
        let stamp = captured_at.format("%Y%m%d_%H%M%S");
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        std::fs::create_dir_all(&self.root)?;

        let stored_path = self.root.join(format!("{item_id}_{stamp}{ext}"));
        std::fs::write(&stored_path, bytes)?;

        tracing::debug!(
            item_id,
            path = %stored_path.display(),
            size = bytes.len(),
            "Photo stored"
        );

        Ok(Attachment {
            item_id: item_id.to_string(),
            stored_path,
            captured_at: captured_at.naive_local(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, AttachmentManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = AttachmentManager::new(dir.path().join("photos"));
        (dir, manager)
    }

    #[test]
    fn store_writes_bytes_verbatim() {
        let (_dir, manager) = manager();
        let payload = b"\xFF\xD8\xFFfake jpeg payload";

        let attachment = manager.store("item_3", payload, "evidence.jpg").unwrap();

        let written = std::fs::read(&attachment.stored_path).unwrap();
        assert_eq!(written, payload);
    }

    #[test]
    fn filename_carries_item_id_and_extension() {
        let (_dir, manager) = manager();
        let attachment = manager.store("item_7", b"png bytes", "photo.png").unwrap();

        let name = attachment
            .stored_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("item_7_"));
        assert!(name.ends_with(".png"));
        assert_eq!(attachment.item_id, "item_7");
    }

    #[test]
    fn missing_extension_is_tolerated() {
        let (_dir, manager) = manager();
        let attachment = manager.store("item_1", b"bytes", "camera-upload").unwrap();

        let name = attachment
            .stored_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.starts_with("item_1_"));
        assert!(!name.contains('.'));
    }

    #[test]
    fn storage_area_created_on_first_use() {
        let (_dir, manager) = manager();
        assert!(!manager.root().exists());

        manager.store("item_1", b"bytes", "a.jpg").unwrap();
        assert!(manager.root().is_dir());
    }

    #[test]
    fn repeated_uploads_do_not_remove_prior_files() {
        let (_dir, manager) = manager();
        let first = manager.store("item_1", b"first", "a.jpg").unwrap();
        let second = manager.store("item_1", b"second", "b.jpg").unwrap();

        // Both files remain on disk whether or not the names collided.
        assert!(second.stored_path.exists());
        assert!(first.stored_path.exists());
    }

    #[test]
    fn unwritable_root_fails_with_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the storage directory should be forces create_dir_all
        // to fail.
        let blocked = dir.path().join("photos");
        std::fs::write(&blocked, b"in the way").unwrap();

        let manager = AttachmentManager::new(blocked);
        let err = manager.store("item_1", b"bytes", "a.jpg").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
