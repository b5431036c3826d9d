//! Local filesystem session store.
//!
//! Layout:
//! ```text
//! {dir}/
//!   {session_id}.json
//!   .{session_id}.json.{uuid}.tmp   (only while a save is in flight)
//! ```
//!
//! Saves write a uniquely named temporary file next to the target and rename
//! it into place, so a reader sees either the previous log or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use twin_core::session::store::SessionStore;
use twin_types::chat::{Message, SessionId};
use twin_types::error::StoreError;

use super::{decode_log, encode_log};

/// Filesystem-backed session store rooted at one directory.
pub struct LocalSessionStore {
    dir: PathBuf,
}

impl LocalSessionStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file for a session.
    ///
    /// The session id is joined verbatim, so ids containing separators resolve
    /// outside a flat `{dir}/{id}.json` layout.
    pub fn log_path(&self, session_id: &SessionId) -> PathBuf {
        self.dir.join(session_id.storage_key())
    }

    fn temp_path(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::now_v7().simple()))
    }
}

impl SessionStore for LocalSessionStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Message>, StoreError> {
        let path = self.log_path(session_id);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No conversation log yet");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(StoreError::Io(format!(
                    "failed to read {}: {err}",
                    path.display()
                )));
            }
        };

        decode_log(&bytes)
    }

    async fn save(&self, session_id: &SessionId, messages: &[Message]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            StoreError::Io(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let path = self.log_path(session_id);
        let tmp = Self::temp_path(&path);
        let bytes = encode_log(messages)?;

        if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
            return Err(StoreError::Io(format!("failed to write {}: {e}", tmp.display())));
        }

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io(format!(
                "failed to move log into place at {}: {e}",
                path.display()
            )));
        }

        debug!(path = %path.display(), messages = messages.len(), "Conversation log saved");
        Ok(())
    }
}
