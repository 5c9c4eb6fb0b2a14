//! # Yuki Store
//!
//! Chat history persistence — one pretty-printed JSON file per
//! conversation, human-inspectable and compatible with the
//! `{"messages": [...]}` layout earlier clients wrote.
//!
//! The store owns no state besides the path: history lives in memory
//! for the process lifetime and is flushed after every completed turn.

use std::path::{Path, PathBuf};
use tracing::debug;
use yuki_core::error::StoreError;
use yuki_core::message::History;

/// File-backed storage for a single conversation.
pub struct ChatStore {
    path: PathBuf,
}

impl ChatStore {
    /// Create a store for the given chat file path. The file is not
    /// touched until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load history from disk.
    ///
    /// A missing file means a fresh conversation and yields an empty
    /// history. A file that exists but does not parse is an error —
    /// history is user data, and silently discarding it to start over
    /// is worse than failing loudly.
    pub fn load(&self) -> Result<History, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No chat file yet, starting empty");
                return Ok(History::new());
            }
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let history: History =
            serde_json::from_str(&content).map_err(|e| StoreError::ParseError {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), count = history.len(), "Chat history loaded");
        Ok(history)
    }

    /// Write the full history to disk, creating parent directories as
    /// needed.
    ///
    /// Writes to a temporary sibling file and renames it over the
    /// target, so a crash mid-write can never leave a truncated chat
    /// file behind — the previous version stays intact until the
    /// rename lands.
    pub fn save(&self, history: &History) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteError {
                path: self.path.display().to_string(),
                reason: format!("failed to create chat directory: {e}"),
            })?;
        }

        let json =
            serde_json::to_string_pretty(history).map_err(|e| StoreError::WriteError {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|e| StoreError::WriteError {
            path: tmp_path.display().to_string(),
            reason: e.to_string(),
        })?;

        std::fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::WriteError {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};
    use yuki_core::message::Message;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = ChatStore::new(dir.path().join("chat.json"));

        let mut history = History::new();
        history.push(Message::user("hello"));
        history.push(Message::assistant("hi there"));
        store.save(&history).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.messages[1].content, "hi there");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = ChatStore::new(dir.path().join("nope.json"));
        let history = store.load().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = ChatStore::new(dir.path().join("chats").join("deep").join("c.json"));
        store.save(&History::new()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_replaces_file_and_leaves_no_temp_behind() {
        let dir = tempdir().unwrap();
        let store = ChatStore::new(dir.path().join("chat.json"));

        let mut history = History::new();
        history.push(Message::user("first"));
        store.save(&history).unwrap();
        history.push(Message::assistant("second"));
        store.save(&history).unwrap();

        // Only the chat file itself remains; the staging file was
        // renamed over it.
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, ["chat.json"]);

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn corrupted_file_is_a_parse_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "this is not json").unwrap();

        let store = ChatStore::new(tmp.path());
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::ParseError { .. }));
    }

    #[test]
    fn loads_legacy_messages_layout() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{"messages":[{{"role":"user","content":"old chat"}}]}}"#
        )
        .unwrap();

        let store = ChatStore::new(tmp.path());
        let history = store.load().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages[0].content, "old chat");
    }
}
