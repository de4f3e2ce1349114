//! Saving the generated document
//!
//! The dump goes to the system clipboard first. When the clipboard cannot be
//! reached (no display server, headless session) it is written to a file
//! instead and the fallback is reported to the caller.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::PersistenceError;

/// Text sink used by [`save`]
pub trait Clipboard: Send {
    /// Replace the clipboard contents
    fn set(&mut self, contents: &str) -> Result<(), PersistenceError>;
}

/// System clipboard using arboard
///
/// The handle is opened lazily and kept for the lifetime of the app, since
/// some platforms drop the contents when the last handle goes away.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }
}

impl Clipboard for SystemClipboard {
    fn set(&mut self, contents: &str) -> Result<(), PersistenceError> {
        if self.inner.is_none() {
            let opened = arboard::Clipboard::new()
                .map_err(|e| PersistenceError::Clipboard(e.to_string()))?;
            self.inner = Some(opened);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(PersistenceError::Clipboard("clipboard not opened".to_string()));
        };
        clipboard
            .set_text(contents.to_string())
            .map_err(|e| PersistenceError::Clipboard(e.to_string()))
    }
}

/// Where a save ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Copied to the clipboard
    Clipboard,
    /// Clipboard failed, written to `path` instead
    File {
        /// File that was written
        path: PathBuf,
        /// Why the clipboard was skipped
        reason: String,
    },
}

impl std::fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveOutcome::Clipboard => write!(f, "config copied to clipboard"),
            SaveOutcome::File { path, reason } => {
                write!(f, "config written to {} ({})", path.display(), reason)
            }
        }
    }
}

/// Copy `text` to the clipboard, falling back to `fallback_path`
///
/// # Errors
///
/// Returns `PersistenceError::FileWrite` when both the clipboard and the
/// fallback file fail.
pub fn save<C: Clipboard + ?Sized>(
    text: &str,
    clipboard: &mut C,
    fallback_path: &Path,
) -> Result<SaveOutcome, PersistenceError> {
    let reason = match clipboard.set(text) {
        Ok(()) => {
            debug!(bytes = text.len(), "Copied config to clipboard");
            return Ok(SaveOutcome::Clipboard);
        }
        Err(e) => e.to_string(),
    };

    warn!(
        path = %fallback_path.display(),
        reason = %reason,
        "Clipboard unavailable, writing config to file"
    );

    std::fs::write(fallback_path, text).map_err(|source| PersistenceError::FileWrite {
        path: fallback_path.to_path_buf(),
        clipboard: reason.clone(),
        source,
    })?;

    Ok(SaveOutcome::File {
        path: fallback_path.to_path_buf(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingClipboard {
        contents: Option<String>,
    }

    impl Clipboard for RecordingClipboard {
        fn set(&mut self, contents: &str) -> Result<(), PersistenceError> {
            self.contents = Some(contents.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn set(&mut self, _contents: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Clipboard("no display".to_string()))
        }
    }

    #[test]
    fn test_save_to_clipboard() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf.yaml");
        let mut clipboard = RecordingClipboard::default();

        let outcome = save("rules: []\n", &mut clipboard, &path).unwrap();

        assert_eq!(outcome, SaveOutcome::Clipboard);
        assert_eq!(clipboard.contents.as_deref(), Some("rules: []\n"));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_falls_back_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf.yaml");

        let outcome = save("rules: []\n", &mut BrokenClipboard, &path).unwrap();

        match outcome {
            SaveOutcome::File { path: written, reason } => {
                assert_eq!(written, path);
                assert!(reason.contains("no display"));
            }
            other => panic!("expected file fallback, got {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "rules: []\n");
    }

    #[test]
    fn test_save_reports_both_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("conf.yaml");

        let err = save("x", &mut BrokenClipboard, &path).unwrap_err();

        assert!(matches!(err, PersistenceError::FileWrite { .. }));
        assert!(err.to_string().contains("no display"));
    }

    #[test]
    fn test_save_outcome_display() {
        let outcome = SaveOutcome::File {
            path: PathBuf::from("conf.yaml"),
            reason: "no display".to_string(),
        };
        assert_eq!(outcome.to_string(), "config written to conf.yaml (no display)");
    }
}
