//! Recording session for the Figma port.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::config::FIGMA_CASSETTE;
use super::recorder::CassetteRecorder;

/// Parent of recording session directories, relative to cwd.
pub const DEFAULT_CASSETTE_ROOT: &str = ".figma-tokens/cassettes";

/// Owns the recorder of a recording session.
///
/// Only Figma responses are recorded: the written files follow from them,
/// and `--replay` regenerates those files below `--out`.
pub struct RecordingSession {
    /// Recorder for Figma API interactions.
    pub figma: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session in a timestamped directory below `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn in_dir(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let recorder = CassetteRecorder::new(
            output_dir.join(FIGMA_CASSETTE),
            format!("{timestamp}-figma"),
            get_commit_hash(),
        );

        Ok(Self { figma: Arc::new(Mutex::new(recorder)), output_dir })
    }

    /// Write the cassette to disk and return the session directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds the recorder or the
    /// cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.figma)
            .map_err(|_| "Recording adapter for figma still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for figma poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write figma cassette: {e}"))?;

        Ok(self.output_dir)
    }
}

/// Get the current git commit hash, or "unknown" with a warning if unavailable.
fn get_commit_hash() -> String {
    let hash = std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string());

    if let Some(h) = hash {
        h
    } else {
        warn!("could not get git commit hash, using 'unknown'");
        "unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Cassette;

    #[test]
    fn session_writes_the_figma_cassette_only() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::in_dir(root.path()).unwrap();

        session.figma.lock().unwrap().record(
            "figma",
            "local_variables",
            serde_json::json!({"file_key": "k"}),
            serde_json::json!({"Ok": {"meta": {}}}),
        );

        let dir = session.finish().unwrap();
        assert!(dir.starts_with(root.path()));

        let figma = Cassette::load(&dir.join(FIGMA_CASSETTE)).unwrap();
        assert_eq!(figma.interactions.len(), 1);
        assert!(!dir.join("fs.cassette.yaml").exists());
    }

    #[test]
    fn finish_fails_while_an_adapter_holds_the_recorder() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::in_dir(root.path()).unwrap();
        let _held = Arc::clone(&session.figma);

        let err = session.finish().unwrap_err();
        assert!(err.contains("figma still has references"));
    }

    #[test]
    fn get_commit_hash_returns_string() {
        assert!(!get_commit_hash().is_empty());
    }
}
