//! Locates the cassette of a recorded session for replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// File name of the Figma port cassette inside a session directory.
pub const FIGMA_CASSETTE: &str = "figma.cassette.yaml";

/// Cassette file paths used by a replaying context.
///
/// Written files are never replayed: they are regenerated from the recorded
/// Figma responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CassetteConfig {
    /// Path to the Figma API port cassette file.
    pub figma: PathBuf,
}

impl CassetteConfig {
    /// Points at the Figma cassette of a recording session directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is not a directory or holds no Figma cassette.
    pub fn from_session_dir(dir: &Path) -> Result<Self, String> {
        if !dir.is_dir() {
            return Err(format!("Cassette directory not found: {}", dir.display()));
        }
        let figma = dir.join(FIGMA_CASSETTE);
        if !figma.is_file() {
            return Err(format!("No {FIGMA_CASSETTE} in {}", dir.display()));
        }
        Ok(Self { figma })
    }

    /// Loads the Figma cassette and creates a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_figma(&self) -> Result<CassetteReplayer, String> {
        Cassette::load(&self.figma).map(|cassette| CassetteReplayer::new(&cassette))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    fn fetch_interaction() -> Interaction {
        Interaction {
            seq: 0,
            port: "figma".into(),
            method: "local_variables".into(),
            input: json!({"file_key": "k"}),
            output: json!({"Ok": {"meta": {}}}),
        }
    }

    #[test]
    fn from_session_dir_finds_the_figma_cassette() {
        let dir = tempfile::tempdir().unwrap();
        write_cassette(&dir.path().join(FIGMA_CASSETTE), vec![fetch_interaction()]);

        let config = CassetteConfig::from_session_dir(dir.path()).unwrap();
        assert_eq!(config.figma, dir.path().join(FIGMA_CASSETTE));
    }

    #[test]
    fn from_session_dir_rejects_missing_directory() {
        let err = CassetteConfig::from_session_dir(Path::new("/nonexistent/session")).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn from_session_dir_requires_a_figma_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let err = CassetteConfig::from_session_dir(dir.path()).unwrap_err();
        assert!(err.starts_with("No figma.cassette.yaml"), "{err}");
    }

    #[test]
    fn load_figma_builds_a_replayer() {
        let dir = tempfile::tempdir().unwrap();
        write_cassette(&dir.path().join(FIGMA_CASSETTE), vec![fetch_interaction()]);

        let config = CassetteConfig::from_session_dir(dir.path()).unwrap();
        let mut replayer = config.load_figma().unwrap();

        let interaction =
            replayer.next_matching("figma", "local_variables", &json!({"file_key": "k"})).unwrap();
        assert_eq!(interaction.seq, 0);
    }

    #[test]
    fn load_figma_surfaces_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FIGMA_CASSETTE), "interactions: [not, a, cassette").unwrap();

        let config = CassetteConfig::from_session_dir(dir.path()).unwrap();
        let err = config.load_figma().err().unwrap();
        assert!(err.contains("Failed to parse cassette file"));
    }
}
