//! Live filesystem adapter using `std::fs`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ports::filesystem::FileSystem;
use crate::ports::PortError;

/// Live filesystem adapter backed by real disk I/O.
///
/// Relative paths are resolved against `root`.
#[derive(Debug, Clone)]
pub struct LiveFileSystem {
    root: PathBuf,
}

impl LiveFileSystem {
    /// Creates an adapter that resolves relative paths against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSystem for LiveFileSystem {
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %target.display(), bytes = contents.len(), "writing file");
        Ok(std::fs::write(target, contents)?)
    }
}
