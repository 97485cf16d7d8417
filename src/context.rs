//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::figma::LiveFigmaApi;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::recording::RecordingFigmaApi;
use crate::adapters::replaying::ReplayingFigmaApi;
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::ports::figma::FigmaApi;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Filesystem the artifacts are written to.
    pub fs: Box<dyn FileSystem>,
    /// Figma REST API client.
    pub figma: Box<dyn FigmaApi>,
}

impl ServiceContext {
    /// Wires explicit adapters together.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, figma: Box<dyn FigmaApi>) -> Self {
        Self { fs, figma }
    }

    /// Creates a live context writing below `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the Figma client cannot be configured from the
    /// environment.
    pub fn live(out_dir: &Path) -> Result<Self, String> {
        let figma = LiveFigmaApi::from_env().map_err(|e| e.to_string())?;
        Ok(Self::new(Box::new(LiveFileSystem::new(out_dir)), Box::new(figma)))
    }

    /// Creates a live context whose Figma responses are captured by a new
    /// [`RecordingSession`] below `cassette_root`.
    ///
    /// Drop the context before calling [`RecordingSession::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the Figma client cannot be configured or the
    /// session directory cannot be created.
    pub fn recording_at(
        out_dir: &Path,
        cassette_root: &Path,
    ) -> Result<(Self, RecordingSession), String> {
        let live = Self::live(out_dir)?;
        let session = RecordingSession::in_dir(cassette_root)?;
        let ctx = Self::new(
            live.fs,
            Box::new(RecordingFigmaApi::new(live.figma, session.figma.clone())),
        );
        Ok((ctx, session))
    }

    /// Creates a context that serves Figma responses from a recorded
    /// cassette and writes the artifacts below `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig, out_dir: &Path) -> Result<Self, String> {
        Ok(Self::new(
            Box::new(LiveFileSystem::new(out_dir)),
            Box::new(ReplayingFigmaApi::new(config.load_figma()?)),
        ))
    }
}
