//! `figma-tokens generate` command.
//!
//! Fetches the primitive and admin token files from Figma, converts both
//! into token dictionaries, and writes one JSON file per token group and mode.

use std::env;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::cassette::config::CassetteConfig;
use crate::cassette::session::DEFAULT_CASSETTE_ROOT;
use crate::context::ServiceContext;
use crate::dictionary::{Dictionary, DictionaryError};
use crate::figma::LocalVariablesResponse;
use crate::ports::PortError;

/// Figma file holding the primitive (foundation) tokens.
pub const PRIMITIVE_FILE_KEY: &str = "hSDX8IwmRAPOTL4NWPwVCl";
/// Figma file holding the administration tokens.
pub const ADMIN_FILE_KEY: &str = "8X90GCcpIa4GllKCHA7qFM";

/// Light-mode primitive tokens.
pub const PRIMITIVES_PATH: &str = "./tokens/foundation/primitives.tokens.json";
/// Light-mode admin tokens.
pub const ADMIN_LIGHT_PATH: &str = "./tokens/administration/light.tokens.json";
/// Dark-mode admin tokens.
pub const ADMIN_DARK_PATH: &str = "./tokens/administration/dark.tokens.json";

const LIGHT_MODE: &str = "light mode";
const DARK_MODE: &str = "dark mode";

/// Environment variable that turns on cassette recording.
pub const RECORD_ENV: &str = "FIGMA_TOKENS_RECORD";

/// Failures of a generate run. Nothing is retried or rolled back.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Fetching a file's variables failed.
    #[error("failed to fetch local variables of file {file_key}: {source}")]
    Retrieval {
        /// File that could not be fetched.
        file_key: &'static str,
        /// Underlying port error.
        source: PortError,
    },
    /// A response could not be converted into tokens.
    #[error("failed to build token dictionary: {0}")]
    Dictionary(#[from] DictionaryError),
    /// A dictionary lacks a mode the outputs require.
    #[error("file {file_key} has no {mode:?} mode")]
    MissingMode {
        /// File whose dictionary lacks the mode.
        file_key: &'static str,
        /// Required mode.
        mode: &'static str,
    },
    /// A payload could not be serialized.
    #[error("failed to serialize tokens: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Writing an artifact failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Artifact path.
        path: &'static str,
        /// Underlying port error.
        source: PortError,
    },
}

/// Generates the token artifacts through the ports of a [`ServiceContext`].
pub struct GenerateArtifacts<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GenerateArtifacts<'a> {
    /// Creates the use case over the given context.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Runs the export.
    ///
    /// Both files are fetched concurrently and both fetches must succeed
    /// before anything is written. Writes are sequential; a failure part way
    /// leaves earlier files in place.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] describing the first failing step.
    pub async fn execute(&self) -> Result<(), GenerateError> {
        let (primitive_response, admin_response) =
            tokio::try_join!(self.fetch(PRIMITIVE_FILE_KEY), self.fetch(ADMIN_FILE_KEY))?;

        let primitive_dictionary = Dictionary::from_figma_api_response(&primitive_response, None)?;
        self.write_mode(&primitive_dictionary, PRIMITIVE_FILE_KEY, LIGHT_MODE, PRIMITIVES_PATH)?;

        let admin_dictionary =
            Dictionary::from_figma_api_response(&admin_response, Some(&primitive_response))?;
        self.write_mode(&admin_dictionary, ADMIN_FILE_KEY, LIGHT_MODE, ADMIN_LIGHT_PATH)?;
        self.write_mode(&admin_dictionary, ADMIN_FILE_KEY, DARK_MODE, ADMIN_DARK_PATH)?;

        Ok(())
    }

    async fn fetch(&self, file_key: &'static str) -> Result<LocalVariablesResponse, GenerateError> {
        info!(file_key, "fetching local variables");
        self.ctx
            .figma
            .local_variables(file_key)
            .await
            .map_err(|source| GenerateError::Retrieval { file_key, source })
    }

    fn write_mode(
        &self,
        dictionary: &Dictionary,
        file_key: &'static str,
        mode: &'static str,
        path: &'static str,
    ) -> Result<(), GenerateError> {
        let payload = dictionary
            .mode(mode)
            .ok_or(GenerateError::MissingMode { file_key, mode })?
            .without_type();
        let json = serde_json::to_string_pretty(&payload)?;

        self.ctx
            .fs
            .write(Path::new(path), &json)
            .map_err(|source| GenerateError::Write { path, source })?;
        info!(path, mode, tokens = payload.token_count(), "wrote token file");
        Ok(())
    }
}

/// Execute the `generate` command.
///
/// With `replay`, responses come from the Figma cassette of a recorded
/// session directory and the files are written below `out_dir`. Otherwise Figma is called live; setting `FIGMA_TOKENS_RECORD`
/// records the run under `.figma-tokens/cassettes/`.
///
/// # Errors
///
/// Returns an error string if the context cannot be set up or the export fails.
pub fn run(out_dir: &Path, replay: Option<&Path>) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    if let Some(dir) = replay {
        let config = CassetteConfig::from_session_dir(dir)?;
        let ctx = ServiceContext::replaying_from(&config, out_dir)?;
        return runtime.block_on(GenerateArtifacts::new(&ctx).execute()).map_err(|e| e.to_string());
    }

    if env::var_os(RECORD_ENV).is_some() {
        let (ctx, session) =
            ServiceContext::recording_at(out_dir, Path::new(DEFAULT_CASSETTE_ROOT))?;
        let result = runtime.block_on(GenerateArtifacts::new(&ctx).execute());

        // Adapters hold recorder references until the context is gone.
        drop(ctx);
        match session.finish() {
            Ok(dir) => info!(dir = %dir.display(), "recording saved"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
        return result.map_err(|e| e.to_string());
    }

    let ctx = ServiceContext::live(out_dir)?;
    runtime.block_on(GenerateArtifacts::new(&ctx).execute()).map_err(|e| e.to_string())
}
