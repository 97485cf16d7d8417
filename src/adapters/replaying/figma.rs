//! Replaying adapter for the `FigmaApi` port.

use std::sync::{Mutex, PoisonError};

use serde_json::json;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::figma::LocalVariablesResponse;
use crate::ports::{FigmaApi, FigmaFuture, PortError};

/// Serves recorded local variables responses from a cassette.
///
/// Each request is answered by the next recorded response for the same file
/// key, so concurrent fetches replay correctly whatever order they finished
/// in while recording.
pub struct ReplayingFigmaApi {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFigmaApi {
    /// Creates a replaying client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FigmaApi for ReplayingFigmaApi {
    fn local_variables<'a>(&'a self, file_key: &'a str) -> FigmaFuture<'a> {
        let output = self
            .replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_matching("figma", "local_variables", &json!({ "file_key": file_key }))
            .map(|interaction| interaction.output.clone());
        Box::pin(async move {
            match output {
                Ok(output) => {
                    replay_result::<LocalVariablesResponse>(output, "figma::local_variables")
                }
                Err(message) => Err(PortError::from(message)),
            }
        })
    }
}
