//! Recording adapter for the `FigmaApi` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{FigmaApi, FigmaFuture};

/// Records Figma API interactions while delegating to an inner implementation.
pub struct RecordingFigmaApi {
    inner: Box<dyn FigmaApi>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFigmaApi {
    /// Creates a new recording client wrapping the given implementation.
    pub fn new(inner: Box<dyn FigmaApi>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct FileKeyInput<'a> {
    file_key: &'a str,
}

impl FigmaApi for RecordingFigmaApi {
    fn local_variables<'a>(&'a self, file_key: &'a str) -> FigmaFuture<'a> {
        Box::pin(async move {
            let result = self.inner.local_variables(file_key).await;
            record_result(
                &self.recorder,
                "figma",
                "local_variables",
                &FileKeyInput { file_key },
                &result,
            );
            result
        })
    }
}
