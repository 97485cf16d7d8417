//! Figma API port for reading a file's local variables.

use std::future::Future;
use std::pin::Pin;

use super::PortError;
use crate::figma::LocalVariablesResponse;

/// Boxed future type alias used by [`FigmaApi`] to keep the trait dyn-compatible.
pub type FigmaFuture<'a> =
    Pin<Box<dyn Future<Output = Result<LocalVariablesResponse, PortError>> + Send + 'a>>;

/// Retrieves design data from Figma.
pub trait FigmaApi: Send + Sync {
    /// Fetches the local variables (and the remote variables they use) of
    /// the file identified by `file_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, not found, etc.)
    /// or the response cannot be decoded.
    fn local_variables<'a>(&'a self, file_key: &'a str) -> FigmaFuture<'a>;
}
