//! Live adapter for the `FigmaApi` port using the Figma REST API.

use std::env;

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::figma::LocalVariablesResponse;
use crate::ports::figma::{FigmaApi, FigmaFuture};
use crate::ports::PortError;

const DEFAULT_FIGMA_API_BASE: &str = "https://api.figma.com";
const TOKEN_HEADER: &str = "X-Figma-Token";
/// Hostnames allowed to use plain http.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Failures of the live Figma client.
#[derive(Debug, Error)]
pub enum FigmaApiError {
    /// `FIGMA_ACCESS_TOKEN` is unset or empty.
    #[error("FIGMA_ACCESS_TOKEN environment variable not set")]
    MissingToken,
    /// `FIGMA_API_BASE` is not an acceptable URL.
    #[error("invalid FIGMA_API_BASE {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The request never produced a response.
    #[error("Figma API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Figma answered with a non-success status.
    #[error("Figma API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message reported by Figma, or the raw body.
        message: String,
    },
    /// The body was not a local variables payload.
    #[error("failed to parse Figma API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Connection settings for the Figma REST API.
#[derive(Debug, Clone)]
pub struct FigmaConfig {
    /// Personal access token sent as `X-Figma-Token`.
    pub access_token: String,
    /// API base, e.g. `https://api.figma.com`.
    pub base_url: Url,
}

impl FigmaConfig {
    /// Reads `FIGMA_ACCESS_TOKEN` and the optional `FIGMA_API_BASE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or the base URL is invalid.
    pub fn from_env() -> Result<Self, FigmaApiError> {
        let access_token = env::var("FIGMA_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(FigmaApiError::MissingToken)?;
        let base = env::var("FIGMA_API_BASE").unwrap_or_else(|_| DEFAULT_FIGMA_API_BASE.into());
        Ok(Self { access_token, base_url: validate_base_url(&base)? })
    }
}

/// Validates an API base URL.
///
/// `localhost` and `127.0.0.1` may use any scheme; every other host must
/// use https.
fn validate_base_url(base: &str) -> Result<Url, FigmaApiError> {
    let invalid = |reason: String| FigmaApiError::InvalidBaseUrl { url: base.into(), reason };

    let url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    let host = url.host_str().ok_or_else(|| invalid("missing host".into()))?;

    if LOCALHOST_DOMAINS.iter().any(|local| host.eq_ignore_ascii_case(local)) {
        return Ok(url);
    }
    if url.scheme() != "https" {
        return Err(invalid(format!("non-localhost hosts must use https, got {}://", url.scheme())));
    }
    Ok(url)
}

/// Error body returned by Figma. Older endpoints use `err`, newer ones `message`.
#[derive(Deserialize)]
struct FigmaErrorBody {
    message: Option<String>,
    err: Option<String>,
}

/// Live Figma client backed by `reqwest`.
pub struct LiveFigmaApi {
    client: Client,
    config: FigmaConfig,
}

impl LiveFigmaApi {
    /// Creates a client with the given settings.
    #[must_use]
    pub fn new(config: FigmaConfig) -> Self {
        Self { client: Client::new(), config }
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// See [`FigmaConfig::from_env`].
    pub fn from_env() -> Result<Self, FigmaApiError> {
        Ok(Self::new(FigmaConfig::from_env()?))
    }

    fn local_variables_url(&self, file_key: &str) -> String {
        format!(
            "{}/v1/files/{file_key}/variables/local",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn fetch(&self, file_key: &str) -> Result<LocalVariablesResponse, FigmaApiError> {
        let url = self.local_variables_url(file_key);
        debug!(%url, "requesting local variables");

        let response =
            self.client.get(&url).header(TOKEN_HEADER, &self.config.access_token).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<FigmaErrorBody>(&body)
                .ok()
                .and_then(|e| e.message.or(e.err))
                .unwrap_or(body);
            return Err(FigmaApiError::Status { status: status.as_u16(), message });
        }

        let parsed: LocalVariablesResponse = serde_json::from_str(&body)?;
        info!(
            file_key,
            variables = parsed.meta.variables.len(),
            collections = parsed.meta.variable_collections.len(),
            "fetched local variables"
        );
        Ok(parsed)
    }
}

impl FigmaApi for LiveFigmaApi {
    fn local_variables<'a>(&'a self, file_key: &'a str) -> FigmaFuture<'a> {
        Box::pin(async move { self.fetch(file_key).await.map_err(PortError::from) })
    }
}
