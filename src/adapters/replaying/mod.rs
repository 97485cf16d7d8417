//! Replaying adapters that serve recorded interactions.

pub mod figma;

pub use figma::ReplayingFigmaApi;

use serde::de::DeserializeOwned;

use crate::ports::PortError;

/// Turns a recorded output back into a `Result`.
///
/// Mirror of `recording::record_result`: expects `{"Ok": <value>}` or
/// `{"Err": "message"}`. Lowercase keys and bare values are accepted for
/// hand-written cassettes.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = match output {
        serde_json::Value::Object(mut map) if map.contains_key("Ok") || map.contains_key("ok") => {
            map.remove("Ok").or_else(|| map.remove("ok")).unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}
