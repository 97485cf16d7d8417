//! Typed mirror of Figma's `GET /v1/files/:file_key/variables/local` payload.
//!
//! Modelled fields are the ones the dictionary builder reads, plus a
//! collection's `name` and `key` so recorded cassettes stay readable. Unknown
//! fields are ignored. Maps use [`IndexMap`] so response order survives
//! deserialization and the generated token files are stable between runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level response of the local variables endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVariablesResponse {
    /// HTTP status echoed by the API.
    #[serde(default = "default_status")]
    pub status: u16,
    /// Whether the API reported an error.
    #[serde(default)]
    pub error: bool,
    /// Variables and collections defined in (or used by) the file.
    pub meta: LocalVariablesMeta,
}

fn default_status() -> u16 {
    200
}

/// The `meta` object of a [`LocalVariablesResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalVariablesMeta {
    /// Variables keyed by variable id.
    #[serde(default)]
    pub variables: IndexMap<String, Variable>,
    /// Collections keyed by collection id.
    #[serde(default)]
    pub variable_collections: IndexMap<String, VariableCollection>,
}

/// A single Figma variable with its value for every mode of its collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// File-scoped variable id, e.g. `VariableID:1:2`.
    pub id: String,
    /// Slash separated name, e.g. `color/red/500`.
    pub name: String,
    /// Stable key shared across files that import this variable.
    #[serde(default)]
    pub key: String,
    /// Id of the owning collection.
    pub variable_collection_id: String,
    /// Type every mode value resolves to.
    pub resolved_type: ResolvedType,
    /// Value per mode id.
    #[serde(default)]
    pub values_by_mode: IndexMap<String, VariableValue>,
    /// `true` when the variable is defined in another file.
    #[serde(default)]
    pub remote: bool,
    /// Free-form description entered in Figma.
    #[serde(default)]
    pub description: String,
}

/// A collection groups variables and defines the modes they vary over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    /// Collection id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stable key shared across files.
    #[serde(default)]
    pub key: String,
    /// Modes in display order.
    #[serde(default)]
    pub modes: Vec<VariableMode>,
    /// `true` when the collection is defined in another file.
    #[serde(default)]
    pub remote: bool,
    /// Ids of member variables in display order.
    #[serde(default)]
    pub variable_ids: Vec<String>,
}

/// A named mode of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMode {
    /// Mode id referenced by `valuesByMode`.
    pub mode_id: String,
    /// Display name, e.g. `Light mode`.
    pub name: String,
}

/// The type a variable resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedType {
    /// `true` / `false`.
    Boolean,
    /// Any number.
    Float,
    /// Any string.
    String,
    /// An RGBA color.
    Color,
}

/// A variable's value in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// Reference to another variable.
    Alias(VariableAlias),
    /// RGBA color with channels in `0.0..=1.0`.
    Color(Rgba),
    /// Boolean literal.
    Boolean(bool),
    /// Numeric literal.
    Float(f64),
    /// String literal.
    String(String),
}

/// Alias payload, `{ "type": "VARIABLE_ALIAS", "id": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableAlias {
    /// Always `VARIABLE_ALIAS`.
    #[serde(rename = "type")]
    pub kind: AliasKind,
    /// Id of the aliased variable.
    pub id: String,
}

/// Discriminator of [`VariableAlias`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasKind {
    /// The only kind Figma emits.
    #[serde(rename = "VARIABLE_ALIAS")]
    VariableAlias,
}

/// RGBA color as sent by Figma.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel; absent means opaque.
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Variable {
    /// Key used to match this variable across files.
    ///
    /// Prefers the explicit `key`; falls back to the key embedded in
    /// imported ids (`VariableID:<key>/<node>`).
    #[must_use]
    pub fn match_key(&self) -> &str {
        if self.key.is_empty() {
            key_from_variable_id(&self.id).unwrap_or(&self.id)
        } else {
            &self.key
        }
    }
}

/// Extracts the library key from an imported variable id.
///
/// Imported ids have the form `VariableID:<key>/<node id>`; local ids
/// (`VariableID:1:2`) carry no key and yield `None`.
#[must_use]
pub fn key_from_variable_id(id: &str) -> Option<&str> {
    let rest = id.strip_prefix("VariableID:").unwrap_or(id);
    let (key, _) = rest.split_once('/')?;
    (!key.is_empty()).then_some(key)
}
