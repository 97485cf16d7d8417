//! Dictionary builder: Figma local variables → mode-keyed token trees.
//!
//! Every local collection contributes one payload per mode; payloads of
//! collections that share a mode name are merged. Variable names are split
//! on `/` to form token paths. Aliases become `{path}` references, resolved
//! against the same file first and then against an optional reference file
//! (the primitives) by variable key.

pub mod token;

use std::collections::HashMap;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::figma::{
    key_from_variable_id, LocalVariablesResponse, ResolvedType, Variable, VariableCollection,
    VariableValue,
};

pub use token::{Token, TokenGroup, TokenNode, TokenType, TokenValue};

/// Errors raised while converting a Figma response into a [`Dictionary`].
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// An alias points at a variable found in neither file.
    #[error("variable {variable:?} aliases unknown variable {target}")]
    UnresolvedAlias {
        /// Name of the aliasing variable.
        variable: String,
        /// Id of the missing alias target.
        target: String,
    },
    /// A literal does not match the variable's resolved type.
    #[error("variable {variable:?} is {expected:?} but has a value of another type in mode {mode:?}")]
    ValueMismatch {
        /// Name of the offending variable.
        variable: String,
        /// Declared type.
        expected: ResolvedType,
        /// Mode whose value mismatched.
        mode: String,
    },
    /// A variable has no value for one of its collection's modes.
    #[error("variable {variable:?} has no value for mode {mode:?}")]
    MissingValue {
        /// Name of the variable.
        variable: String,
        /// Mode lacking a value.
        mode: String,
    },
    /// A variable name has no usable path segment.
    #[error("variable {id} has an empty name")]
    EmptyName {
        /// Id of the variable.
        id: String,
    },
    /// A name segment contains a character that alias syntax reserves.
    #[error("variable {variable:?} has segment {segment:?}; `.`, `{{` and `}}` are not allowed")]
    ReservedCharacter {
        /// Name of the variable.
        variable: String,
        /// Offending segment.
        segment: String,
    },
    /// Two variables map to overlapping token paths.
    #[error("token path {path:?} is defined more than once")]
    PathConflict {
        /// Dotted path of the conflict.
        path: String,
    },
}

/// Token trees keyed by normalized mode name (e.g. `light mode`).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Dictionary {
    value: IndexMap<String, TokenGroup>,
}

impl Dictionary {
    /// Builds a dictionary from a local variables response.
    ///
    /// `reference` is the response of the file that owns the variables this
    /// file aliases remotely; pass `None` for self-contained files.
    ///
    /// # Errors
    ///
    /// Returns a [`DictionaryError`] when an alias cannot be resolved, a value
    /// does not match its declared type, or two variables collide.
    pub fn from_figma_api_response(
        response: &LocalVariablesResponse,
        reference: Option<&LocalVariablesResponse>,
    ) -> Result<Self, DictionaryError> {
        let resolver = AliasResolver::new(response, reference);
        let mut value: IndexMap<String, TokenGroup> = IndexMap::new();

        for collection in response.meta.variable_collections.values().filter(|c| !c.remote) {
            for mode in &collection.modes {
                value.entry(mode_key(&mode.name)).or_default();
            }

            for variable in collection_variables(response, collection) {
                let path = token_path(variable)?;

                for mode in &collection.modes {
                    let raw = variable.values_by_mode.get(&mode.mode_id).ok_or_else(|| {
                        DictionaryError::MissingValue {
                            variable: variable.name.clone(),
                            mode: mode.name.clone(),
                        }
                    })?;
                    let token = Token {
                        token_type: token_type(variable.resolved_type),
                        value: convert_value(variable, &mode.name, raw, &resolver)?,
                        description: Some(variable.description.trim())
                            .filter(|d| !d.is_empty())
                            .map(String::from),
                    };
                    value.entry(mode_key(&mode.name)).or_default().insert(&path, token)?;
                }
            }
        }

        for (mode, group) in &mut value {
            group.token_type = group.uniform_type();
            debug!(mode = %mode, tokens = group.token_count(), "built mode payload");
        }

        Ok(Self { value })
    }

    /// Payload of a mode, looked up by normalized name.
    #[must_use]
    pub fn mode(&self, name: &str) -> Option<&TokenGroup> {
        self.value.get(name)
    }

    /// Mode names in first-seen order.
    pub fn modes(&self) -> impl Iterator<Item = &str> {
        self.value.keys().map(String::as_str)
    }

}

/// Normalizes a Figma mode name into a dictionary key.
#[must_use]
pub fn mode_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Characters that delimit alias references and so cannot appear in a segment.
const RESERVED: &[char] = &['.', '{', '}'];

/// Splits a slash separated variable name into token path segments.
fn token_path(variable: &Variable) -> Result<Vec<String>, DictionaryError> {
    let path: Vec<String> = variable
        .name
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if path.is_empty() {
        return Err(DictionaryError::EmptyName { id: variable.id.clone() });
    }
    if let Some(segment) = path.iter().find(|s| s.contains(RESERVED)) {
        return Err(DictionaryError::ReservedCharacter {
            variable: variable.name.clone(),
            segment: segment.clone(),
        });
    }
    Ok(path)
}

/// Local variables of a collection: listed ids first, then stragglers.
fn collection_variables<'a>(
    response: &'a LocalVariablesResponse,
    collection: &'a VariableCollection,
) -> impl Iterator<Item = &'a Variable> {
    let variables = &response.meta.variables;
    let listed = collection.variable_ids.iter().filter_map(|id| variables.get(id));
    let unlisted = variables.values().filter(|v| {
        v.variable_collection_id == collection.id && !collection.variable_ids.contains(&v.id)
    });
    listed.chain(unlisted).filter(|v| !v.remote)
}

fn token_type(resolved: ResolvedType) -> TokenType {
    match resolved {
        ResolvedType::Color => TokenType::Color,
        ResolvedType::Float => TokenType::Number,
        ResolvedType::String => TokenType::String,
        ResolvedType::Boolean => TokenType::Boolean,
    }
}

fn convert_value(
    variable: &Variable,
    mode: &str,
    raw: &VariableValue,
    resolver: &AliasResolver<'_>,
) -> Result<TokenValue, DictionaryError> {
    let mismatch = || DictionaryError::ValueMismatch {
        variable: variable.name.clone(),
        expected: variable.resolved_type,
        mode: mode.to_string(),
    };

    match (variable.resolved_type, raw) {
        (_, VariableValue::Alias(alias)) => resolver
            .resolve(&alias.id)?
            .map(TokenValue::Reference)
            .ok_or_else(|| DictionaryError::UnresolvedAlias {
                variable: variable.name.clone(),
                target: alias.id.clone(),
            }),
        (ResolvedType::Color, VariableValue::Color(rgba)) => Ok(TokenValue::Color(
            csscolorparser::Color::new(rgba.r, rgba.g, rgba.b, rgba.a).to_hex_string(),
        )),
        (ResolvedType::Float, VariableValue::Float(n)) => Ok(TokenValue::Number(round4(*n))),
        (ResolvedType::String, VariableValue::String(s)) => Ok(TokenValue::String(s.clone())),
        (ResolvedType::Boolean, VariableValue::Boolean(b)) => Ok(TokenValue::Boolean(*b)),
        _ => Err(mismatch()),
    }
}

/// Rounds to four decimals; Figma stores floats as f32.
fn round4(n: f64) -> f64 {
    (n * 10_000.0).round() / 10_000.0
}

/// Maps alias target ids to token paths.
struct AliasResolver<'a> {
    local: &'a IndexMap<String, Variable>,
    reference_by_key: HashMap<&'a str, &'a Variable>,
    reference_by_id: Option<&'a IndexMap<String, Variable>>,
}

impl<'a> AliasResolver<'a> {
    fn new(
        response: &'a LocalVariablesResponse,
        reference: Option<&'a LocalVariablesResponse>,
    ) -> Self {
        let reference_by_key: HashMap<&str, &Variable> = reference
            .map(|r| {
                r.meta
                    .variables
                    .values()
                    .filter(|v| !v.remote)
                    .map(|v| (v.match_key(), v))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            local: &response.meta.variables,
            reference_by_key,
            reference_by_id: reference.map(|r| &r.meta.variables),
        }
    }

    fn resolve(&self, id: &str) -> Result<Option<Vec<String>>, DictionaryError> {
        let local = self.local.get(id);
        if let Some(variable) = local.filter(|v| !v.remote) {
            return token_path(variable).map(Some);
        }

        let key = local.map(Variable::match_key).or_else(|| key_from_variable_id(id));
        let from_reference = key
            .and_then(|k| self.reference_by_key.get(k).copied())
            .or_else(|| self.reference_by_id.and_then(|vars| vars.get(id)));
        if let Some(variable) = from_reference {
            return token_path(variable).map(Some);
        }

        // Imported variables keep their library name.
        local.map(token_path).transpose()
    }
}
