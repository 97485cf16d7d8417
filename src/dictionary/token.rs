//! Token tree in the design-tokens JSON shape (`$type` / `$value`).

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use super::DictionaryError;

/// Category of a token, emitted as `$type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Hex color string.
    Color,
    /// Unitless number.
    Number,
    /// Arbitrary string.
    String,
    /// Boolean flag.
    Boolean,
}

/// A token's `$value`.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// `#rrggbb` or `#rrggbbaa`.
    Color(String),
    /// Numeric literal.
    Number(f64),
    /// String literal.
    String(String),
    /// Boolean literal.
    Boolean(bool),
    /// Path of another token, serialized as `{a.b.c}`.
    Reference(Vec<String>),
}

impl TokenValue {
    /// Renders a reference path in alias syntax.
    #[must_use]
    pub fn reference_syntax(path: &[String]) -> String {
        format!("{{{}}}", path.join("."))
    }
}

impl Serialize for TokenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenValue::Color(hex) => serializer.serialize_str(hex),
            TokenValue::Number(n) => serializer.serialize_f64(*n),
            TokenValue::String(s) => serializer.serialize_str(s),
            TokenValue::Boolean(b) => serializer.serialize_bool(*b),
            TokenValue::Reference(path) => {
                serializer.serialize_str(&TokenValue::reference_syntax(path))
            }
        }
    }
}

/// A single design token.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Token {
    /// Token category.
    #[serde(rename = "$type")]
    pub token_type: TokenType,
    /// Literal value or reference.
    #[serde(rename = "$value")]
    pub value: TokenValue,
    /// Description copied from Figma, omitted when empty.
    #[serde(rename = "$description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Either a token or a nested group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum TokenNode {
    /// Leaf token.
    Token(Token),
    /// Nested group.
    Group(TokenGroup),
}

/// A named set of tokens and groups, optionally carrying a shared `$type`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TokenGroup {
    /// Type shared by every token below this group.
    #[serde(rename = "$type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
    /// Children in insertion order.
    #[serde(flatten)]
    pub children: IndexMap<String, TokenNode>,
}

impl TokenGroup {
    /// Returns a copy of this group with its own `$type` removed.
    ///
    /// Nested groups and tokens are left untouched.
    #[must_use]
    pub fn without_type(&self) -> TokenGroup {
        TokenGroup { token_type: None, children: self.children.clone() }
    }

    /// Inserts `token` at `path`, creating intermediate groups.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::PathConflict`] when the path, or one of its
    /// prefixes, is already occupied by a token, or when the final segment is
    /// already a group.
    pub fn insert(&mut self, path: &[String], token: Token) -> Result<(), DictionaryError> {
        self.insert_at(path, 0, token)
    }

    fn insert_at(
        &mut self,
        path: &[String],
        depth: usize,
        token: Token,
    ) -> Result<(), DictionaryError> {
        let conflict = || DictionaryError::PathConflict { path: path[..=depth].join(".") };
        let segment = &path[depth];

        if depth + 1 == path.len() {
            if self.children.contains_key(segment) {
                return Err(conflict());
            }
            self.children.insert(segment.clone(), TokenNode::Token(token));
            return Ok(());
        }

        let child = self
            .children
            .entry(segment.clone())
            .or_insert_with(|| TokenNode::Group(TokenGroup::default()));
        match child {
            TokenNode::Group(group) => group.insert_at(path, depth + 1, token),
            TokenNode::Token(_) => Err(conflict()),
        }
    }

    /// Number of tokens below this group.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.children
            .values()
            .map(|node| match node {
                TokenNode::Token(_) => 1,
                TokenNode::Group(group) => group.token_count(),
            })
            .sum()
    }

    /// The single type shared by every token below this group, if any.
    #[must_use]
    pub fn uniform_type(&self) -> Option<TokenType> {
        let mut types = Vec::new();
        self.collect_types(&mut types);
        let first = *types.first()?;
        types.iter().all(|t| *t == first).then_some(first)
    }

    fn collect_types(&self, out: &mut Vec<TokenType>) {
        for node in self.children.values() {
            match node {
                TokenNode::Token(token) => out.push(token.token_type),
                TokenNode::Group(group) => group.collect_types(out),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn color(hex: &str) -> Token {
        Token { token_type: TokenType::Color, value: TokenValue::Color(hex.into()), description: None }
    }

    fn path(s: &str) -> Vec<String> {
        s.split('.').map(String::from).collect()
    }

    #[test]
    fn serializes_in_design_token_shape() {
        let mut group = TokenGroup::default();
        group.insert(&path("red.500"), color("#ff0000")).unwrap();
        group
            .insert(
                &path("brand"),
                Token {
                    token_type: TokenType::Color,
                    value: TokenValue::Reference(path("red.500")),
                    description: Some("Primary brand".into()),
                },
            )
            .unwrap();
        group.token_type = Some(TokenType::Color);

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(
            value,
            json!({
                "$type": "color",
                "red": { "500": { "$type": "color", "$value": "#ff0000" } },
                "brand": {
                    "$type": "color",
                    "$value": "{red.500}",
                    "$description": "Primary brand"
                }
            })
        );
    }

    #[test]
    fn without_type_drops_only_the_top_level_type() {
        let mut group = TokenGroup { token_type: Some(TokenType::Color), ..TokenGroup::default() };
        group.insert(&path("red"), color("#ff0000")).unwrap();
        group.insert(&path("blue"), color("#0000ff")).unwrap();

        let stripped = serde_json::to_value(group.without_type()).unwrap();
        assert_eq!(
            stripped,
            json!({
                "red": { "$type": "color", "$value": "#ff0000" },
                "blue": { "$type": "color", "$value": "#0000ff" }
            })
        );

        let mut original = serde_json::to_value(&group).unwrap();
        original.as_object_mut().unwrap().remove("$type");
        assert_eq!(stripped, original);
    }

    #[test]
    fn insert_rejects_token_under_token() {
        let mut group = TokenGroup::default();
        group.insert(&path("red"), color("#ff0000")).unwrap();
        let err = group.insert(&path("red.500"), color("#ee0000")).unwrap_err();
        assert!(matches!(err, DictionaryError::PathConflict { path } if path == "red"));
    }

    #[test]
    fn insert_rejects_token_over_group() {
        let mut group = TokenGroup::default();
        group.insert(&path("red.500"), color("#ff0000")).unwrap();
        let err = group.insert(&path("red"), color("#ee0000")).unwrap_err();
        assert!(matches!(err, DictionaryError::PathConflict { path } if path == "red"));
    }

    #[test]
    fn uniform_type_requires_agreement() {
        let mut group = TokenGroup::default();
        assert_eq!(group.uniform_type(), None);

        group.insert(&path("a.b"), color("#000000")).unwrap();
        assert_eq!(group.uniform_type(), Some(TokenType::Color));

        group
            .insert(
                &path("spacing"),
                Token {
                    token_type: TokenType::Number,
                    value: TokenValue::Number(4.0),
                    description: None,
                },
            )
            .unwrap();
        assert_eq!(group.uniform_type(), None);
        assert_eq!(group.token_count(), 2);
    }
}
