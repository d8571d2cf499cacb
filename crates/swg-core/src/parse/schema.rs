use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The `type` keyword: a single token or, in newer documents, a list of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            TypeSet::Single(t) => vec![t.as_str()],
            TypeSet::Multiple(ts) => ts.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens().contains(&token)
    }

    /// Human readable form used in diagnostics, e.g. `array` or `[string, null]`.
    pub fn describe(&self) -> String {
        match self {
            TypeSet::Single(t) => t.clone(),
            TypeSet::Multiple(ts) => format!("[{}]", ts.join(", ")),
        }
    }
}

/// `required` is a list of property names on objects, but some documents put a
/// boolean on the property itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Required {
    Names(Vec<String>),
    Flag(bool),
}

impl Default for Required {
    fn default() -> Self {
        Required::Names(Vec::new())
    }
}

impl Required {
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Required::Names(names) => names.iter().any(|n| n == name),
            Required::Flag(_) => false,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Required::Flag(true))
    }

    fn is_empty(&self) -> bool {
        matches!(self, Required::Names(n) if n.is_empty())
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<RawSchema>),
}

/// A loosely typed schema object shared by both document dialects.
///
/// References are kept as a plain `$ref` field rather than a separate variant:
/// v2 documents routinely put siblings such as `description` next to `$ref`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSchema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, RawSchema>,

    #[serde(default, skip_serializing_if = "Required::is_empty")]
    pub required: Required,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RawSchema>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<RawSchema>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl RawSchema {
    /// The `$ref` this schema points at, directly or through its array items.
    pub fn target_ref(&self) -> Option<&str> {
        self.ref_path
            .as_deref()
            .or_else(|| self.items.as_ref().and_then(|i| i.ref_path.as_deref()))
    }

    /// An inline `object` (or untyped) schema with no properties and no reference.
    pub fn is_empty_object(&self) -> bool {
        let object_like = match &self.schema_type {
            Some(t) => t.contains("object"),
            None => self.items.is_none() && self.enum_values.is_empty(),
        };
        object_like
            && self.ref_path.is_none()
            && self.properties.is_empty()
            && self.all_of.is_empty()
            && !matches!(self.additional_properties, Some(AdditionalProperties::Schema(_)))
    }

    /// Collapse `allOf: [{ $ref }]`, the common way of attaching a description
    /// to a reference, into the reference itself.
    pub fn unwrap_single_all_of(&self) -> Option<RawSchema> {
        match self.all_of.as_slice() {
            [only] if self.ref_path.is_none() && self.properties.is_empty() => {
                let mut merged = only.clone();
                if merged.description.is_none() {
                    merged.description = self.description.clone();
                }
                Some(merged)
            }
            _ => None,
        }
    }
}
