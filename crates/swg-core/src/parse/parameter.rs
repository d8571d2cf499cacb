use serde::{Deserialize, Serialize};

use super::schema::{RawSchema, TypeSet};

/// Parameter location, covering both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
    FormData,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// An operation parameter. Newer documents describe the value with `schema`;
/// older ones put `type`, `format`, `items` and `enum` on the parameter itself
/// (except for body parameters, which always carry a `schema`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RawSchema>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RawSchema>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl RawParameter {
    /// The schema describing this parameter's value, whichever way it was declared.
    pub fn effective_schema(&self) -> RawSchema {
        let mut schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => RawSchema {
                schema_type: self.param_type.clone(),
                format: self.format.clone(),
                items: self.items.clone(),
                enum_values: self.enum_values.clone(),
                default_value: self.default_value.clone(),
                ..RawSchema::default()
            },
        };
        if schema.description.is_none() {
            schema.description = self.description.clone();
        }
        schema
    }
}

/// A reference or inline parameter. References are inlined when the document
/// is normalized, so resolvers only ever see the `Parameter` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(RawParameter),
}

impl ParameterOrRef {
    pub fn as_parameter(&self) -> Option<&RawParameter> {
        match self {
            ParameterOrRef::Parameter(p) => Some(p),
            ParameterOrRef::Ref { .. } => None,
        }
    }
}
