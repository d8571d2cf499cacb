use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::operation::{RawPathItem, RawRequestBody, RawResponse};
use super::parameter::RawParameter;
use super::schema::RawSchema;
use crate::diagnostics::Diagnostics;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
}

/// Accept `version: 1.0` as well as `version: "1.0"`.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDoc {
    pub swagger: String,

    #[serde(default)]
    pub info: Info,

    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, RawPathItem>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, RawSchema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, RawParameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, RawResponse>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
}

/// Reusable components of an OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, RawSchema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, RawParameter>,

    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RawRequestBody>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, RawResponse>,
}

/// An OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDoc {
    pub openapi: String,

    #[serde(default)]
    pub info: Info,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, RawPathItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

/// The two source dialects, as told apart by their version key.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDocument {
    Swagger(SwaggerDoc),
    OpenApi(OpenApiDoc),
}

/// The single document shape both resolvers work on. Whatever dialect the
/// source was written in has been folded away by the time one of these exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawDocument {
    pub info: Info,
    pub definitions: IndexMap<String, RawSchema>,
    pub paths: IndexMap<String, RawPathItem>,
    /// Entries dropped or left unresolved while reading the source.
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}
