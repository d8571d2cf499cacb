use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::ParameterOrRef;
use super::schema::RawSchema;
use crate::ir::HttpMethod;

/// A media type entry of a request body or response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawMediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RawSchema>,
}

/// A request body construct (newer dialect only).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, RawMediaType>,

    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RawRequestBody),
}

/// A response. The older dialect puts the schema directly on the response, the
/// newer one nests it under a media type in `content`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RawSchema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, RawMediaType>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, serde_json::Value>,
}

impl RawResponse {
    /// The response schema, wherever the dialect put it. Under `content` a JSON
    /// media type is preferred, then `*/*`.
    pub fn body_schema(&self) -> Option<&RawSchema> {
        if let Some(schema) = &self.schema {
            return Some(schema);
        }
        self.content
            .get("application/json")
            .or_else(|| {
                self.content
                    .iter()
                    .find(|(media, _)| media.contains("json"))
                    .map(|(_, mt)| mt)
            })
            .or_else(|| self.content.get("*/*"))
            .and_then(|mt| mt.schema.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(RawResponse),
}

impl ResponseOrRef {
    pub fn as_response(&self) -> Option<&RawResponse> {
        match self {
            ResponseOrRef::Response(r) => Some(r),
            ResponseOrRef::Ref { .. } => None,
        }
    }
}

/// One operation under a path and method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawOperation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    /// Media types accepted. Filled for both dialects during normalization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,

    /// Media types produced. Filled for both dialects during normalization.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// A path item, containing operations keyed by HTTP method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPathItem {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<RawOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<RawOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<RawOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<RawOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<RawOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<RawOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<RawOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<RawOperation>,
}

impl RawPathItem {
    /// Declared operations in a fixed method order.
    pub fn operations(&self) -> Vec<(HttpMethod, &RawOperation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }

    pub fn operations_mut(&mut self) -> impl Iterator<Item = &mut RawOperation> {
        [
            &mut self.get,
            &mut self.put,
            &mut self.post,
            &mut self.delete,
            &mut self.options,
            &mut self.head,
            &mut self.patch,
            &mut self.trace,
        ]
        .into_iter()
        .filter_map(Option::as_mut)
    }
}
