use indexmap::IndexMap;
use serde::Serialize;

use super::property::VirtualProperty;
use crate::parse::parameter::ParameterLocation;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Lower-case method name, as used in documents and operation names.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Parameters of one operation split by location, required ones first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBuckets {
    pub path: Vec<VirtualProperty>,
    pub query: Vec<VirtualProperty>,
    pub body: Vec<VirtualProperty>,
    pub form_data: Vec<VirtualProperty>,
    pub header: Vec<VirtualProperty>,
}

impl ParameterBuckets {
    /// The bucket for a location. Cookies have none.
    pub fn bucket_mut(&mut self, location: ParameterLocation) -> Option<&mut Vec<VirtualProperty>> {
        match location {
            ParameterLocation::Path => Some(&mut self.path),
            ParameterLocation::Query => Some(&mut self.query),
            ParameterLocation::Body => Some(&mut self.body),
            ParameterLocation::FormData => Some(&mut self.form_data),
            ParameterLocation::Header => Some(&mut self.header),
            ParameterLocation::Cookie => None,
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &VirtualProperty> {
        self.path
            .iter()
            .chain(&self.query)
            .chain(&self.body)
            .chain(&self.form_data)
            .chain(&self.header)
    }

    pub fn is_empty(&self) -> bool {
        self.all().next().is_none()
    }
}

/// The `200` response of an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationResponse {
    #[serde(rename = "ref")]
    pub ref_name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    pub properties: Vec<VirtualProperty>,
}

/// A fully resolved API operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    /// Path with any literal query suffix removed.
    pub url: String,
    pub method: HttpMethod,
    pub parameters: ParameterBuckets,
    /// Media types the operation accepts.
    pub request_headers: Vec<String>,
    /// Media types the operation produces.
    pub response_headers: Vec<String>,
    pub response: OperationResponse,
    pub summary: String,
    pub description: String,
    pub tag: String,
    pub deprecated: bool,
}

/// Insertion-ordered `operationName → descriptor`. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OperationsIr {
    entries: IndexMap<String, OperationDescriptor>,
}

impl OperationsIr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub(crate) fn insert(&mut self, name: String, op: OperationDescriptor) {
        self.entries.insert(name, op);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OperationDescriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Operations grouped by tag, tags in first-seen order.
    pub fn by_tag(&self) -> IndexMap<&str, Vec<(&str, &OperationDescriptor)>> {
        let mut groups: IndexMap<&str, Vec<(&str, &OperationDescriptor)>> = IndexMap::new();
        for (name, op) in &self.entries {
            groups
                .entry(op.tag.as_str())
                .or_default()
                .push((name.as_str(), op));
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
