use std::collections::HashSet;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use serde::Serialize;

use crate::diagnostics::{Diagnostics, Resolved};
use crate::error::ConfigError;
use crate::ir::{
    HttpMethod, OperationDescriptor, OperationResponse, OperationsIr, ParameterBuckets,
};
use crate::parse::operation::{RawOperation, RawPathItem, RequestBodyOrRef, ResponseOrRef};
use crate::parse::parameter::RawParameter;

use super::name_normalizer::{
    base_name, camel_case, pascal_case, ref_name, starts_with_http_verb, upper_first,
};
use super::property_resolver::PropertyResolver;

pub const DEFAULT_CONJUNCTION: &str = "By";

const OCTET_STREAM: &str = "application/octet-stream";

/// Options steering operation naming and selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathOptions {
    /// Shell-style globs; a path must match every one of them.
    pub filter: Vec<String>,
    /// Take the tag from this non-empty path segment instead of the document.
    pub tag_index: Option<usize>,
    /// Joins a parent segment and a trailing path variable: `user_By_id`.
    pub conjunction: String,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            filter: Vec::new(),
            tag_index: None,
            conjunction: DEFAULT_CONJUNCTION.to_string(),
        }
    }
}

/// Resolves raw path items into an [`OperationsIr`].
#[derive(Debug)]
pub struct PathResolver {
    filter: GlobSet,
    tag_index: Option<usize>,
    conjunction: String,
}

/// An operation that survived filtering, before it is named.
struct Candidate<'a> {
    raw_url: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    method: HttpMethod,
    op: &'a RawOperation,
}

impl Candidate<'_> {
    fn subject(&self) -> String {
        format!("{} {}", self.method, self.raw_url)
    }

    fn explicit_id(&self) -> Option<&str> {
        self.op
            .operation_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl PathResolver {
    pub fn new(options: &PathOptions) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &options.filter {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::InvalidFilter {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
            builder.add(glob);
        }
        let filter = builder.build().map_err(|e| ConfigError::InvalidFilter {
            pattern: options.filter.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            filter,
            tag_index: options.tag_index,
            conjunction: options.conjunction.clone(),
        })
    }

    /// Whether `path` (query already stripped) passes every filter glob.
    pub fn accepts(&self, path: &str) -> bool {
        self.filter.is_empty() || self.filter.matches(path).len() == self.filter.len()
    }

    pub fn resolve(&self, paths: &IndexMap<String, RawPathItem>) -> Resolved<OperationsIr> {
        let mut diagnostics = Diagnostics::new();
        let mut ir = OperationsIr::new();

        let mut candidates = Vec::new();
        for (raw_url, item) in paths {
            let (path, query) = split_query(raw_url);
            if !self.accepts(path) {
                log::debug!("filtered out {raw_url}");
                continue;
            }
            for (method, op) in item.operations() {
                candidates.push(Candidate {
                    raw_url,
                    path,
                    query,
                    method,
                    op,
                });
            }
        }

        // Explicit ids are claimed up front so derived names never take them.
        let mut reserved = HashSet::new();
        let mut dropped = HashSet::new();
        for (index, candidate) in candidates.iter().enumerate() {
            let Some(id) = candidate.explicit_id() else {
                continue;
            };
            if !reserved.insert(id.to_string()) {
                diagnostics.error(
                    candidate.subject(),
                    format!("duplicate operationId `{id}`, operation dropped"),
                );
                dropped.insert(index);
            }
        }

        let mut taken = reserved.clone();
        for (index, candidate) in candidates.iter().enumerate() {
            if dropped.contains(&index) {
                continue;
            }

            let Some(tag) = self.tag_for(candidate) else {
                diagnostics.error(candidate.subject(), "operation has no tag, excluded");
                continue;
            };

            let name = match candidate.explicit_id() {
                Some(id) => id.to_string(),
                None => {
                    let derived =
                        derive_operation_name(candidate.path, candidate.query, &self.conjunction);
                    if derived.is_empty() {
                        diagnostics.error(
                            candidate.subject(),
                            "cannot derive an operation name, skipped",
                        );
                        continue;
                    }
                    let named = if starts_with_http_verb(&derived) {
                        derived
                    } else {
                        format!("{}{}", candidate.method.as_str(), upper_first(&derived))
                    };
                    let unique = unique_name(&named, &taken);
                    if unique != named {
                        diagnostics.warn(
                            candidate.subject(),
                            format!("operation name `{named}` already used, renamed to `{unique}`"),
                        );
                    }
                    taken.insert(unique.clone());
                    unique
                }
            };

            let descriptor = self.describe(candidate, &name, tag, &mut diagnostics);
            ir.insert(name, descriptor);
        }

        log::debug!("resolved {} operations from {} paths", ir.len(), paths.len());
        Resolved::new(ir, diagnostics)
    }

    fn tag_for(&self, candidate: &Candidate<'_>) -> Option<String> {
        match self.tag_index {
            Some(index) => segments(candidate.path).nth(index).map(str::to_string),
            None => candidate
                .op
                .tags
                .iter()
                .map(|t| t.trim())
                .find(|t| !t.is_empty())
                .map(str::to_string),
        }
    }

    fn describe(
        &self,
        candidate: &Candidate<'_>,
        name: &str,
        tag: String,
        diagnostics: &mut Diagnostics,
    ) -> OperationDescriptor {
        let op = candidate.op;
        let owner = pascal_case(name);

        OperationDescriptor {
            url: candidate.path.to_string(),
            method: candidate.method,
            parameters: resolve_parameters(&owner, op),
            request_headers: op.consumes.clone(),
            response_headers: op.produces.clone(),
            response: resolve_response(&owner, candidate, diagnostics),
            summary: op.summary.clone().unwrap_or_default(),
            description: op.description.clone().unwrap_or_default(),
            tag,
            deprecated: op.deprecated.unwrap_or(false),
        }
    }
}

/// `/pets?status=sold` → (`/pets`, `Some("status=sold")`).
pub fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    }
}

/// Name an operation after its path: `/user/{id}` with `By` → `userById`,
/// `/pets?status=sold` → `petsStatusSold`. Empty when nothing usable remains.
pub fn derive_operation_name(path: &str, query: Option<&str>, conjunction: &str) -> String {
    let segments: Vec<&str> = segments(path).collect();

    let mut base = match segments.split_last() {
        Some((last, rest)) => match path_variable(last) {
            Some(var) => match rest.last() {
                Some(parent) => {
                    let parent = path_variable(parent).unwrap_or(parent);
                    format!("{parent}_{conjunction}_{var}")
                }
                None => format!("{conjunction}_{var}"),
            },
            None => last.to_string(),
        },
        None => String::new(),
    };

    if let Some(first) = query.and_then(|q| q.split('&').next()).filter(|p| !p.is_empty()) {
        base.push('_');
        base.push_str(&first.replace([',', '='], "_"));
    }

    camel_case(&base)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn path_variable(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn unique_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    (2..)
        .map(|n| format!("{name}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

fn resolve_parameters(owner: &str, op: &RawOperation) -> ParameterBuckets {
    let mut params: Vec<&RawParameter> = op
        .parameters
        .iter()
        .filter_map(|p| p.as_parameter())
        .collect();
    params.sort_by_key(|p| !p.required);

    let mut resolver = PropertyResolver::scoped();
    let mut buckets = ParameterBuckets::default();
    for param in params {
        let Some(bucket) = buckets.bucket_mut(param.location) else {
            log::debug!("{owner}: ignoring {} parameter `{}`", param.location.as_str(), param.name);
            continue;
        };
        let schema = param.effective_schema();
        bucket.push(resolver.resolve_property(
            owner,
            &param.name,
            &schema,
            param.required,
            &IndexMap::new(),
        ));
    }

    if let Some(RequestBodyOrRef::RequestBody(body)) = &op.request_body {
        for (media, content) in &body.content {
            let Some(schema) = content.schema.as_ref().filter(|s| !s.is_empty_object()) else {
                log::debug!("{owner}: skipping request body `{media}` without properties");
                continue;
            };
            let name = if media == OCTET_STREAM {
                "file".to_string()
            } else {
                match schema.target_ref() {
                    Some(r) => base_name(&ref_name(r)).to_lowercase(),
                    None => "body".to_string(),
                }
            };
            if buckets.body.iter().any(|p| p.name == name) {
                continue;
            }
            let prop = resolver.resolve_property(owner, &name, schema, body.required, &IndexMap::new());
            buckets.body.push(prop);
        }
        buckets.body.sort_by_key(|p| !p.required);
    }

    buckets
}

fn resolve_response(
    owner: &str,
    candidate: &Candidate<'_>,
    diagnostics: &mut Diagnostics,
) -> OperationResponse {
    let Some(response) = candidate.op.responses.get("200").and_then(ResponseOrRef::as_response)
    else {
        diagnostics.warn(candidate.subject(), "no 200 response, response type left empty");
        return OperationResponse::default();
    };
    let Some(schema) = response.body_schema() else {
        return OperationResponse::default();
    };

    let resolved = PropertyResolver::scoped().resolve_type(
        &format!("{owner}Response"),
        schema,
        &IndexMap::new(),
    );
    OperationResponse {
        ref_name: resolved.ref_name,
        type_name: resolved.ty,
        properties: resolved.properties.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn paths(yaml: &str) -> IndexMap<String, RawPathItem> {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    fn resolve(yaml: &str, options: PathOptions) -> Resolved<OperationsIr> {
        PathResolver::new(&options).unwrap().resolve(&paths(yaml))
    }

    #[test]
    fn test_derive_operation_name() {
        assert_eq!(derive_operation_name("/user/{id}", None, "By"), "userById");
        assert_eq!(derive_operation_name("/pets", None, "By"), "pets");
        assert_eq!(
            derive_operation_name("/pets", Some("status=sold"), "By"),
            "petsStatusSold"
        );
        assert_eq!(derive_operation_name("/{org}/{id}", None, "With"), "orgWithId");
        assert_eq!(derive_operation_name("/{id}", None, "By"), "byId");
        assert_eq!(derive_operation_name("/", None, "By"), "");
    }

    #[test]
    fn test_split_query() {
        assert_eq!(split_query("/pets?a=b"), ("/pets", Some("a=b")));
        assert_eq!(split_query("/pets"), ("/pets", None));
    }

    #[test]
    fn test_method_prefix_and_verb_detection() {
        let resolved = resolve(
            r#"
/user/{id}:
  get:
    tags: [user]
  delete:
    tags: [user]
/getStatus:
  get:
    tags: [misc]
"#,
            PathOptions::default(),
        );
        let names: Vec<_> = resolved.value.names().collect();
        assert_eq!(names, ["getUserById", "deleteUserById", "getStatus"]);
    }

    #[test]
    fn test_explicit_ids_are_reserved() {
        let resolved = resolve(
            r#"
/pets:
  get:
    tags: [pet]
/pets?limit=1:
  post:
    tags: [pet]
    operationId: getPets
/other:
  get:
    tags: [pet]
    operationId: getPets
"#,
            PathOptions::default(),
        );
        let names: Vec<_> = resolved.value.names().collect();
        assert_eq!(names, ["getPets2", "getPets"]);
        assert_eq!(resolved.value.get("getPets").unwrap().url, "/pets");
        assert_eq!(resolved.diagnostics.with_severity(Severity::Error).count(), 1);
        let renames = resolved
            .diagnostics
            .with_severity(Severity::Warning)
            .filter(|d| d.message.contains("renamed"))
            .count();
        assert_eq!(renames, 1);
    }

    #[test]
    fn test_filter_requires_every_glob() {
        let doc = r#"
/pets/{id}:
  get:
    tags: [pet]
/pets/{id}/photos:
  get:
    tags: [pet]
/store:
  get:
    tags: [store]
"#;
        let options = PathOptions {
            filter: vec!["/pets/**".to_string(), "/*/*".to_string()],
            ..PathOptions::default()
        };
        let resolved = resolve(doc, options);
        let urls: Vec<_> = resolved.value.iter().map(|(_, op)| op.url.as_str()).collect();
        assert_eq!(urls, ["/pets/{id}"]);
    }

    #[test]
    fn test_invalid_glob_is_config_error() {
        let options = PathOptions {
            filter: vec!["/pets/[".to_string()],
            ..PathOptions::default()
        };
        assert!(matches!(
            PathResolver::new(&options),
            Err(ConfigError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_tag_index_overrides_tags() {
        let resolved = resolve(
            r#"
/api/store/order:
  get:
    tags: [ignored]
"#,
            PathOptions {
                tag_index: Some(1),
                ..PathOptions::default()
            },
        );
        assert_eq!(resolved.value.get("getOrder").unwrap().tag, "store");
    }

    #[test]
    fn test_cookie_parameters_ignored() {
        let resolved = resolve(
            r#"
/session:
  get:
    tags: [auth]
    parameters:
      - name: sid
        in: cookie
        schema:
          type: string
      - name: X-Trace
        in: header
        schema:
          type: string
"#,
            PathOptions::default(),
        );
        let op = resolved.value.get("getSession").unwrap();
        assert_eq!(op.parameters.all().count(), 1);
        assert_eq!(op.parameters.header[0].name, "X-Trace");
    }

    #[test]
    fn test_octet_stream_and_empty_bodies() {
        let resolved = resolve(
            r#"
/upload:
  post:
    tags: [files]
    requestBody:
      required: true
      content:
        application/octet-stream:
          schema:
            type: string
            format: binary
        application/x-www-form-urlencoded:
          schema:
            type: object
"#,
            PathOptions::default(),
        );
        let body = &resolved.value.get("postUpload").unwrap().parameters.body;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].name, "file");
        assert_eq!(body[0].format, "binary");
        assert!(body[0].required);
    }

    #[test]
    fn test_inline_response_properties_are_scoped() {
        let resolved = resolve(
            r#"
/stats:
  get:
    tags: [stats]
    responses:
      '200':
        description: ok
        schema:
          type: object
          properties:
            total:
              type: integer
"#,
            PathOptions::default(),
        );
        let response = &resolved.value.get("getStats").unwrap().response;
        assert_eq!(response.type_name, "GetStatsResponse");
        assert_eq!(response.properties[0].name, "total");
        assert!(resolved.diagnostics.is_empty());
    }

    #[test]
    fn test_response_owner_is_pascal_cased() {
        let resolved = resolve(
            r#"
/pets:
  get:
    tags: [pet]
    operationId: list-pets
    responses:
      '200':
        description: ok
        schema:
          type: object
          properties:
            next:
              type: string
"#,
            PathOptions::default(),
        );
        let response = &resolved.value.get("list-pets").unwrap().response;
        assert_eq!(response.type_name, "ListPetsResponse");
    }
}
