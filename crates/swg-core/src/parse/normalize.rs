use indexmap::IndexMap;

use super::operation::{RawPathItem, RawRequestBody, RawResponse, RequestBodyOrRef, ResponseOrRef};
use super::parameter::{ParameterOrRef, RawParameter};
use super::spec::{OpenApiDoc, RawDocument, SourceDocument, SwaggerDoc};
use crate::diagnostics::Diagnostics;
use crate::transform::name_normalizer::ref_name;

/// Reusable objects that operation-level `$ref`s may point at.
struct Shared<'a> {
    parameters: &'a IndexMap<String, RawParameter>,
    request_bodies: &'a IndexMap<String, RawRequestBody>,
    responses: &'a IndexMap<String, RawResponse>,
}

impl SourceDocument {
    pub fn version(&self) -> &str {
        match self {
            SourceDocument::Swagger(doc) => &doc.swagger,
            SourceDocument::OpenApi(doc) => &doc.openapi,
        }
    }

    /// Fold the dialect into the shape the resolvers consume.
    pub fn into_raw(self) -> RawDocument {
        match self {
            SourceDocument::Swagger(doc) => from_swagger(doc),
            SourceDocument::OpenApi(doc) => from_openapi(doc),
        }
    }
}

fn from_swagger(doc: SwaggerDoc) -> RawDocument {
    let SwaggerDoc {
        info,
        mut paths,
        definitions,
        parameters,
        responses,
        consumes,
        produces,
        ..
    } = doc;
    let request_bodies = IndexMap::new();
    let shared = Shared {
        parameters: &parameters,
        request_bodies: &request_bodies,
        responses: &responses,
    };
    let mut diagnostics = Diagnostics::new();

    for (url, item) in &mut paths {
        inline_references(url, item, &shared, &mut diagnostics);
        for op in item.operations_mut() {
            if op.consumes.is_empty() {
                op.consumes = consumes.clone();
            }
            if op.produces.is_empty() {
                op.produces = produces.clone();
            }
        }
    }

    RawDocument {
        info,
        definitions,
        paths,
        diagnostics,
    }
}

fn from_openapi(doc: OpenApiDoc) -> RawDocument {
    let OpenApiDoc {
        info,
        mut paths,
        components,
        ..
    } = doc;
    let components = components.unwrap_or_default();
    let shared = Shared {
        parameters: &components.parameters,
        request_bodies: &components.request_bodies,
        responses: &components.responses,
    };
    let mut diagnostics = Diagnostics::new();

    for (url, item) in &mut paths {
        inline_references(url, item, &shared, &mut diagnostics);
        for op in item.operations_mut() {
            if op.consumes.is_empty() {
                if let Some(RequestBodyOrRef::RequestBody(body)) = &op.request_body {
                    op.consumes = body.content.keys().cloned().collect();
                }
            }
            if op.produces.is_empty() {
                if let Some(ok) = op.responses.get("200").and_then(ResponseOrRef::as_response) {
                    op.produces = ok.content.keys().cloned().collect();
                }
            }
        }
    }

    RawDocument {
        info,
        definitions: components.schemas,
        paths,
        diagnostics,
    }
}

/// Merge path-level parameters into every operation and replace parameter,
/// request body and response references with the objects they point at.
fn inline_references(
    url: &str,
    item: &mut RawPathItem,
    shared: &Shared<'_>,
    diagnostics: &mut Diagnostics,
) {
    let path_level = resolve_parameters(url, &item.parameters, shared, diagnostics);
    item.parameters.clear();

    for op in item.operations_mut() {
        let own = resolve_parameters(url, &op.parameters, shared, diagnostics);
        op.parameters = merge_parameters(&path_level, own)
            .into_iter()
            .map(ParameterOrRef::Parameter)
            .collect();

        if let Some(RequestBodyOrRef::Ref { ref_path }) = &op.request_body {
            op.request_body = match shared.request_bodies.get(&ref_name(ref_path)) {
                Some(body) => Some(RequestBodyOrRef::RequestBody(body.clone())),
                None => {
                    diagnostics.warn(url, format!("unresolved request body reference `{ref_path}`"));
                    None
                }
            };
        }

        for (status, response) in op.responses.iter_mut() {
            if let ResponseOrRef::Ref { ref_path } = response {
                let target = match shared.responses.get(&ref_name(ref_path)) {
                    Some(resolved) => resolved.clone(),
                    None => {
                        diagnostics.warn(
                            url,
                            format!("unresolved {status} response reference `{ref_path}`"),
                        );
                        RawResponse::default()
                    }
                };
                *response = ResponseOrRef::Response(target);
            }
        }
    }
}

fn resolve_parameters(
    url: &str,
    params: &[ParameterOrRef],
    shared: &Shared<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<RawParameter> {
    params
        .iter()
        .filter_map(|p| match p {
            ParameterOrRef::Parameter(param) => Some(param.clone()),
            ParameterOrRef::Ref { ref_path } => {
                let found = shared.parameters.get(&ref_name(ref_path)).cloned();
                if found.is_none() {
                    diagnostics.warn(url, format!("unresolved parameter reference `{ref_path}`"));
                }
                found
            }
        })
        .collect()
}

/// Operation-level parameters override path-level ones with the same name and location.
fn merge_parameters(path_level: &[RawParameter], own: Vec<RawParameter>) -> Vec<RawParameter> {
    let mut merged = path_level.to_vec();
    for param in own {
        match merged
            .iter()
            .position(|p| p.name == param.name && p.location == param.location)
        {
            Some(pos) => merged[pos] = param,
            None => merged.push(param),
        }
    }
    merged
}
