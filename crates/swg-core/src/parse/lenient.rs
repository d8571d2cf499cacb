//! Drops malformed entries from a document tree before it is deserialized into
//! the typed model. Each entry is tried on its own, innermost first, so a bad
//! property costs that property and a bad parameter costs that parameter.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::operation::{
    RawOperation, RawPathItem, RawRequestBody, RawResponse, RequestBodyOrRef, ResponseOrRef,
};
use super::parameter::{ParameterOrRef, RawParameter};
use super::schema::RawSchema;
use crate::diagnostics::Diagnostics;

const METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// Remove every entry of `document` that would fail to deserialize, recording
/// one error per removed entry.
pub fn prune_document(document: &mut Value, diagnostics: &mut Diagnostics) {
    let Some(root) = document.as_object_mut() else {
        return;
    };

    if let Some(definitions) = root.get_mut("definitions") {
        prune_schema_map(definitions, None, diagnostics);
    }
    if let Some(parameters) = root.get_mut("parameters") {
        prune_map::<RawParameter>(parameters, "parameter", diagnostics);
    }
    if let Some(responses) = root.get_mut("responses") {
        prune_map::<RawResponse>(responses, "response", diagnostics);
    }

    if let Some(components) = root.get_mut("components").and_then(Value::as_object_mut) {
        if let Some(schemas) = components.get_mut("schemas") {
            prune_schema_map(schemas, None, diagnostics);
        }
        if let Some(parameters) = components.get_mut("parameters") {
            prune_map::<RawParameter>(parameters, "parameter", diagnostics);
        }
        if let Some(bodies) = components.get_mut("requestBodies") {
            prune_map::<RawRequestBody>(bodies, "request body", diagnostics);
        }
        if let Some(responses) = components.get_mut("responses") {
            prune_map::<RawResponse>(responses, "response", diagnostics);
        }
    }

    if let Some(paths) = root.get_mut("paths").and_then(Value::as_object_mut) {
        prune_paths(paths, diagnostics);
    }
}

fn accepts<T: DeserializeOwned>(value: &Value) -> Result<(), serde_json::Error> {
    T::deserialize(value).map(|_| ())
}

/// Schemas keyed by name. `owner` is the enclosing schema for `properties`.
fn prune_schema_map(map: &mut Value, owner: Option<&str>, diagnostics: &mut Diagnostics) {
    let Some(map) = map.as_object_mut() else {
        return;
    };
    let subject = |name: &str| match owner {
        Some(owner) => format!("{owner}.{name}"),
        None => name.to_string(),
    };

    for (name, schema) in map.iter_mut() {
        prune_schema(schema, &subject(name.as_str()), diagnostics);
    }
    map.retain(|name, schema| match accepts::<RawSchema>(schema) {
        Ok(()) => true,
        Err(err) => {
            diagnostics.error(subject(name.as_str()), format!("malformed schema skipped: {err}"));
            false
        }
    });
}

/// Prune the nested schemas of one schema in place.
fn prune_schema(schema: &mut Value, subject: &str, diagnostics: &mut Diagnostics) {
    let Some(object) = schema.as_object_mut() else {
        return;
    };

    if let Some(properties) = object.get_mut("properties") {
        prune_schema_map(properties, Some(subject), diagnostics);
    }

    for key in ["items", "additionalProperties"] {
        let Some(nested) = object.get_mut(key) else {
            continue;
        };
        if nested.is_boolean() {
            continue;
        }
        prune_schema(nested, subject, diagnostics);
        if let Err(err) = accepts::<RawSchema>(nested) {
            diagnostics.error(subject, format!("malformed `{key}` skipped: {err}"));
            drop_key(object, key);
        }
    }

    if let Some(parts) = object.get_mut("allOf").and_then(Value::as_array_mut) {
        for part in parts.iter_mut() {
            prune_schema(part, subject, diagnostics);
        }
        parts.retain(|part| match accepts::<RawSchema>(part) {
            Ok(()) => true,
            Err(err) => {
                diagnostics.error(subject, format!("malformed `allOf` member skipped: {err}"));
                false
            }
        });
    }
}

/// Reusable objects keyed by name, such as shared parameters.
fn prune_map<T: DeserializeOwned>(map: &mut Value, kind: &str, diagnostics: &mut Diagnostics) {
    let Some(map) = map.as_object_mut() else {
        return;
    };
    map.retain(|name, value| match accepts::<T>(value) {
        Ok(()) => true,
        Err(err) => {
            diagnostics.error(name.as_str(), format!("malformed {kind} skipped: {err}"));
            false
        }
    });
}

fn prune_paths(paths: &mut Map<String, Value>, diagnostics: &mut Diagnostics) {
    for (url, item) in paths.iter_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        if let Some(params) = item.get_mut("parameters") {
            prune_parameters(params, url, diagnostics);
        }
        for method in METHODS {
            let Some(operation) = item.get_mut(method) else {
                continue;
            };
            let subject = format!("{} {url}", method.to_uppercase());
            prune_operation(operation, &subject, diagnostics);
            if let Err(err) = accepts::<RawOperation>(operation) {
                diagnostics.error(subject, format!("malformed operation skipped: {err}"));
                drop_key(item, method);
            }
        }
    }

    paths.retain(|url, item| match accepts::<RawPathItem>(item) {
        Ok(()) => true,
        Err(err) => {
            diagnostics.error(url.as_str(), format!("malformed path skipped: {err}"));
            false
        }
    });
}

fn prune_operation(operation: &mut Value, subject: &str, diagnostics: &mut Diagnostics) {
    let Some(operation) = operation.as_object_mut() else {
        return;
    };
    if let Some(params) = operation.get_mut("parameters") {
        prune_parameters(params, subject, diagnostics);
    }
    if let Some(body) = operation.get("requestBody") {
        if let Err(err) = accepts::<RequestBodyOrRef>(body) {
            diagnostics.error(subject, format!("malformed request body skipped: {err}"));
            drop_key(operation, "requestBody");
        }
    }
    if let Some(responses) = operation.get_mut("responses").and_then(Value::as_object_mut) {
        responses.retain(|status, response| match accepts::<ResponseOrRef>(response) {
            Ok(()) => true,
            Err(err) => {
                diagnostics.error(subject, format!("malformed {status} response skipped: {err}"));
                false
            }
        });
    }
}

fn prune_parameters(params: &mut Value, subject: &str, diagnostics: &mut Diagnostics) {
    let Some(params) = params.as_array_mut() else {
        return;
    };
    params.retain(|param| match accepts::<ParameterOrRef>(param) {
        Ok(()) => true,
        Err(_) => {
            let name = param.get("name").and_then(Value::as_str).unwrap_or("?");
            diagnostics.error(
                subject,
                format!("malformed parameter `{name}` skipped: needs `name` and `in`, or `$ref`"),
            );
            false
        }
    });
}

/// Remove `key` without disturbing the order of the remaining keys.
fn drop_key(object: &mut Map<String, Value>, key: &str) {
    object.retain(|k, _| k != key);
}
