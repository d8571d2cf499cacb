pub mod lenient;
pub mod normalize;
pub mod operation;
pub mod parameter;
pub mod schema;
pub mod spec;

use crate::diagnostics::{Diagnostics, Resolved};
use crate::error::ParseError;
use spec::{OpenApiDoc, RawDocument, SourceDocument, SwaggerDoc};

/// Parse a document from YAML.
pub fn from_yaml(input: &str) -> Result<RawDocument, ParseError> {
    let value: serde_json::Value = serde_yaml_ng::from_str(input)?;
    Ok(into_raw(detect_dialect(value)?))
}

/// Parse a document from JSON.
pub fn from_json(input: &str) -> Result<RawDocument, ParseError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    Ok(into_raw(detect_dialect(value)?))
}

/// Fold the dialect away, keeping what was skipped while parsing ahead of what
/// folding reports.
fn into_raw(source: Resolved<SourceDocument>) -> RawDocument {
    let Resolved {
        value,
        mut diagnostics,
    } = source;
    let mut raw = value.into_raw();
    diagnostics.extend(std::mem::take(&mut raw.diagnostics));
    raw.diagnostics = diagnostics;
    raw
}

/// Parse a document whose format is not known up front: JSON when it opens
/// with `{`, YAML otherwise.
pub fn from_str(input: &str) -> Result<RawDocument, ParseError> {
    if input.trim_start().starts_with('{') {
        from_json(input)
    } else {
        from_yaml(input)
    }
}

/// Tell the dialects apart by their version key and deserialize accordingly.
/// Malformed entries are dropped and reported rather than failing the document.
pub fn detect_dialect(
    mut value: serde_json::Value,
) -> Result<Resolved<SourceDocument>, ParseError> {
    let mut diagnostics = Diagnostics::new();

    if let Some(version) = take_version(&mut value, "swagger") {
        if !version.starts_with("2.") {
            return Err(ParseError::UnsupportedVersion(version));
        }
        lenient::prune_document(&mut value, &mut diagnostics);
        let doc: SwaggerDoc = serde_json::from_value(value)?;
        return Ok(Resolved::new(SourceDocument::Swagger(doc), diagnostics));
    }

    if let Some(version) = take_version(&mut value, "openapi") {
        if !version.starts_with("3.") {
            return Err(ParseError::UnsupportedVersion(version));
        }
        lenient::prune_document(&mut value, &mut diagnostics);
        let doc: OpenApiDoc = serde_json::from_value(value)?;
        return Ok(Resolved::new(SourceDocument::OpenApi(doc), diagnostics));
    }

    Err(ParseError::MissingField("swagger or openapi".to_string()))
}

/// Read a version key as a string, rewriting it in place when the author
/// wrote a bare number such as `swagger: 2.0`.
fn take_version(value: &mut serde_json::Value, key: &str) -> Option<String> {
    let slot = value.get_mut(key)?;
    let version = match &*slot {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    *slot = serde_json::Value::String(version.clone());
    Some(version)
}
