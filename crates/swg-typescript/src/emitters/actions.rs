use std::collections::{BTreeSet, HashSet};

use heck::ToKebabCase;
use minijinja::{Environment, Value, context};
use swg_core::ir::{OperationDescriptor, OperationsIr, VirtualProperty};
use swg_core::transform::name_normalizer::pascal_case;

use super::ACTIONS_TEMPLATE;
use super::definitions::{field_to_ctx, quoted};
use crate::type_mapper::{ir_type_to_ts, property_to_ts, referenced_names};

/// One rendered `<tag>.ts` module.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionModule {
    pub tag: String,
    /// Module name without extension, e.g. `pet-store`.
    pub module: String,
    pub content: String,
}

/// File stem for a tag's action module.
pub fn module_name(tag: &str) -> String {
    let kebab = tag.to_kebab_case();
    if kebab.is_empty() {
        "default".to_string()
    } else {
        kebab
    }
}

/// Emit one action module per tag, in first-seen tag order.
///
/// `definition_names` are the base names exported by `definitions.ts`; only
/// those are imported.
pub fn emit_actions(
    env: &Environment<'_>,
    definition_names: &HashSet<String>,
    operations: &OperationsIr,
) -> Result<Vec<ActionModule>, minijinja::Error> {
    let tmpl = env.get_template(ACTIONS_TEMPLATE)?;
    let mut modules = Vec::new();

    for (tag, ops) in operations.by_tag() {
        let mut locals = LocalTypes::new(definition_names);
        let mut imports = BTreeSet::new();
        let op_ctx: Vec<Value> = ops
            .iter()
            .map(|(name, op)| operation_to_ctx(name, op, &mut locals, &mut imports))
            .collect();
        for field in locals.types.iter().flat_map(|(_, fields)| fields) {
            imports.extend(referenced_names(&property_to_ts(field)).map(str::to_string));
        }

        let local_names: HashSet<&str> = locals.types.iter().map(|(name, _)| name.as_str()).collect();
        let imports: Vec<String> = imports
            .into_iter()
            .filter(|name| definition_names.contains(name) && !local_names.contains(name.as_str()))
            .collect();
        let local_types: Vec<Value> = locals
            .types
            .iter()
            .map(|(name, fields)| {
                context! {
                    name => name,
                    fields => fields.iter().map(field_to_ctx).collect::<Vec<_>>(),
                }
            })
            .collect();

        let content = tmpl.render(context! {
            tag => tag,
            imports => imports,
            local_types => local_types,
            operations => op_ctx,
        })?;
        log::debug!("rendered {} operations for tag `{tag}`", ops.len());
        modules.push(ActionModule {
            tag: tag.to_string(),
            module: module_name(tag),
            content,
        });
    }
    Ok(modules)
}

/// Inline object types that have no entry in `definitions.ts`.
struct LocalTypes<'a> {
    exported: &'a HashSet<String>,
    types: Vec<(String, Vec<VirtualProperty>)>,
}

impl<'a> LocalTypes<'a> {
    fn new(exported: &'a HashSet<String>) -> Self {
        Self {
            exported,
            types: Vec::new(),
        }
    }

    fn collect(&mut self, name: &str, fields: &[VirtualProperty]) {
        if fields.is_empty() || self.exported.contains(name) || self.types.iter().any(|(n, _)| n == name) {
            return;
        }
        self.types.push((name.to_string(), fields.to_vec()));
        for field in fields {
            if let Some(children) = &field.properties {
                self.collect(&local_type_name(&field.type_name), children);
            }
        }
    }

    fn collect_property(&mut self, prop: &VirtualProperty) {
        if let Some(children) = &prop.properties {
            self.collect(&local_type_name(&prop.type_name), children);
        }
    }
}

/// `Array<GetPetResponseItems> | null` names the local type `GetPetResponseItems`.
fn local_type_name(ty: &str) -> String {
    let mut name = ty.split('|').next().unwrap_or(ty).trim();
    while let Some(inner) = name.strip_prefix("Array<").and_then(|rest| rest.strip_suffix('>')) {
        name = inner.trim();
    }
    name.to_string()
}

fn operation_to_ctx(
    name: &str,
    op: &OperationDescriptor,
    locals: &mut LocalTypes<'_>,
    imports: &mut BTreeSet<String>,
) -> Value {
    let mut seen = HashSet::new();
    let params: Vec<&VirtualProperty> = op
        .parameters
        .all()
        .filter(|p| seen.insert(p.name.as_str()))
        .collect();
    for prop in &params {
        locals.collect_property(prop);
        imports.extend(referenced_names(&property_to_ts(prop)).map(str::to_string));
    }

    let response = ir_type_to_ts(&op.response.type_name);
    if !op.response.properties.is_empty() {
        locals.collect(&local_type_name(&op.response.type_name), &op.response.properties);
    }
    imports.extend(referenced_names(&response).map(str::to_string));

    let keys = |bucket: &[VirtualProperty]| -> Vec<String> {
        bucket.iter().map(|p| quoted(&p.name)).collect()
    };

    context! {
        name => name,
        method => op.method.to_string(),
        url => op.url.clone(),
        path => url_template(&op.url),
        summary => op.summary.clone(),
        description => op.description.clone(),
        deprecated => op.deprecated,
        params_type => format!("{}Params", pascal_case(name)),
        params => params.iter().copied().map(field_to_ctx).collect::<Vec<_>>(),
        params_required => params.iter().any(|p| p.required),
        query => keys(&op.parameters.query),
        headers => keys(&op.parameters.header),
        form => keys(&op.parameters.form_data),
        body => op.parameters.body.first().map(|p| quoted(&p.name)),
        content_type => op.request_headers.first().cloned(),
        response => response,
    }
}

/// Turn `/pets/{petId}` into the body of a template literal.
pub fn url_template(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        out.push_str(&rest[..open].replace('`', "\\`"));
        let name = &rest[open + 1..close];
        out.push_str(&format!("${{encodeURIComponent(String(params[{}]))}}", quoted(name)));
        rest = &rest[close + 1..];
    }
    out.push_str(&rest.replace('`', "\\`"));
    out
}
