use minijinja::{Environment, Value, context};
use swg_core::ir::{DefinitionEntry, DefinitionsIr, VirtualProperty};

use super::DEFINITIONS_TEMPLATE;
use crate::type_mapper::{ir_type_to_ts, property_to_ts};

/// Emit `definitions.ts`: one interface per record, one type alias per scalar.
pub fn emit_definitions(
    env: &Environment<'_>,
    title: &str,
    definitions: &DefinitionsIr,
) -> Result<String, minijinja::Error> {
    let tmpl = env.get_template(DEFINITIONS_TEMPLATE)?;
    let entries: Vec<Value> = definitions
        .iter()
        .map(|(name, entry)| entry_to_ctx(name, entry))
        .collect();
    tmpl.render(context! {
        title => title,
        definitions => entries,
    })
}

fn entry_to_ctx(name: &str, entry: &DefinitionEntry) -> Value {
    match entry {
        DefinitionEntry::Scalar(prop) => {
            let target = if prop.is_enum() {
                property_to_ts(prop)
            } else {
                ir_type_to_ts(&prop.type_name)
            };
            context! {
                kind => "alias",
                name => name,
                description => prop.description.clone(),
                target => target,
            }
        }
        DefinitionEntry::Record(props) if props.is_empty() => context! {
            kind => "alias",
            name => name,
            target => "Record<string, unknown>",
        },
        DefinitionEntry::Record(props) => context! {
            kind => "interface",
            name => name,
            fields => props.iter().map(field_to_ctx).collect::<Vec<_>>(),
        },
    }
}

pub(crate) fn field_to_ctx(prop: &VirtualProperty) -> Value {
    context! {
        name => property_key(&prop.name),
        ts_type => property_to_ts(prop),
        required => prop.required,
        description => prop.description.clone(),
        format => prop.format.clone(),
    }
}

/// A property name as an object key, quoted unless it is a plain identifier.
pub fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if identifier {
        name.to_string()
    } else {
        quoted(name)
    }
}

/// A TypeScript string literal.
pub fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
