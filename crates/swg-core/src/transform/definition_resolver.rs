use std::collections::HashSet;

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostics, Resolved};
use crate::ir::{DefinitionEntry, DefinitionsIr, VirtualProperty};
use crate::parse::schema::RawSchema;

use super::generic::DefinitionNameMapping;
use super::property_resolver::PropertyResolver;

/// Flatten the document's definitions into a [`DefinitionsIr`].
///
/// Generic instantiations collapse into one parameterised entry
/// (`Page«User»`, `Page«Pet»` → `Page<T>`); only the first key seen for a base
/// name is resolved. Inline nested objects are registered alongside their
/// parent, right after it.
pub fn resolve_definitions(definitions: &IndexMap<String, RawSchema>) -> Resolved<DefinitionsIr> {
    let mut ir = DefinitionsIr::new();
    let mut diagnostics = Diagnostics::new();
    let reserved: HashSet<String> = definitions
        .keys()
        .map(|key| DefinitionNameMapping::definition(key).base)
        .collect();

    for (key, schema) in definitions {
        let mapping = DefinitionNameMapping::definition(key);
        if let Some((existing, _)) = ir.find_by_base(&mapping.base) {
            diagnostics.info(key.as_str(), format!("collapsed into `{existing}`"));
            continue;
        }

        if !schema.enum_values.is_empty() {
            let scalar = enum_definition(&mapping.name, schema);
            ir.insert(mapping.name, DefinitionEntry::Scalar(scalar));
            continue;
        }

        let declared = schema.schema_type.as_ref();
        if let Some(declared) = declared.filter(|t| !t.contains("object")) {
            diagnostics.error(
                key.as_str(),
                format!(
                    "expected an object definition, found type `{}`",
                    declared.describe()
                ),
            );
            ir.insert(mapping.name, DefinitionEntry::Record(Vec::new()));
            continue;
        }

        // Reserve the slot so the parent precedes the children it registers.
        ir.insert(mapping.name.clone(), DefinitionEntry::Record(Vec::new()));
        let mut resolver = PropertyResolver::registering(&mut ir, &reserved);
        let properties = resolver.resolve_object(&mapping.base, schema, &mapping.mappings);
        diagnostics.extend(resolver.into_diagnostics());
        ir.insert(mapping.name, DefinitionEntry::Record(properties));
    }

    log::debug!("resolved {} definitions from {} keys", ir.len(), definitions.len());
    Resolved::new(ir, diagnostics)
}

fn enum_definition(name: &str, schema: &RawSchema) -> VirtualProperty {
    let type_name = match &schema.schema_type {
        Some(declared) => declared.tokens().join(" | "),
        None => "string".to_string(),
    };
    VirtualProperty {
        name: name.to_string(),
        type_name,
        description: schema.description.clone().unwrap_or_default(),
        enum_option: schema.enum_values.clone(),
        format: schema.format.clone().unwrap_or_default(),
        default: schema.default_value.clone(),
        ..VirtualProperty::default()
    }
}
