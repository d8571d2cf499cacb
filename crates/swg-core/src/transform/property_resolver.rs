use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::ir::{DefinitionEntry, DefinitionsIr, VirtualProperty};
use crate::parse::schema::{AdditionalProperties, RawSchema};

use super::generic::{DefinitionNameMapping, GenericType};
use super::name_normalizer::{ref_name, synthesized_name};

/// The type half of a [`VirtualProperty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedType {
    pub ty: String,
    pub ref_name: String,
    pub enum_option: Vec<Value>,
    pub properties: Option<Vec<VirtualProperty>>,
}

/// Turns raw property schemas into [`VirtualProperty`] values.
///
/// With a registry, inline nested objects are added to it under their
/// synthesized name. Without one (parameters, responses) they are only kept
/// in the field's `properties`.
pub struct PropertyResolver<'a> {
    registry: Option<&'a mut DefinitionsIr>,
    /// Base names of the document's own definitions. Inline objects never
    /// register under one of these.
    reserved: Option<&'a HashSet<String>>,
    diagnostics: Diagnostics,
}

impl<'a> PropertyResolver<'a> {
    pub fn registering(registry: &'a mut DefinitionsIr, reserved: &'a HashSet<String>) -> Self {
        Self {
            registry: Some(registry),
            reserved: Some(reserved),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn scoped() -> Self {
        Self {
            registry: None,
            reserved: None,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Everything recorded while resolving, such as renamed inline objects.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Resolve every property of an object schema, in declaration order.
    /// Properties of inline `allOf` members follow the schema's own.
    pub fn resolve_object(
        &mut self,
        owner: &str,
        schema: &RawSchema,
        mappings: &IndexMap<String, String>,
    ) -> Vec<VirtualProperty> {
        let mut props: Vec<VirtualProperty> = Vec::new();
        for part in std::iter::once(schema).chain(&schema.all_of) {
            if let Some(r) = &part.ref_path {
                log::debug!("{owner}: not merging properties of {r}");
                continue;
            }
            for (name, prop) in &part.properties {
                if props.iter().any(|p| &p.name == name) {
                    continue;
                }
                let required = part.required.contains(name) || schema.required.contains(name);
                props.push(self.resolve_property(owner, name, prop, required, mappings));
            }
        }
        props
    }

    pub fn resolve_property(
        &mut self,
        owner: &str,
        name: &str,
        schema: &RawSchema,
        required: bool,
        mappings: &IndexMap<String, String>,
    ) -> VirtualProperty {
        let synth = synthesized_name(owner, name);
        let resolved = self.resolve_type(&synth, schema, mappings);
        let unwrapped = schema.unwrap_single_all_of();
        let facets = unwrapped.as_ref().unwrap_or(schema);

        VirtualProperty {
            name: name.to_string(),
            type_name: resolved.ty,
            description: facets.description.clone().unwrap_or_default(),
            required: required || schema.required.is_flagged(),
            enum_option: resolved.enum_option,
            ref_name: resolved.ref_name,
            format: facets.format.clone().unwrap_or_default(),
            default: facets.default_value.clone(),
            properties: resolved.properties,
        }
    }

    /// Resolve the type of `schema`. `synth` names anything inline that needs
    /// a name of its own (enums, nested objects).
    pub fn resolve_type(
        &mut self,
        synth: &str,
        schema: &RawSchema,
        mappings: &IndexMap<String, String>,
    ) -> ResolvedType {
        if let Some(inner) = schema.unwrap_single_all_of() {
            return self.resolve_type(synth, &inner, mappings);
        }

        if let Some(ref_path) = &schema.ref_path {
            let target = ref_name(ref_path);
            let mut ty = GenericType::parse(&target);
            ty.substitute(mappings);
            return ResolvedType {
                ty: ty.render(),
                ref_name: DefinitionNameMapping::reference(&target).base,
                ..ResolvedType::default()
            };
        }

        if !schema.enum_values.is_empty() {
            return ResolvedType {
                ty: synth.to_string(),
                enum_option: schema.enum_values.clone(),
                ..ResolvedType::default()
            };
        }

        let map_value = match &schema.additional_properties {
            Some(AdditionalProperties::Schema(value)) if schema.properties.is_empty() => {
                Some(value.as_ref())
            }
            _ => None,
        };

        let tokens: Vec<&str> = match &schema.schema_type {
            Some(declared) => declared.tokens(),
            None if !schema.properties.is_empty() || map_value.is_some() => vec!["object"],
            None if schema.items.is_some() => vec!["array"],
            None => vec!["any"],
        };

        let mut resolved = ResolvedType::default();
        let mut members = Vec::with_capacity(tokens.len() + 1);
        for token in tokens {
            let member = match token {
                "array" => {
                    let inner = match &schema.items {
                        Some(items) => self.resolve_type(synth, items, mappings),
                        None => ResolvedType {
                            ty: "any".to_string(),
                            ..ResolvedType::default()
                        },
                    };
                    resolved.ref_name = inner.ref_name;
                    resolved.enum_option = inner.enum_option;
                    resolved.properties = inner.properties;
                    format!("Array<{}>", inner.ty)
                }
                "object" if !schema.properties.is_empty() => {
                    let (name, children) = self.inline_object(synth, schema, mappings);
                    resolved.properties = Some(children);
                    name
                }
                "object" => match map_value {
                    Some(value) => {
                        let inner = self.resolve_type(synth, value, mappings);
                        resolved.ref_name = inner.ref_name;
                        format!("Map<string, {}>", inner.ty)
                    }
                    None => "object".to_string(),
                },
                other => other.to_string(),
            };
            if !members.contains(&member) {
                members.push(member);
            }
        }
        if schema.nullable == Some(true) && !members.iter().any(|m| m == "null") {
            members.push("null".to_string());
        }

        resolved.ty = members.join(" | ");
        resolved
    }

    /// Name and children of an inline object. Registered the first time;
    /// later sightings reuse the registered children.
    fn inline_object(
        &mut self,
        synth: &str,
        schema: &RawSchema,
        mappings: &IndexMap<String, String>,
    ) -> (String, Vec<VirtualProperty>) {
        let name = self.inline_name(synth);
        let existing = self
            .registry
            .as_deref()
            .and_then(|registry| registry.find_by_base(&name))
            .map(|(_, entry)| entry.properties().to_vec());
        if let Some(children) = existing {
            log::debug!("inline object `{name}` already registered");
            return (name, children);
        }

        // Reserve the name so the parent precedes its children.
        if let Some(registry) = self.registry.as_deref_mut() {
            registry.insert(name.clone(), DefinitionEntry::Record(Vec::new()));
        }
        let children = self.resolve_object(&name, schema, mappings);
        if let Some(registry) = self.registry.as_deref_mut() {
            registry.insert(name.clone(), DefinitionEntry::Record(children.clone()));
        }
        (name, children)
    }

    /// `synth`, or `synth2`, `synth3`, … when a document definition owns `synth`.
    fn inline_name(&mut self, synth: &str) -> String {
        let Some(reserved) = self.reserved.filter(|r| r.contains(synth)) else {
            return synth.to_string();
        };
        let renamed = (2..)
            .map(|n| format!("{synth}{n}"))
            .find(|candidate| !reserved.contains(candidate))
            .unwrap_or_else(|| synth.to_string());
        self.diagnostics.warn(
            synth,
            format!("inline object renamed to `{renamed}`, `{synth}` is a document definition"),
        );
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(json: &str) -> RawSchema {
        serde_json::from_str(json).unwrap()
    }

    fn mappings(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_primitive_and_format() {
        let prop = PropertyResolver::scoped().resolve_property(
            "Pet",
            "id",
            &schema(r#"{"type":"integer","format":"int64","description":"identifier"}"#),
            true,
            &IndexMap::new(),
        );
        assert_eq!(prop.type_name, "integer");
        assert_eq!(prop.format, "int64");
        assert_eq!(prop.description, "identifier");
        assert!(prop.required);
        assert!(prop.properties.is_none());
    }

    #[test]
    fn test_ref_substitution_keeps_ref() {
        let m = mappings(&[("T", "User")]);
        let mut resolver = PropertyResolver::scoped();

        let list = resolver.resolve_type(
            "PageContent",
            &schema(r##"{"type":"array","items":{"$ref":"#/definitions/User"}}"##),
            &m,
        );
        assert_eq!(list.ty, "Array<T>");
        assert_eq!(list.ref_name, "User");

        let other = resolver.resolve_type(
            "PageOrder",
            &schema(r##"{"$ref":"#/definitions/Order"}"##),
            &m,
        );
        assert_eq!(other.ty, "Order");
        assert_eq!(other.ref_name, "Order");
    }

    #[test]
    fn test_generic_ref_renders_reference_form() {
        let resolved = PropertyResolver::scoped().resolve_type(
            "X",
            &schema(r##"{"$ref":"#/definitions/Wrapper%C2%ABList%C2%ABPet%C2%BB%C2%BB"}"##),
            &IndexMap::new(),
        );
        assert_eq!(resolved.ty, "Wrapper<Array<Pet>>");
        assert_eq!(resolved.ref_name, "Wrapper");
    }

    #[test]
    fn test_inline_enum_named_after_owner() {
        let prop = PropertyResolver::scoped().resolve_property(
            "Pet",
            "status",
            &schema(r#"{"type":"string","enum":["available","sold"]}"#),
            false,
            &IndexMap::new(),
        );
        assert_eq!(prop.type_name, "PetStatus");
        assert_eq!(prop.enum_option.len(), 2);
        assert!(!prop.required);
    }

    #[test]
    fn test_inline_object_registered_once() {
        let mut ir = DefinitionsIr::new();
        let reserved = HashSet::new();
        let raw = schema(
            r#"{"type":["object","null"],"properties":{"city":{"type":"string"}}}"#,
        );
        let first = PropertyResolver::registering(&mut ir, &reserved).resolve_property(
            "Pet",
            "address",
            &raw,
            false,
            &IndexMap::new(),
        );
        assert_eq!(first.type_name, "PetAddress | null");
        assert_eq!(first.properties.as_ref().map(Vec::len), Some(1));
        assert!(ir.contains_base("PetAddress"));

        let second = PropertyResolver::registering(&mut ir, &reserved).resolve_property(
            "Pet",
            "address",
            &raw,
            false,
            &IndexMap::new(),
        );
        assert_eq!(second.properties, first.properties);
        assert_eq!(ir.len(), 1);
    }

    #[test]
    fn test_array_of_inline_objects() {
        let mut ir = DefinitionsIr::new();
        let reserved = HashSet::new();
        let prop = PropertyResolver::registering(&mut ir, &reserved).resolve_property(
            "Order",
            "lines",
            &schema(r#"{"type":"array","items":{"type":"object","properties":{"sku":{"type":"string"}}}}"#),
            false,
            &IndexMap::new(),
        );
        assert_eq!(prop.type_name, "Array<OrderLines>");
        assert!(ir.get("OrderLines").is_some());
    }

    #[test]
    fn test_scoped_mode_does_not_register() {
        let prop = PropertyResolver::scoped().resolve_property(
            "GetPetResponse",
            "meta",
            &schema(r#"{"properties":{"total":{"type":"integer"}}}"#),
            false,
            &IndexMap::new(),
        );
        assert_eq!(prop.type_name, "GetPetResponseMeta");
        assert_eq!(prop.properties.unwrap()[0].name, "total");
    }

    #[test]
    fn test_map_missing_and_nullable() {
        let mut resolver = PropertyResolver::scoped();
        let map = resolver.resolve_type(
            "X",
            &schema(r#"{"type":"object","additionalProperties":{"type":"integer"}}"#),
            &IndexMap::new(),
        );
        assert_eq!(map.ty, "Map<string, integer>");

        let any = resolver.resolve_type("X", &schema("{}"), &IndexMap::new());
        assert_eq!(any.ty, "any");

        let nullable =
            resolver.resolve_type("X", &schema(r#"{"type":"string","nullable":true}"#), &IndexMap::new());
        assert_eq!(nullable.ty, "string | null");
    }

    #[test]
    fn test_single_all_of_unwrapped() {
        let prop = PropertyResolver::scoped().resolve_property(
            "Pet",
            "category",
            &schema(r##"{"allOf":[{"$ref":"#/definitions/Category"}],"description":"the category"}"##),
            false,
            &IndexMap::new(),
        );
        assert_eq!(prop.type_name, "Category");
        assert_eq!(prop.ref_name, "Category");
        assert_eq!(prop.description, "the category");
    }

    #[test]
    fn test_required_flag_on_property() {
        let props = PropertyResolver::scoped().resolve_object(
            "Pet",
            &schema(r#"{"required":["id"],"properties":{"id":{"type":"integer"},"name":{"type":"string","required":true},"tag":{"type":"string"}}}"#),
            &IndexMap::new(),
        );
        let required: Vec<bool> = props.iter().map(|p| p.required).collect();
        assert_eq!(required, [true, true, false]);
    }

    #[test]
    fn test_inline_object_avoids_document_definition() {
        let mut ir = DefinitionsIr::new();
        let reserved: HashSet<String> = ["PetOwner".to_string()].into_iter().collect();
        let mut resolver = PropertyResolver::registering(&mut ir, &reserved);
        let prop = resolver.resolve_property(
            "Pet",
            "owner",
            &schema(r#"{"type":"object","properties":{"name":{"type":"string"}}}"#),
            false,
            &IndexMap::new(),
        );
        let diagnostics = resolver.into_diagnostics();

        assert_eq!(prop.type_name, "PetOwner2");
        assert_eq!(diagnostics.len(), 1);
        assert!(ir.get("PetOwner2").is_some());
        assert!(ir.get("PetOwner").is_none());
    }
}
