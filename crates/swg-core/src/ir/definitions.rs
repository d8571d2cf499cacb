use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use super::property::VirtualProperty;
use crate::transform::name_normalizer::base_name;

/// What a resolved definition name maps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefinitionEntry {
    /// A structured record.
    Record(Vec<VirtualProperty>),
    /// An enum or other scalar definition.
    Scalar(VirtualProperty),
}

impl DefinitionEntry {
    pub fn properties(&self) -> &[VirtualProperty] {
        match self {
            DefinitionEntry::Record(props) => props,
            DefinitionEntry::Scalar(_) => &[],
        }
    }

    pub fn as_scalar(&self) -> Option<&VirtualProperty> {
        match self {
            DefinitionEntry::Scalar(p) => Some(p),
            DefinitionEntry::Record(_) => None,
        }
    }
}

/// Insertion-ordered `resolvedName → entry`. No two entries share a base name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DefinitionsIr {
    entries: IndexMap<String, DefinitionEntry>,
    /// base name → entry name
    #[serde(skip)]
    bases: HashMap<String, String>,
}

impl DefinitionsIr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&DefinitionEntry> {
        self.entries.get(name)
    }

    /// Look an entry up by its base name, e.g. `Page` for `Page<T>`.
    pub fn find_by_base(&self, base: &str) -> Option<(&str, &DefinitionEntry)> {
        let name = self.bases.get(base)?;
        self.entries
            .get_key_value(name)
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn contains_base(&self, base: &str) -> bool {
        self.find_by_base(base).is_some()
    }

    /// Insert or replace `name`. Replacing keeps the original position.
    pub(crate) fn insert(&mut self, name: String, entry: DefinitionEntry) {
        self.bases
            .entry(base_name(&name).to_string())
            .or_insert_with(|| name.clone());
        self.entries.insert(name, entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefinitionEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
