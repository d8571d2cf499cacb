//! Generic type notation embedded in definition keys.
//!
//! Generators such as springfox encode generic instantiations in definition
//! keys with guillemets (`Page«List«User»»`); references to them arrive
//! percent-encoded. This module parses either guillemet or angle-bracket
//! notation into a [`GenericType`] tree and derives the placeholder mapping a
//! generic definition is declared with.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::name_normalizer::placeholder;

/// Java-style collection names rendered as `Array`.
const COLLECTION_NAMES: [&str; 4] = ["List", "Set", "Collection", "Array"];

/// A type name with its generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericType {
    pub name: String,
    pub args: Vec<GenericType>,
}

impl GenericType {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Parse `Name«Arg, Other«Nested»»` or `Name<Arg>`. Malformed notation
    /// (unbalanced brackets, trailing text) yields a leaf holding the whole input.
    pub fn parse(input: &str) -> Self {
        let mut parser = Parser {
            chars: input.chars().collect(),
            pos: 0,
        };
        match parser.parse_type() {
            Some(ty) if parser.at_end() => ty,
            _ => {
                log::debug!("treating `{input}` as a plain type name");
                Self::leaf(input.trim())
            }
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// The innermost concrete type, following the last argument of every
    /// nested generic list: `List«Map«String,User»»` → `User`.
    pub fn innermost(&self) -> &GenericType {
        match self.args.last() {
            Some(last) => last.innermost(),
            None => self,
        }
    }

    /// Replace every leaf whose name is a mapping value with its placeholder.
    pub fn substitute(&mut self, mappings: &IndexMap<String, String>) {
        if self.args.is_empty() {
            if let Some((placeholder, _)) = mappings.iter().find(|(_, orig)| **orig == self.name) {
                self.name = placeholder.clone();
            }
            return;
        }
        for arg in &mut self.args {
            arg.substitute(mappings);
        }
    }

    /// Reference form: `Wrapper<Pet>`, `Page<Array<User>>`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn display_name(&self) -> &str {
        if self.is_generic() && COLLECTION_NAMES.contains(&self.name.as_str()) {
            "Array"
        } else {
            &self.name
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())?;
        if self.is_generic() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn parse_type(&mut self) -> Option<GenericType> {
        let name = self.parse_name()?;
        let mut ty = GenericType::leaf(name);
        self.skip_whitespace();
        if self.eat(is_open) {
            loop {
                ty.args.push(self.parse_type()?);
                self.skip_whitespace();
                if self.eat(|c| c == ',') {
                    continue;
                }
                if self.eat(is_close) {
                    break;
                }
                return None;
            }
        }
        Some(ty)
    }

    fn parse_name(&mut self) -> Option<String> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(&c) = self.chars.get(self.pos) {
            if is_open(c) || is_close(c) || c == ',' {
                break;
            }
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn eat(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.chars.get(self.pos) {
            Some(&c) if pred(c) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos == self.chars.len()
    }
}

fn is_open(c: char) -> bool {
    c == '«' || c == '<'
}

fn is_close(c: char) -> bool {
    c == '»' || c == '>'
}

/// The resolved name of a definition key and, for generic declarations, which
/// placeholder stands for which concrete type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionNameMapping {
    pub name: String,
    /// `name` with any generic argument list removed.
    pub base: String,
    /// placeholder → original type name
    pub mappings: IndexMap<String, String>,
}

impl DefinitionNameMapping {
    /// Resolve a raw definition key.
    ///
    /// With `is_definition` the key is read as a declaration: each top-level
    /// argument gets a placeholder (`Page«List«User»»` → `Page<T>`, `T → User`).
    /// Otherwise the name is the reference form (`Page<Array<User>>`).
    pub fn new(raw: &str, is_definition: bool) -> Self {
        let ty = GenericType::parse(raw);
        let base = ty.name.clone();

        if !is_definition || !ty.is_generic() {
            return Self {
                name: ty.render(),
                base,
                mappings: IndexMap::new(),
            };
        }

        let mut mappings = IndexMap::new();
        for (index, arg) in ty.args.iter().enumerate() {
            mappings.insert(placeholder(index), arg.innermost().name.clone());
        }
        let params: Vec<&str> = mappings.keys().map(String::as_str).collect();
        Self {
            name: format!("{}<{}>", base, params.join(", ")),
            base,
            mappings,
        }
    }

    pub fn definition(raw: &str) -> Self {
        Self::new(raw, true)
    }

    pub fn reference(raw: &str) -> Self {
        Self::new(raw, false)
    }

    pub fn is_generic(&self) -> bool {
        !self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let ty = GenericType::parse("Pet");
        assert_eq!(ty, GenericType::leaf("Pet"));
    }

    #[test]
    fn test_parse_nested_guillemets() {
        let ty = GenericType::parse("Page«List«User»»");
        assert_eq!(ty.name, "Page");
        assert_eq!(ty.args.len(), 1);
        assert_eq!(ty.args[0].name, "List");
        assert_eq!(ty.args[0].args[0], GenericType::leaf("User"));
        assert_eq!(ty.render(), "Page<Array<User>>");
    }

    #[test]
    fn test_parse_multiple_args() {
        let ty = GenericType::parse("Map«string, Pet»");
        assert_eq!(ty.args.len(), 2);
        assert_eq!(ty.render(), "Map<string, Pet>");
    }

    #[test]
    fn test_parse_angle_brackets() {
        assert_eq!(GenericType::parse("Wrapper<Pet>").render(), "Wrapper<Pet>");
    }

    #[test]
    fn test_parse_malformed_is_leaf() {
        let ty = GenericType::parse("Broken«Pet");
        assert!(!ty.is_generic());
        assert_eq!(ty.name, "Broken«Pet");
        assert!(!GenericType::parse("A«B»C").is_generic());
    }

    #[test]
    fn test_innermost_follows_last_argument() {
        let ty = GenericType::parse("List«Map«string,User»»");
        assert_eq!(ty.innermost().name, "User");
    }

    #[test]
    fn test_substitute_leaves_only() {
        let mut mappings = IndexMap::new();
        mappings.insert("T".to_string(), "User".to_string());
        let mut ty = GenericType::parse("Array<User>");
        ty.substitute(&mappings);
        assert_eq!(ty.render(), "Array<T>");

        let mut other = GenericType::parse("Order");
        other.substitute(&mappings);
        assert_eq!(other.render(), "Order");
    }

    #[test]
    fn test_definition_mapping_single() {
        let m = DefinitionNameMapping::definition("Wrapper«Pet»");
        assert_eq!(m.name, "Wrapper<T>");
        assert_eq!(m.base, "Wrapper");
        assert_eq!(m.mappings.get("T").map(String::as_str), Some("Pet"));
    }

    #[test]
    fn test_definition_mapping_nested() {
        let m = DefinitionNameMapping::definition("Page«List«User»»");
        assert_eq!(m.name, "Page<T>");
        assert_eq!(m.mappings.len(), 1);
        assert_eq!(m.mappings["T"], "User");
    }

    #[test]
    fn test_definition_mapping_cycles_placeholders() {
        let m = DefinitionNameMapping::definition("Tuple«A,B,C,D»");
        assert_eq!(m.name, "Tuple<T, K, U, T1>");
        assert_eq!(m.mappings["T1"], "D");
    }

    #[test]
    fn test_reference_mapping() {
        let m = DefinitionNameMapping::reference("Page«List«User»»");
        assert_eq!(m.name, "Page<Array<User>>");
        assert_eq!(m.base, "Page");
        assert!(!m.is_generic());
    }

    #[test]
    fn test_plain_definition() {
        let m = DefinitionNameMapping::definition("Pet");
        assert_eq!(m.name, "Pet");
        assert!(m.mappings.is_empty());
    }
}
