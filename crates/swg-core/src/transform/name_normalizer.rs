use heck::{ToLowerCamelCase, ToPascalCase};

use crate::ir::HttpMethod;

const PLACEHOLDER_LETTERS: [&str; 3] = ["T", "K", "U"];

/// `user_By_id` → `userById`.
pub fn camel_case(name: &str) -> String {
    name.to_lower_camel_case()
}

/// `pet-owner` → `PetOwner`.
pub fn pascal_case(name: &str) -> String {
    name.to_pascal_case()
}

/// Upper-case the first character and leave the rest alone.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extract the target name of a `$ref`.
///
/// `#/definitions/Page%C2%ABUser%C2%BB` → `Page«User»`
pub fn ref_name(ref_path: &str) -> String {
    let last = ref_path.rsplit('/').next().unwrap_or(ref_path);
    let decoded = match urlencoding::decode(last) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => last.to_string(),
    };
    decoded.replace("~1", "/").replace("~0", "~")
}

/// A name with any generic argument list removed: `Page<T>` → `Page`.
pub fn base_name(name: &str) -> &str {
    match name.find(['<', '«']) {
        Some(pos) => name[..pos].trim_end(),
        None => name,
    }
}

/// The `index`-th generic placeholder: `T, K, U, T1, K1, U1, T2, …`.
pub fn placeholder(index: usize) -> String {
    let letter = PLACEHOLDER_LETTERS[index % PLACEHOLDER_LETTERS.len()];
    match index / PLACEHOLDER_LETTERS.len() {
        0 => letter.to_string(),
        round => format!("{letter}{round}"),
    }
}

/// Name for an inline structure nested under `owner`: `Pet` + `owner` → `PetOwner`.
pub fn synthesized_name(owner: &str, property: &str) -> String {
    format!("{}{}", owner, pascal_case(property))
}

/// Whether a camel-cased name already reads like `getX`, `deleteX`, …
pub fn starts_with_http_verb(name: &str) -> bool {
    HttpMethod::ALL.iter().any(|method| {
        let verb = method.as_str();
        match name.strip_prefix(verb) {
            Some(rest) => rest
                .chars()
                .next()
                .is_none_or(|c| c.is_uppercase() || !c.is_alphabetic()),
            None => false,
        }
    })
}
