use swg_core::ir::VirtualProperty;
use swg_core::transform::GenericType;

/// Map an IR type string (`integer`, `Array<Pet>`, `Map<string, T> | null`)
/// to its TypeScript representation.
pub fn ir_type_to_ts(ty: &str) -> String {
    let ty = ty.trim();
    if ty.is_empty() {
        return "void".to_string();
    }
    let members: Vec<String> = split_union(ty)
        .into_iter()
        .map(|member| generic_to_ts(&GenericType::parse(member)))
        .collect();
    members.join(" | ")
}

/// TypeScript type of a property, with `enumOption` values as a literal union.
pub fn property_to_ts(prop: &VirtualProperty) -> String {
    if !prop.is_enum() {
        return ir_type_to_ts(&prop.type_name);
    }
    let literals: Vec<String> = prop.enum_option.iter().map(|v| v.to_string()).collect();
    let union = literals.join(" | ");
    if prop.type_name.starts_with("Array<") {
        format!("({union})[]")
    } else {
        union
    }
}

fn generic_to_ts(ty: &GenericType) -> String {
    if !ty.is_generic() {
        return primitive_to_ts(&ty.name);
    }
    let args: Vec<String> = ty.args.iter().map(generic_to_ts).collect();
    match (ty.name.as_str(), args.as_slice()) {
        ("Array", [inner]) if inner.contains('|') => format!("({inner})[]"),
        ("Array", [inner]) => format!("{inner}[]"),
        ("Map", [key, value]) => format!("Record<{key}, {value}>"),
        (name, args) => format!("{}<{}>", name, args.join(", ")),
    }
}

fn primitive_to_ts(name: &str) -> String {
    match name {
        "integer" | "number" => "number".to_string(),
        "string" | "date" | "date-time" => "string".to_string(),
        "boolean" => "boolean".to_string(),
        "file" => "Blob".to_string(),
        "any" => "unknown".to_string(),
        "object" => "Record<string, unknown>".to_string(),
        "null" => "null".to_string(),
        other if other.contains('|') => ir_type_to_ts(other),
        other => other.to_string(),
    }
}

/// Split on `|` outside any generic argument list.
fn split_union(ty: &str) -> Vec<&str> {
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in ty.char_indices() {
        match c {
            '<' | '«' => depth += 1,
            '>' | '»' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                members.push(ty[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    members.push(ty[start..].trim());
    members.retain(|m| !m.is_empty());
    members
}

/// Definition names referenced by a TypeScript type string.
pub fn referenced_names<'a>(ts: &'a str) -> impl Iterator<Item = &'a str> {
    ts.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|word| word.chars().next().is_some_and(|c| c.is_uppercase()))
}
