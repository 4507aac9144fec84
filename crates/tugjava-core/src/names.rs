//! Java name utilities.
//!
//! Helpers for qualified names, binary names of member types, and type
//! erasure of type references *as written in source*. These operate on text
//! only; resolving a name against an environment is the model crate's job.

/// Primitive type keywords (including `void`).
pub const PRIMITIVES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// The package whose types are implicitly imported.
pub const JAVA_LANG: &str = "java.lang";

/// Check if `name` is a primitive type keyword.
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// The last segment of a dotted (or `$`-separated) name.
///
/// `java.util.Map$Entry` and `java.util.Map.Entry` both yield `Entry`.
pub fn simple_name(qualified: &str) -> &str {
    match qualified.rfind(['.', '$']) {
        Some(idx) => &qualified[idx + 1..],
        None => qualified,
    }
}

/// Everything before the last `.`, or `""` for an unqualified name.
pub fn qualifier(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(idx) => &qualified[..idx],
        None => "",
    }
}

/// Join a package (possibly empty) and a simple name.
pub fn qualify(package: &str, simple: &str) -> String {
    if package.is_empty() {
        simple.to_string()
    } else {
        format!("{}.{}", package, simple)
    }
}

/// Convert a binary name (`a.b.Outer$Inner`) to its source form (`a.b.Outer.Inner`).
pub fn binary_to_source(binary: &str) -> String {
    binary.replace('$', ".")
}

/// Check if `fqn` names a top-level type in `java.lang`.
pub fn is_java_lang(fqn: &str) -> bool {
    qualifier(fqn) == JAVA_LANG
}

/// Remove generic arguments (`<...>`, nested) and all whitespace from a type.
///
/// `Map<String, List<T>>[]` becomes `Map[]`.
pub fn strip_type_arguments(type_text: &str) -> String {
    let mut out = String::with_capacity(type_text.len());
    let mut depth = 0usize;
    for c in type_text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Top-level type arguments of a type as written.
///
/// `Map<String, List<T>>` gives `["String", "List<T>"]`; a raw type or a
/// diamond gives none.
pub fn type_arguments(type_text: &str) -> Vec<&str> {
    let Some(open) = type_text.find('<') else {
        return Vec::new();
    };
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = open + 1;
    for (idx, c) in type_text.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '<' => depth += 1,
            ',' if depth == 1 => {
                args.push(type_text[start..idx].trim());
                start = idx + 1;
            }
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    args.push(type_text[start..idx].trim());
                    break;
                }
            }
            _ => {}
        }
    }
    args.retain(|arg| !arg.is_empty());
    args
}

/// Replace type variables in a type as written by the types bound to them.
///
/// Only whole, unqualified names are replaced: with `T` bound to `String`,
/// `Map<T, a.T>` becomes `Map<String, a.T>`.
pub fn substitute_type_variables(type_text: &str, bindings: &[(String, String)]) -> String {
    let mut out = String::with_capacity(type_text.len());
    let mut token = String::new();
    let flush = |token: &mut String, out: &mut String| {
        let qualified = out.ends_with('.');
        match bindings.iter().find(|(name, _)| *name == *token) {
            Some((_, bound)) if !qualified => out.push_str(bound),
            _ => out.push_str(token),
        }
        token.clear();
    };
    for c in type_text.chars() {
        if c.is_alphanumeric() || c == '_' || c == '$' {
            token.push(c);
        } else {
            flush(&mut token, &mut out);
            out.push(c);
        }
    }
    flush(&mut token, &mut out);
    out
}

/// Split a stripped type into its base name and array dimension count.
///
/// Varargs (`...`) count as one dimension.
pub fn split_array_dims(stripped: &str) -> (&str, usize) {
    let mut base = stripped;
    let mut dims = 0;
    loop {
        if let Some(rest) = base.strip_suffix("[]") {
            base = rest;
            dims += 1;
        } else if let Some(rest) = base.strip_suffix("...") {
            base = rest;
            dims += 1;
        } else {
            return (base, dims);
        }
    }
}

/// Erase a type reference as written to the simple name used in signatures.
///
/// Generic arguments are dropped, qualification is dropped, and names found in
/// `type_variables` erase to their first bound (or `Object`). Array dimensions
/// and varargs are kept as `[]`.
///
/// `type_variables` pairs a variable name with its first bound as written.
pub fn erasure(type_text: &str, type_variables: &[(String, Option<String>)]) -> String {
    let stripped = strip_type_arguments(type_text);
    let (base, dims) = split_array_dims(&stripped);
    let base = base
        .strip_prefix("?extends")
        .or_else(|| base.strip_prefix("?super"))
        .unwrap_or(base);

    let erased_base = match type_variables.iter().find(|(name, _)| name == base) {
        Some((_, Some(bound))) => {
            // Bounds referring to other type variables are erased one level only.
            simple_name(split_array_dims(&strip_type_arguments(bound)).0).to_string()
        }
        Some((_, None)) => "Object".to_string(),
        None => simple_name(base).to_string(),
    };

    let mut out = erased_base;
    for _ in 0..dims {
        out.push_str("[]");
    }
    out
}

/// Render an erased method signature: `name(T1,T2)`.
pub fn erased_signature<'p>(
    name: &str,
    parameter_types: impl IntoIterator<Item = &'p str>,
) -> String {
    let params: Vec<&str> = parameter_types.into_iter().collect();
    format!("{}({})", name, params.join(","))
}

/// Check if `name` is a valid Java identifier (keywords are not rejected).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
