//! Stateless predicates recognizing type-string patterns.

/// Native PHP type keywords.
///
/// Anything outside this registry is treated as a class name. A future PHP
/// reserved type missing from the list will be misclassified; that is the
/// accepted tradeoff of working without a symbol table.
pub static NATIVE_TYPES: &[&str] = &[
    "string", "int", "float", "bool", "array", "object", "callable", "iterable", "null", "void",
    "never", "mixed", "true", "false", "self", "static", "parent", "resource",
];

/// Membership test against the native type registry.
pub fn is_native_type(type_str: &str) -> bool {
    NATIVE_TYPES.contains(&type_str)
}

/// Whether a type looks like a class name (not a native keyword).
pub fn is_class_name_like(type_str: &str) -> bool {
    !is_native_type(type_str.trim_start_matches('\\'))
}

/// Whether a type looks like a template parameter (`T`, `TValue`, `TKey`).
///
/// A leading backslash is tolerated (type resolvers sometimes qualify a bare
/// `T` as a class), but any further namespace separator disqualifies it.
pub fn is_template_placeholder(type_str: &str) -> bool {
    let ty = type_str.trim_start_matches('\\');

    if ty.contains('\\') {
        return false;
    }

    let mut chars = ty.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Whether a type is a quoted string literal (`"low"`, `'high'`).
pub fn is_string_literal(type_str: &str) -> bool {
    let mut chars = type_str.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return false;
    };

    (first == '"' || first == '\'')
        && last == first
        && !chars.any(|c| c == '"' || c == '\'')
}

/// Whether a type is an integer literal (`0`, `42`, `-1`).
pub fn is_int_literal(type_str: &str) -> bool {
    let digits = type_str.strip_prefix('-').unwrap_or(type_str);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
