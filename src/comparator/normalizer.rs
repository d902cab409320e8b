//! Canonicalizes raw type strings into a stable comparable form.

use once_cell::sync::Lazy;
use regex::Regex;

use super::parser::split_union;

/// Long-form aliases rewritten to their canonical spelling, whole-word and
/// case-insensitive. `boolean` inside `boolean-ish` is left alone.
static TYPE_ALIASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("boolean", "bool"),
        ("integer", "int"),
        ("double", "float"),
        ("real", "float"),
        ("callback", "callable"),
    ]
    .iter()
    .map(|(alias, canonical)| {
        let pattern = Regex::new(&format!(r"(?i)\b{alias}\b")).expect("static alias pattern");
        (pattern, *canonical)
    })
    .collect()
});

static BACKSLASH_BEFORE_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([A-Za-z])").expect("static pattern"));

/// Normalize a type string for comparison.
///
/// Blank input yields `None` ("no type", never comparable). Otherwise the
/// text is trimmed, fully-qualified names collapse to bare names, nullable
/// `?T` becomes `T|null`, legacy aliases are rewritten, top-level union and
/// intersection members are sorted, and the whole result is lower-cased.
///
/// The function is pure and idempotent: normalizing a normalized value is a
/// no-op.
pub fn normalize(type_str: &str) -> Option<String> {
    if type_str.trim().is_empty() {
        return None;
    }

    let mut ty = type_str.trim().to_string();

    // Fully qualified class names collapse to bare names
    ty = ty.trim_start_matches('\\').to_string();
    ty = BACKSLASH_BEFORE_LETTER.replace_all(&ty, "$1").into_owned();

    // Nullable syntax becomes a union with null
    if let Some(rest) = ty.strip_prefix('?') {
        ty = format!("{rest}|null");
    }

    for (pattern, canonical) in TYPE_ALIASES.iter() {
        ty = pattern.replace_all(&ty, *canonical).into_owned();
    }

    // Sort union members for order-independent comparison. Callable
    // signatures contain parentheses and are left as-is.
    if ty.contains('|') && !ty.contains('(') {
        let parts: Vec<String> = {
            let mut parts: Vec<String> = split_union(&ty)
                .into_iter()
                .map(|p| p.to_lowercase())
                .collect();
            parts.sort();
            parts
        };
        ty = parts.join("|");
    }

    // Same treatment for intersection members
    if ty.contains('&') && !ty.contains('(') {
        let mut parts: Vec<String> = ty
            .split('&')
            .map(|p| p.trim().to_lowercase())
            .collect();
        parts.sort();
        ty = parts.join("&");
    }

    Some(ty.to_lowercase())
}
