//! Low-level type-string manipulation: depth-aware union splitting and
//! balanced-bracket stripping.
//!
//! These scanners never reject malformed input. An unbalanced bracket lets
//! the depth counter go negative or never return to zero; the trailing
//! segment is still emitted. Callers get a best-effort partial result.

/// Split a union type into its constituent parts.
///
/// Splits on `|` only at nesting depth zero, so generics, callables, array
/// shapes, and list syntax stay intact (`array<int|string>|null` yields two
/// parts). Parts are trimmed, empties dropped, and the result is sorted
/// lexicographically for order-independent comparison.
pub fn split_union(type_str: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for ch in type_str.chars() {
        match ch {
            '<' | '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            '|' if depth == 0 => {
                let part = current.trim();
                if !part.is_empty() {
                    parts.push(part.to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let part = current.trim();
    if !part.is_empty() {
        parts.push(part.to_string());
    }

    parts.sort();
    parts
}

/// Strip generic parameters and array shapes for base-type comparison.
///
/// `array<string, int>` and `array{id: int}` both reduce to `array`.
pub fn strip_qualifiers(type_str: &str) -> String {
    let stripped = remove_balanced_brackets(type_str, '{', '}');
    remove_balanced_brackets(&stripped, '<', '>')
}

/// Extract the raw text inside the first top-level `<...>` pair.
///
/// `array<string, int>` yields `string, int`; types without generics (or
/// with an unterminated `<`) yield `None`.
pub fn extract_first_generic_parameter(type_str: &str) -> Option<String> {
    let start = type_str.find('<')?;
    let mut depth: i32 = 0;
    let mut param = String::new();

    for ch in type_str[start + 1..].chars() {
        match ch {
            '<' => {
                depth += 1;
                param.push(ch);
            }
            '>' => {
                if depth == 0 {
                    return Some(param.trim().to_string());
                }
                depth -= 1;
                param.push(ch);
            }
            _ => param.push(ch),
        }
    }

    None
}

/// Remove balanced bracket pairs, keeping only characters at depth zero.
///
/// The bracket characters themselves are dropped. A stray closer drives the
/// depth negative, which suppresses the remainder until it recovers.
pub fn remove_balanced_brackets(type_str: &str, open: char, close: char) -> String {
    let mut result = String::new();
    let mut depth: i32 = 0;

    for ch in type_str.chars() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
        } else if depth == 0 {
            result.push(ch);
        }
    }

    result
}

/// Multiset equality over two string lists, ignoring order.
pub fn set_equal(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut a_sorted = a.to_vec();
    let mut b_sorted = b.to_vec();
    a_sorted.sort();
    b_sorted.sort();

    a_sorted == b_sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_union() {
        assert_eq!(split_union("string|int"), vec!["int", "string"]);
    }

    #[test]
    fn splits_only_at_top_level() {
        assert_eq!(
            split_union("array<int|string>|null"),
            vec!["array<int|string>", "null"]
        );
        assert_eq!(
            split_union("callable(int|string): void|null"),
            vec!["callable(int|string): void", "null"]
        );
        assert_eq!(
            split_union("array{a: int|null}|false"),
            vec!["array{a: int|null}", "false"]
        );
    }

    #[test]
    fn split_trims_and_drops_empty_segments() {
        assert_eq!(split_union(" string | | int "), vec!["int", "string"]);
        assert_eq!(split_union(""), Vec::<String>::new());
    }

    #[test]
    fn split_tolerates_unbalanced_brackets() {
        // The trailing accumulated segment is still emitted.
        assert_eq!(split_union("array<string|int"), vec!["array<string|int"]);
        assert_eq!(split_union("foo>|bar"), vec!["foo>|bar"]);
    }

    #[test]
    fn strips_generics_and_shapes() {
        assert_eq!(strip_qualifiers("array<string, int>"), "array");
        assert_eq!(strip_qualifiers("array{id: int, name: string}"), "array");
        assert_eq!(strip_qualifiers("list<array{id: int}>"), "list");
        assert_eq!(strip_qualifiers("string"), "string");
    }

    #[test]
    fn strip_handles_nested_generics() {
        assert_eq!(strip_qualifiers("array<string, array<int>>"), "array");
    }

    #[test]
    fn extracts_first_generic_parameter() {
        assert_eq!(
            extract_first_generic_parameter("array<string, int>").as_deref(),
            Some("string, int")
        );
        assert_eq!(
            extract_first_generic_parameter("list<array<int>>").as_deref(),
            Some("array<int>")
        );
        assert_eq!(extract_first_generic_parameter("string"), None);
        assert_eq!(extract_first_generic_parameter("array<unterminated"), None);
    }

    #[test]
    fn set_equal_ignores_order() {
        let a = vec!["int".to_string(), "string".to_string()];
        let b = vec!["string".to_string(), "int".to_string()];
        assert!(set_equal(&a, &b));
    }

    #[test]
    fn set_equal_respects_multiplicity() {
        let a = vec!["int".to_string(), "int".to_string()];
        let b = vec!["int".to_string()];
        assert!(!set_equal(&a, &b));
    }
}
