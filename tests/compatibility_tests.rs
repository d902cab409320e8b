//! Type-compatibility engine behavior across the documented PHPDoc syntax.

use phpdoc_lint::{are_compatible, normalize};

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "?string",
        "\\App\\Models\\User",
        "Integer|Boolean",
        "array<string, int>",
        "B|A|null",
        "Countable&Traversable",
        "  float  ",
    ];

    for sample in samples {
        let once = normalize(sample).unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice, "normalize not idempotent for {sample:?}");
    }
}

#[test]
fn normalization_canonicalizes_equivalent_spellings() {
    assert_eq!(normalize("?string"), normalize("string|null"));
    assert_eq!(normalize("integer"), normalize("int"));
    assert_eq!(normalize("B|A"), normalize("a|b"));
    assert_eq!(normalize("\\DateTime"), normalize("DateTime"));
    assert_eq!(normalize(""), None);
    assert_eq!(normalize("   "), None);
}

#[test]
fn scalar_and_numeric_pseudo_types() {
    // A documented `scalar` is acceptable for any scalar signature
    assert!(are_compatible("int", "scalar"));
    assert!(are_compatible("string", "scalar"));
    assert!(are_compatible("bool|int|string", "scalar"));
    assert!(!are_compatible("array", "scalar"));

    assert!(are_compatible("float", "numeric"));
    assert!(are_compatible("int|float", "numeric"));
    assert!(!are_compatible("string", "numeric"));
}

#[test]
fn array_family() {
    assert!(are_compatible("array", "string[]"));
    assert!(are_compatible("array", "array<int, string>"));
    assert!(are_compatible("array", "non-empty-array"));
    assert!(are_compatible("array", "list<string>"));
    assert!(are_compatible("array", "array{id: int, name: string}"));
    assert!(!are_compatible("array", "string"));
}

#[test]
fn string_family() {
    assert!(are_compatible("string", "class-string"));
    assert!(are_compatible("string", "class-string<Model>"));
    assert!(are_compatible("string", "non-empty-string"));
    assert!(are_compatible("string", "numeric-string"));
    assert!(are_compatible("string", "'literal'"));
    assert!(are_compatible("string", "\"double-quoted\""));
    assert!(!are_compatible("string", "int"));
}

#[test]
fn int_family() {
    assert!(are_compatible("int", "positive-int"));
    assert!(are_compatible("int", "negative-int"));
    assert!(are_compatible("int", "int<0, 100>"));
    assert!(are_compatible("int", "42"));
    assert!(are_compatible("int", "-1"));
    assert!(!are_compatible("int", "string"));
}

#[test]
fn callable_and_closure() {
    assert!(are_compatible("callable", "Closure"));
    assert!(are_compatible("callable", "\\Closure"));
    assert!(are_compatible("callable", "callable(int): string"));
    assert!(are_compatible("Closure", "callable"));
}

#[test]
fn object_shapes_and_classes() {
    assert!(are_compatible("object", "MyClass"));
    assert!(are_compatible("object", "object{id: int}"));
    assert!(!are_compatible("MyClass", "object"));
}

#[test]
fn iterable_family() {
    assert!(are_compatible("iterable", "iterable<string>"));
    assert!(are_compatible("iterable", "iterable<int, string>"));
    assert!(!are_compatible("iterable", "string"));
}

#[test]
fn mixed_and_templates() {
    assert!(are_compatible("mixed", "TValue"));
    assert!(are_compatible("mixed", "T"));
    assert!(are_compatible("mixed", "($flag is true ? int : string)"));
    assert!(!are_compatible("int", "($flag is true ? int : string)"));
}

#[test]
fn key_of_and_value_of_pseudo_types() {
    assert!(are_compatible("string", "key-of<self::MAP>"));
    assert!(are_compatible("int|string", "key-of<self::MAP>"));
    assert!(!are_compatible("float", "key-of<self::MAP>"));
    assert!(are_compatible("mixed", "value-of<self::MAP>"));
    assert!(are_compatible("array", "value-of<self::MAP>"));
}

#[test]
fn never_and_resource() {
    assert!(are_compatible("never", "noreturn"));
    assert!(are_compatible("never", "no-return"));
    assert!(are_compatible("resource", "closed-resource"));
    assert!(are_compatible("resource", "open-resource"));
}

#[test]
fn generic_class_references() {
    assert!(are_compatible("Collection", "Collection<int, User>"));
    assert!(!are_compatible("Collection", "OtherThing<User>"));
}

#[test]
fn union_matching_is_member_wise() {
    assert!(are_compatible("int|string", "string|int"));
    assert!(are_compatible("array|null", "string[]|null"));
    assert!(are_compatible("int|string|null", "positive-int|class-string|null"));

    // Every signature member must find a documented partner
    assert!(!are_compatible("int|string", "int"));
    // Leftover documented members fail unless they are literals under string
    assert!(!are_compatible("int", "int|string"));
    assert!(are_compatible("string|null", "'a'|'b'|null"));
}

#[test]
fn nullable_shorthand() {
    assert!(are_compatible("?int", "int|null"));
    assert!(are_compatible("int|null", "?int"));
    assert!(are_compatible("?array", "array<string>|null"));
}

#[test]
fn direction_matters() {
    // Widening the documented side is not accepted
    assert!(!are_compatible("positive-int", "int"));
    assert!(!are_compatible("class-string", "string"));
    assert!(!are_compatible("non-empty-array", "array"));
}

#[test]
fn unrelated_classes_are_incompatible() {
    assert!(!are_compatible("DateTime", "DateInterval"));
    assert!(!are_compatible("App\\User", "App\\Order"));
    assert!(are_compatible("App\\User", "\\App\\User"));
}
