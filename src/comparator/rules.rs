//! The compatibility rule set: a closed, ordered table of narrowly-scoped
//! rules, each deciding whether one documented-type family is acceptable for
//! one signature-type base.
//!
//! Rules are consulted in table order and the first rule whose `applies` and
//! `compatible` both hold wins. Inputs are normalized (lower-cased) type
//! strings; each rule strips generic/shape qualifiers where it compares
//! bases, but a few (conditional types, generic classes) inspect the full
//! text.

use super::classifier;
use super::parser::strip_qualifiers;

/// PHPDoc string subtypes compatible with a native `string`.
static STRING_SUBTYPES: &[&str] = &[
    "class-string",
    "non-empty-string",
    "numeric-string",
    "callable-string",
    "literal-string",
    "lowercase-string",
    "truthy-string",
    "non-falsy-string",
    "trait-string",
    "interface-string",
];

/// PHPDoc int subtypes compatible with a native `int`.
static INT_SUBTYPES: &[&str] = &[
    "positive-int",
    "negative-int",
    "non-negative-int",
    "non-positive-int",
    "int-mask",
    "int-mask-of",
];

/// One compatibility rule. The set is closed and enumerable by design;
/// adding a rule means adding a variant and a slot in [`RULE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Array,
    String,
    StringLiteral,
    Int,
    Callable,
    Object,
    Iterable,
    Template,
    KeyOf,
    ValueOf,
    Conditional,
    GenericClass,
    ArrayKey,
    Scalar,
    Numeric,
    Never,
    Resource,
}

/// Dispatch order. Observable behavior depends on it: the engine stops at
/// the first rule that both applies and accepts.
pub static RULE_ORDER: &[Rule] = &[
    Rule::Array,
    Rule::String,
    Rule::StringLiteral,
    Rule::Int,
    Rule::Callable,
    Rule::Object,
    Rule::Iterable,
    Rule::Template,
    Rule::KeyOf,
    Rule::ValueOf,
    Rule::Conditional,
    Rule::GenericClass,
    Rule::ArrayKey,
    Rule::Scalar,
    Rule::Numeric,
    Rule::Never,
    Rule::Resource,
];

/// Pre-computed views of one (signature, documented) pairing, shared by
/// every rule so the bases are stripped once.
pub struct RulePair<'a> {
    pub sig: &'a str,
    pub doc: &'a str,
    pub sig_base: String,
    pub doc_base: String,
}

impl<'a> RulePair<'a> {
    pub fn new(sig: &'a str, doc: &'a str) -> Self {
        Self {
            sig,
            doc,
            sig_base: strip_qualifiers(sig),
            doc_base: strip_qualifiers(doc),
        }
    }
}

impl Rule {
    /// Whether this rule is in scope for the pairing.
    pub fn applies(&self, pair: &RulePair<'_>) -> bool {
        match self {
            Rule::Array => pair.sig_base == "array",
            Rule::String | Rule::StringLiteral => pair.sig_base == "string",
            Rule::Int => pair.sig_base == "int",
            Rule::Callable => pair.sig_base == "callable" || pair.sig_base == "closure",
            Rule::Object => pair.sig_base == "object",
            Rule::Iterable => pair.sig_base == "iterable",
            Rule::Template => pair.sig_base == "mixed",
            Rule::KeyOf => pair.doc_base == "key-of",
            Rule::ValueOf => pair.doc_base == "value-of",
            Rule::Conditional => pair.doc.contains(" is ") && pair.doc.contains(" ? "),
            Rule::GenericClass => pair.doc.contains('<') && !pair.sig.contains('<'),
            Rule::ArrayKey => pair.doc_base == "array-key",
            Rule::Scalar => pair.doc_base == "scalar",
            Rule::Numeric => pair.doc_base == "numeric",
            Rule::Never => pair.sig_base == "never",
            Rule::Resource => pair.sig_base == "resource",
        }
    }

    /// Whether the documented type is acceptable, given that the rule
    /// applies.
    pub fn compatible(&self, pair: &RulePair<'_>) -> bool {
        match self {
            Rule::Array => {
                let doc = pair.doc_base.as_str();
                doc.ends_with("[]")
                    || doc.starts_with("array")
                    || doc.starts_with("list")
                    || doc.starts_with("non-empty-list")
                    || doc.starts_with("non-empty-array")
                    || doc == "callable-array"
            }
            Rule::String => {
                STRING_SUBTYPES
                    .iter()
                    .any(|subtype| pair.doc_base.starts_with(subtype))
                    || pair.doc_base.contains("-string")
            }
            Rule::StringLiteral => classifier::is_string_literal(&pair.doc_base),
            Rule::Int => {
                INT_SUBTYPES
                    .iter()
                    .any(|subtype| pair.doc_base.starts_with(subtype))
                    || pair.doc.starts_with("int<")
                    || pair.doc_base.contains("-int")
                    || classifier::is_int_literal(&pair.doc_base)
            }
            Rule::Callable => {
                // callable and Closure are interchangeable, and a bare
                // keyword accepts its parameterized spelling
                (pair.sig_base == "callable" && pair.doc_base == "closure")
                    || (pair.sig_base == "closure" && pair.doc_base == "callable")
                    || (pair.sig_base == "callable" && pair.doc.starts_with("callable("))
                    || (pair.sig_base == "closure" && pair.doc.starts_with("closure("))
            }
            Rule::Object => {
                pair.doc.starts_with("object{")
                    || pair.doc.starts_with("object<")
                    || classifier::is_class_name_like(&pair.doc_base)
            }
            Rule::Iterable => pair.doc_base.starts_with("iterable"),
            Rule::Template => classifier::is_template_placeholder(&pair.doc_base),
            Rule::KeyOf => matches!(
                pair.sig_base.as_str(),
                "string" | "int" | "array-key" | "int|string" | "string|int"
            ),
            Rule::ValueOf => matches!(
                pair.sig_base.as_str(),
                "mixed" | "string" | "int" | "float" | "bool" | "array"
            ),
            // A conditional type's outcome is statically undecidable, so it
            // is only accepted against mixed
            Rule::Conditional => pair.sig_base == "mixed",
            Rule::GenericClass => match pair.doc.split_once('<') {
                Some((doc_head, _)) => doc_head.eq_ignore_ascii_case(pair.sig),
                None => false,
            },
            Rule::ArrayKey => matches!(pair.sig_base.as_str(), "int|string" | "string|int"),
            Rule::Scalar => {
                let scalar = ["int", "float", "string", "bool"];
                scalar.contains(&pair.sig_base.as_str())
                    || pair
                        .sig_base
                        .split('|')
                        .all(|part| scalar.contains(&part.trim()))
            }
            Rule::Numeric => matches!(
                pair.sig_base.as_str(),
                "int" | "float" | "int|float" | "float|int"
            ),
            Rule::Never => matches!(
                pair.doc_base.as_str(),
                "never-return" | "never-returns" | "no-return" | "noreturn"
            ),
            Rule::Resource => matches!(
                pair.doc_base.as_str(),
                "closed-resource" | "open-resource"
            ),
        }
    }
}

/// Run the rule table in order; true on the first rule whose scope and
/// acceptance both hold.
pub fn accepts(sig: &str, doc: &str) -> bool {
    let pair = RulePair::new(sig, doc);
    RULE_ORDER
        .iter()
        .any(|rule| rule.applies(&pair) && rule.compatible(&pair))
}
