//! Type-compatibility engine.
//!
//! Decides whether a documented type string is acceptable for a signature
//! type string. Both sides are compared syntactically — no symbol table, no
//! inheritance resolution. The comparison is direction-sensitive:
//! `object` accepts `MyClass`, but `MyClass` does not accept `object`.

pub mod classifier;
pub mod normalizer;
pub mod parser;
pub mod rules;

pub use normalizer::normalize;

use classifier::{is_string_literal, is_template_placeholder};
use parser::{set_equal, split_union, strip_qualifiers};

/// Check whether a documented type is compatible with a signature type.
///
/// The pipeline: normalize both sides, try exact and union-set equality,
/// then part-by-part union matching, then base equality with generics and
/// shapes stripped, and finally the rule table. An absent type on either
/// side (blank input) is incomparable and yields `false`.
///
/// Stateless and side-effect-free; safe to call concurrently and cacheable
/// by input value.
pub fn are_compatible(signature_type: &str, doc_type: &str) -> bool {
    let (Some(norm_sig), Some(norm_doc)) = (normalize(signature_type), normalize(doc_type)) else {
        return false;
    };

    if norm_sig == norm_doc {
        return true;
    }

    let sig_parts = split_union(&norm_sig);
    let doc_parts = split_union(&norm_doc);

    if set_equal(&sig_parts, &doc_parts) {
        return true;
    }

    // Union matching inspects the documented parts in their original casing
    // so string literals and template placeholders are still recognizable.
    let raw_doc_parts = split_union(doc_type.trim());
    if match_union_parts(&sig_parts, &raw_doc_parts) {
        return true;
    }

    if strip_qualifiers(&norm_sig) == strip_qualifiers(&norm_doc) {
        return true;
    }

    rules::accepts(&norm_sig, &norm_doc)
}

/// Greedy part-by-part union matching.
///
/// Each signature part claims the first still-unclaimed documented part it
/// is compatible with; leftover documented parts are only tolerated when
/// they are string literals covered by a matched `string` signature part.
///
/// The assignment is greedy and never backtracks, so ambiguous multi-part
/// unions can produce a false negative. That behavior is contractual — an
/// optimal bipartite matching would change observable results.
fn match_union_parts(sig_parts: &[String], doc_parts: &[String]) -> bool {
    if sig_parts.is_empty() || doc_parts.is_empty() {
        return false;
    }

    let mut claimed = vec![false; doc_parts.len()];

    for sig_part in sig_parts {
        let matched = doc_parts.iter().enumerate().find(|(i, candidate)| {
            !claimed[*i] && part_accepts(sig_part, candidate)
        });

        match matched {
            Some((i, _)) => claimed[i] = true,
            None => return false,
        }
    }

    // Every unclaimed documented part must be a literal narrowing of a
    // matched string signature part.
    let has_string_part = sig_parts.iter().any(|p| p == "string");
    doc_parts
        .iter()
        .zip(&claimed)
        .all(|(candidate, claimed)| *claimed || (has_string_part && is_string_literal(candidate)))
}

/// Whether one signature union member accepts one documented union member.
fn part_accepts(sig_part: &str, candidate: &str) -> bool {
    if sig_part == "string" && is_string_literal(candidate) {
        return true;
    }

    let candidate_base = strip_qualifiers(candidate);
    if strip_qualifiers(sig_part).eq_ignore_ascii_case(&candidate_base) {
        return true;
    }

    if rules::accepts(sig_part, &candidate.to_lowercase()) {
        return true;
    }

    sig_part == "mixed" && is_template_placeholder(candidate)
}
