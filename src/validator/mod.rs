//! Per-method docblock validation.
//!
//! Compares one method's `@param` / `@return` tags against its signature and
//! produces an ordered issue list. Within the parameter pass, extra-param
//! issues come first, then type mismatches, then the single order issue,
//! then missing-param issues; return issues always follow parameter issues.

use crate::comparator::are_compatible;
use crate::core::{Issue, IssueKind, MethodInfo};
use crate::parsers::docblock::{DocBlock, DocBlockParser};

pub struct MethodValidator {
    doc_parser: DocBlockParser,
}

impl Default for MethodValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodValidator {
    pub fn new() -> Self {
        Self {
            doc_parser: DocBlockParser::new(),
        }
    }

    /// Validate a method's documentation against its signature.
    ///
    /// Missing `@param` / `@return` tags are only reported when
    /// `report_missing` is set; mismatches and extras are always reported.
    pub fn validate(&mut self, method: &MethodInfo, report_missing: bool) -> Vec<Issue> {
        let doc = self.parse_doc(method);

        let mut issues = validate_params(method, doc.as_ref(), report_missing);
        issues.extend(validate_return(method, doc.as_ref(), report_missing));
        issues
    }

    pub fn validate_params(&mut self, method: &MethodInfo, report_missing: bool) -> Vec<Issue> {
        let doc = self.parse_doc(method);
        validate_params(method, doc.as_ref(), report_missing)
    }

    pub fn validate_return(&mut self, method: &MethodInfo, report_missing: bool) -> Vec<Issue> {
        let doc = self.parse_doc(method);
        validate_return(method, doc.as_ref(), report_missing)
    }

    fn parse_doc(&mut self, method: &MethodInfo) -> Option<DocBlock> {
        if !method.has_doc_comment() {
            return None;
        }
        method
            .doc_comment
            .as_deref()
            .map(|doc| self.doc_parser.parse(doc))
    }
}

fn validate_params(
    method: &MethodInfo,
    doc: Option<&DocBlock>,
    report_missing: bool,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    // A comment without @param tags counts the same as no comment here.
    let doc = match doc {
        Some(doc) if doc.has_param_tags() => doc,
        _ => {
            if report_missing {
                for (name, _) in &method.parameters {
                    issues.push(missing_param_issue(name));
                }
            }
            return issues;
        }
    };

    for (name, _) in doc.params() {
        if !method.has_param(name) {
            issues.push(Issue::new(
                IssueKind::ExtraParam,
                name,
                format!("Extra @param ${name} not in method signature"),
            ));
        }
    }

    for (name, doc_type) in doc.params() {
        if !method.has_param(name) {
            // Already reported as an extra param
            continue;
        }

        if let (Some(sig_type), Some(doc_type)) = (method.param_type(name), doc_type.as_deref()) {
            if !are_compatible(sig_type, doc_type) {
                issues.push(
                    Issue::new(
                        IssueKind::TypeMismatch,
                        name,
                        format!(
                            "Type mismatch for ${name}: signature has '{sig_type}', doc has '{doc_type}'"
                        ),
                    )
                    .with_types(sig_type, doc_type),
                );
            }
        }
    }

    if let Some(issue) = check_param_order(method, doc) {
        issues.push(issue);
    }

    if report_missing {
        for (name, _) in &method.parameters {
            if !doc.has_param(name) {
                issues.push(missing_param_issue(name));
            }
        }
    }

    issues
}

/// Compare documented tag order against declaration order, restricted to
/// the names present on both sides with each side's own relative order.
fn check_param_order(method: &MethodInfo, doc: &DocBlock) -> Option<Issue> {
    let doc_filtered: Vec<&str> = doc
        .param_order()
        .iter()
        .filter(|name| method.has_param(name))
        .map(String::as_str)
        .collect();

    let sig_filtered: Vec<&str> = method
        .parameters
        .iter()
        .filter(|(name, _)| doc.param_order().iter().any(|d| d == name))
        .map(|(name, _)| name.as_str())
        .collect();

    if doc_filtered.is_empty() || doc_filtered == sig_filtered {
        return None;
    }

    Some(
        Issue::new(
            IssueKind::ParamOrder,
            "@params",
            "Parameter order in @param tags does not match method signature",
        )
        .with_types(sig_filtered.join(", "), doc_filtered.join(", ")),
    )
}

fn validate_return(
    method: &MethodInfo,
    doc: Option<&DocBlock>,
    report_missing: bool,
) -> Vec<Issue> {
    // Constructors and destructors have no meaningful return semantics
    if matches!(method.name.as_str(), "__construct" | "__destruct") {
        return Vec::new();
    }

    let sig_return = method.return_type.as_deref();
    let wants_return_tag = sig_return.is_some_and(|ty| ty != "void");

    let Some(doc) = doc else {
        if report_missing && wants_return_tag {
            return vec![missing_return_issue(sig_return.unwrap_or_default())];
        }
        return Vec::new();
    };

    if report_missing && !doc.has_return_tag() && wants_return_tag {
        return vec![missing_return_issue(sig_return.unwrap_or_default())];
    }

    if let (Some(sig_type), Some(doc_type)) = (sig_return, doc.return_type()) {
        if !are_compatible(sig_type, doc_type) {
            return vec![
                Issue::new(
                    IssueKind::ReturnMismatch,
                    "@return",
                    format!(
                        "Return type mismatch: signature has '{sig_type}', doc has '{doc_type}'"
                    ),
                )
                .with_types(sig_type, doc_type),
            ];
        }
    }

    Vec::new()
}

fn missing_param_issue(name: &str) -> Issue {
    Issue::new(
        IssueKind::MissingParam,
        name,
        format!("Missing @param documentation for ${name}"),
    )
}

fn missing_return_issue(return_type: &str) -> Issue {
    Issue::new(
        IssueKind::MissingReturn,
        "@return",
        format!("Missing @return documentation for return type '{return_type}'"),
    )
}
