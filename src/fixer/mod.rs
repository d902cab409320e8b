//! Automatic docblock rewriting.
//!
//! Fixes the mechanical issue kinds: parameter order is always fixed,
//! missing `@param` / `@return` tags only when requested. Methods are
//! processed bottom-up so earlier edits never shift the line numbers of
//! methods still to be fixed. Type mismatches are never rewritten, those
//! need a human decision.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::core::errors::Result;
use crate::core::{Issue, IssueKind, MethodInfo};

static PARAM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\s*@param\s+\S+\s+\$(\w+)").expect("static pattern"));
static RETURN_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\s*@return\s").expect("static pattern"));
static LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*").expect("static pattern"));

/// Span of an existing docblock in a file's line buffer.
struct DocBlockSpan {
    start: usize,
    end: usize,
    indent: String,
}

pub struct DocBlockFixer {
    fix_missing: bool,
}

impl DocBlockFixer {
    pub fn new(fix_missing: bool) -> Self {
        Self { fix_missing }
    }

    /// Apply fixes to one file, given each method's detected issues.
    ///
    /// Returns the number of fixes applied; the file is only rewritten when
    /// that count is non-zero.
    pub fn fix_file(&self, path: &Path, methods: &[(MethodInfo, Vec<Issue>)]) -> Result<usize> {
        let content = fs::read_to_string(path)?;
        let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

        // Bottom-up keeps line numbers stable for the methods still pending
        let mut ordered: Vec<&(MethodInfo, Vec<Issue>)> = methods.iter().collect();
        ordered.sort_by(|a, b| b.0.line.cmp(&a.0.line));

        let mut fix_count = 0;
        for (method, issues) in ordered {
            fix_count += self.fix_method(&mut lines, method, issues);
        }

        if fix_count > 0 {
            fs::write(path, lines.join("\n"))?;
        }

        Ok(fix_count)
    }

    fn fix_method(&self, lines: &mut Vec<String>, method: &MethodInfo, issues: &[Issue]) -> usize {
        let fix_order = issues.iter().any(|i| i.kind == IssueKind::ParamOrder);
        let missing_params: Vec<&str> = if self.fix_missing {
            issues
                .iter()
                .filter(|i| i.kind == IssueKind::MissingParam)
                .map(|i| i.subject.as_str())
                .collect()
        } else {
            Vec::new()
        };
        let add_return = self.fix_missing
            && issues.iter().any(|i| i.kind == IssueKind::MissingReturn);

        if !fix_order && missing_params.is_empty() && !add_return {
            return 0;
        }

        let mut fix_count = 0;

        match find_doc_block(lines, method.line) {
            Some(span) if method.has_doc_comment() => {
                if fix_order {
                    fix_param_order(lines, &span, method);
                    fix_count += 1;
                }
                if !missing_params.is_empty() {
                    // Re-locate after the order rewrite, which may have
                    // changed the block length.
                    if let Some(span) = find_doc_block(lines, method.line) {
                        add_missing_params(lines, &span, method, &missing_params);
                        fix_count += missing_params.len();
                    }
                }
                if add_return {
                    if let Some(span) = find_doc_block(lines, method.line) {
                        if add_missing_return(lines, &span, method) {
                            fix_count += 1;
                        }
                    }
                }
            }
            _ => {
                if !missing_params.is_empty() || add_return {
                    fix_count +=
                        create_doc_block(lines, method, &missing_params, add_return);
                }
            }
        }

        fix_count
    }
}

/// Walk backwards from the method line, over blank lines, to the `*/` end
/// of a docblock, then up to its `/**` opening line.
fn find_doc_block(lines: &[String], method_line: usize) -> Option<DocBlockSpan> {
    let method_index = method_line.checked_sub(1)?;

    let mut index = method_index.checked_sub(1)?;
    while lines.get(index).is_some_and(|l| l.trim().is_empty()) {
        index = index.checked_sub(1)?;
    }

    if !lines.get(index)?.trim().ends_with("*/") {
        return None;
    }
    let end = index;

    loop {
        let line = lines.get(index)?;
        if line.trim().starts_with("/**") {
            let indent = LEADING_WS
                .find(line)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return Some(DocBlockSpan {
                start: index,
                end,
                indent,
            });
        }
        index = index.checked_sub(1)?;
    }
}

/// Rebuild the docblock with `@param` lines in signature order. Description
/// lines stay where they are; the `@return` line goes after the params.
fn fix_param_order(lines: &mut Vec<String>, span: &DocBlockSpan, method: &MethodInfo) {
    let doc_lines: Vec<String> = lines[span.start..=span.end].to_vec();

    let mut param_lines: Vec<(String, String)> = Vec::new();
    let mut other_lines: Vec<String> = Vec::new();
    let mut return_line: Option<String> = None;

    for line in &doc_lines {
        let trimmed = line.trim();

        if let Some(captures) = PARAM_LINE.captures(trimmed) {
            param_lines.push((captures[1].to_string(), line.clone()));
        } else if RETURN_LINE.is_match(trimmed) {
            return_line = Some(line.clone());
        } else {
            other_lines.push(line.clone());
        }
    }

    let mut rebuilt: Vec<String> = Vec::new();
    for line in &other_lines {
        if line.trim() == "*/" {
            break;
        }
        rebuilt.push(line.clone());
    }

    for (name, _) in &method.parameters {
        if let Some((_, line)) = param_lines.iter().find(|(param, _)| param == name) {
            rebuilt.push(line.clone());
        }
    }

    if let Some(line) = return_line {
        rebuilt.push(line);
    }
    rebuilt.push(format!("{} */", span.indent));

    lines.splice(span.start..=span.end, rebuilt);
}

/// Insert generated `@param` lines before the `@return` tag or the closing
/// `*/`, in signature order. Untyped parameters are documented as `mixed`.
fn add_missing_params(
    lines: &mut Vec<String>,
    span: &DocBlockSpan,
    method: &MethodInfo,
    missing: &[&str],
) {
    let mut insert_index = span.end;
    for i in span.start..=span.end {
        let trimmed = lines[i].trim();
        if trimmed.starts_with("* @return") || trimmed == "*/" {
            insert_index = i;
            break;
        }
    }

    let new_lines: Vec<String> = method
        .parameters
        .iter()
        .filter(|(name, _)| missing.contains(&name.as_str()))
        .map(|(name, ty)| {
            let ty = ty.as_deref().unwrap_or("mixed");
            format!("{} * @param {ty} ${name}", span.indent)
        })
        .collect();

    lines.splice(insert_index..insert_index, new_lines);
}

fn add_missing_return(lines: &mut Vec<String>, span: &DocBlockSpan, method: &MethodInfo) -> bool {
    let Some(return_type) = method.return_type.as_deref() else {
        return false;
    };

    let new_line = format!("{} * @return {return_type}", span.indent);
    lines.splice(span.end..span.end, [new_line]);
    true
}

/// Generate a fresh docblock directly above an undocumented method.
fn create_doc_block(
    lines: &mut Vec<String>,
    method: &MethodInfo,
    missing: &[&str],
    add_return: bool,
) -> usize {
    let method_index = method.line.saturating_sub(1);
    let indent = lines
        .get(method_index)
        .and_then(|l| LEADING_WS.find(l))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let mut doc_lines = vec![format!("{indent}/**")];
    let mut fix_count = 0;

    for (name, ty) in &method.parameters {
        if missing.contains(&name.as_str()) {
            let ty = ty.as_deref().unwrap_or("mixed");
            doc_lines.push(format!("{indent} * @param {ty} ${name}"));
            fix_count += 1;
        }
    }

    if add_return {
        if let Some(return_type) = method.return_type.as_deref() {
            doc_lines.push(format!("{indent} * @return {return_type}"));
            fix_count += 1;
        }
    }

    doc_lines.push(format!("{indent} */"));
    lines.splice(method_index..method_index, doc_lines);
    fix_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_fixture(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixture.php");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn method(
        name: &str,
        line: usize,
        params: &[(&str, Option<&str>)],
        return_type: Option<&str>,
        doc: Option<&str>,
    ) -> MethodInfo {
        MethodInfo {
            name: name.to_string(),
            line,
            parameters: params
                .iter()
                .map(|(n, t)| (n.to_string(), t.map(str::to_string)))
                .collect(),
            return_type: return_type.map(str::to_string),
            doc_comment: doc.map(str::to_string),
            class_name: None,
        }
    }

    fn order_issue() -> Issue {
        Issue::new(IssueKind::ParamOrder, "@params", "order")
    }

    fn missing_param(name: &str) -> Issue {
        Issue::new(IssueKind::MissingParam, name, "missing")
    }

    fn missing_return() -> Issue {
        Issue::new(IssueKind::MissingReturn, "@return", "missing")
    }

    #[test]
    fn reorders_param_tags_to_signature_order() {
        let source = indoc! {r#"
            <?php
            /**
             * Swaps values.
             *
             * @param string $second
             * @param int $first
             */
            function swap(int $first, string $second): void {}
        "#};
        let (_dir, path) = write_fixture(source);

        let m = method(
            "swap",
            8,
            &[("first", Some("int")), ("second", Some("string"))],
            Some("void"),
            Some("/** placeholder */"),
        );

        let fixed = DocBlockFixer::new(false)
            .fix_file(&path, &[(m, vec![order_issue()])])
            .unwrap();
        assert_eq!(fixed, 1);

        let expected = indoc! {r#"
            <?php
            /**
             * Swaps values.
             *
             * @param int $first
             * @param string $second
             */
            function swap(int $first, string $second): void {}
        "#};
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn reorder_keeps_return_after_params() {
        let source = indoc! {r#"
            <?php
            /**
             * @param string $b
             * @return bool
             * @param int $a
             */
            function f(int $a, string $b): bool { return true; }
        "#};
        let (_dir, path) = write_fixture(source);

        let m = method(
            "f",
            7,
            &[("a", Some("int")), ("b", Some("string"))],
            Some("bool"),
            Some("/** placeholder */"),
        );

        DocBlockFixer::new(false)
            .fix_file(&path, &[(m, vec![order_issue()])])
            .unwrap();

        let expected = indoc! {r#"
            <?php
            /**
             * @param int $a
             * @param string $b
             * @return bool
             */
            function f(int $a, string $b): bool { return true; }
        "#};
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn adds_missing_params_before_return_tag() {
        let source = indoc! {r#"
            <?php
            /**
             * @param int $a
             * @return void
             */
            function f(int $a, string $b): void {}
        "#};
        let (_dir, path) = write_fixture(source);

        let m = method(
            "f",
            6,
            &[("a", Some("int")), ("b", Some("string"))],
            Some("void"),
            Some("/** placeholder */"),
        );

        let fixed = DocBlockFixer::new(true)
            .fix_file(&path, &[(m, vec![missing_param("b")])])
            .unwrap();
        assert_eq!(fixed, 1);

        let expected = indoc! {r#"
            <?php
            /**
             * @param int $a
             * @param string $b
             * @return void
             */
            function f(int $a, string $b): void {}
        "#};
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn adds_missing_return_before_closing() {
        let source = indoc! {r#"
            <?php
            /**
             * @param int $a
             */
            function f(int $a): string { return ''; }
        "#};
        let (_dir, path) = write_fixture(source);

        let m = method(
            "f",
            5,
            &[("a", Some("int"))],
            Some("string"),
            Some("/** placeholder */"),
        );

        DocBlockFixer::new(true)
            .fix_file(&path, &[(m, vec![missing_return()])])
            .unwrap();

        let expected = indoc! {r#"
            <?php
            /**
             * @param int $a
             * @return string
             */
            function f(int $a): string { return ''; }
        "#};
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn creates_docblock_for_undocumented_method() {
        let source = indoc! {r#"
            <?php
            class C {
                public function f(int $a, $b): string { return ''; }
            }
        "#};
        let (_dir, path) = write_fixture(source);

        let m = method(
            "f",
            3,
            &[("a", Some("int")), ("b", None)],
            Some("string"),
            None,
        );

        let fixed = DocBlockFixer::new(true)
            .fix_file(
                &path,
                &[(m, vec![missing_param("a"), missing_param("b"), missing_return()])],
            )
            .unwrap();
        assert_eq!(fixed, 3);

        let expected = indoc! {r#"
            <?php
            class C {
                /**
                 * @param int $a
                 * @param mixed $b
                 * @return string
                 */
                public function f(int $a, $b): string { return ''; }
            }
        "#};
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn missing_fixes_require_opt_in() {
        let source = indoc! {r#"
            <?php
            function f(int $a): string { return ''; }
        "#};
        let (_dir, path) = write_fixture(source);

        let m = method("f", 2, &[("a", Some("int"))], Some("string"), None);

        let fixed = DocBlockFixer::new(false)
            .fix_file(&path, &[(m, vec![missing_param("a"), missing_return()])])
            .unwrap();
        assert_eq!(fixed, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
    }

    #[test]
    fn fixes_multiple_methods_bottom_up() {
        let source = indoc! {r#"
            <?php
            function first(int $a): void {}

            function second(string $b): void {}
        "#};
        let (_dir, path) = write_fixture(source);

        let methods = vec![
            (
                method("first", 2, &[("a", Some("int"))], Some("void"), None),
                vec![missing_param("a")],
            ),
            (
                method("second", 4, &[("b", Some("string"))], Some("void"), None),
                vec![missing_param("b")],
            ),
        ];

        let fixed = DocBlockFixer::new(true).fix_file(&path, &methods).unwrap();
        assert_eq!(fixed, 2);

        let expected = indoc! {r#"
            <?php
            /**
             * @param int $a
             */
            function first(int $a): void {}

            /**
             * @param string $b
             */
            function second(string $b): void {}
        "#};
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn type_mismatches_are_left_alone() {
        let source = indoc! {r#"
            <?php
            /**
             * @param string $a
             */
            function f(int $a): void {}
        "#};
        let (_dir, path) = write_fixture(source);

        let m = method(
            "f",
            5,
            &[("a", Some("int"))],
            Some("void"),
            Some("/** placeholder */"),
        );
        let issue = Issue::new(IssueKind::TypeMismatch, "a", "mismatch");

        let fixed = DocBlockFixer::new(true).fix_file(&path, &[(m, vec![issue])]).unwrap();
        assert_eq!(fixed, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), source);
    }
}
