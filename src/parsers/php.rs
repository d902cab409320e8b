//! PHP signature extraction via tree-sitter.
//!
//! Walks a parsed tree collecting every function and method with its
//! parameter types, return type, and the `/** ... */` comment immediately
//! preceding it. Type text is taken verbatim from the source so nullable
//! (`?Foo`), union (`A|B`), and intersection (`A&B`) spellings survive
//! untouched.

use anyhow::{Context, Result};
use tree_sitter::{Node, Parser};

use crate::core::MethodInfo;

pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .context("Failed to set PHP language")?;
        Ok(Self { parser })
    }

    /// Extract all functions and methods from PHP source.
    ///
    /// Returns `Err` with a positioned message when the grammar reports a
    /// syntax error; callers surface that as a per-file parse error rather
    /// than aborting the run.
    pub fn extract_methods(&mut self, content: &str) -> Result<Vec<MethodInfo>> {
        let tree = self
            .parser
            .parse(content, None)
            .context("Failed to parse PHP content")?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(root).unwrap_or(1);
            anyhow::bail!("Parse error near line {line}");
        }

        let mut methods = Vec::new();
        collect_methods(root, content, None, &mut methods);
        Ok(methods)
    }
}

fn collect_methods(node: Node, source: &str, class: Option<&str>, out: &mut Vec<MethodInfo>) {
    match node.kind() {
        "class_declaration" | "interface_declaration" | "trait_declaration"
        | "enum_declaration" => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(n, source).to_string());

            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_methods(child, source, name.as_deref(), out);
            }
            return;
        }
        "method_declaration" => {
            out.push(extract_method(node, source, class));
        }
        "function_definition" => {
            // Free functions carry no owner even when nested in a method body
            out.push(extract_method(node, source, None));
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_methods(child, source, class, out);
    }
}

fn extract_method(node: Node, source: &str, class: Option<&str>) -> MethodInfo {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_default();

    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(params, source))
        .unwrap_or_default();

    let return_type = node
        .child_by_field_name("return_type")
        .map(|n| node_text(n, source).to_string());

    MethodInfo {
        name,
        line: node.start_position().row + 1,
        parameters,
        return_type,
        doc_comment: preceding_doc_comment(node, source),
        class_name: class.map(str::to_string),
    }
}

fn extract_parameters(params_node: Node, source: &str) -> Vec<(String, Option<String>)> {
    let mut parameters = Vec::new();
    let mut cursor = params_node.walk();

    for child in params_node.named_children(&mut cursor) {
        if !matches!(
            child.kind(),
            "simple_parameter" | "variadic_parameter" | "property_promotion_parameter"
        ) {
            continue;
        }

        let Some(name_node) = child.child_by_field_name("name") else {
            continue;
        };
        let name = node_text(name_node, source).trim_start_matches('$').to_string();
        if name.is_empty() {
            continue;
        }

        let type_text = child
            .child_by_field_name("type")
            .map(|n| node_text(n, source).to_string());

        parameters.push((name, type_text));
    }

    parameters
}

/// The `/** ... */` comment directly above a declaration, if any.
fn preceding_doc_comment(node: Node, source: &str) -> Option<String> {
    let prev = node.prev_named_sibling()?;

    if prev.kind() != "comment" {
        return None;
    }

    let text = node_text(prev, source);
    text.starts_with("/**").then(|| text.to_string())
}

fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(line) = first_error_line(child) {
            return Some(line);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn extract(source: &str) -> Vec<MethodInfo> {
        PhpParser::new().unwrap().extract_methods(source).unwrap()
    }

    #[test]
    fn extracts_free_function() {
        let methods = extract(indoc! {r#"
            <?php
            function greet(string $name, int $times = 1): string {
                return str_repeat($name, $times);
            }
        "#});

        assert_eq!(methods.len(), 1);
        let m = &methods[0];
        assert_eq!(m.name, "greet");
        assert_eq!(m.class_name, None);
        assert_eq!(
            m.parameters,
            vec![
                ("name".to_string(), Some("string".to_string())),
                ("times".to_string(), Some("int".to_string())),
            ]
        );
        assert_eq!(m.return_type.as_deref(), Some("string"));
    }

    #[test]
    fn extracts_class_method_with_owner() {
        let methods = extract(indoc! {r#"
            <?php
            class Greeter {
                public function greet(?string $name): void {}
            }
        "#});

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].class_name.as_deref(), Some("Greeter"));
        assert_eq!(methods[0].full_name(), "Greeter::greet");
        assert_eq!(methods[0].parameters[0].1.as_deref(), Some("?string"));
    }

    #[test]
    fn captures_union_and_intersection_types_verbatim() {
        let methods = extract(indoc! {r#"
            <?php
            function convert(int|string $value, Countable&Traversable $items): int|false {
                return 0;
            }
        "#});

        let m = &methods[0];
        assert_eq!(m.parameters[0].1.as_deref(), Some("int|string"));
        assert_eq!(m.parameters[1].1.as_deref(), Some("Countable&Traversable"));
        assert_eq!(m.return_type.as_deref(), Some("int|false"));
    }

    #[test]
    fn untyped_parameters_are_none() {
        let methods = extract("<?php function f($a, $b) {}");
        assert_eq!(
            methods[0].parameters,
            vec![("a".to_string(), None), ("b".to_string(), None)]
        );
        assert_eq!(methods[0].return_type, None);
    }

    #[test]
    fn attaches_preceding_doc_comment() {
        let methods = extract(indoc! {r#"
            <?php
            class Widget {
                /**
                 * @param int $id
                 * @return string
                 */
                public function render(int $id): string {
                    return '';
                }
            }
        "#});

        let doc = methods[0].doc_comment.as_deref().unwrap();
        assert!(doc.starts_with("/**"));
        assert!(doc.contains("@param int $id"));
    }

    #[test]
    fn plain_comment_is_not_a_doc_comment() {
        let methods = extract(indoc! {r#"
            <?php
            // not a docblock
            function f(): void {}
        "#});

        assert_eq!(methods[0].doc_comment, None);
    }

    #[test]
    fn interface_and_trait_methods_get_owner_names() {
        let methods = extract(indoc! {r#"
            <?php
            interface Renderable {
                public function render(): string;
            }
            trait Nameable {
                public function name(): string {
                    return 'x';
                }
            }
        "#});

        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].class_name.as_deref(), Some("Renderable"));
        assert_eq!(methods[1].class_name.as_deref(), Some("Nameable"));
    }

    #[test]
    fn promoted_constructor_parameters() {
        let methods = extract(indoc! {r#"
            <?php
            class Point {
                public function __construct(private float $x, private float $y) {}
            }
        "#});

        assert_eq!(
            methods[0].parameters,
            vec![
                ("x".to_string(), Some("float".to_string())),
                ("y".to_string(), Some("float".to_string())),
            ]
        );
    }

    #[test]
    fn variadic_parameter() {
        let methods = extract("<?php function sum(int ...$values): int { return 0; }");
        assert_eq!(
            methods[0].parameters,
            vec![("values".to_string(), Some("int".to_string()))]
        );
    }

    #[test]
    fn syntax_error_is_reported_not_panicked() {
        let mut parser = PhpParser::new().unwrap();
        let result = parser.extract_methods("<?php function broken( {");
        assert!(result.is_err());
    }

    #[test]
    fn method_line_is_one_based() {
        let methods = extract("<?php\nfunction f(): void {}\n");
        assert_eq!(methods[0].line, 2);
    }
}
