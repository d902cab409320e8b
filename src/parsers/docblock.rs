//! PHPDoc tag extraction.
//!
//! Line-oriented parser for `@param` and `@return` tags. Type expressions
//! may contain whitespace inside `<> () {} []` nesting (`array<string, int>`,
//! `($x is string ? int : bool)`), so the scanner tracks bracket depth when
//! deciding where a type ends and the variable or description begins.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use xxhash_rust::xxh64::xxh64;

static VAR_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$(\w+)").expect("static pattern"));

/// Structured tag data for one documentation comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Documented parameter name -> optional type text. One slot per name in
    /// first-appearance order; a duplicate tag overwrites the type.
    params: Vec<(String, Option<String>)>,
    return_type: Option<String>,
    has_param_tags: bool,
    has_return_tag: bool,
    /// Parameter names in tag order, duplicates preserved.
    param_order: Vec<String>,
}

impl DocBlock {
    pub fn params(&self) -> &[(String, Option<String>)] {
        &self.params
    }

    pub fn param_type(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .and_then(|(_, ty)| ty.as_deref())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|(param, _)| param == name)
    }

    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    pub fn has_param_tags(&self) -> bool {
        self.has_param_tags
    }

    pub fn has_return_tag(&self) -> bool {
        self.has_return_tag
    }

    pub fn param_order(&self) -> &[String] {
        &self.param_order
    }
}

/// Parses docblock text into [`DocBlock`] data, memoizing by content hash
/// so repeated identical comments are only parsed once per parser instance.
#[derive(Debug, Default)]
pub struct DocBlockParser {
    cache: HashMap<u64, DocBlock>,
}

impl DocBlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn parse(&mut self, doc_comment: &str) -> DocBlock {
        let key = xxh64(doc_comment.as_bytes(), 0);

        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let parsed = parse_doc_comment(doc_comment);
        self.cache.insert(key, parsed.clone());
        parsed
    }
}

fn parse_doc_comment(doc_comment: &str) -> DocBlock {
    let mut block = DocBlock::default();

    for line in doc_comment.lines() {
        let Some(tag_line) = strip_comment_decoration(line) else {
            continue;
        };

        if let Some(rest) = tag_word(tag_line, "@param") {
            block.has_param_tags = true;

            if let Some((name, ty)) = parse_param_tag(rest) {
                block.param_order.push(name.clone());

                match block.params.iter_mut().find(|(param, _)| *param == name) {
                    Some(slot) => slot.1 = ty,
                    None => block.params.push((name, ty)),
                }
            }
        } else if let Some(rest) = tag_word(tag_line, "@return") {
            block.has_return_tag = true;

            if block.return_type.is_none() {
                block.return_type = parse_return_tag(rest);
            }
        }
    }

    block
}

/// Strip `/**`, `*/` and the leading `*` gutter from one comment line.
fn strip_comment_decoration(line: &str) -> Option<&str> {
    let mut text = line.trim();

    if let Some(rest) = text.strip_prefix("/**") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("*/") {
        text = rest;
    }
    text = text.trim_start_matches('*').trim();

    (!text.is_empty()).then_some(text)
}

/// Match a tag word followed by whitespace or end of line, so `@return`
/// does not also match `@returns`.
fn tag_word<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(tag)?;

    match rest.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(rest.trim_start()),
        Some(_) => None,
    }
}

/// Parse the remainder of a `@param` line into `(name, optional type)`.
///
/// The type is everything before the first `$variable` token at bracket
/// depth zero; the description after the variable is discarded. A tag with
/// no recognizable variable name is skipped entirely.
fn parse_param_tag(rest: &str) -> Option<(String, Option<String>)> {
    let mut type_text = String::new();
    let mut depth: i32 = 0;

    for token in rest.split_whitespace() {
        let bare = token.strip_prefix("...").unwrap_or(token);

        if depth == 0 {
            if let Some(captures) = VAR_NAME.captures(bare) {
                let name = captures[1].to_string();
                let ty = (!type_text.is_empty()).then_some(type_text);
                return Some((name, ty));
            }
        }

        if !type_text.is_empty() {
            type_text.push(' ');
        }
        type_text.push_str(token);
        depth += bracket_delta(token);
    }

    None
}

/// Parse the remainder of a `@return` line into a type.
///
/// Takes the first whitespace token, then keeps appending tokens while the
/// bracket depth is still open, so `array<string, int>` survives intact.
fn parse_return_tag(rest: &str) -> Option<String> {
    let mut tokens = rest.split_whitespace();
    let first = tokens.next()?;

    let mut type_text = first.to_string();
    let mut depth = bracket_delta(first);

    for token in tokens {
        if depth <= 0 {
            break;
        }
        type_text.push(' ');
        type_text.push_str(token);
        depth += bracket_delta(token);
    }

    Some(type_text)
}

fn bracket_delta(token: &str) -> i32 {
    token.chars().fold(0, |delta, c| match c {
        '<' | '(' | '[' | '{' => delta + 1,
        '>' | ')' | ']' | '}' => delta - 1,
        _ => delta,
    })
}
