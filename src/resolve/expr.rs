//! Type-expression syntax.
//!
//! Best-effort structural scan of TypeScript type text. Nothing here looks at
//! other declarations; identifiers come back as `Ref` and the resolver decides
//! what they mean. Whatever we don't understand comes back as `Opaque`.
use std::str::CharIndices;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ir::Prim;

static IDENT_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*$").unwrap()
});

/// Wrappers that don't change the runtime shape we care about.
const TRANSPARENT_GENERICS: &[&str] = &["Partial", "Required", "Readonly", "NonNullable", "Promise"];

const ARRAY_GENERICS: &[&str] = &["Array", "ReadonlyArray"];

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr<'a> {
    Union(Vec<TypeExpr<'a>>),
    Array(Box<TypeExpr<'a>>),
    Keyword(Prim),
    Null,
    Undefined,
    Literal(Value),
    /// Bare or qualified identifier, reduced to its last segment.
    Ref(&'a str),
    /// Inline object literal type; holds the text between the braces.
    Object(&'a str),
    Opaque(&'a str),
}

// ------------------------------- Parse ----------------------------------- //

pub fn parse(text: &str) -> TypeExpr<'_> {
    let text = text.trim();
    let text = match text.strip_prefix('|') {
        Some(rest) => rest.trim(),
        None => text,
    };
    if text.is_empty() {
        return TypeExpr::Opaque(text);
    }

    let members = split_top_level(text, '|');
    if members.len() > 1 {
        return TypeExpr::Union(members.into_iter().map(parse).collect());
    }

    // intersections and function types stay opaque
    if find_top_level(text, '&').is_some() || find_top_level_arrow(text).is_some() {
        return TypeExpr::Opaque(text);
    }
    if text.starts_with("keyof ") || text.starts_with("typeof ") || text.starts_with("infer ") {
        return TypeExpr::Opaque(text);
    }
    if let Some(rest) = text.strip_prefix("readonly ") {
        return parse(rest);
    }

    if let Some(inner) = strip_wrapping(text, '(', ')') {
        return parse(inner);
    }
    if let Some(body) = strip_wrapping(text, '{', '}') {
        return TypeExpr::Object(body);
    }
    if strip_wrapping(text, '[', ']').is_some() {
        // tuple
        return TypeExpr::Opaque(text);
    }
    if let Some(inner) = text.strip_suffix("[]") {
        return TypeExpr::Array(Box::new(parse(inner)));
    }
    if text.ends_with('>') {
        return parse_generic(text);
    }

    if let Some(lit) = parse_literal(text) {
        return lit;
    }

    match text {
        "string" => TypeExpr::Keyword(Prim::String),
        "number" | "bigint" => TypeExpr::Keyword(Prim::Number),
        "boolean" => TypeExpr::Keyword(Prim::Boolean),
        "Date" => TypeExpr::Keyword(Prim::Date),
        "null" => TypeExpr::Null,
        "undefined" | "void" => TypeExpr::Undefined,
        "any" | "unknown" | "object" | "never" | "symbol" => TypeExpr::Opaque(text),
        _ if IDENT_PATH.is_match(text) => TypeExpr::Ref(last_segment(text)),
        _ => TypeExpr::Opaque(text),
    }
}

fn parse_generic(text: &str) -> TypeExpr<'_> {
    let Some(open) = text.find('<') else { return TypeExpr::Opaque(text) };
    let base = text[..open].trim();
    if !IDENT_PATH.is_match(base) || matching_close(text, open) != Some(text.len() - 1) {
        return TypeExpr::Opaque(text);
    }
    let args = &text[open + 1..text.len() - 1];
    let base = last_segment(base);
    if ARRAY_GENERICS.contains(&base) {
        return TypeExpr::Array(Box::new(parse(args)));
    }
    if TRANSPARENT_GENERICS.contains(&base) {
        return match split_top_level(args, ',').first() {
            Some(first) => parse(first),
            None => TypeExpr::Opaque(text),
        };
    }
    if base == "Record" {
        return TypeExpr::Opaque(text);
    }
    // Page<User> → Page; type arguments are not substituted
    TypeExpr::Ref(base)
}

fn parse_literal(text: &str) -> Option<TypeExpr<'_>> {
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return Some(TypeExpr::Literal(Value::from(&text[1..text.len() - 1])));
        }
    }
    if text.starts_with('`') {
        return Some(TypeExpr::Keyword(Prim::String));
    }
    match text {
        "true" => return Some(TypeExpr::Literal(Value::Bool(true))),
        "false" => return Some(TypeExpr::Literal(Value::Bool(false))),
        _ => {}
    }
    if text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        if let Ok(i) = text.parse::<i64>() {
            return Some(TypeExpr::Literal(Value::from(i)));
        }
        if let Some(n) = text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
            return Some(TypeExpr::Literal(Value::Number(n)));
        }
    }
    None
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

// ------------------------------ Scanning --------------------------------- //

/// Walks `(byte index, char, depth)`, skipping the inside of string literals.
/// Openers and their closers report the depth outside of them; `=>` never
/// closes an angle bracket.
struct Nesting<'a> {
    chars: CharIndices<'a>,
    depth: usize,
    quote: Option<char>,
    escaped: bool,
    prev: char,
}

impl<'a> Nesting<'a> {
    fn new(text: &'a str) -> Self {
        Self { chars: text.char_indices(), depth: 0, quote: None, escaped: false, prev: '\0' }
    }
}

impl Iterator for Nesting<'_> {
    type Item = (usize, char, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (i, c) = self.chars.next()?;
            let prev = std::mem::replace(&mut self.prev, c);
            if let Some(q) = self.quote {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == q {
                    self.quote = None;
                    return Some((i, c, self.depth));
                }
                continue;
            }
            return Some(match c {
                '\'' | '"' | '`' => {
                    self.quote = Some(c);
                    (i, c, self.depth)
                }
                '(' | '[' | '{' | '<' => {
                    self.depth += 1;
                    (i, c, self.depth - 1)
                }
                '>' if prev == '=' => (i, c, self.depth),
                ')' | ']' | '}' | '>' => {
                    self.depth = self.depth.saturating_sub(1);
                    (i, c, self.depth)
                }
                _ => (i, c, self.depth),
            });
        }
    }
}

/// Split on `sep` at nesting depth 0. Pieces are trimmed; empty pieces dropped.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c, depth) in Nesting::new(text) {
        if depth == 0 && c == sep {
            out.push(text[start..i].trim());
            start = i + c.len_utf8();
        }
    }
    out.push(text[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}

pub fn find_top_level(text: &str, needle: char) -> Option<usize> {
    Nesting::new(text).find(|&(_, c, depth)| depth == 0 && c == needle).map(|(i, _, _)| i)
}

fn find_top_level_arrow(text: &str) -> Option<usize> {
    Nesting::new(text)
        .find(|&(i, c, depth)| depth == 0 && c == '>' && i > 0 && text.as_bytes()[i - 1] == b'=')
        .map(|(i, _, _)| i - 1)
}

/// Index of the bracket closing the one at `open`.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let tail = text.get(open..)?;
    let mut walk = Nesting::new(tail);
    let (_, first, _) = walk.next()?;
    if !matches!(first, '(' | '[' | '{' | '<') {
        return None;
    }
    walk.find(|&(_, c, depth)| depth == 0 && matches!(c, ')' | ']' | '}' | '>'))
        .map(|(i, _, _)| open + i)
}

/// Inner text when `text` is exactly one `open … close` group.
fn strip_wrapping(text: &str, open: char, close: char) -> Option<&str> {
    if !text.starts_with(open) || !text.ends_with(close) {
        return None;
    }
    match matching_close(text, 0) {
        Some(end) if end == text.len() - close.len_utf8() => Some(&text[1..end]),
        _ => None,
    }
}

/// Members of an interface or object-literal body.
///
/// Splits on top-level `;` and `,`, and on newlines unless the type continues
/// on the next line (`| 'b'`) or the current line is left dangling (`status:`).
pub fn split_members(body: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c, depth) in Nesting::new(body) {
        if depth != 0 {
            continue;
        }
        let cut = match c {
            ';' | ',' => true,
            '\n' => {
                let before = body[start..i].trim_end();
                let after = body[i + 1..].trim_start();
                !before.ends_with([':', '|', '&', '='])
                    && !after.starts_with(['|', '&'])
            }
            _ => false,
        };
        if cut {
            out.push(body[start..i].trim());
            start = i + 1;
        }
    }
    out.push(body[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}

/// First type argument of the generic list opening at `open` (`<`).
pub fn first_generic_arg(text: &str, open: usize) -> Option<&str> {
    let close = matching_close(text, open)?;
    split_top_level(&text[open + 1..close], ',').into_iter().next()
}

/// Drop `//` and `/* */` comments outside of string literals.
///
/// `'` and `"` strings end at the line break at the latest, so a stray
/// apostrophe in JSX text (`<p>Don't</p>`) only affects its own line.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && chars.peek() != Some(&'\n') {
                if let Some(next) = chars.next() { out.push(next); }
            } else if c == q || (c == '\n' && q != '`') {
                quote = None;
            }
            continue;
        }
        match (c, chars.peek()) {
            ('/', Some('/')) => {
                while let Some(&n) = chars.peek() {
                    if n == '\n' { break; }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut last = '\0';
                for n in chars.by_ref() {
                    if n == '\n' { out.push('\n'); }
                    if last == '*' && n == '/' { break; }
                    last = n;
                }
                out.push(' ');
            }
            ('\'' | '"' | '`', _) => {
                quote = Some(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_split_only_at_top_level() {
        let parts = split_top_level("| A | Array<B | C> | { x: D | E }", '|');
        assert_eq!(parts, vec!["A", "Array<B | C>", "{ x: D | E }"]);
    }

    #[test]
    fn arrow_does_not_close_generics() {
        let parts = split_top_level("Map<K, () => V>, X", ',');
        assert_eq!(parts, vec!["Map<K, () => V>", "X"]);
    }

    #[test]
    fn arrays_in_all_spellings() {
        let expected = TypeExpr::Array(Box::new(TypeExpr::Ref("Bar")));
        assert_eq!(parse("Bar[]"), expected);
        assert_eq!(parse("Array<Bar>"), expected);
        assert_eq!(parse("readonly Bar[]"), expected);
        assert_eq!(parse("ReadonlyArray<Bar>"), expected);
    }

    #[test]
    fn parenthesized_union_array() {
        let t = parse("(string | number)[]");
        assert_eq!(
            t,
            TypeExpr::Array(Box::new(TypeExpr::Union(vec![
                TypeExpr::Keyword(Prim::String),
                TypeExpr::Keyword(Prim::Number),
            ])))
        );
    }

    #[test]
    fn literals_and_keywords() {
        assert_eq!(parse("'active'"), TypeExpr::Literal(Value::from("active")));
        assert_eq!(parse("\"x\""), TypeExpr::Literal(Value::from("x")));
        assert_eq!(parse("42"), TypeExpr::Literal(Value::from(42)));
        assert_eq!(parse("true"), TypeExpr::Literal(Value::Bool(true)));
        assert_eq!(parse("Date"), TypeExpr::Keyword(Prim::Date));
        assert_eq!(parse("bigint"), TypeExpr::Keyword(Prim::Number));
        assert_eq!(parse("null"), TypeExpr::Null);
        assert_eq!(parse("undefined"), TypeExpr::Undefined);
    }

    #[test]
    fn references_and_simple_generics() {
        assert_eq!(parse("Api.User"), TypeExpr::Ref("User"));
        assert_eq!(parse("Page<User>"), TypeExpr::Ref("Page"));
        assert_eq!(parse("Partial<User>"), TypeExpr::Ref("User"));
        assert_eq!(parse("Promise<User[]>"), TypeExpr::Array(Box::new(TypeExpr::Ref("User"))));
    }

    #[test]
    fn unsupported_syntax_is_opaque() {
        assert!(matches!(parse("A & B"), TypeExpr::Opaque(_)));
        assert!(matches!(parse("(x: number) => void"), TypeExpr::Opaque(_)));
        assert!(matches!(parse("[string, number]"), TypeExpr::Opaque(_)));
        assert!(matches!(parse("keyof User"), TypeExpr::Opaque(_)));
        assert!(matches!(parse("Record<string, number>"), TypeExpr::Opaque(_)));
        assert!(matches!(parse("User['id']"), TypeExpr::Opaque(_)));
        assert!(matches!(parse("any"), TypeExpr::Opaque("any")));
    }

    #[test]
    fn inline_object_body() {
        assert_eq!(parse("{ id: string; tags: string[] }"), TypeExpr::Object(" id: string; tags: string[] "));
    }

    #[test]
    fn members_keep_multiline_unions_together() {
        let body = "\n  id: string;\n  status:\n    | 'a'\n    | 'b';\n  meta: { x: number, y: number }\n  name?: string\n";
        let members = split_members(body);
        assert_eq!(members.len(), 4);
        assert_eq!(members[1].split_whitespace().collect::<Vec<_>>().join(" "), "status: | 'a' | 'b'");
        assert_eq!(members[2], "meta: { x: number, y: number }");
        assert_eq!(members[3], "name?: string");
    }

    #[test]
    fn comments_are_stripped_but_strings_survive() {
        let src = "const u = 'http://x'; // trailing\n/* block\ncomment */ type A = string;";
        let out = strip_comments(src);
        assert!(out.contains("'http://x'"));
        assert!(!out.contains("trailing"));
        assert!(!out.contains("block"));
        assert!(out.contains("type A = string;"));
        assert_eq!(out.matches('\n').count(), 2);
    }

    #[test]
    fn jsx_apostrophes_do_not_open_strings_across_lines() {
        let src = "export function C() { return <p>Don't forget</p>; }\n\
                   // const old = useMutation<Old>();\n\
                   const s = 'it''s'; /* gone */\n\
                   const t = `multi\n// kept`;\n";
        let out = strip_comments(src);
        assert!(!out.contains("useMutation<Old>"));
        assert!(!out.contains("gone"));
        assert!(out.contains("// kept"));
        assert!(out.contains("Don't forget</p>; }"));
    }

    #[test]
    fn first_generic_argument() {
        let text = "useMutation<Asset[], Error, Input>(fn)";
        let open = text.find('<').unwrap();
        assert_eq!(first_generic_arg(text, open), Some("Asset[]"));
    }
}
