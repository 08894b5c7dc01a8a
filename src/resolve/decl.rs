//! Declaration finders over comment-stripped unit text.
//!
//! Everything returns borrowed slices of the unit; turning them into `Ty` is
//! the resolver's job.
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::expr::{first_generic_arg, matching_close, split_top_level};

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:type\s+)?([^;'"]*?)\s*from\s*['"]([^'"]+)['"]"#).unwrap()
});

static RE_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*export\s+(?:type\s+)?(\*|\{[^}]*\})\s*from\s*['"]([^'"]+)['"]"#).unwrap()
});

static MEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)^(?:readonly\s+)?(?:'([^']+)'|"([^"]+)"|([A-Za-z_$][\w$]*))\s*(\?)?\s*:\s*(.+)$"#).unwrap()
});

static HOOK_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(use[A-Z][\w$]*)\s*<").unwrap());

static EXPORTED_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:declare\s+)?type\s+([A-Za-z_$][\w$]*)").unwrap()
});

static EXPORTED_INTERFACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:default\s+)?(?:declare\s+)?interface\s+([A-Za-z_$][\w$]*)").unwrap()
});

// ------------------------------- Types ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl<'a> {
    pub extends: Vec<&'a str>,
    pub body: &'a str,
}

/// One name brought into scope by an import or re-export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding<'a> {
    pub imported: &'a str,
    pub local: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl<'a> {
    pub bindings: Vec<Binding<'a>>,
    pub specifier: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReExport<'a> {
    /// `None` for `export * from`.
    pub bindings: Option<Vec<Binding<'a>>>,
    pub specifier: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member<'a> {
    pub name: &'a str,
    pub optional: bool,
    pub raw_type: &'a str,
}

// ---------------------------- Declarations ------------------------------- //

fn decl_regex(keyword: &str, name: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:declare\s+)?{keyword}\s+{}\b",
        regex::escape(name)
    )).ok()
}

/// Skip an optional `<...>` parameter list right after a declaration name.
fn skip_type_params(rest: &str) -> &str {
    let trimmed = rest.trim_start();
    if trimmed.starts_with('<') {
        if let Some(close) = matching_close(trimmed, 0) {
            return &trimmed[close + 1..];
        }
    }
    trimmed
}

pub fn find_interface<'a>(unit: &'a str, name: &str) -> Option<InterfaceDecl<'a>> {
    let m = decl_regex("interface", name)?.find(unit)?;
    let rest = skip_type_params(&unit[m.end()..]);
    let brace = rest.find('{')?;
    let close = matching_close(rest, brace)?;
    let header = rest[..brace].trim();
    let extends = match header.strip_prefix("extends") {
        Some(list) => split_top_level(list, ','),
        None => Vec::new(),
    };
    Some(InterfaceDecl { extends, body: &rest[brace + 1..close] })
}

/// Right-hand side of `type NAME = ...`.
pub fn find_alias<'a>(unit: &'a str, name: &str) -> Option<&'a str> {
    let m = decl_regex("type", name)?.find(unit)?;
    let rest = skip_type_params(&unit[m.end()..]);
    let rhs = rest.strip_prefix('=')?;
    Some(rhs[..statement_end(rhs)].trim())
}

/// Body of `enum NAME { ... }` (also `const enum`).
pub fn find_enum<'a>(unit: &'a str, name: &str) -> Option<&'a str> {
    let m = decl_regex(r"(?:const\s+)?enum", name)?.find(unit)?;
    let rest = unit[m.end()..].trim_start();
    if !rest.starts_with('{') {
        return None;
    }
    let close = matching_close(rest, 0)?;
    Some(&rest[1..close])
}

/// Matches an interface, type alias or enum declaration of `name`. Compile it
/// once and test it against many units.
pub fn declaration_pattern(name: &str) -> Option<Regex> {
    decl_regex(r"(?:interface|type|(?:const\s+)?enum)", name)
}

/// Member values of an enum body. Uninitialized members count up from the
/// last numeric value, starting at 0.
pub fn enum_values(body: &str) -> Vec<Value> {
    let mut next = 0i64;
    let mut out = Vec::new();
    for member in split_top_level(body, ',') {
        let init = member.split_once('=').map(|(_, v)| v.trim());
        let value = match init {
            Some(v) if v.len() >= 2 && (v.starts_with('\'') || v.starts_with('"')) => {
                Value::from(&v[1..v.len() - 1])
            }
            Some(v) => match (v.parse::<i64>(), v.parse::<f64>()) {
                (Ok(n), _) => {
                    next = n + 1;
                    Value::from(n)
                }
                (_, Ok(f)) if f.is_finite() => Value::from(f),
                // computed (`1 << 2`, `Other.A`): the value isn't known here
                _ => continue,
            },
            None => {
                next += 1;
                Value::from(next - 1)
            }
        };
        out.push(value);
    }
    out
}

/// Byte length of a type-alias right-hand side: up to the first top-level `;`,
/// or the first top-level line break that doesn't continue the expression.
fn statement_end(rhs: &str) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in rhs.char_indices() {
        let last = std::mem::replace(&mut prev, c);
        if let Some(q) = quote {
            if c == q && last != '\\' { quote = None; }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' | '[' | '{' | '<' => depth += 1,
            '>' if last == '=' => {}
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return i,
            '\n' if depth == 0 => {
                let before = rhs[..i].trim();
                let after = rhs[i + 1..].trim_start();
                let continues = before.is_empty()
                    || before.ends_with(['|', '&', '=', ':'])
                    || after.starts_with(['|', '&']);
                if !continues {
                    return i;
                }
            }
            _ => {}
        }
    }
    rhs.len()
}

// ------------------------------ Members ---------------------------------- //

/// `[readonly] name[?]: type`. Methods and index signatures yield `None`.
pub fn parse_member(member: &str) -> Option<Member<'_>> {
    let caps = MEMBER.captures(member.trim())?;
    let name = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?.as_str();
    Some(Member {
        name,
        optional: caps.get(4).is_some(),
        raw_type: caps.get(5)?.as_str().trim(),
    })
}

// ------------------------------ Imports ---------------------------------- //

fn parse_bindings(list: &str) -> Vec<Binding<'_>> {
    split_top_level(list, ',')
        .into_iter()
        .filter_map(|item| {
            let item = item.strip_prefix("type ").unwrap_or(item).trim();
            let (imported, local) = match item.split_once(" as ") {
                Some((a, b)) => (a.trim(), b.trim()),
                None => (item, item),
            };
            (!imported.is_empty()).then_some(Binding { imported, local })
        })
        .collect()
}

pub fn imports(unit: &str) -> Vec<ImportDecl<'_>> {
    IMPORT
        .captures_iter(unit)
        .filter_map(|caps| {
            let clause = caps.get(1)?.as_str().trim();
            let specifier = caps.get(2)?.as_str();
            let mut bindings = Vec::new();
            let named_start = clause.find('{');
            if let Some(open) = named_start {
                if let Some(close) = matching_close(clause, open) {
                    bindings.extend(parse_bindings(&clause[open + 1..close]));
                }
            }
            // default import: looked up in the target under its local name
            let default = clause[..named_start.unwrap_or(clause.len())].trim().trim_end_matches(',').trim();
            if !default.is_empty() && !default.starts_with('*') {
                bindings.push(Binding { imported: default, local: default });
            }
            Some(ImportDecl { bindings, specifier })
        })
        .collect()
}

pub fn re_exports(unit: &str) -> Vec<ReExport<'_>> {
    RE_EXPORT
        .captures_iter(unit)
        .filter_map(|caps| {
            let what = caps.get(1)?.as_str();
            let bindings = what
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .map(parse_bindings);
            Some(ReExport { bindings, specifier: caps.get(2)?.as_str() })
        })
        .collect()
}

// ---------------------------- File data type ----------------------------- //

/// First type argument of the first `hook<...>(` call in the unit.
pub fn hook_type_argument<'a>(unit: &'a str, hook: &str) -> Option<&'a str> {
    let call = HOOK_CALL.captures_iter(unit).find(|c| &c[1] == hook)?;
    let whole = call.get(0)?;
    first_generic_arg(unit, whole.end() - 1)
}

pub fn exported_aliases(unit: &str) -> Vec<&str> {
    EXPORTED_ALIAS.captures_iter(unit).filter_map(|c| c.get(1)).map(|m| m.as_str()).collect()
}

pub fn exported_interfaces(unit: &str) -> Vec<&str> {
    EXPORTED_INTERFACE.captures_iter(unit).filter_map(|c| c.get(1)).map(|m| m.as_str()).collect()
}

// ------------------------------- Tests ------------------------------------ //
