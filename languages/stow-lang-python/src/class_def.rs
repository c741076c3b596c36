//! Class header model
//!
//! Only the header (`class Name(bases):`) and the decorators above it are
//! understood; class bodies are left alone.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use stow_foundation::{StowError, StowResult};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"));

/// Whether `name` is a valid Python identifier (ASCII subset)
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// A class header found in a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    /// Leading whitespace of the `class` line
    pub indent: String,
    /// Base list entries as written, trimmed
    pub bases: Vec<String>,
    /// Byte range of `class ...:` including the indentation
    pub header: Range<usize>,
    /// 0-based line of the `class` keyword
    pub line: usize,
    /// Byte offset where new code goes to land before this class and its decorators
    pub insert_offset: usize,
}

impl ClassDef {
    /// Header text for `bases`, keeping name and indentation
    pub fn render_header(&self, bases: &[String]) -> String {
        render_header(&self.indent, &self.name, bases)
    }

    pub fn has_base(&self, base: &str) -> bool {
        self.bases.iter().any(|b| b == base)
    }

    /// `text` with this class's base list replaced by `bases`
    pub fn replace_bases(&self, text: &str, bases: &[String]) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        out.push_str(&text[..self.header.start]);
        out.push_str(&self.render_header(bases));
        out.push_str(&text[self.header.end..]);
        out
    }
}

pub(crate) fn render_header(indent: &str, name: &str, bases: &[String]) -> String {
    if bases.is_empty() {
        format!("{}class {}:", indent, name)
    } else {
        format!("{}class {}({}):", indent, name, bases.join(", "))
    }
}

/// Locate the first top-level or nested `class <name>` header in `text`
pub fn find_class(text: &str, name: &str) -> StowResult<ClassDef> {
    if !is_identifier(name) {
        return Err(StowError::invalid_input(format!(
            "'{}' is not a valid class name",
            name
        )));
    }

    let pattern = Regex::new(&format!(
        r"(?m)^([ \t]*)class[ \t]+{}\b",
        regex::escape(name)
    ))
    .map_err(|e| StowError::parse(format!("Invalid class pattern: {}", e), None))?;

    let captures = pattern
        .captures(text)
        .ok_or_else(|| StowError::not_found(format!("class {}", name)))?;
    let (start, name_end) = match captures.get(0) {
        Some(whole) => (whole.start(), whole.end()),
        None => return Err(StowError::not_found(format!("class {}", name))),
    };
    let indent = captures.get(1).map_or("", |m| m.as_str()).to_string();
    let line = line_of(text, start);

    let bytes = text.as_bytes();
    let mut pos = skip_blanks(bytes, name_end);
    let mut bases = Vec::new();

    if bytes.get(pos) == Some(&b'(') {
        let close = find_closing_paren(text, pos)
            .ok_or_else(|| StowError::parse("Unbalanced parenthesis in class header", Some(line + 1)))?;
        bases = split_top_level(&text[pos + 1..close]);
        pos = skip_blanks(bytes, close + 1);
    }

    if bytes.get(pos) != Some(&b':') {
        return Err(StowError::parse(
            format!("Expected ':' after class {} header", name),
            Some(line + 1),
        ));
    }

    Ok(ClassDef {
        name: name.to_string(),
        bases,
        header: start..pos + 1,
        line,
        insert_offset: decorators_start(text, start, &indent),
        indent,
    })
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count()
}

fn skip_blanks(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b' ') | Some(b'\t')) {
        pos += 1;
    }
    pos
}

/// Offset of the first decorator line directly above the class, or the class line itself
fn decorators_start(text: &str, class_start: usize, indent: &str) -> usize {
    let mut offset = class_start;
    while offset > 0 {
        let previous_end = offset - 1;
        let previous_start = text[..previous_end].rfind('\n').map_or(0, |i| i + 1);
        let previous = &text[previous_start..previous_end];
        let is_decorator = previous
            .strip_prefix(indent)
            .is_some_and(|rest| rest.starts_with('@'));
        if !is_decorator {
            break;
        }
        offset = previous_start;
    }
    offset
}

/// Byte index of the `)` closing the `(` at `open`, skipping strings and comments
fn find_closing_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut in_comment = false;

    for (i, ch) in text[open..].char_indices() {
        if in_comment {
            in_comment = ch != '\n';
            continue;
        }
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '#' => in_comment = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split an argument list on top-level commas, dropping comments and blanks
fn split_top_level(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut in_comment = false;

    for ch in args.chars() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
                current.push(' ');
            }
            continue;
        }
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => {
                quote = Some(ch);
                current.push(ch);
            }
            '#' => in_comment = true,
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => parts.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|part| !part.is_empty())
        .collect()
}
