//! Module paths and import insertion

use crate::convention::{INIT_DOT_PY, PY_EXTENSION};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path};

static IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:import|from)[ \t]+\S").expect("import regex"));

/// Dotted module name of `file` relative to the source `root`.
///
/// `pkg/sub/__init__.py` is `pkg.sub`. Returns `None` for files outside the
/// root, non-Python files, and the root's own `__init__.py`.
pub fn module_path(root: &Path, file: &Path) -> Option<String> {
    let relative = pathdiff::diff_paths(file, root)?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }

    let file_name = parts.pop()?;
    if file_name != INIT_DOT_PY {
        parts.push(file_name.strip_suffix(PY_EXTENSION)?.to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}

/// Whether `text` already imports `name` from `module`
pub fn has_from_import(text: &str, module: &str, name: &str) -> bool {
    let pattern = format!(
        r"(?m)^from[ \t]+{}[ \t]+import[ \t]+.*\b{}\b",
        regex::escape(module),
        regex::escape(name)
    );
    Regex::new(&pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Insert `from <module> import <name>` after the leading import block.
///
/// Without imports the statement goes after a module docstring and leading
/// comments, followed by a blank line when code comes next. Text that already
/// has the import is returned unchanged.
pub fn insert_from_import(text: &str, module: &str, name: &str) -> String {
    if has_from_import(text, module, name) {
        return text.to_string();
    }

    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let header_end = header_end(&lines);
    let mut last_import_end = None;

    let mut i = header_end;
    while i < lines.len() {
        let line = lines[i];
        if IMPORT_LINE.is_match(line) {
            let end = statement_end(&lines, i);
            last_import_end = Some(end);
            i = end;
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            i += 1;
            continue;
        }
        break;
    }

    let insert_at = last_import_end.unwrap_or(header_end);
    let mut out = String::with_capacity(text.len() + module.len() + name.len() + 16);
    for line in &lines[..insert_at] {
        out.push_str(line);
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("from {} import {}\n", module, name));

    let next_is_code = lines
        .get(insert_at)
        .is_some_and(|line| !line.trim().is_empty());
    if last_import_end.is_none() && next_is_code {
        out.push('\n');
    }

    for line in &lines[insert_at..] {
        out.push_str(line);
    }
    out
}

/// Index of the first line after leading comments and a module docstring
fn header_end(lines: &[&str]) -> usize {
    let mut i = 0;
    while i < lines.len() && lines[i].trim_start().starts_with('#') {
        i += 1;
    }

    let Some(first) = lines.get(i) else {
        return i;
    };
    let trimmed = first.trim_start().trim_start_matches(['r', 'u', 'R', 'U']);
    let quote = if trimmed.starts_with("\"\"\"") {
        "\"\"\""
    } else if trimmed.starts_with("'''") {
        "'''"
    } else {
        return i;
    };

    if trimmed[3..].contains(quote) {
        return i + 1;
    }
    for (j, line) in lines.iter().enumerate().skip(i + 1) {
        if line.contains(quote) {
            return j + 1;
        }
    }
    lines.len()
}

/// Index of the line after the import statement starting at `start`
fn statement_end(lines: &[&str], start: usize) -> usize {
    let first = lines[start];
    let mut j = start;
    if first.contains('(') && !first.contains(')') {
        while j + 1 < lines.len() && !lines[j].contains(')') {
            j += 1;
        }
    } else {
        while j + 1 < lines.len() && lines[j].trim_end().ends_with('\\') {
            j += 1;
        }
    }
    j + 1
}
