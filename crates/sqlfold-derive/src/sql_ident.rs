//! Compile-time checks for names written in `#[orm(...)]`.
//!
//! Same rules as the runtime checks in `sqlfold`: plain parts match
//! `[A-Za-z_#@][A-Za-z0-9_#@$]*`, bracketed parts (`[Order Details]`) may hold
//! anything but NUL and an unescaped `]`.

use syn::{Error, LitStr, Result};

fn is_plain_part(part: &str) -> bool {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || matches!(first, '_' | '#' | '@'))
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '#' | '@' | '$'))
}

fn is_bracketed_part(part: &str) -> bool {
    let Some(inner) = part.strip_prefix('[').and_then(|p| p.strip_suffix(']')) else {
        return false;
    };
    !inner.is_empty() && !inner.contains('\0') && inner.replace("]]", "").find(']').is_none()
}

fn is_valid_part(part: &str) -> bool {
    is_plain_part(part) || is_bracketed_part(part)
}

/// A single identifier: column or alias.
pub(crate) fn parse_sql_ident(lit: &LitStr, what: &str) -> Result<String> {
    let value = lit.value();
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::new(lit.span(), format!("{what} must not be empty")));
    }
    if !is_valid_part(value) {
        return Err(Error::new(
            lit.span(),
            format!(
                "{what} `{value}` is not a valid T-SQL identifier; use [brackets] for other names"
            ),
        ));
    }
    Ok(value.to_string())
}

/// Table names may be schema-qualified: `dbo.Users`, `[sales].[Order Details]`.
pub(crate) fn parse_table_name(lit: &LitStr) -> Result<String> {
    let value = lit.value();
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::new(lit.span(), "table must not be empty"));
    }
    if let Some(bad) = split_parts(value).into_iter().find(|p| !is_valid_part(p)) {
        return Err(Error::new(
            lit.span(),
            format!("table `{value}` has an invalid part `{bad}`"),
        ));
    }
    Ok(value.to_string())
}

/// Split on `.` outside brackets.
fn split_parts(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_bracket = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' if !in_bracket => in_bracket = true,
            ']' if in_bracket => in_bracket = false,
            '.' if !in_bracket => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
