//! Identifier checks for caller-supplied names.
//!
//! Table names, columns and default aliases come from [`Entity`](crate::Entity)
//! constants and are trusted. Names that arrive at runtime (explicit aliases,
//! projection targets, count aliases, parameter names) are validated here
//! before they are spliced into SQL text, since identifiers cannot be bound.
//!
//! - Plain parts match `[A-Za-z_#@][A-Za-z0-9_#@$]*`
//! - Bracketed parts (`[Order Details]`) allow anything except NUL, with `]]`
//!   as the escape for `]`
//! - Parts may be joined with `.` (`dbo.Users`)
//! - Aliases and output names are a single part and may not start with `@`
//!   (variables) or `#` (temporary objects)

use crate::error::{QbError, QbResult};

fn is_plain_start(c: char) -> bool {
    c == '_' || c == '#' || c == '@' || c.is_ascii_alphabetic()
}

fn is_plain_continue(c: char) -> bool {
    c == '_' || c == '#' || c == '@' || c == '$' || c.is_ascii_alphanumeric()
}

/// Check that `s` is a plain (unbracketed, undotted) identifier.
pub(crate) fn is_plain_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_plain_start(first) => chars.all(is_plain_continue),
        _ => false,
    }
}

/// Validate an identifier that may be dotted and/or bracketed.
///
/// `what` names the argument in the error message.
pub(crate) fn check_ident(s: &str, what: &str) -> QbResult<()> {
    if s.is_empty() {
        return Err(QbError::validation(format!("{what} cannot be empty")));
    }
    if s.contains('\0') {
        return Err(QbError::validation(format!(
            "{what} cannot contain NUL character"
        )));
    }

    let mut chars = s.chars().peekable();
    let mut first_part = true;

    while chars.peek().is_some() {
        if !first_part {
            match chars.next() {
                Some('.') if chars.peek().is_some() => {}
                Some('.') => {
                    return Err(QbError::validation(format!("Trailing '.' in {what} '{s}'")));
                }
                Some(c) => {
                    return Err(QbError::validation(format!(
                        "Expected '.' between parts of {what} '{s}', got '{c}'"
                    )));
                }
                None => break,
            }
        }
        first_part = false;

        if chars.peek() == Some(&'[') {
            chars.next();
            let mut len = 0usize;
            loop {
                match chars.next() {
                    Some(']') => {
                        if chars.peek() == Some(&']') {
                            chars.next();
                            len += 1;
                        } else {
                            break;
                        }
                    }
                    Some(_) => len += 1,
                    None => {
                        return Err(QbError::validation(format!(
                            "Unclosed bracket in {what} '{s}'"
                        )));
                    }
                }
            }
            if len == 0 {
                return Err(QbError::validation(format!("Empty bracketed part in {what} '{s}'")));
            }
            continue;
        }

        let mut part = String::new();
        while let Some(&c) = chars.peek() {
            if c == '.' {
                break;
            }
            part.push(c);
            chars.next();
        }
        if !is_plain_ident(&part) {
            return Err(QbError::validation(format!(
                "Invalid {what} '{s}' (expected [A-Za-z_][A-Za-z0-9_]* or [bracketed] parts)"
            )));
        }
    }

    Ok(())
}

fn is_bracketed_part(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('[').and_then(|p| p.strip_suffix(']')) else {
        return false;
    };
    !inner.is_empty() && !inner.contains('\0') && !inner.replace("]]", "").contains(']')
}

/// Validate a table alias or output column name.
///
/// Stricter than [`check_ident`]: one part only, starting with a letter or
/// `_` unless bracketed.
pub(crate) fn check_alias(s: &str, what: &str) -> QbResult<()> {
    let mut chars = s.chars();
    let plain = match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(is_plain_continue)
        }
        _ => false,
    };
    if plain || is_bracketed_part(s) {
        return Ok(());
    }
    Err(QbError::validation(format!(
        "Invalid {what} '{s}' (expected [A-Za-z_][A-Za-z0-9_]* or one [bracketed] name)"
    )))
}

/// Normalize and validate a caller-supplied parameter name.
///
/// A leading `@` is accepted and stripped; the remainder must be a plain
/// identifier without further `@`/`#`.
pub(crate) fn param_name(raw: &str) -> QbResult<String> {
    let name = raw.strip_prefix('@').unwrap_or(raw);
    let valid = is_plain_ident(name) && !name.contains(['@', '#', '$']);
    if !valid {
        return Err(QbError::validation(format!("Invalid parameter name '{raw}'")));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_dotted() {
        assert!(check_ident("u", "alias").is_ok());
        assert!(check_ident("dbo.Users", "table").is_ok());
        assert!(check_ident("#tmp", "table").is_ok());
    }

    #[test]
    fn test_bracketed() {
        assert!(check_ident("[Order Details]", "table").is_ok());
        assert!(check_ident("dbo.[Odd]]Name]", "table").is_ok());
        assert!(check_ident("[unclosed", "table").is_err());
        assert!(check_ident("[]", "table").is_err());
    }

    #[test]
    fn test_rejects_injection() {
        assert!(check_ident("u; DROP TABLE x", "alias").is_err());
        assert!(check_ident("1abc", "alias").is_err());
        assert!(check_ident("a.", "alias").is_err());
        assert!(check_ident("", "alias").is_err());
    }

    #[test]
    fn test_alias_is_single_part_without_variable_prefix() {
        assert!(check_alias("u", "alias").is_ok());
        assert!(check_alias("_t2", "alias").is_ok());
        assert!(check_alias("[Order Total]", "projection target").is_ok());
        assert!(check_alias("[a]]b]", "alias").is_ok());

        assert!(check_alias("@t", "alias").is_err());
        assert!(check_alias("#t", "alias").is_err());
        assert!(check_alias("@x", "projection target").is_err());
        assert!(check_alias("dbo.u", "alias").is_err());
        assert!(check_alias("[a].[b]", "alias").is_err());
        assert!(check_alias("[a]]", "alias").is_err());
        assert!(check_alias("", "alias").is_err());
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name("@id").unwrap(), "id");
        assert_eq!(param_name("user_id").unwrap(), "user_id");
        assert!(param_name("@").is_err());
        assert!(param_name("a b").is_err());
        assert!(param_name("@@x").is_err());
    }
}
