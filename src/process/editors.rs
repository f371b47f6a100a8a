// src/process/editors.rs

use crate::error::FieldError;

/// Parse a list literal like `['J. Smith', "A. Doe"]` into names.
///
/// Brackets are optional. Entries may be single- or double-quoted (with
/// backslash escapes), or bare text running to the next comma. A trailing
/// comma is accepted.
pub fn parse_editor_list(raw: &str) -> Result<Vec<String>, FieldError> {
    let malformed = |reason: &str| FieldError::MalformedEditorList {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    let body = match (trimmed.strip_prefix('['), trimmed.strip_suffix(']')) {
        (Some(_), Some(_)) if trimmed.len() >= 2 => &trimmed[1..trimmed.len() - 1],
        (None, None) => trimmed,
        _ => return Err(malformed("unbalanced brackets")),
    };

    let mut names = Vec::new();
    let mut chars = body.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else { break };

        if first == '\'' || first == '"' {
            chars.next();
            let mut name = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some(escaped) => name.push(escaped),
                        None => return Err(malformed("dangling escape")),
                    },
                    c if c == first => {
                        closed = true;
                        break;
                    }
                    c => name.push(c),
                }
            }
            if !closed {
                return Err(malformed("unterminated quote"));
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed("empty entry"));
            }
            names.push(name.to_string());

            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            match chars.next() {
                None => break,
                Some(',') => continue,
                Some(_) => return Err(malformed("expected `,` after quoted name")),
            }
        } else {
            let mut name = String::new();
            let mut more = false;
            for c in chars.by_ref() {
                if c == ',' {
                    more = true;
                    break;
                }
                name.push(c);
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed("empty entry"));
            }
            if name.contains(['\'', '"']) {
                return Err(malformed("stray quote"));
            }
            names.push(name.to_string());
            if !more {
                break;
            }
        }
    }
    Ok(names)
}

/// Drop repeated names, keeping the first occurrence of each.
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

/// Join 1 to 4 names as prose: `A`, `A and B`, `A, B and C`, `A, B, C and D`.
pub fn format_editors(names: &[String]) -> Result<String, FieldError> {
    match names {
        [only] => Ok(only.clone()),
        [init @ .., last] if names.len() <= 4 => Ok(format!("{} and {}", init.join(", "), last)),
        _ => Err(FieldError::UnsupportedEditorCount { count: names.len() }),
    }
}

/// Parse, dedupe and phrase an editor column in one go.
pub fn editors_prose(raw: &str) -> Result<String, FieldError> {
    let names = dedup_names(parse_editor_list(raw)?);
    format_editors(&names)
}
