//! Identifier casing conversions.
//!
//! The wire format is snake_case, local code uses camelCase and resource
//! paths use kebab-case. Only ASCII letters take part in word-boundary
//! detection.

/// Converts `some_name` / `some name` to `someName`.
///
/// A separator (underscore or whitespace) upper-cases the character that
/// follows it and is then dropped. The first character is lower-cased.
pub fn to_camel_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut joined = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_camel_separator(c) && i + 1 < chars.len() {
            joined.push(c);
            joined.extend(chars[i + 1].to_uppercase());
            i += 2;
        } else {
            joined.push(c);
            i += 1;
        }
    }

    let mut stripped = joined.chars().filter(|c| !is_camel_separator(*c));
    match stripped.next() {
        Some(first) => first.to_lowercase().chain(stripped).collect(),
        None => String::new(),
    }
}

/// Converts `someName` / `some-name` / `some name` to `some_name`.
pub fn to_snake_case(text: &str) -> String {
    split_words(text, '_', |c| c == '-')
}

/// Converts `SomeName` / `some_name` / `some name` to `some-name`.
pub fn to_kebab_case(text: &str) -> String {
    split_words(text, '-', |c| c == '_')
}

fn is_camel_separator(c: char) -> bool {
    c == '_' || c.is_whitespace()
}

/// Inserts `delimiter` at every lower→upper boundary, collapses whitespace
/// runs and `replaced` characters into `delimiter`, then lower-cases.
fn split_words(text: &str, delimiter: char, replaced: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut chars = text.chars().peekable();
    let mut in_whitespace = false;

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(delimiter);
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        if replaced(c) {
            out.push(delimiter);
            continue;
        }

        out.extend(c.to_lowercase());
        if c.is_ascii_lowercase() && chars.peek().is_some_and(|n| n.is_ascii_uppercase()) {
            out.push(delimiter);
        }
    }

    out
}
