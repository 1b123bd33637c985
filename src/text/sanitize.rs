//! Whitespace normalization and artifact stripping.

use super::patterns::{ARTIFACT_TOKEN_RE, BREADCRUMB_RE, NUMBER_RE, TYPE_RESIDUE_RE};

/// Strip artifact tokens, collapse whitespace runs to single spaces and trim.
///
/// # Examples
///
/// ```
/// use archtex::text::sanitize_fragment;
///
/// assert_eq!(sanitize_fragment("  see vol=3 pg=12 the\n\tnote "), "see the note");
/// ```
pub fn sanitize_fragment(text: &str) -> String {
    let cleaned = ARTIFACT_TOKEN_RE.replace_all(text, "");
    collapse_whitespace(&cleaned)
}

/// Sanitize a text leaf, keeping one boundary space where the original had
/// leading or trailing whitespace so words in sibling inline elements stay
/// separated.
///
/// Whitespace-only input becomes a single space; empty input stays empty.
pub fn sanitize_text_node(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let leading = text.starts_with(char::is_whitespace);
    let trailing = text.ends_with(char::is_whitespace);

    let stripped = ARTIFACT_TOKEN_RE.replace_all(text, "");
    let collapsed: String = collapse_whitespace(&stripped)
        .chars()
        .filter(|&c| !is_stray_control(c))
        .collect();
    let cleaned = TYPE_RESIDUE_RE.replace_all(&collapsed, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return if leading || trailing {
            " ".to_string()
        } else {
            String::new()
        };
    }

    let mut result = String::with_capacity(cleaned.len() + 2);
    if leading {
        result.push(' ');
    }
    result.push_str(cleaned);
    if trailing {
        result.push(' ');
    }
    result
}

/// Collapse every whitespace run (Unicode-aware) to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check whether text has the archive's navigation-breadcrumb shape.
pub fn is_breadcrumb(text: &str) -> bool {
    BREADCRUMB_RE.is_match(text)
}

/// First decimal number embedded in `text`, if any.
pub fn first_number(text: &str) -> Option<&str> {
    NUMBER_RE.find(text).map(|m| m.as_str())
}

/// Control characters outside the printable ranges (C0 except whitespace, DEL, C1).
fn is_stray_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}
