//! LaTeX escaping.

/// Escape characters that are special in LaTeX.
///
/// Backslash becomes `\textbackslash{}`, curly quotes map to TeX quote
/// ligatures, `& % $ # _ { }` gain a backslash, and `~`/`^` become text
/// commands. Must be applied exactly once to each visible text leaf.
///
/// # Examples
///
/// ```
/// use archtex::text::escape_latex;
///
/// assert_eq!(escape_latex("50% & $5"), "50\\% \\& \\$5");
/// assert_eq!(escape_latex("\u{201C}Hi\u{201D}"), "``Hi''");
/// ```
pub fn escape_latex(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);

    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\textbackslash{}"),
            '\u{201C}' => result.push_str("``"),
            '\u{201D}' => result.push_str("''"),
            '\u{2018}' => result.push('`'),
            '\u{2019}' => result.push('\''),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                result.push('\\');
                result.push(c);
            }
            '~' => result.push_str("\\textasciitilde{}"),
            '^' => result.push_str("\\textasciicircum{}"),
            _ => result.push(c),
        }
    }

    result
}

/// Escape a URL for the first argument of `\href`.
///
/// hyperref reads the argument nearly verbatim, so only `#` and `%` take a
/// backslash; backslashes and braces are percent-encoded.
///
/// ```
/// use archtex::text::escape_url;
///
/// assert_eq!(escape_url("https://x.org/~me/a_b#s2"), "https://x.org/~me/a_b\\#s2");
/// ```
pub fn escape_url(url: &str) -> String {
    let mut result = String::with_capacity(url.len() + 8);

    for c in url.chars() {
        match c {
            '#' | '%' => {
                result.push('\\');
                result.push(c);
            }
            '\\' => result.push_str("\\%5C"),
            '{' => result.push_str("\\%7B"),
            '}' => result.push_str("\\%7D"),
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_latex("a\\b"), "a\\textbackslash{}b");
    }

    #[test]
    fn test_escape_specials() {
        assert_eq!(escape_latex("#1_{x}"), "\\#1\\_\\{x\\}");
        assert_eq!(escape_latex("a~b^c"), "a\\textasciitilde{}b\\textasciicircum{}c");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_latex("\u{2018}tis\u{2019}"), "`tis'");
        assert_eq!(escape_latex("\"plain\""), "\"plain\"");
    }

    #[test]
    fn test_escape_url() {
        assert_eq!(escape_url("https://x.org/~user/a_b"), "https://x.org/~user/a_b");
        assert_eq!(escape_url("https://x.org/a%20b#c"), "https://x.org/a\\%20b\\#c");
        assert_eq!(escape_url("https://x.org/{x}\\y"), "https://x.org/\\%7Bx\\%7D\\%5Cy");
    }

    #[test]
    fn test_escape_plain_text_untouched() {
        assert_eq!(escape_latex("Capital, Volume I"), "Capital, Volume I");
    }
}
