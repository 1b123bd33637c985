//! Whole-document fixes applied to rendered LaTeX.

use std::sync::LazyLock;

use regex_lite::Regex;

static BREADCRUMB_ENDNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\endnote\{[^}]*MIA[^}]*Archive[^}]*\}").unwrap());

/// Forced line breaks that LaTeX rejects with "There's no line here to end",
/// paired with the text that replaces the environment or command plus breaks.
static SPACING_FIXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(\\begin\{quote\})\s*(?:\\\\\s*)+", "${1}\n"),
        (r"(\\end\{quote\})\s*(?:\\\\\s*)+", "${1}\n\n"),
        (r"(\\begin\{quoting\})\s*(?:\\\\\s*)+", "${1}\n"),
        (r"(\\end\{quoting\})\s*(?:\\\\\s*)+", "${1}\n\n"),
        (r"(\\subsection\*\{[^}]+\})\s*(?:\\\\\s*)+", "${1}\n\n"),
        (r"(\\subsubsection\*\{[^}]+\})\s*(?:\\\\\s*)+", "${1}\n\n"),
        (r"(\\section\*\{[^}]+\})\s*(?:\\\\\s*)+", "${1}\n\n"),
        (r"(\\paragraph\*\{[^}]+\}\\mbox\{\}\s*)\s*(?:\\\\\s*)+", "${1}\n\n"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

static REPEATED_BREAKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\\\\s*){2,}").unwrap());

/// Remove `\endnote{...}` calls whose body is an archive breadcrumb.
pub fn strip_breadcrumb_endnotes(latex: &str) -> String {
    BREADCRUMB_ENDNOTE_RE.replace_all(latex, "").into_owned()
}

/// Drop forced line breaks directly after quote environments and sectioning
/// commands, then collapse runs of `\\` into a single break.
///
/// ```
/// use archtex::latex::clean_latex_spacing;
///
/// let latex = "\\section*{Title}\\\\\nText \\\\ \\\\\nMore";
/// assert_eq!(clean_latex_spacing(latex), "\\section*{Title}\n\nText \\\\\nMore");
/// ```
pub fn clean_latex_spacing(latex: &str) -> String {
    let mut cleaned = latex.to_string();
    for (pattern, replacement) in SPACING_FIXES.iter() {
        cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
    }
    REPEATED_BREAKS_RE
        .replace_all(&cleaned, "\\\\\n")
        .into_owned()
}

/// Wrap lines longer than `max_length` characters at spaces.
///
/// A single word longer than the limit stays on its own line.
pub fn break_long_lines(text: &str, max_length: usize) -> String {
    let mut result: Vec<String> = Vec::new();
    for line in text.split('\n') {
        if line.chars().count() <= max_length {
            result.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;
        for word in line.split(' ') {
            let word_len = word.chars().count();
            if current_len + word_len + 1 > max_length {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                current.push_str(word);
                current_len = word_len;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(word);
                current_len += word_len;
            }
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    result.join("\n")
}
