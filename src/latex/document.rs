//! Standalone document assembly.
//!
//! [`build_document`] wraps a rendered body in the preamble it needs: the
//! body uses `\endnote` (enotez), `quoting`, `\multirow`, `array` column
//! specifiers and `\href`.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::text::{collapse_whitespace, escape_latex};

/// `IVThe Title` as left by some chapter headings.
static GLUED_NUMERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([IVX]+)([A-Z][a-z])").unwrap());

const PREAMBLE: &str = r#"\documentclass[11pt,a4paper]{article}

% Font setup
\usepackage{fontspec}
\setmainfont{FreeSerif}
\newfontfamily\greekfont{FreeSerif}

% Page geometry
\usepackage{geometry}
\geometry{
  top=1.2in,
  bottom=1.2in,
  left=1.3in,
  right=1.3in,
  headheight=14pt
}

% Headers and footers
\usepackage{fancyhdr}
\pagestyle{fancy}
\fancyhf{}
\fancyhead[L]{\small\textit{{{AUTHOR}}}}
\fancyhead[R]{\small\thepage}
\renewcommand{\headrulewidth}{0.4pt}
\fancypagestyle{plain}{
  \fancyhf{}
  \fancyfoot[C]{\small\thepage}
  \renewcommand{\headrulewidth}{0pt}
}

% Section formatting
\usepackage{titlesec}
\titleformat{\section}
  {\Large\bfseries}
  {\thesection}{1em}{}
\titlespacing*{\section}{0pt}{2.5ex plus 1ex minus .2ex}{1.5ex plus .2ex}
\titleformat{\subsection}
  {\large\bfseries}
  {\thesubsection}{1em}{}
\titlespacing*{\subsection}{0pt}{2ex plus 1ex minus .2ex}{1ex plus .2ex}
\titleformat{\subsubsection}
  {\normalsize\bfseries\itshape}
  {\thesubsubsection}{1em}{}

% Paragraph spacing
\usepackage{parskip}
\setlength{\parskip}{0.6em}
\setlength{\parindent}{0pt}

% Tables and lists
\usepackage{longtable}
\usepackage{multirow}
\usepackage{array}
\usepackage{enumitem}
\setlist[enumerate]{itemsep=0.3em, parsep=0.2em}
\setlist[itemize]{itemsep=0.3em, parsep=0.2em}

% Endnotes
\usepackage{enotez}
\setenotez{list-name={Notes}, reset=true, backref=true}

% Hyperlinks
\usepackage{xcolor}
\usepackage[colorlinks=true, linkcolor=blue!70!black, urlcolor=blue!60!black]{hyperref}

% Quotations
\usepackage{quoting}
\quotingsetup{vskip=0.5em, leftmargin=1.5em, rightmargin=1.5em}

\begin{document}

% Title page
\thispagestyle{empty}
\vspace*{2cm}
\begin{center}
{\Huge\bfseries {{TITLE}}}\\[1.5em]
{\Large {{AUTHOR}}}\\[3em]
\end{center}
"#;

/// Title page and heading data for [`build_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Plain text; escaped on output.
    pub title: String,
    /// Plain text; `Unknown` when absent.
    pub author: Option<String>,
    /// Label and value pairs shown under the title. Labels are plain text,
    /// values are LaTeX fragments (they may hold `\href` calls) and are
    /// emitted unchanged.
    pub metadata: Vec<(String, String)>,
}

/// Wrap a rendered body in a complete, compilable LaTeX document.
///
/// The endnote list is printed after the body only when the body has
/// endnotes.
///
/// ```
/// use archtex::latex::{DocumentMeta, build_document};
///
/// let meta = DocumentMeta {
///     title: "Wage Labour & Capital".to_string(),
///     author: Some("Karl Marx".to_string()),
///     metadata: Vec::new(),
/// };
/// let tex = build_document("Wages\\endnote{Of labour power.}.\n\n", &meta);
/// assert!(tex.contains("\\section*{Wage Labour \\& Capital}"));
/// assert!(tex.contains("\\printendnotes"));
/// assert!(tex.ends_with("\\end{document}\n"));
/// ```
pub fn build_document(body: &str, meta: &DocumentMeta) -> String {
    let author = escape_latex(meta.author.as_deref().unwrap_or("Unknown"));
    let mut tex = PREAMBLE
        .replace("{{TITLE}}", &escape_latex(&meta.title))
        .replace("{{AUTHOR}}", &author);

    if !meta.metadata.is_empty() {
        tex.push_str("\\vfill\n\\begin{center}\n\\begin{minipage}{0.8\\textwidth}\n\\small\n\\hrule\n\\vspace{0.8em}\n");
        for (label, value) in &meta.metadata {
            tex.push_str(&format!(
                "\\textbf{{{}:}} {value}\\\\[0.3em]\n",
                escape_latex(label)
            ));
        }
        tex.push_str("\\vspace{0.5em}\n\\hrule\n\\end{minipage}\n\\end{center}\n");
    }
    tex.push_str("\\newpage\n\n");

    tex.push_str(&format!(
        "\\section*{{{}}}\n",
        escape_latex(&section_title(&meta.title))
    ));
    tex.push_str(body);
    if !body.ends_with('\n') {
        tex.push('\n');
    }
    if body.contains("\\endnote{") {
        tex.push_str("\\printendnotes\n");
    }
    tex.push_str("\\end{document}\n");
    tex
}

/// Collapse whitespace, drop a leading `CHAPTER ` and separate a glued
/// roman numeral (`IVThe` becomes `IV. The`).
fn section_title(title: &str) -> String {
    let title = collapse_whitespace(title);
    let Some(rest) = title
        .get(..8)
        .filter(|prefix| prefix.eq_ignore_ascii_case("chapter "))
        .map(|_| title[8..].trim())
    else {
        return title;
    };
    GLUED_NUMERAL_RE.replace(rest, "${1}. ${2}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str) -> DocumentMeta {
        DocumentMeta {
            title: title.to_string(),
            ..DocumentMeta::default()
        }
    }

    #[test]
    fn test_required_packages() {
        let tex = build_document("Body.\n\n", &meta("Capital"));
        for package in [
            "\\usepackage{enotez}",
            "\\usepackage{quoting}",
            "\\usepackage{multirow}",
            "\\usepackage{array}",
            "\\usepackage[colorlinks=true, linkcolor=blue!70!black, urlcolor=blue!60!black]{hyperref}",
        ] {
            assert!(tex.contains(package), "missing {package}");
        }
        assert!(tex.starts_with("\\documentclass[11pt,a4paper]{article}\n"));
    }

    #[test]
    fn test_title_page_and_author() {
        let tex = build_document("", &meta("Value, Price & Profit"));
        assert!(tex.contains("{\\Huge\\bfseries Value, Price \\& Profit}\\\\[1.5em]"));
        assert!(tex.contains("{\\Large Unknown}\\\\[3em]"));
        assert!(tex.contains("\\fancyhead[L]{\\small\\textit{Unknown}}"));

        let with_author = DocumentMeta {
            author: Some("Friedrich Engels".to_string()),
            ..meta("Anti-Dühring")
        };
        let tex = build_document("", &with_author);
        assert!(tex.contains("\\fancyhead[L]{\\small\\textit{Friedrich Engels}}"));
    }

    #[test]
    fn test_metadata_block() {
        let with_meta = DocumentMeta {
            metadata: vec![
                ("Source".to_string(), "\\href{https://x.org}{MIA}".to_string()),
                ("Written_on".to_string(), "1847".to_string()),
            ],
            ..meta("Wage Labour")
        };
        let tex = build_document("", &with_meta);
        assert!(tex.contains("\\textbf{Source:} \\href{https://x.org}{MIA}\\\\[0.3em]"));
        assert!(tex.contains("\\textbf{Written\\_on:} 1847\\\\[0.3em]"));
        assert!(tex.contains("\\begin{minipage}{0.8\\textwidth}"));

        assert!(!build_document("", &meta("Plain")).contains("minipage"));
    }

    #[test]
    fn test_endnotes_printed_only_when_used() {
        let plain = build_document("No notes here.\n\n", &meta("A"));
        assert!(!plain.contains("\\printendnotes"));
        assert!(plain.ends_with("No notes here.\n\n\\end{document}\n"));

        let noted = build_document("Claim\\endnote{Source.}", &meta("A"));
        assert!(noted.ends_with("Claim\\endnote{Source.}\n\\printendnotes\n\\end{document}\n"));
    }

    #[test]
    fn test_section_title() {
        assert_eq!(section_title("CHAPTER IVThe  Working Day"), "IV. The Working Day");
        assert_eq!(section_title("Chapter 2 Money"), "2 Money");
        assert_eq!(section_title("CHAPTER VIII Rent"), "VIII Rent");
        assert_eq!(section_title("Wage\nLabour"), "Wage Labour");
        assert_eq!(section_title("Chap"), "Chap");
    }
}
