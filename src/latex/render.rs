//! Document tree → LaTeX rendering.
//!
//! Rendering is a pure recursive walk returning strings: block elements need
//! their children's output before deciding how to wrap it (stripping forced
//! breaks, detecting an inner `quoting`), so the walk returns fragments
//! rather than appending to a shared buffer.

use std::cell::Cell;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;
use url::Url;

use super::table;
use crate::dom::{Dom, NodeData, NodeId};
use crate::text::{
    collapse_whitespace, escape_latex, escape_url, is_breadcrumb, sanitize_fragment,
    sanitize_text_node,
};

static ENDNOTE_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\endnote\{[^}]*\}").unwrap());

static NAV_ARROWS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:>>|<<)\s*").unwrap());

static HREF_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\href\{[^}]+\}\{[^}]+\}").unwrap());

static PIPE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|\s*").unwrap());

static TOP_OF_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Top\s+of\s+the\s+page\s*$").unwrap());

static LEADING_BREAKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\\\\\s*)+").unwrap());

static TRAILING_BREAKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\\\\\s*)+$").unwrap());

/// Heading labels of the notes section itself; the notes become endnotes.
const NOTES_LABELS: [&str; 4] = ["notes", "note", "footnotes", "endnotes"];

/// Element nesting at which [`LatexRenderer`] falls back to plain text.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Generic-role containers whose edges are block boundaries.
const BLOCK_CONTAINERS: &[&str] = &[
    "html", "body", "section", "article", "main", "aside", "figure", "dl", "dt", "dd",
];

/// How an element renders, decided from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    /// `p`, `div`, `center`.
    Block,
    LineBreak,
    Italic,
    Bold,
    /// `span`, `font`.
    Span,
    Heading(u8),
    BlockQuote,
    List { ordered: bool },
    ListItem,
    Table,
    /// `tbody`, `tr`, `td` and friends outside of table classification.
    TablePart,
    Link,
    /// Anything else renders as its children.
    Generic,
}

impl Role {
    /// Roles that start and end a line of output.
    pub(crate) fn is_block(self) -> bool {
        !matches!(
            self,
            Role::Italic | Role::Bold | Role::Span | Role::Link | Role::Generic
        )
    }

    pub(crate) fn of(tag: &str) -> Role {
        match tag {
            "p" | "div" | "center" => Role::Block,
            "br" => Role::LineBreak,
            "em" | "i" | "cite" => Role::Italic,
            "strong" | "b" => Role::Bold,
            "span" | "font" => Role::Span,
            "h1" => Role::Heading(1),
            "h2" => Role::Heading(2),
            "h3" => Role::Heading(3),
            "h4" => Role::Heading(4),
            "h5" => Role::Heading(5),
            "h6" => Role::Heading(6),
            "blockquote" => Role::BlockQuote,
            "ul" => Role::List { ordered: false },
            "ol" => Role::List { ordered: true },
            "li" => Role::ListItem,
            "table" => Role::Table,
            "tbody" | "thead" | "tfoot" | "tr" | "td" | "th" => Role::TablePart,
            "a" => Role::Link,
            _ => Role::Generic,
        }
    }
}

/// Renders a document tree (footnote markers already inlined) to LaTeX.
pub struct LatexRenderer<'a> {
    dom: &'a Dom,
    base_url: Option<Url>,
    max_depth: usize,
    depth: Cell<usize>,
}

impl<'a> LatexRenderer<'a> {
    /// Create a renderer. An empty or unparsable `base_url` means relative
    /// links are downgraded to their text.
    pub fn new(dom: &'a Dom, base_url: &str) -> Self {
        Self {
            dom,
            base_url: Url::parse(base_url).ok(),
            max_depth: DEFAULT_MAX_DEPTH,
            depth: Cell::new(0),
        }
    }

    /// Elements nested deeper than `max_depth` below the node passed to
    /// [`render`](Self::render) are emitted as their escaped plain text.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn dom(&self) -> &'a Dom {
        self.dom
    }

    /// Nesting levels left before the depth limit.
    pub(crate) fn remaining_depth(&self) -> usize {
        self.max_depth.saturating_sub(self.depth.get())
    }

    /// Render a node and its subtree.
    pub fn render(&self, id: NodeId) -> String {
        let Some(node) = self.dom.get(id) else {
            return String::new();
        };

        match &node.data {
            NodeData::Document => self.render_children(id),
            NodeData::Text(text) => render_text(text),
            NodeData::FootnoteMarker(body) => render_endnote(body),
            NodeData::Comment(_) | NodeData::Doctype { .. } => String::new(),
            NodeData::Element { name, .. } => {
                let depth = self.depth.get();
                if depth >= self.max_depth {
                    return self.render_flattened(id);
                }
                self.depth.set(depth + 1);
                let latex = self.render_element(id, Role::of(&name.local));
                self.depth.set(depth);
                latex
            }
        }
    }

    /// Concatenate the rendering of every child, skipping whitespace that
    /// only separates blocks.
    pub fn render_children(&self, id: NodeId) -> String {
        self.dom
            .children(id)
            .filter(|&child| !self.is_block_gap(child))
            .map(|child| self.render(child))
            .collect()
    }

    fn render_flattened(&self, id: NodeId) -> String {
        debug!(depth = self.depth.get(), "nesting limit reached, rendering subtree as text");
        escape_latex(&sanitize_fragment(&self.dom.text_content(id)))
    }

    /// Whether `id` is a whitespace-only text run with a block element, or
    /// the edge of a block container, on either side.
    fn is_block_gap(&self, id: NodeId) -> bool {
        let Some(node) = self.dom.get(id) else {
            return false;
        };
        let NodeData::Text(text) = &node.data else {
            return false;
        };
        if !text.trim().is_empty() {
            return false;
        }

        let edge_is_block = |sibling: NodeId| {
            if sibling.is_some() {
                is_block_level(self.dom, sibling)
            } else {
                node.parent == self.dom.document() || is_block_level(self.dom, node.parent)
            }
        };
        edge_is_block(node.prev_sibling) || edge_is_block(node.next_sibling)
    }

    fn render_element(&self, id: NodeId, role: Role) -> String {
        match role {
            Role::Block => self.render_block(id),
            Role::LineBreak => "\n".to_string(),
            Role::Italic => format!("\\textit{{{}}}", self.render_children(id)),
            Role::Bold => format!("\\textbf{{{}}}", self.render_children(id)),
            Role::Span => {
                if self.has_class(id, |c| c == "inline") {
                    format!(
                        "\\begin{{flushright}}{}\\end{{flushright}}",
                        self.render_children(id)
                    )
                } else {
                    self.render_children(id)
                }
            }
            Role::Heading(level) => self.render_heading(id, level),
            Role::BlockQuote => {
                let body = normalize_block(&self.render_children(id));
                if body.contains("\\begin{quoting}") {
                    format!("{body}\n\n")
                } else {
                    format!("\\begin{{quoting}}\n{body}\n\\end{{quoting}}\n\n")
                }
            }
            Role::List { ordered } => {
                let env = if ordered { "enumerate" } else { "itemize" };
                let items: String = self
                    .dom
                    .children(id)
                    .filter(|&li| self.dom.has_tag(li, &["li"]))
                    .map(|li| format!("\\item {}\n", self.render_children(li)))
                    .collect();
                format!("\\begin{{{env}}}\n{items}\\end{{{env}}}\n\n")
            }
            Role::ListItem => format!("\\item {}\n", self.render_children(id)),
            Role::Table => table::render_table(self, id),
            Role::TablePart | Role::Generic => self.render_children(id),
            Role::Link => self.render_link(id),
        }
    }

    fn has_class(&self, id: NodeId, pred: impl Fn(&str) -> bool) -> bool {
        self.dom
            .element_classes(id)
            .iter()
            .any(|class| pred(&class.to_lowercase()))
    }

    fn render_block(&self, id: NodeId) -> String {
        if self.has_class(id, |c| c.contains("quote")) {
            let body = normalize_block(&self.render_children(id));
            return format!("\\begin{{quoting}}\n{body}\n\\end{{quoting}}\n\n");
        }
        if self.has_class(id, |c| c.contains("indentb")) {
            let raw = self.render_children(id);
            let lines: Vec<&str> = raw
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();
            let body = normalize_block(&lines.join(" \\\\\n"));
            return format!("\\begin{{quote}}\n{body}\n\\end{{quote}}\n\n");
        }
        if self.has_class(id, |c| c == "inline") {
            let content = self.render_children(id);
            return format!("\\begin{{flushright}}\n{content}\n\\end{{flushright}}\n\n");
        }
        let content = self.render_children(id);
        if content.ends_with("\n\n") {
            content
        } else {
            format!("{content}\n\n")
        }
    }

    fn render_heading(&self, id: NodeId, level: u8) -> String {
        let label = self.dom.stripped_text(id, "").to_lowercase();
        if NOTES_LABELS.contains(&label.as_str()) || is_navigation_heading(self.dom, id) {
            return String::new();
        }

        let content = clean_heading_content(&self.render_children(id));
        if content.is_empty() {
            return String::new();
        }

        match level {
            1 => format!("\\section*{{{content}}}\n\n"),
            2 | 4 => format!("\\subsection*{{{content}}}\n\n"),
            3 => format!("\\subsubsection*{{{content}}}\n\n"),
            _ => format!("\\paragraph*{{{content}}}\\mbox{{}}\\\\\n\n"),
        }
    }

    fn render_link(&self, id: NodeId) -> String {
        let text = self.render_children(id);
        let Some(href) = self.dom.get_attr(id, "href").filter(|h| !h.is_empty()) else {
            return text;
        };
        if href.starts_with('#') {
            return text;
        }

        let target = if href.starts_with("http") {
            href.to_string()
        } else {
            match self.base_url.as_ref().and_then(|base| base.join(href).ok()) {
                Some(url) => url.to_string(),
                None => return text,
            }
        };
        format!("\\href{{{}}}{{{text}}}", escape_url(&target))
    }
}

/// Render `node` to LaTeX, resolving relative links against `base_url`.
///
/// ```
/// use archtex::dom::parse_html;
/// use archtex::latex::render;
///
/// let dom = parse_html("<p>Rent &amp; <em>profit</em></p>");
/// let p = dom.find_by_tag("p").unwrap();
/// assert_eq!(render(&dom, p, ""), "Rent \\& \\textit{profit}\n\n");
/// ```
pub fn render(dom: &Dom, node: NodeId, base_url: &str) -> String {
    LatexRenderer::new(dom, base_url).render(node)
}

pub(crate) fn render_text(text: &str) -> String {
    let text = sanitize_text_node(text);
    if text.is_empty() {
        return String::new();
    }
    escape_latex(&text)
}

/// `\endnote{...}` for a resolved footnote body. Empty and breadcrumb-shaped
/// bodies render to nothing.
pub(crate) fn render_endnote(body: &str) -> String {
    let content = sanitize_fragment(body);
    if content.is_empty() || is_breadcrumb(&content) {
        return String::new();
    }
    format!("\\endnote{{{}}}", escape_latex(&content))
}

fn is_block_level(dom: &Dom, id: NodeId) -> bool {
    dom.tag(id)
        .is_some_and(|tag| Role::of(tag).is_block() || BLOCK_CONTAINERS.contains(&tag))
}

fn is_navigation_heading(dom: &Dom, id: NodeId) -> bool {
    let raw = dom.stripped_text(id, "");
    let lower = raw.to_lowercase();
    let has_arrows = raw.contains(">>") || raw.contains("<<");
    let has_links = dom
        .descendants(id)
        .any(|d| dom.has_tag(d, &["a"]) && dom.get_attr(d, "href").is_some());

    has_arrows
        || lower.contains("top of the page")
        || (has_links && (lower.contains("contents") || lower.contains("page")))
}

/// Strip endnote calls, navigation arrows, links and `|` separators from a
/// rendered heading, collapsing it onto one line.
pub(crate) fn clean_heading_content(raw: &str) -> String {
    let cleaned = ENDNOTE_CALL_RE.replace_all(raw, "");
    let cleaned = NAV_ARROWS_RE.replace_all(&cleaned, "");
    let cleaned = HREF_CALL_RE.replace_all(&cleaned, "");
    let cleaned = PIPE_SEPARATOR_RE.replace_all(&cleaned, " ");
    if is_breadcrumb(&cleaned) || TOP_OF_PAGE_RE.is_match(&cleaned) {
        return String::new();
    }
    collapse_whitespace(&cleaned)
}

/// Trim a block body: surrounding whitespace, forced line breaks (`\\`) at
/// either end and blank leading or trailing lines.
pub(crate) fn normalize_block(text: &str) -> String {
    let text = TRAILING_BREAKS_RE.replace(text.trim_end(), "");
    let text = LEADING_BREAKS_RE.replace(text.trim_start(), "");

    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
