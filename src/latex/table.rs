//! Table classification.
//!
//! Archive pages use tables for everything except tabular data: verse set in
//! a single cell, two-column section outlines, numbered lists split across
//! cells, and nested "A = B" layouts. [`classify`] picks one
//! [`TableLayout`] per table (first applicable rule wins) and
//! [`render_table`] renders it; anything unrecognized degrades to prose.
//!
//! Rows and cells are always the table's own: rows whose nearest `table`
//! ancestor is this table, cells that are direct children of such a row.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::render::{LatexRenderer, normalize_block, render_endnote, render_text};
use crate::dom::{Dom, NodeData, NodeId};
use crate::text::{collapse_whitespace, escape_latex, sanitize_fragment};

/// `I. FIRST SECTION`
static SECTION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVX]+\.\s+[A-Z\s]+$").unwrap());

/// Looser form used when emboldening a rendered label.
static SECTION_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[IVX]+\.\s*[A-Z\s]+$").unwrap());

static PAREN_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d+\)").unwrap());

static ITEM_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\((\d+)\)\s*$").unwrap());

/// Lines shorter than this count as verse lines.
const SHORT_LINE: usize = 80;

const SECTION_LIST_COLUMNS: &str =
    r">{\raggedleft\arraybackslash}p{0.22\textwidth}|p{0.73\textwidth}";
const VALUE_FORM_COLUMNS: &str = r">{\raggedleft\arraybackslash}p{0.42\textwidth}|p{0.5\textwidth}";
const VALUE_FORM_EQUALS_COLUMNS: &str =
    r">{\raggedleft\arraybackslash}p{0.38\textwidth} c|p{0.5\textwidth}";

/// How a table renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLayout {
    /// Footer/navigation tables and tables without rows.
    Omitted,
    /// Single cell of verse.
    Verse { cell: NodeId },
    /// Single cell of ordinary content.
    QuotedCell { cell: NodeId },
    /// Roman-numeral section headers against list bodies.
    SectionList { rows: Vec<NodeId> },
    /// `(1)`, `(2)` markers in one cell against content lines in another.
    NumberedList { items: Vec<String> },
    /// Nested table of terms against one explanatory block.
    ValueForm(ValueForm),
    /// Cell texts joined per row.
    Prose,
}

/// Rendered pieces of a value-form table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueForm {
    pub terms: Vec<String>,
    pub value: String,
    /// The inner table had its own `=` column.
    pub equals_column: bool,
}

/// Rows whose nearest `table` ancestor is `table`.
pub fn own_rows(dom: &Dom, table: NodeId) -> Vec<NodeId> {
    dom.descendants(table)
        .filter(|&id| dom.has_tag(id, &["tr"]) && dom.find_ancestor(id, &["table"]) == Some(table))
        .collect()
}

/// `td`/`th` children of a row.
pub fn own_cells(dom: &Dom, row: NodeId) -> Vec<NodeId> {
    dom.children(row)
        .filter(|&id| dom.has_tag(id, &["td", "th"]))
        .collect()
}

fn is_footer_or_nav(dom: &Dom, table: NodeId) -> bool {
    let marks = |s: &str| {
        let s = s.to_lowercase();
        s.contains("foot") || s.contains("nav")
    };
    dom.element_classes(table).iter().any(|c| marks(c)) || dom.element_id(table).is_some_and(marks)
}

/// Verse: at least three `br`s, or at least three lines of which 70% are short.
pub fn is_poetry_cell(dom: &Dom, cell: NodeId) -> bool {
    if dom.find_all(cell, &["br"]).len() >= 3 {
        return true;
    }
    let text = dom.stripped_text(cell, "\n");
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 3 {
        return false;
    }
    let short = lines
        .iter()
        .filter(|l| l.chars().count() < SHORT_LINE)
        .count();
    short * 10 >= lines.len() * 7
}

fn is_separator_row(dom: &Dom, row: NodeId, cells: &[NodeId]) -> bool {
    let full_width = matches!(cells, [only] if dom.get_attr(*only, "colspan") == Some("2"));
    full_width || dom.find_first(row, &["hr"]).is_some()
}

/// At least two rows, one with a roman-numeral section header on the left
/// and one with an ordered list on the right.
pub fn is_section_list(dom: &Dom, rows: &[NodeId]) -> bool {
    if rows.len() < 2 {
        return false;
    }
    let mut headers = 0;
    let mut lists = 0;
    for &row in rows {
        let cells = own_cells(dom, row);
        if is_separator_row(dom, row, &cells) {
            continue;
        }
        if let &[left, right] = cells.as_slice() {
            if SECTION_HEADER_RE.is_match(dom.stripped_text(left, "").trim()) {
                headers += 1;
            }
            if dom.find_first(right, &["ol"]).is_some() {
                lists += 1;
            }
        }
    }
    headers >= 1 && lists >= 1
}

/// At least two `(n)` markers across the rows' text.
pub fn is_numbered_list(dom: &Dom, rows: &[NodeId]) -> bool {
    let text: String = rows.iter().map(|&row| dom.text_content(row)).collect();
    PAREN_NUMBER_RE.find_iter(&text).count() >= 2
}

/// Lines per item in a cell of `(1)<br><br>(2)<br>` markers: each marker owns
/// the `br`s that follow it; the last marker owns at least one line.
pub fn parse_numbered_cell(dom: &Dom, cell: NodeId) -> Vec<usize> {
    let mut counts = Vec::new();
    let mut seen_marker = false;
    let mut breaks = 0;

    for child in dom.children(cell) {
        if dom.has_tag(child, &["br"]) {
            breaks += 1;
            continue;
        }
        let Some(text) = dom.text(child) else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() || !ITEM_MARKER_RE.is_match(text) {
            continue;
        }
        if seen_marker {
            counts.push(breaks);
        }
        seen_marker = true;
        breaks = 0;
    }

    if seen_marker {
        counts.push(breaks.max(1));
    }
    counts
}

/// Split a cell's content into lines at `br` children, artifact tokens
/// removed and empty lines dropped.
pub fn content_lines(dom: &Dom, cell: NodeId) -> Vec<String> {
    let mut lines = Vec::new();
    let mut parts: Vec<String> = Vec::new();

    for child in dom.children(cell) {
        let Some(node) = dom.get(child) else {
            continue;
        };
        match &node.data {
            NodeData::Element { .. } if dom.has_tag(child, &["br"]) => {
                if !parts.is_empty() {
                    lines.push(parts.join(" "));
                    parts.clear();
                }
            }
            NodeData::Element { .. } => {
                let text = dom.text_content(child);
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            NodeData::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            _ => {}
        }
    }
    if !parts.is_empty() {
        lines.push(parts.join(" "));
    }

    lines
        .iter()
        .map(|line| sanitize_fragment(line))
        .filter(|line| !line.is_empty())
        .collect()
}

fn numbered_items(dom: &Dom, rows: &[NodeId]) -> Option<Vec<String>> {
    let cells: Vec<NodeId> = rows.iter().flat_map(|&row| own_cells(dom, row)).collect();
    let &[first, second, ..] = cells.as_slice() else {
        return None;
    };

    let counts = parse_numbered_cell(dom, first);
    if counts.len() < 2 {
        return None;
    }

    let lines = content_lines(dom, second);
    let mut remaining = lines.into_iter();
    let mut items: Vec<String> = Vec::new();
    for count in counts {
        let item: Vec<String> = remaining.by_ref().take(count).collect();
        if !item.is_empty() {
            items.push(item.join(" "));
        }
    }

    let leftover: Vec<String> = remaining.collect();
    if let Some(last) = items.last_mut()
        && !leftover.is_empty()
    {
        last.push(' ');
        last.push_str(&leftover.join(" "));
    }

    (!items.is_empty()).then_some(items)
}

/// Render a cell for a one-line table slot.
fn single_line(renderer: &LatexRenderer<'_>, cell: NodeId) -> String {
    let content = normalize_block(&renderer.render_children(cell));
    collapse_whitespace(&content.replace('\n', " "))
}

fn value_form(renderer: &LatexRenderer<'_>, table: NodeId) -> Option<ValueForm> {
    let dom = renderer.dom();
    let outer_rows = own_rows(dom, table);
    let &[outer_row] = outer_rows.as_slice() else {
        return None;
    };
    let outer_cells: Vec<NodeId> = own_cells(dom, outer_row)
        .into_iter()
        .filter(|&c| dom.has_tag(c, &["td"]))
        .collect();
    if outer_cells.len() < 2 {
        return None;
    }

    let mut inner_table = None;
    let mut value_cell = None;
    for &cell in &outer_cells {
        let nested = dom.find_first(cell, &["table"]);
        if nested.is_some() && inner_table.is_none() {
            inner_table = nested;
        } else if !sanitize_fragment(&dom.stripped_text(cell, " ")).is_empty() {
            value_cell = Some(cell);
        }
    }
    let (inner_table, value_cell) = (inner_table?, value_cell?);

    let inner_rows = own_rows(dom, inner_table);
    if inner_rows.len() < 2 {
        return None;
    }

    let mut terms = Vec::new();
    let mut equals_column = false;
    for row in inner_rows {
        let mut cells = own_cells(dom, row);
        if cells.is_empty() {
            continue;
        }
        if let Some(&last) = cells.last()
            && sanitize_fragment(&dom.stripped_text(last, " ")) == "="
        {
            equals_column = true;
            cells.pop();
        }

        let parts: Vec<String> = cells
            .iter()
            .map(|&cell| single_line(renderer, cell))
            .filter(|part| !part.is_empty())
            .collect();
        let term = parts.join(" ");
        if !term.is_empty() {
            terms.push(term);
        }
    }
    if terms.len() < 2 {
        return None;
    }

    let mut value = single_line(renderer, value_cell);
    if value.is_empty() {
        return None;
    }
    if !equals_column && !value.starts_with('=') {
        value = format!("= {value}");
    }

    Some(ValueForm {
        terms,
        value,
        equals_column,
    })
}

/// Pick the layout for a table.
pub fn classify(renderer: &LatexRenderer<'_>, table: NodeId) -> TableLayout {
    let dom = renderer.dom();
    if is_footer_or_nav(dom, table) {
        return TableLayout::Omitted;
    }

    let rows = own_rows(dom, table);
    let has_nested_table = dom.find_first(table, &["table"]).is_some();

    if !has_nested_table && is_section_list(dom, &rows) {
        return TableLayout::SectionList { rows };
    }
    if dom.find_first(table, &["ol", "ul", "li"]).is_some() {
        return TableLayout::Prose;
    }
    if has_nested_table {
        return value_form(renderer, table).map_or(TableLayout::Prose, TableLayout::ValueForm);
    }
    if rows.is_empty() {
        return TableLayout::Omitted;
    }

    if let &[row] = rows.as_slice()
        && let &[cell] = own_cells(dom, row).as_slice()
    {
        return if is_poetry_cell(dom, cell) {
            TableLayout::Verse { cell }
        } else {
            TableLayout::QuotedCell { cell }
        };
    }

    if is_numbered_list(dom, &rows)
        && let Some(items) = numbered_items(dom, &rows)
    {
        return TableLayout::NumberedList { items };
    }
    TableLayout::Prose
}

/// Classify and render a table.
pub fn render_table(renderer: &LatexRenderer<'_>, table: NodeId) -> String {
    let dom = renderer.dom();
    let in_blockquote = dom.find_ancestor(table, &["blockquote"]).is_some();

    match classify(renderer, table) {
        TableLayout::Omitted => String::new(),
        TableLayout::Verse { cell } => {
            let verse = format_poetry(renderer, cell);
            if in_blockquote {
                format!("{verse}\n\n")
            } else {
                format!(
                    "\\begin{{center}}\n\\begin{{quoting}}\n{verse}\n\\end{{quoting}}\n\\end{{center}}\n\n"
                )
            }
        }
        TableLayout::QuotedCell { cell } => {
            let content = renderer.render_children(cell);
            if content.trim().is_empty() {
                return String::new();
            }
            let body = normalize_block(&content);
            if in_blockquote {
                format!("{body}\n\n")
            } else {
                format!("\\begin{{quoting}}\n{body}\n\\end{{quoting}}\n\n")
            }
        }
        TableLayout::SectionList { rows } => render_section_list(renderer, &rows),
        TableLayout::NumberedList { items } => {
            let items: Vec<String> = items
                .iter()
                .map(|item| format!("\\item {}", escape_latex(item)))
                .collect();
            format!("\\begin{{enumerate}}\n{}\n\\end{{enumerate}}\n\n", items.join("\n"))
        }
        TableLayout::ValueForm(form) => render_value_form(&form),
        TableLayout::Prose => render_prose(dom, table, in_blockquote),
    }
}

fn render_section_list(renderer: &LatexRenderer<'_>, rows: &[NodeId]) -> String {
    let dom = renderer.dom();
    let mut lines = Vec::new();
    for &row in rows {
        let cells = own_cells(dom, row);
        if is_separator_row(dom, row, &cells) {
            lines.push("\\hline".to_string());
            continue;
        }
        let &[left, right] = cells.as_slice() else {
            continue;
        };

        let label = renderer.render_children(left).trim().to_string();
        let label = if SECTION_LABEL_RE.is_match(&label) {
            format!("\\textbf{{{label}}}")
        } else {
            label
        };
        let body = normalize_block(&renderer.render_children(right));
        lines.push(format!("{label} & {body} \\\\"));
    }

    format!(
        "\\begin{{center}}\n\\begin{{tabular}}{{{SECTION_LIST_COLUMNS}}}\n\\renewcommand{{\\arraystretch}}{{1.1}}\n\\setlength{{\\tabcolsep}}{{0.8em}}\n{}\n\\end{{tabular}}\n\\end{{center}}\n\n",
        lines.join("\n")
    )
}

fn render_value_form(form: &ValueForm) -> String {
    let total = form.terms.len();
    let rows: Vec<String> = form
        .terms
        .iter()
        .enumerate()
        .map(|(i, term)| {
            let equals = if form.equals_column { " = &" } else { "" };
            if i == 0 {
                format!(
                    "{term} &{equals} \\multirow{{{total}}}{{*}}{{{}}} \\\\",
                    form.value
                )
            } else {
                format!("{term} &{equals} \\\\")
            }
        })
        .collect();
    let columns = if form.equals_column {
        VALUE_FORM_EQUALS_COLUMNS
    } else {
        VALUE_FORM_COLUMNS
    };

    format!(
        "\\begin{{center}}\n\\setlength{{\\tabcolsep}}{{1.1em}}\n\\renewcommand{{\\arraystretch}}{{1.15}}\n\\begin{{tabular}}{{{columns}}}\n{}\n\\end{{tabular}}\n\\end{{center}}\n\n",
        rows.join("\n")
    )
}

/// Each row's cell texts joined by an em-dash, rows separated by blank lines.
fn render_prose(dom: &Dom, table: NodeId, in_blockquote: bool) -> String {
    let lines: Vec<String> = own_rows(dom, table)
        .into_iter()
        .filter_map(|row| {
            let cells: Vec<String> = own_cells(dom, row)
                .into_iter()
                .map(|cell| sanitize_fragment(&dom.stripped_text(cell, " ")))
                .filter(|text| !text.is_empty())
                .map(|text| escape_latex(&text))
                .collect();
            (!cells.is_empty()).then(|| cells.join(" --- "))
        })
        .collect();

    if lines.is_empty() {
        return String::new();
    }
    let content = lines.join("\n\n");
    if in_blockquote {
        format!("\n{content}\n\n")
    } else {
        format!("\n\\begin{{quoting}}\n{content}\n\\end{{quoting}}\n\n")
    }
}

/// Verse lines of a cell joined by ` \\`. A line ends only at a `br` that is
/// a child of the cell or of a paragraph in it; inline formatting is kept.
pub fn format_poetry(renderer: &LatexRenderer<'_>, cell: NodeId) -> String {
    let mut verse = Verse::default();
    for child in renderer.dom().children(cell) {
        verse.line_level(renderer, child, 1);
    }
    verse.flush();

    if verse.lines.is_empty() {
        return String::new();
    }
    format!("\n{}", verse.lines.join(" \\\\\n"))
}

#[derive(Default)]
struct Verse {
    lines: Vec<String>,
    current: String,
}

impl Verse {
    fn flush(&mut self) {
        let line = collapse_whitespace(&self.current);
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn line_level(&mut self, renderer: &LatexRenderer<'_>, id: NodeId, depth: usize) {
        let dom = renderer.dom();
        if dom.has_tag(id, &["br"]) {
            self.flush();
        } else if dom.has_tag(id, &["p"]) && depth < renderer.remaining_depth() {
            for child in dom.children(id) {
                self.line_level(renderer, child, depth + 1);
            }
        } else {
            self.inline(renderer, id, depth);
        }
    }

    fn inline(&mut self, renderer: &LatexRenderer<'_>, id: NodeId, depth: usize) {
        let dom = renderer.dom();
        let Some(node) = dom.get(id) else {
            return;
        };
        if depth >= renderer.remaining_depth() {
            self.wrap_text(dom, id, None);
            return;
        }
        match &node.data {
            NodeData::Text(text) => self.current.push_str(&render_text(text)),
            NodeData::FootnoteMarker(body) => self.current.push_str(&render_endnote(body)),
            NodeData::Element { .. } if dom.has_tag(id, &["em", "i", "cite"]) => {
                self.wrap_text(dom, id, Some("textit"));
            }
            NodeData::Element { .. } if dom.has_tag(id, &["strong", "b"]) => {
                self.wrap_text(dom, id, Some("textbf"));
            }
            NodeData::Element { .. } if dom.has_tag(id, &["a"]) => self.wrap_text(dom, id, None),
            NodeData::Element { .. } => {
                for child in dom.children(id) {
                    self.inline(renderer, child, depth + 1);
                }
            }
            NodeData::Document | NodeData::Comment(_) | NodeData::Doctype { .. } => {}
        }
    }

    fn wrap_text(&mut self, dom: &Dom, id: NodeId, command: Option<&str>) {
        let text = dom.stripped_text(id, " ");
        if text.is_empty() {
            return;
        }
        let escaped = escape_latex(&text);
        match command {
            Some(command) => self.current.push_str(&format!("\\{command}{{{escaped}}}")),
            None => self.current.push_str(&escaped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn with_table<T>(html: &str, f: impl FnOnce(&LatexRenderer<'_>, NodeId) -> T) -> T {
        let dom = parse_html(html);
        let table = dom.find_by_tag("table").unwrap();
        let renderer = LatexRenderer::new(&dom, "");
        f(&renderer, table)
    }

    fn layout(html: &str) -> TableLayout {
        with_table(html, classify)
    }

    fn rendered(html: &str) -> String {
        with_table(html, render_table)
    }

    #[test]
    fn test_own_rows_skip_nested() {
        let dom = parse_html(
            "<table><tr><td><table><tr><td>in</td></tr></table></td></tr><tr><td>b</td></tr></table>",
        );
        let table = dom.find_by_tag("table").unwrap();
        assert_eq!(own_rows(&dom, table).len(), 2);
    }

    #[test]
    fn test_footer_table_omitted() {
        assert_eq!(
            layout(r#"<table class="footer"><tr><td>x</td></tr></table>"#),
            TableLayout::Omitted
        );
        assert_eq!(
            layout(r#"<table id="navbar"><tr><td>x</td></tr></table>"#),
            TableLayout::Omitted
        );
        assert_eq!(rendered(r#"<table class="Footer"><tr><td>x</td></tr></table>"#), "");
    }

    #[test]
    fn test_poetry_predicate() {
        let dom = parse_html("<table><tr><td>a<br>b<br>c<br>d</td></tr></table>");
        let cell = dom.find_by_tag("td").unwrap();
        assert!(is_poetry_cell(&dom, cell));

        let dom = parse_html("<table><tr><td>One long line only</td></tr></table>");
        let cell = dom.find_by_tag("td").unwrap();
        assert!(!is_poetry_cell(&dom, cell));
    }

    #[test]
    fn test_verse_four_lines() {
        let out = rendered(
            "<table><tr><td>The first line<br>The second line<br>The <em>third</em> line<br>The fourth line</td></tr></table>",
        );
        assert_eq!(
            out,
            "\\begin{center}\n\\begin{quoting}\n\nThe first line \\\\\nThe second line \\\\\nThe \\textit{third} line \\\\\nThe fourth line\n\\end{quoting}\n\\end{center}\n\n"
        );
    }

    #[test]
    fn test_verse_inside_blockquote_not_wrapped() {
        let dom = parse_html(
            "<blockquote><table><tr><td>a<br>b<br>c<br>d</td></tr></table></blockquote>",
        );
        let table = dom.find_by_tag("table").unwrap();
        let out = render_table(&LatexRenderer::new(&dom, ""), table);
        assert_eq!(out, "\na \\\\\nb \\\\\nc \\\\\nd\n\n");
    }

    #[test]
    fn test_single_cell_quote() {
        let out = rendered("<table><tr><td>A single quoted passage.</td></tr></table>");
        assert_eq!(out, "\\begin{quoting}\nA single quoted passage.\n\\end{quoting}\n\n");
    }

    #[test]
    fn test_section_list() {
        let html = "<table>\
            <tr><td>I. FIRST SECTION</td><td><ol><li>Point one</li></ol></td></tr>\
            <tr><td>Plain</td><td>Other</td></tr>\
            </table>";
        assert!(matches!(layout(html), TableLayout::SectionList { .. }));

        let out = rendered(html);
        assert!(out.contains(SECTION_LIST_COLUMNS));
        assert!(out.contains("\\textbf{I. FIRST SECTION} & \\begin{enumerate}\n\\item Point one\n\\end{enumerate} \\\\"));
        assert!(out.contains("Plain & Other \\\\"));
    }

    #[test]
    fn test_section_list_separator_rows() {
        let html = "<table>\
            <tr><td colspan=\"2\">Heading</td></tr>\
            <tr><td>II. SECOND</td><td><ol><li>x</li></ol></td></tr>\
            <tr><td><hr></td><td></td></tr>\
            </table>";
        let out = rendered(html);
        assert_eq!(out.matches("\\hline").count(), 2);
    }

    #[test]
    fn test_list_table_is_prose() {
        let html = "<table><tr><td>Intro</td><td><ul><li>a</li><li>b</li></ul></td></tr></table>";
        assert_eq!(layout(html), TableLayout::Prose);
        assert_eq!(
            rendered(html),
            "\n\\begin{quoting}\nIntro --- a b\n\\end{quoting}\n\n"
        );
    }

    #[test]
    fn test_numbered_list() {
        let html = "<table><tr>\
            <td>(1)<br><br>(2)<br></td>\
            <td>first a<br>first b<br>second<br>extra</td>\
            </tr></table>";
        assert_eq!(
            layout(html),
            TableLayout::NumberedList {
                items: vec!["first a first b".to_string(), "second extra".to_string()]
            }
        );
        assert_eq!(
            rendered(html),
            "\\begin{enumerate}\n\\item first a first b\n\\item second extra\n\\end{enumerate}\n\n"
        );
    }

    #[test]
    fn test_parse_numbered_cell() {
        let dom = parse_html("<table><tr><td>(1)<br>(2)<br><br><br>(3)</td></tr></table>");
        let cell = dom.find_by_tag("td").unwrap();
        assert_eq!(parse_numbered_cell(&dom, cell), vec![1, 3, 1]);
    }

    #[test]
    fn test_value_form() {
        let html = "<table><tr>\
            <td><table><tr><td>20 yards of linen</td><td>=</td></tr>\
            <tr><td>1 coat</td><td>=</td></tr></table></td>\
            <td>2 ounces of gold</td>\
            </tr></table>";
        let expected = ValueForm {
            terms: vec!["20 yards of linen".to_string(), "1 coat".to_string()],
            value: "2 ounces of gold".to_string(),
            equals_column: true,
        };
        assert_eq!(layout(html), TableLayout::ValueForm(expected));

        let out = rendered(html);
        assert!(out.contains(VALUE_FORM_EQUALS_COLUMNS));
        assert!(out.contains("20 yards of linen & = & \\multirow{2}{*}{2 ounces of gold} \\\\"));
        assert!(out.contains("1 coat & = & \\\\"));
    }

    #[test]
    fn test_value_form_without_equals_column() {
        let html = "<table><tr>\
            <td><table><tr><td>a coat</td></tr><tr><td>tea</td></tr></table></td>\
            <td>gold</td>\
            </tr></table>";
        let out = rendered(html);
        assert!(out.contains("a coat & \\multirow{2}{*}{= gold} \\\\"));
        assert!(out.contains("tea & \\\\"));
    }

    #[test]
    fn test_nested_table_fallback_no_duplicates() {
        let html = "<table><tr><td><table><tr><td>inner</td></tr></table></td></tr>\
            <tr><td>outer</td></tr></table>";
        assert_eq!(layout(html), TableLayout::Prose);
        let out = rendered(html);
        assert_eq!(out.matches("inner").count(), 1);
        assert!(out.contains("inner\n\nouter"));
    }

    #[test]
    fn test_generic_table() {
        let html = "<table><tr><td>a &amp; b</td><td>c</td></tr><tr><td>d</td></tr></table>";
        assert_eq!(
            rendered(html),
            "\n\\begin{quoting}\na \\& b --- c\n\nd\n\\end{quoting}\n\n"
        );
    }
}
