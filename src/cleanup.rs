//! Structural cleanup of archive pages.
//!
//! Page chrome (scripts, navigation, "back to index" links) goes before
//! footnotes are indexed. Leftover artifact blocks, including the footnote
//! section itself once its bodies are inlined, go after resolution. Every
//! function collects its targets first and detaches them afterwards, so a
//! removal never disturbs the walk that found it.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::dom::{Dom, NodeId};
use crate::text::is_breadcrumb;

static ARTIFACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)t2h-|footnote|endnote").unwrap());

static CONVERTER_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)t2h-").unwrap());

static CHROME_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)footer|terms|nav|header|crumbs").unwrap());

static CONTENT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)content|main|text").unwrap());

static CONTENT_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)content|main|text|body").unwrap());

const UNWANTED_TAGS: [&str; 6] = ["script", "style", "header", "footer", "nav", "form"];

const RETURN_LINK_PHRASES: [&str; 2] = ["back to", "return to"];

fn detach_all(dom: &mut Dom, targets: Vec<NodeId>) -> usize {
    let root = dom.document();
    let mut removed = 0;
    for id in targets {
        if id != root && dom.is_attached(id) {
            dom.detach(id);
            removed += 1;
        }
    }
    removed
}

/// Remove page chrome: scripts, styles, headers, footers, navigation and
/// forms, plus the enclosing block of any "back to"/"return to" link.
pub fn strip_unwanted(dom: &mut Dom) {
    let root = dom.document();
    let chrome = dom.find_all(root, &UNWANTED_TAGS);
    let removed = detach_all(dom, chrome);

    let root = dom.document();
    let return_blocks: Vec<NodeId> = dom
        .find_all(root, &["a"])
        .into_iter()
        .filter(|&a| {
            let text = dom.text_content(a).to_lowercase();
            RETURN_LINK_PHRASES.iter().any(|phrase| text.contains(phrase))
        })
        .map(|a| dom.parent(a))
        .filter(|parent| parent.is_some())
        .collect();
    let removed_blocks = detach_all(dom, return_blocks);

    debug!(removed, removed_blocks, "stripped page chrome");
}

/// The text of an element holding exactly one text run, possibly through a
/// chain of single-child wrappers.
fn sole_string(dom: &Dom, id: NodeId) -> Option<&str> {
    if let Some(text) = dom.text(id) {
        return Some(text);
    }
    let mut children = dom.children(id);
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    sole_string(dom, only)
}

fn is_artifact(dom: &Dom, id: NodeId) -> bool {
    dom.element_classes(id).iter().any(|c| ARTIFACT_RE.is_match(c))
        || dom.element_id(id).is_some_and(|v| ARTIFACT_RE.is_match(v))
        || (dom.has_tag(id, &["span"])
            && sole_string(dom, id).is_some_and(|s| CONVERTER_SPAN_RE.is_match(s)))
        || dom
            .element_classes(id)
            .iter()
            .any(|c| CHROME_CLASS_RE.is_match(c))
}

fn is_breadcrumb_block(dom: &Dom, id: NodeId) -> bool {
    if !dom.has_tag(id, &["p", "div", "span"]) {
        return false;
    }
    let text = dom.stripped_text(id, "");
    is_breadcrumb(&text) && text.contains('>') && (text.contains("Archive") || text.contains("MIA"))
}

/// Remove converter artifacts, footnote and endnote blocks, chrome marked by
/// class, and breadcrumb trails.
pub fn remove_artifact_nodes(dom: &mut Dom) {
    let root = dom.document();
    let targets: Vec<NodeId> = dom
        .descendants(root)
        .filter(|&id| dom.is_element(id) && (is_artifact(dom, id) || is_breadcrumb_block(dom, id)))
        .collect();
    let removed = detach_all(dom, targets);
    debug!(removed, "removed artifact nodes");
}

/// The node holding the page's main text.
///
/// Candidates are `div`/`article`/`section`/`main` elements whose id names
/// content, then (if none) those elements and `table`s whose class does. The
/// candidate with the most text wins, earliest first on ties. Without
/// candidates the `body` is used, and without a `body` the document.
pub fn select_content_node(dom: &Dom) -> NodeId {
    let root = dom.document();
    let by_id: Vec<NodeId> = dom
        .find_all(root, &["div", "article", "section", "main"])
        .into_iter()
        .filter(|&id| dom.element_id(id).is_some_and(|v| CONTENT_ID_RE.is_match(v)))
        .collect();

    let candidates = if by_id.is_empty() {
        dom.find_all(root, &["div", "article", "section", "main", "table"])
            .into_iter()
            .filter(|&id| {
                dom.element_classes(id)
                    .iter()
                    .any(|c| CONTENT_CLASS_RE.is_match(c))
            })
            .collect()
    } else {
        by_id
    };

    let mut best: Option<(NodeId, usize)> = None;
    for id in candidates {
        let len = dom.text_content(id).chars().count();
        if best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((id, len));
        }
    }

    match best {
        Some((id, _)) => id,
        None => dom.find_by_tag("body").unwrap_or(root),
    }
}
