//! Reference resolution: replace in-text citations with footnote markers.
//!
//! Two passes run over a tree whose footnote definitions were already
//! indexed. [`inline_hyperlink_refs`] handles `<a href="#...">` links across
//! the whole document; [`inline_manual_refs`] handles bare `[3]` citations in
//! the text runs of the selected content subtree. Matches become
//! [`NodeData::FootnoteMarker`](crate::dom::NodeData::FootnoteMarker) nodes
//! holding the unescaped body text.

use tracing::{debug, info, warn};

use super::index::{CROSS_REFERENCE_PREFIXES, FootnoteIndex, numeric_aliases};
use crate::config::Config;
use crate::dom::{Dom, NodeId};
use crate::text::patterns::{MANUAL_CITATION_RE, NOTE_CLASS_RE};
use crate::text::{first_number, is_breadcrumb};

/// Fragment targets that are navigation, never notes.
const NON_NOTE_TARGETS: [&str; 2] = ["#top", "#toc"];

/// Fragment prefixes of section and figure anchors.
const NON_NOTE_PREFIXES: [&str; 2] = ["#s", "#fig"];

/// Number of available keys shown when the first citation fails to resolve.
const KEY_SAMPLE_SIZE: usize = 10;

/// Counters reported by hyperlink resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub matched: usize,
    pub unmatched: usize,
    /// Up to `unmatched_sample_limit` unmatched links as `href (text)`,
    /// section anchors left out.
    pub samples: Vec<String>,
}

/// Whether a link points at navigation or a section/figure anchor instead
/// of a note.
pub fn is_non_note_target(href: &str, link_text: &str) -> bool {
    let href = href.to_lowercase();
    NON_NOTE_TARGETS.contains(&href.as_str())
        || NON_NOTE_PREFIXES.iter().any(|p| href.starts_with(p))
        || is_breadcrumb(link_text)
}

/// Ordered, de-duplicated index keys to try for a link.
///
/// ```
/// use archtex::footnotes::candidate_keys;
///
/// let keys = candidate_keys("#fw12", "[12]");
/// assert_eq!(keys[..3], ["fw12", "12", "n12"]);
/// ```
pub fn candidate_keys(href: &str, link_text: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(fragment) = href.strip_prefix('#') {
        let raw = fragment.trim_start_matches('#').to_lowercase();
        for prefix in CROSS_REFERENCE_PREFIXES {
            if let Some(stripped) = raw.strip_prefix(prefix) {
                candidates.push(stripped.to_string());
            }
        }
        if let Some(number) = first_number(&raw) {
            candidates.extend(numeric_aliases(number));
        }
        candidates.insert(0, raw);
    }

    if let Some(number) = first_number(link_text) {
        candidates.extend(numeric_aliases(number));
    }

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| !c.is_empty() && seen.insert(c.clone()));
    candidates
}

/// Look up the body text a link refers to.
pub fn match_reference<'a>(
    href: &str,
    link_text: &str,
    index: &'a FootnoteIndex,
) -> Option<&'a str> {
    if is_non_note_target(href, link_text) {
        return None;
    }
    candidate_keys(href, link_text)
        .iter()
        .find_map(|key| index.get(key))
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Replace every in-document link that resolves against `index` with a
/// footnote marker. Links that do not resolve are unwrapped to their text.
pub fn inline_hyperlink_refs(
    dom: &mut Dom,
    index: &FootnoteIndex,
    config: &Config,
) -> ResolveStats {
    let links: Vec<NodeId> = dom
        .descendants(dom.document())
        .filter(|&id| {
            dom.has_tag(id, &["a"]) && dom.get_attr(id, "href").is_some_and(|h| h.starts_with('#'))
        })
        .collect();

    let mut stats = ResolveStats::default();

    for link in links {
        if !dom.is_attached(link) {
            continue;
        }
        let href = dom.get_attr(link, "href").unwrap_or_default().to_string();
        let link_text = dom.stripped_text(link, " ");

        match match_reference(&href, &link_text, index) {
            Some(body) => {
                let marker = dom.create_footnote_marker(body);
                dom.replace(link, marker);
                stats.matched += 1;
            }
            None => {
                stats.unmatched += 1;
                if stats.samples.len() < config.unmatched_sample_limit
                    && !href.to_lowercase().starts_with("#s")
                {
                    stats
                        .samples
                        .push(format!("{href} ({})", preview(&link_text, 40)));
                }
                dom.unwrap(link);
            }
        }
    }

    if !stats.samples.is_empty() {
        warn!(
            count = stats.unmatched,
            "footnote references had no match: {}",
            stats.samples.join("; ")
        );
    }
    stats
}

/// Whether citations in this text run are eligible for manual resolution.
fn is_citation_context(dom: &Dom, text: NodeId) -> bool {
    let parent = dom.parent(text);
    if parent.is_none() || dom.has_tag(parent, &["script", "style"]) {
        return false;
    }
    !dom.ancestors(text).any(|a| {
        (dom.has_tag(a, &["a"]) && dom.get_attr(a, "href").is_some())
            || dom
                .element_classes(a)
                .iter()
                .any(|class| NOTE_CLASS_RE.is_match(class))
    })
}

/// Body for a bare `[n]` citation: direct key variants first, then any key
/// whose embedded number is `n`.
pub fn lookup_citation<'a>(index: &'a FootnoteIndex, number: &str) -> Option<&'a str> {
    let variants = [
        number.to_string(),
        format!("n{number}"),
        format!("note{number}"),
        format!("footnote{number}"),
        format!("#{number}"),
        format!("fn{number}"),
    ];
    variants.iter().find_map(|key| index.get(key)).or_else(|| {
        index
            .iter()
            .find(|(key, _)| first_number(key) == Some(number))
            .map(|(_, body)| body)
    })
}

enum Piece {
    Text(String),
    Marker(String),
}

/// Resolve bare `[n]` citations in the text runs below `content`.
///
/// A run is split around each resolved citation and the pieces are spliced
/// in its place; runs without a resolved citation are left untouched.
/// Returns the number of citations converted.
pub fn inline_manual_refs(
    dom: &mut Dom,
    content: NodeId,
    index: &FootnoteIndex,
    config: &Config,
) -> usize {
    let runs: Vec<(NodeId, String)> = dom
        .descendants(content)
        .filter_map(|id| {
            let text = dom.text(id)?;
            memchr::memchr(b'[', text.as_bytes())?;
            if !MANUAL_CITATION_RE.is_match(text) || !is_citation_context(dom, id) {
                return None;
            }
            Some((id, text.to_string()))
        })
        .collect();

    let mut matched = 0;
    let mut unmatched: Vec<String> = Vec::new();

    for (run, text) in runs {
        let mut pieces = Vec::new();
        let mut last = 0;
        let mut resolved_any = false;

        for caps in MANUAL_CITATION_RE.captures_iter(&text) {
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                pieces.push(Piece::Text(text[last..whole.start()].to_string()));
            }

            match lookup_citation(index, number.as_str()) {
                Some(body) => {
                    pieces.push(Piece::Marker(body.to_string()));
                    matched += 1;
                    resolved_any = true;
                }
                None => {
                    pieces.push(Piece::Text(whole.as_str().to_string()));
                    if unmatched.len() < config.unmatched_sample_limit {
                        unmatched.push(whole.as_str().to_string());
                        if unmatched.len() == 1 {
                            let keys: Vec<&str> = index.keys().take(KEY_SAMPLE_SIZE).collect();
                            debug!(?keys, "available footnote keys");
                        }
                    }
                }
            }
            last = whole.end();
        }
        if last < text.len() {
            pieces.push(Piece::Text(text[last..].to_string()));
        }

        if resolved_any {
            for piece in pieces {
                let node = match piece {
                    Piece::Text(text) => dom.create_text(text),
                    Piece::Marker(body) => dom.create_footnote_marker(body),
                };
                dom.insert_before(run, node);
            }
            dom.detach(run);
        }
    }

    if !unmatched.is_empty() {
        warn!(
            count = unmatched.len(),
            "manual footnote references had no match: {}",
            unmatched.join(", ")
        );
    }
    if matched > 0 {
        info!("converted {matched} manual footnote references to endnotes");
    }
    matched
}
