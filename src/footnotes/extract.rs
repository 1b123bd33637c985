//! Footnote definition discovery.
//!
//! Definitions are found by five independent passes, run in a fixed order.
//! Each pass only reads the tree and the entries merged so far, and returns a
//! [`PassOutput`]: the entries it wants written and the definition blocks it
//! consumed. The merge step applies both before the next pass runs, so a
//! later pass never sees a block an earlier one already turned into a note.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::index::FootnoteIndex;
use crate::config::Config;
use crate::dom::{Dom, NodeData, NodeId};
use crate::text::patterns::{
    BARE_ANCHOR_MARKER_RE, BARE_NUMBER_RE, BRACKET_ENUMERATION_RE, CLASS_BLOCK_MARKER_RE,
    FOOTNOTE_CLASS_RE, FOOTNOTE_HEADING_RE, INLINE_NUMBER_RE, LEADING_ENUMERATION_RE,
    LEADING_STARS_RE, SEGMENT_MARKER_RE,
};
use crate::text::{first_number, is_breadcrumb, sanitize_fragment};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Class-marked notes whose anchor is a bare number need at least this much
/// text to count as a definition rather than a stray reference.
const SUBSTANTIAL_NOTE_LENGTH: usize = 50;

/// Bare-anchor bodies must be longer than this.
const MIN_BARE_ANCHOR_BODY: usize = 5;

type Pass = fn(&Dom, &FootnoteIndex, &Config) -> PassOutput;

/// Passes in precedence order.
const PASSES: [(&str, Pass); 5] = [
    ("heading list", heading_list_pass),
    ("class blocks", class_block_pass),
    ("bare anchors", bare_anchor_pass),
    ("bracketed paragraphs", bracket_paragraph_pass),
    ("tabular definitions", tabular_pass),
];

/// Scan the tree for footnote definitions and build the normalized index.
///
/// Definition blocks that produced an entry are detached from the tree. The
/// returned index has lowercase keys and every numeric and cross-reference
/// alias (see [`FootnoteIndex::normalized`]).
pub fn build_index(dom: &mut Dom, config: &Config) -> FootnoteIndex {
    let mut raw = FootnoteIndex::new();

    for (name, pass) in PASSES {
        let output = pass(dom, &raw, config);
        debug!(
            pass = name,
            entries = output.entries.len(),
            consumed = output.consumed.len(),
            "footnote pass finished"
        );
        output.merge_into(dom, &mut raw);
    }

    raw.normalized(config.max_footnote_length)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Write {
    /// The anchor key of a definition: replaces any earlier body.
    Overwrite,
    /// Aliases and fallback keys: first writer wins.
    IfAbsent,
}

/// Entries and consumed blocks produced by one pass.
#[derive(Debug, Default)]
struct PassOutput {
    entries: Vec<(String, String, Write)>,
    consumed: Vec<NodeId>,
}

impl PassOutput {
    fn merge_into(self, dom: &mut Dom, index: &mut FootnoteIndex) {
        for (key, text, write) in self.entries {
            match write {
                Write::Overwrite => index.insert(key, text),
                Write::IfAbsent => {
                    index.insert_if_absent(key, text);
                }
            }
        }
        for node in self.consumed {
            dom.detach(node);
        }
    }
}

/// Pass-local view of the index: merged entries plus this pass's own.
struct Staging<'a> {
    merged: &'a FootnoteIndex,
    staged: HashSet<String>,
    output: PassOutput,
}

impl<'a> Staging<'a> {
    fn new(merged: &'a FootnoteIndex) -> Self {
        Self {
            merged,
            staged: HashSet::new(),
            output: PassOutput::default(),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.merged.contains_key(key) || self.staged.contains(key)
    }

    fn set(&mut self, key: String, text: String) {
        self.staged.insert(key.clone());
        self.output.entries.push((key, text, Write::Overwrite));
    }

    fn set_if_absent(&mut self, key: String, text: String) {
        if self.contains(&key) {
            return;
        }
        self.staged.insert(key.clone());
        self.output.entries.push((key, text, Write::IfAbsent));
    }

    fn consume(&mut self, node: NodeId) {
        self.output.consumed.push(node);
    }

    /// Whether `node` lies inside a block this pass already consumed.
    fn is_consumed(&self, dom: &Dom, node: NodeId) -> bool {
        self.output
            .consumed
            .iter()
            .any(|&block| dom.is_inclusive_ancestor(block, node))
    }

    fn finish(self) -> PassOutput {
        self.output
    }
}

fn fits(text: &str, config: &Config) -> bool {
    text.chars().count() <= config.max_footnote_length
}

/// The element holding the first text run that reads exactly "Notes",
/// "Footnote" and so on.
fn find_footnote_heading(dom: &Dom) -> Option<NodeId> {
    dom.descendants(dom.document())
        .find(|&id| dom.text(id).is_some_and(|t| FOOTNOTE_HEADING_RE.is_match(t)))
        .map(|text| dom.parent(text))
        .filter(|parent| parent.is_some())
}

/// Whether `heading` starts a section other than the footnotes section.
fn ends_footnote_section(dom: &Dom, heading: NodeId, footnote_heading: NodeId) -> bool {
    if heading == footnote_heading {
        return false;
    }
    let text = dom.stripped_text(heading, "").to_lowercase();
    !text.is_empty() && !text.contains("footnote") && !text.contains("note")
}

/// Elements with one of `tags` after the footnotes heading, in document
/// order, stopping once the nearest preceding heading belongs to another
/// section or `limit` elements were collected.
fn section_candidates(
    dom: &Dom,
    footnote_heading: NodeId,
    tags: &[&str],
    limit: Option<usize>,
) -> Vec<NodeId> {
    let mut current_heading = if dom.has_tag(footnote_heading, HEADINGS) {
        Some(footnote_heading)
    } else {
        dom.preceding(footnote_heading)
            .find(|&id| dom.has_tag(id, HEADINGS))
    };

    let mut candidates = Vec::new();
    for id in dom.following(footnote_heading) {
        if dom.has_tag(id, HEADINGS) {
            current_heading = Some(id);
            continue;
        }
        if !dom.has_tag(id, tags) {
            continue;
        }
        if limit.is_some_and(|limit| candidates.len() >= limit) {
            break;
        }
        if current_heading.is_some_and(|h| ends_footnote_section(dom, h, footnote_heading)) {
            break;
        }
        candidates.push(id);
    }
    candidates
}

/// Split a definition into its number and body: `*3. body`, `[3] body`.
fn leading_enumeration(text: &str) -> Option<(&str, &str)> {
    if let Some(caps) = LEADING_ENUMERATION_RE.captures(text) {
        return Some((caps.get(2)?.as_str(), caps.get(3)?.as_str()));
    }
    let caps = BRACKET_ENUMERATION_RE.captures(text)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Split text at `<digits>. ` markers that start a line.
fn split_numbered_segments(raw: &str) -> Vec<(&str, &str)> {
    let markers: Vec<(usize, usize, &str)> = INLINE_NUMBER_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), whole.end(), caps.get(1)?.as_str()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start, number))| {
            let body_end = markers.get(i + 1).map_or(raw.len(), |next| next.0);
            (number, raw[body_start..body_end].trim())
        })
        .collect()
}

/// Heuristic 1: the list of definitions under a "Notes" heading.
fn heading_list_pass(dom: &Dom, index: &FootnoteIndex, config: &Config) -> PassOutput {
    let mut stage = Staging::new(index);
    let Some(heading) = find_footnote_heading(dom) else {
        return stage.finish();
    };

    for block in section_candidates(dom, heading, &["p", "li"], None) {
        if stage.is_consumed(dom, block) {
            continue;
        }
        index_definition_block(dom, block, config, &mut stage);
    }
    stage.finish()
}

fn index_definition_block(dom: &Dom, block: NodeId, config: &Config, stage: &mut Staging<'_>) {
    let text = dom.stripped_text(block, "");
    if text.chars().count() < config.min_footnote_text_length || is_breadcrumb(&text) {
        return;
    }
    let Some((number, body)) = leading_enumeration(&text) else {
        return;
    };
    let body = sanitize_fragment(&LEADING_STARS_RE.replace(body, ""));
    if body.is_empty() || !fits(&body, config) {
        return;
    }

    let anchors = dom.named_anchors(block);
    let direct: Vec<NodeId> = anchors
        .iter()
        .copied()
        .filter(|&a| dom.parent(a) == block)
        .collect();

    if direct.len() <= 1 {
        let raw = dom.stripped_text(block, "\n");
        let segments = split_numbered_segments(&raw);
        if segments.len() > 1 {
            for (num, segment) in segments {
                let segment = sanitize_fragment(segment);
                if segment.is_empty() {
                    continue;
                }
                stage.set_if_absent(format!("n{num}"), segment.clone());
                stage.set_if_absent(num.to_string(), segment);
            }
            stage.consume(block);
            return;
        }
    }

    if anchors.is_empty() {
        return;
    }

    let segments = if direct.len() > 1 {
        anchor_segments(dom, block, &direct, config)
    } else {
        HashMap::new()
    };

    for anchor in anchors {
        let Some(name) = dom.anchor_name(anchor) else {
            continue;
        };
        let key = name.to_lowercase();
        let text = segments.get(&anchor).cloned().unwrap_or_else(|| body.clone());
        let num = first_number(&key).unwrap_or(number).to_string();

        stage.set(key, text.clone());
        stage.set_if_absent(format!("n{num}"), text.clone());
        stage.set_if_absent(num, text);
    }
    stage.consume(block);
}

/// Per-anchor bodies of a block holding several definitions. Each segment
/// runs from a direct-child anchor to the next one.
fn anchor_segments(
    dom: &Dom,
    block: NodeId,
    direct: &[NodeId],
    config: &Config,
) -> HashMap<NodeId, String> {
    let contents: Vec<NodeId> = dom.children(block).collect();
    let positions: Vec<(NodeId, usize)> = direct
        .iter()
        .filter_map(|&a| contents.iter().position(|&c| c == a).map(|p| (a, p)))
        .collect();

    let mut segments = HashMap::new();
    for (i, &(anchor, start)) in positions.iter().enumerate() {
        let end = positions.get(i + 1).map_or(contents.len(), |&(_, p)| p);
        if start >= end {
            continue;
        }

        let parts: Vec<String> = contents[start + 1..end]
            .iter()
            .filter_map(|&part| segment_part(dom, part))
            .collect();
        let joined = sanitize_fragment(&parts.join(" "));
        let segment = SEGMENT_MARKER_RE.replace(&joined, "").trim().to_string();

        if !segment.is_empty() && fits(&segment, config) {
            segments.insert(anchor, segment);
        }
    }
    segments
}

fn segment_part(dom: &Dom, part: NodeId) -> Option<String> {
    match &dom.get(part)?.data {
        NodeData::Element { .. } if dom.has_tag(part, &["br"]) => Some("\n".to_string()),
        NodeData::Element { .. } => Some(dom.stripped_text(part, " ")),
        NodeData::Text(text) => Some(text.clone()),
        _ => None,
    }
}

fn is_note_marked(dom: &Dom, id: NodeId) -> bool {
    dom.element_classes(id)
        .iter()
        .any(|class| FOOTNOTE_CLASS_RE.is_match(class))
        || dom.element_id(id).is_some_and(|v| FOOTNOTE_CLASS_RE.is_match(v))
}

/// A `p`/`div` marked as a note by class or id that holds one note: a
/// wrapper such as `div#footnotes` around several note blocks or several
/// named anchors is not itself a note.
fn is_note_block(dom: &Dom, id: NodeId) -> bool {
    if !is_note_marked(dom, id) {
        return false;
    }
    let nested = dom
        .descendants(id)
        .any(|d| dom.has_tag(d, &["p", "div"]) && is_note_marked(dom, d));
    !nested && dom.named_anchors(id).len() <= 1
}

/// First anchor below `root` carrying `attr`.
fn first_anchor_with(dom: &Dom, root: NodeId, attr: &str) -> Option<NodeId> {
    dom.descendants(root)
        .find(|&id| dom.has_tag(id, &["a"]) && dom.get_attr(id, attr).is_some())
}

/// Heuristic 2: `p`/`div` blocks whose class or id marks them as a note.
fn class_block_pass(dom: &Dom, index: &FootnoteIndex, config: &Config) -> PassOutput {
    let mut stage = Staging::new(index);

    let blocks = dom
        .find_all(dom.document(), &["p", "div"])
        .into_iter()
        .filter(|&block| is_note_block(dom, block));

    for block in blocks {
        if stage.is_consumed(dom, block) {
            continue;
        }
        let Some(anchor) = first_anchor_with(dom, block, "name")
            .or_else(|| first_anchor_with(dom, block, "id"))
        else {
            continue;
        };

        let block_text = dom.stripped_text(block, "");
        if BARE_NUMBER_RE.is_match(&block_text) {
            continue;
        }
        let anchor_text = dom.stripped_text(anchor, "");
        if BARE_NUMBER_RE.is_match(&anchor_text)
            && block_text.chars().count() < SUBSTANTIAL_NOTE_LENGTH
        {
            continue;
        }

        let Some(name) = dom.anchor_name(anchor) else {
            continue;
        };
        let key = name.to_lowercase();
        if stage.contains(&key) {
            stage.consume(block);
            continue;
        }
        if anchor_text.is_empty() {
            stage.consume(anchor);
        }

        let body = sanitize_fragment(&dom.stripped_text(block, " "));
        let body = CLASS_BLOCK_MARKER_RE.replace(&body, "").into_owned();
        if !body.is_empty() && fits(&body, config) {
            stage.set(key, body);
            stage.consume(block);
        }
    }
    stage.finish()
}

/// Whether a block's text opens with the anchor's own label, `[3]` or `3`.
fn starts_with_label(block_text: &str, label: &str) -> bool {
    block_text.starts_with(label)
        || block_text.starts_with(&format!("[{label}"))
        || block_text.starts_with(&label.replace(['[', ']'], ""))
}

/// Heuristic 3: any remaining anchor whose enclosing block opens with the
/// anchor's label.
fn bare_anchor_pass(dom: &Dom, index: &FootnoteIndex, config: &Config) -> PassOutput {
    let mut stage = Staging::new(index);

    for anchor in dom.named_anchors(dom.document()) {
        if stage.is_consumed(dom, anchor) {
            continue;
        }
        let Some(name) = dom.anchor_name(anchor) else {
            continue;
        };
        let key = name.to_lowercase();
        if stage.contains(&key) {
            continue;
        }

        let target = dom
            .find_ancestor(anchor, &["p", "li", "div"])
            .unwrap_or(anchor);
        let block_text = dom.stripped_text(target, "");
        let label = dom.stripped_text(anchor, "");
        if label.is_empty() || !starts_with_label(&block_text, &label) {
            continue;
        }
        if BARE_NUMBER_RE.is_match(&block_text) {
            continue;
        }

        let body = sanitize_fragment(&dom.stripped_text(target, " "));
        let body = BARE_ANCHOR_MARKER_RE.replace(&body, "").into_owned();
        if is_breadcrumb(&body) {
            continue;
        }

        if body.chars().count() > MIN_BARE_ANCHOR_BODY && fits(&body, config) {
            stage.set(key, body);
            stage.consume(target);
        }
    }
    stage.finish()
}

/// The number variants written by the fallback passes.
fn fallback_variants(number: &str) -> [String; 4] {
    [
        number.to_string(),
        format!("n{number}"),
        format!("note{number}"),
        format!("footnote{number}"),
    ]
}

/// Heuristic 4: `[3] body` paragraphs shortly after the notes heading.
fn bracket_paragraph_pass(dom: &Dom, index: &FootnoteIndex, config: &Config) -> PassOutput {
    let mut stage = Staging::new(index);
    let Some(heading) = find_footnote_heading(dom) else {
        return stage.finish();
    };

    let limit = Some(config.footnote_scan_limit);
    for block in section_candidates(dom, heading, &["p", "li"], limit) {
        let text = dom.stripped_text(block, "");
        if text.chars().count() < config.min_footnote_text_length {
            continue;
        }
        let Some(caps) = BRACKET_ENUMERATION_RE.captures(&text) else {
            continue;
        };
        let (Some(number), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        let body = sanitize_fragment(body.as_str());
        if body.is_empty() || !fits(&body, config) {
            continue;
        }
        for variant in fallback_variants(number.as_str()) {
            stage.set_if_absent(variant, body.clone());
        }
    }
    stage.finish()
}

/// Heuristic 5: two-cell rows of tables after the notes heading, anchor on
/// the left and body on the right.
fn tabular_pass(dom: &Dom, index: &FootnoteIndex, config: &Config) -> PassOutput {
    let mut stage = Staging::new(index);
    let Some(heading) = find_footnote_heading(dom) else {
        return stage.finish();
    };

    let limit = Some(config.footnote_scan_limit);
    for table in section_candidates(dom, heading, &["table"], limit) {
        for row in dom.find_all(table, &["tr"]) {
            let cells = dom.find_all(row, &["td", "th"]);
            let &[anchor_cell, body_cell, ..] = cells.as_slice() else {
                continue;
            };

            let Some(anchor) = first_anchor_with(dom, anchor_cell, "id")
                .or_else(|| first_anchor_with(dom, anchor_cell, "name"))
            else {
                continue;
            };
            let Some(anchor_id) = dom
                .element_id(anchor)
                .filter(|id| !id.is_empty())
                .or_else(|| dom.anchor_name(anchor))
            else {
                continue;
            };

            let body = sanitize_fragment(&dom.stripped_text(body_cell, "\n"));
            let body = SEGMENT_MARKER_RE.replace(&body, "").trim().to_string();
            if body.is_empty() || !fits(&body, config) {
                continue;
            }

            let key = anchor_id.to_lowercase();
            let number = first_number(&key).map(str::to_string);
            stage.set_if_absent(key, body.clone());
            if let Some(number) = number {
                for variant in fallback_variants(&number) {
                    stage.set_if_absent(variant, body.clone());
                }
            }
        }
    }
    stage.finish()
}
