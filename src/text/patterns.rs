//! Cached regex patterns shared across the engine.
//!
//! Uses LazyLock to compile patterns once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Tracking and markup artifacts left behind by the archive's HTML generator:
/// `t2h-*` markers and `vol=`/`pg=`/`src=`/`type=` tags.
pub static ARTIFACT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:t2h-[a-z0-9_-]+|vol=\d+|pg=\d+|src=\S+|type=endnote|type=)\b").unwrap()
});

/// A `type=` tag that survived word-bounded matching (e.g. `type= ` at a run end).
pub static TYPE_RESIDUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btype=\s*").unwrap());

/// Archive navigation text: `MIA > Archive > Author`.
pub static BREADCRUMB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(MIA|Archive).*>(Archive|.*>.*)").unwrap());

/// First run of decimal digits.
pub static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Text consisting of a bare, optionally bracketed number: `3`, `[3]`.
pub static BARE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?\d+\]?$").unwrap());

/// Text of a footnotes section heading.
pub static FOOTNOTE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Footnotes?|Notes?)$").unwrap());

/// Leading enumeration of a definition: `*3. body`, `[3] body`, `3 body`.
pub static LEADING_ENUMERATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\*+)?\s*\[?(\d+)\]?\.?\s*(.+)$").unwrap());

/// Bracketed enumeration: `[3] body`.
pub static BRACKET_ENUMERATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\[(\d+)\]\s*(.+)$").unwrap());

pub static LEADING_STARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*+\s*").unwrap());

/// A `<digits>. ` marker at the start of a line.
pub static INLINE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+)\.\s*").unwrap());

/// Enumeration prefix of a segment or table cell body: `[3].`, `3.`, `3`.
pub static SEGMENT_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?\d+\]?\.?\s*").unwrap());

/// Enumeration prefix of a class-marked note block.
pub static CLASS_BLOCK_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?\d+\]?\s*").unwrap());

/// Enumeration prefix of a bare-anchor definition: `[3]`, `3.`, `3)`.
pub static BARE_ANCHOR_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[?\d+\]?[.)]?\s*").unwrap());

/// Class or id naming a footnote definition block.
pub static FOOTNOTE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)endnote|footnote").unwrap());

/// Class of a container whose citations are already part of a note.
pub static NOTE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)footnote|endnote|note").unwrap());

/// In-text bracketed citation: `[3]`.
pub static MANUAL_CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").unwrap());
