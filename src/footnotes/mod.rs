//! Footnote indexing and reference resolution.
//!
//! [`build_index`] collects footnote definitions into a [`FootnoteIndex`] and
//! removes the definition blocks from the tree. [`inline_hyperlink_refs`] and
//! [`inline_manual_refs`] then replace citations with footnote markers that
//! the LaTeX renderer turns into `\endnote{}` calls.

mod extract;
mod index;
mod resolve;

pub use extract::build_index;
pub use index::{CROSS_REFERENCE_PREFIXES, FootnoteIndex, numeric_aliases};
pub use resolve::{
    ResolveStats, candidate_keys, inline_hyperlink_refs, inline_manual_refs, is_non_note_target,
    lookup_citation, match_reference,
};
