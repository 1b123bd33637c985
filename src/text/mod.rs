//! Text sanitizing and LaTeX escaping.
//!
//! - [`sanitize_fragment`]: strip artifact tokens and collapse whitespace
//! - [`sanitize_text_node`]: the same for text leaves, keeping boundary spaces
//! - [`escape_latex`]: escape LaTeX specials, applied once per visible leaf
//! - [`escape_url`]: escape a link target for `\href`

mod escape;
pub(crate) mod patterns;
mod sanitize;

pub use escape::{escape_latex, escape_url};
pub use sanitize::{
    collapse_whitespace, first_number, is_breadcrumb, sanitize_fragment, sanitize_text_node,
};
