//! LaTeX output.
//!
//! [`LatexRenderer`] walks a document tree and produces a LaTeX body: block
//! structure becomes environments and sectioning commands, footnote markers
//! become `\endnote{}` calls, and tables go through the layout classifier in
//! [`table`]. The post-processing functions then repair spacing for the
//! whole body, and [`build_document`] wraps it in a compilable document.

mod document;
mod postprocess;
mod render;
pub mod table;

pub use document::{DocumentMeta, build_document};
pub use postprocess::{break_long_lines, clean_latex_spacing, strip_breadcrumb_endnotes};
pub use render::{DEFAULT_MAX_DEPTH, LatexRenderer, render};
pub use table::{TableLayout, ValueForm, classify as classify_table, render_table};
