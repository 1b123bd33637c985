//! # archtex
//!
//! Converts pages from the Marxists Internet Archive and similar HTML
//! archives into LaTeX bodies, turning the pages' hand-made footnotes into
//! `\endnote{}` calls.
//!
//! ## Pipeline
//!
//! - [`dom`]: parse HTML into an arena tree that the later stages mutate
//! - [`cleanup`]: drop page chrome and pick the node holding the text
//! - [`footnotes`]: index footnote definitions, then replace hyperlinked and
//!   bracketed (`[3]`) references with footnote markers
//! - [`latex`]: render the tree, classifying layout tables, fix spacing and
//!   optionally wrap the body in a standalone document
//!
//! [`convert_html`] runs all of it:
//!
//! ```
//! use archtex::{Config, convert_html};
//!
//! let html = r##"
//!     <h1>Wage Labour</h1>
//!     <p>Wages are a price<a href="#fn1">[1]</a>.</p>
//!     <h4>Footnotes</h4>
//!     <p><a id="fn1"></a>[1] Of labour power, not labour.</p>
//! "##;
//!
//! let conversion = convert_html(html, "", &Config::default());
//! assert!(conversion.latex.starts_with("\\section*{Wage Labour}"));
//! assert!(conversion.latex.contains("\\endnote{Of labour power, not labour.}"));
//! ```
//!
//! ## Working with the stages
//!
//! The stages are public so callers can stop halfway, for example to inspect
//! the footnote index:
//!
//! ```
//! use archtex::Config;
//! use archtex::dom::parse_html;
//! use archtex::footnotes::build_index;
//!
//! let mut dom = parse_html(r#"<h3>Notes</h3><p><a name="n2"></a>2. A second note.</p>"#);
//! let index = build_index(&mut dom, &Config::default());
//! assert_eq!(index.get("2"), Some("A second note."));
//! assert_eq!(index.get("note2"), Some("A second note."));
//! ```

pub mod cleanup;
pub mod config;
pub mod dom;
pub mod error;
pub mod footnotes;
pub mod latex;
pub mod pipeline;
pub mod text;
pub(crate) mod util;

pub use config::Config;
pub use error::{Error, Result};
pub use footnotes::FootnoteIndex;
pub use pipeline::{Conversion, FootnoteStats, convert_file, convert_html, convert_html_bytes};
