//! Whole-document conversion: HTML in, LaTeX body out.

use std::path::Path;

use tracing::{debug, info};

use crate::cleanup::{remove_artifact_nodes, select_content_node, strip_unwanted};
use crate::config::Config;
use crate::dom::{Dom, parse_html, parse_html_bytes};
use crate::error::Result;
use crate::footnotes::{build_index, inline_hyperlink_refs, inline_manual_refs};
use crate::latex::{LatexRenderer, break_long_lines, clean_latex_spacing, strip_breadcrumb_endnotes};

/// Footnote counters for one converted document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteStats {
    /// Entries in the normalized footnote index, aliases included.
    pub extracted: usize,
    /// References replaced by endnotes, hyperlinked and manual.
    pub inlined: usize,
    /// In-document links that resolved to no footnote.
    pub unmatched_refs: usize,
    /// A few of the unmatched links, as `href (link text)`.
    pub unmatched_samples: Vec<String>,
}

/// The result of converting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub latex: String,
    pub stats: FootnoteStats,
}

/// Convert an HTML document to a LaTeX body.
///
/// Relative links are resolved against `base_url`; pass `""` to render them
/// as plain text.
///
/// ```
/// use archtex::{Config, convert_html};
///
/// let html = r##"<p>Value<a href="#n1">1</a> is social.</p>
///     <h3>Notes</h3>
///     <p><a name="n1"></a>1. Labour is its substance.</p>"##;
/// let conversion = convert_html(html, "", &Config::default());
/// assert!(conversion.latex.contains("Value\\endnote{Labour is its substance.} is social."));
/// assert_eq!(conversion.stats.inlined, 1);
/// ```
pub fn convert_html(html: &str, base_url: &str, config: &Config) -> Conversion {
    convert_dom(parse_html(html), base_url, config)
}

/// Like [`convert_html`], decoding the bytes first (UTF-8, a `<meta>`
/// charset, then Windows-1252).
pub fn convert_html_bytes(html: &[u8], base_url: &str, config: &Config) -> Conversion {
    convert_dom(parse_html_bytes(html), base_url, config)
}

/// Read and convert an HTML file.
pub fn convert_file(path: impl AsRef<Path>, base_url: &str, config: &Config) -> Result<Conversion> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read HTML file");
    Ok(convert_html_bytes(&bytes, base_url, config))
}

fn convert_dom(mut dom: Dom, base_url: &str, config: &Config) -> Conversion {
    strip_unwanted(&mut dom);

    let index = build_index(&mut dom, config);
    let mut stats = FootnoteStats {
        extracted: index.len(),
        ..FootnoteStats::default()
    };

    let linked = inline_hyperlink_refs(&mut dom, &index, config);
    stats.inlined = linked.matched;
    stats.unmatched_refs = linked.unmatched;
    stats.unmatched_samples = linked.samples;

    let content = select_content_node(&dom);
    stats.inlined += inline_manual_refs(&mut dom, content, &index, config);

    remove_artifact_nodes(&mut dom);
    let content = select_content_node(&dom);

    let body = LatexRenderer::new(&dom, base_url)
        .with_max_depth(config.max_depth)
        .render(content);
    let body = strip_breadcrumb_endnotes(&body);
    let body = clean_latex_spacing(&body);
    let latex = break_long_lines(&body, config.max_line_length);

    info!(
        extracted = stats.extracted,
        inlined = stats.inlined,
        unmatched = stats.unmatched_refs,
        "converted document"
    );
    Conversion { latex, stats }
}
