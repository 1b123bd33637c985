//! Document tree and HTML parsing.
//!
//! HTML is parsed with html5ever into an arena-allocated [`Dom`]. The tree is
//! owned by the caller for the whole of one document's processing; footnote
//! resolution mutates it in place before rendering reads it.

mod arena;
mod tree_sink;

pub use arena::{
    AncestorsIter, Attribute, ChildrenIter, DescendantsIter, Dom, FollowingIter, Node, NodeData,
    NodeId, PrecedingIter,
};
pub use tree_sink::{DomSink, NodeHandle};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document into a [`Dom`].
///
/// # Example
///
/// ```
/// use archtex::dom::parse_html;
///
/// let dom = parse_html("<p>Hello, <em>World</em></p>");
/// let p = dom.find_by_tag("p").unwrap();
/// assert_eq!(dom.text_content(p), "Hello, World");
/// ```
pub fn parse_html(html: &str) -> Dom {
    let sink = DomSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}

/// Parse HTML bytes, detecting the encoding from a `<meta>` charset
/// declaration and falling back to Windows-1252 for malformed UTF-8.
pub fn parse_html_bytes(html: &[u8]) -> Dom {
    let hint_encoding = crate::util::extract_meta_charset(html);
    let html_str = crate::util::decode_text(html, hint_encoding);
    parse_html(&html_str)
}
