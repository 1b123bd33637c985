//! Footnote indexing and reference resolution through the public API.

use archtex::dom::{Dom, parse_html};
use archtex::footnotes::{FootnoteIndex, build_index, inline_hyperlink_refs, inline_manual_refs};
use archtex::latex::render;
use archtex::{Config, convert_html};
use proptest::prelude::*;

fn indexed(html: &str) -> (Dom, FootnoteIndex) {
    let mut dom = parse_html(html);
    let index = build_index(&mut dom, &Config::default());
    (dom, index)
}

#[test]
fn test_link_to_endnote_scenario() {
    let mut dom = parse_html(r##"<p>Text<a href="#n1">[1]</a></p>"##);
    let index: FootnoteIndex = [("n1", "Footnote content")].into_iter().collect();

    let stats = inline_hyperlink_refs(&mut dom, &index, &Config::default());
    assert_eq!((stats.matched, stats.unmatched), (1, 0));

    let p = dom.find_by_tag("p").unwrap();
    assert_eq!(render(&dom, p, ""), "Text\\endnote{Footnote content}\n\n");
}

#[test]
fn test_cross_reference_prefix_alias() {
    let index: FootnoteIndex = [("fw12", "Body")].into_iter().collect();
    let normalized = index.normalized(Config::default().max_footnote_length);
    assert_eq!(normalized.get("12"), Some("Body"));
    assert_eq!(normalized.get("fw12"), Some("Body"));
}

#[test]
fn test_unmatched_link_kept_as_text() {
    let mut dom = parse_html(r##"<p>Claim<a href="#n5">[5]</a> stands.</p>"##);
    let index: FootnoteIndex = [("n1", "Something else")].into_iter().collect();

    let stats = inline_hyperlink_refs(&mut dom, &index, &Config::default());
    assert_eq!(stats.matched, 0);
    assert_eq!(stats.unmatched, 1);

    let p = dom.find_by_tag("p").unwrap();
    assert_eq!(dom.text_content(p), "Claim[5] stands.");
    assert!(dom.find_by_tag("a").is_none());
}

#[test]
fn test_hyperlink_and_manual_citation_agree() {
    let html = r##"<body>
        <p>Linked<a href="#n3">[3]</a> and typed [3].</p>
        <h3>Notes</h3>
        <p><a name="n3"></a>3. The same note in both places.</p>
        </body>"##;
    let (mut dom, index) = indexed(html);
    let config = Config::default();

    let linked = inline_hyperlink_refs(&mut dom, &index, &config);
    let body = dom.find_by_tag("body").unwrap();
    let manual = inline_manual_refs(&mut dom, body, &index, &config);
    assert_eq!(linked.matched, 1);
    assert_eq!(manual, 1);

    let p = dom.find_by_tag("p").unwrap();
    let latex = render(&dom, p, "");
    assert_eq!(
        latex,
        "Linked\\endnote{The same note in both places.} and typed \\endnote{The same note in both places.}.\n\n"
    );
}

#[test]
fn test_definitions_removed_from_tree() {
    let html = r#"<h3>Footnotes</h3>
        <p><a name="n1"></a>1. First definition text.</p>
        <p><a name="n2"></a>2. Second definition text.</p>"#;
    let (dom, index) = indexed(html);

    assert_eq!(index.get("1"), Some("First definition text."));
    assert_eq!(index.get("fn2"), Some("Second definition text."));
    let remaining = dom.stripped_text(dom.document(), " ");
    assert_eq!(remaining, "Footnotes");
}

#[test]
fn test_breadcrumb_note_never_indexed() {
    let html = r#"<h3>Notes</h3>
        <p><a name="n1"></a>1. MIA &gt; Archive &gt; Author</p>
        <p class="footnote"><a name="x2"></a>MIA &gt; Archive &gt; Author</p>"#;
    let (_, index) = indexed(html);
    assert!(index.iter().all(|(_, body)| !body.contains("Archive")));
}

#[test]
fn test_id_marked_note_block() {
    let html = r##"<p>Claim<a href="#q7">7</a>.</p>
        <div id="footnote7"><a name="q7"></a>Seven is the number of a note body here with enough text to be substantial.</div>"##;
    let conversion = convert_html(html, "", &Config::default());

    assert_eq!(
        conversion.latex,
        "Claim\\endnote{Seven is the number of a note body here with enough text to be substantial.}.\n\n"
    );
    assert_eq!(conversion.stats.inlined, 1);
    assert_eq!(conversion.stats.unmatched_refs, 0);
}

#[test]
fn test_id_marked_wrapper_not_one_note() {
    let html = r#"<div id="footnotes">
        <p class="endnote"><a name="e1"></a>First endnote body in the wrapper.</p>
        <p class="endnote"><a name="e2"></a>Second endnote body in the wrapper.</p>
        </div>"#;
    let (dom, index) = indexed(html);

    assert_eq!(index.get("e1"), Some("First endnote body in the wrapper."));
    assert_eq!(index.get("e2"), Some("Second endnote body in the wrapper."));
    assert!(dom.find_by_tag("div").is_some());
}

#[test]
fn test_body_at_length_limit_kept() {
    let config = Config {
        max_footnote_length: 30,
        ..Config::default()
    };
    let body = format!("{}.", "a".repeat(29));
    let mut dom = parse_html(&format!(
        r#"<h3>Notes</h3><p><a name="n1"></a>1. {body}</p><p><a name="n2"></a>2. {body}b</p>"#
    ));
    let index = build_index(&mut dom, &config);

    assert_eq!(index.get("1"), Some(body.as_str()));
    assert_eq!(index.get("2"), None);
}

#[test]
fn test_unmatched_samples_exclude_section_links() {
    let mut links = String::new();
    for i in 1..=7 {
        links.push_str(&format!(r##"<a href="#sec{i}">Part {i}</a> <a href="#n{i}0">[{i}0]</a> "##));
    }
    let conversion = convert_html(&format!("<p>{links}</p>"), "", &Config::default());

    assert_eq!(conversion.stats.unmatched_refs, 14);
    assert_eq!(conversion.stats.unmatched_samples.len(), 5);
    assert!(
        conversion
            .stats
            .unmatched_samples
            .iter()
            .all(|sample| sample.starts_with("#n"))
    );

    let config = Config {
        unmatched_sample_limit: 2,
        ..Config::default()
    };
    let limited = convert_html(&format!("<p>{links}</p>"), "", &config);
    assert_eq!(limited.stats.unmatched_samples, vec!["#n10 ([10])", "#n20 ([20])"]);
}

#[test]
fn test_oversized_body_excluded() {
    let config = Config {
        max_footnote_length: 30,
        ..Config::default()
    };
    let mut dom = parse_html(
        r#"<h3>Notes</h3>
        <p><a name="n1"></a>1. Short note.</p>
        <p><a name="n2"></a>2. This body runs well past the thirty character limit.</p>"#,
    );
    let index = build_index(&mut dom, &config);
    assert_eq!(index.get("1"), Some("Short note."));
    assert_eq!(index.get("2"), None);
}

#[test]
fn test_navigation_links_never_become_notes() {
    let mut dom = parse_html(r##"<p><a href="#top">Top</a> <a href="#s2">Section 2</a></p>"##);
    let index: FootnoteIndex = [("top", "not a note"), ("s2", "not a note")]
        .into_iter()
        .collect();

    let stats = inline_hyperlink_refs(&mut dom, &index, &Config::default());
    assert_eq!(stats.matched, 0);
    assert_eq!(stats.unmatched, 2);

    let p = dom.find_by_tag("p").unwrap();
    assert_eq!(render(&dom, p, ""), "Top Section 2\n\n");
}

proptest! {
    #[test]
    fn prop_keys_lowercase_and_aliased(number in 1u32..500, upper in any::<bool>()) {
        let key = if upper { format!("N{number}") } else { format!("n{number}") };
        let index: FootnoteIndex = [(key, "A body of text")].into_iter().collect();
        let normalized = index.normalized(Config::default().max_footnote_length);

        for (key, _) in normalized.iter() {
            prop_assert_eq!(key.to_lowercase(), key);
        }
        for alias in [
            number.to_string(),
            format!("n{number}"),
            format!("note{number}"),
            format!("footnote{number}"),
            format!("fn{number}"),
        ] {
            prop_assert_eq!(normalized.get(&alias), Some("A body of text"));
        }
    }

    #[test]
    fn prop_unmatched_citation_counts_once(number in 10u32..1000) {
        let html = format!(r##"<p>Text<a href="#ref{number}">[{number}]</a> more.</p>"##);
        let mut dom = parse_html(&html);
        let index: FootnoteIndex = [("n1", "Only note")].into_iter().collect();

        let stats = inline_hyperlink_refs(&mut dom, &index, &Config::default());
        prop_assert_eq!((stats.matched, stats.unmatched), (0, 1));
        prop_assert_eq!(stats.samples.len(), 1);

        let p = dom.find_by_tag("p").unwrap();
        let expected = format!("Text[{number}] more.");
        prop_assert_eq!(dom.text_content(p), expected);
    }
}
