//! End-to-end conversion of archive pages.

use std::io::Write;

use archtex::{Config, Error, FootnoteStats, convert_file, convert_html, convert_html_bytes};
use proptest::prelude::*;

const FIXTURE: &str = "tests/fixtures/wage-labour.htm";
const BASE_URL: &str = "https://www.marxists.org/archive/marx/works/1847/wage-labour/ch01.htm";

fn fixture_latex() -> (String, FootnoteStats) {
    let conversion = convert_file(FIXTURE, BASE_URL, &Config::default()).expect("fixture readable");
    (conversion.latex, conversion.stats)
}

#[test]
fn test_fixture_structure() {
    let (latex, _) = fixture_latex();

    assert!(
        latex.trim_start().starts_with("\\section*{Wage Labour and Capital}"),
        "{latex}"
    );
    assert!(latex.contains("\\subsubsection*{I. Preliminary}"));
    assert!(latex.contains(
        "\\begin{quoting}\nLabour power is a commodity, no more, no less than sugar.\n\\end{quoting}"
    ));
    assert!(latex.contains(
        "The first line of the verse \\\\\nThe second line of the verse \\\\\nThe third line \\\\\nThe fourth line"
    ));
    assert!(latex.contains("\\textbf{I. WAGES} & \\begin{enumerate}"));
}

#[test]
fn test_fixture_footnotes() {
    let (latex, stats) = fixture_latex();

    assert!(latex.contains(
        "conditions\\endnote{This refers to the articles in the Neue Rheinische Zeitung of 1849.} which form"
    ));
    assert!(latex.contains(
        "determined?\\endnote{Engels revised the wording in the 1891 edition.} The worker"
    ));
    assert!(latex.contains("for a price \\endnote{Compare Capital, Volume I, Chapter 6.}."));
    assert!(latex.contains("A stray reference[99] stays as text."));

    // Each definition appears once, as an endnote.
    assert_eq!(latex.matches("Neue Rheinische Zeitung").count(), 1);
    assert!(!latex.contains("Notes"));

    assert_eq!(
        stats,
        FootnoteStats {
            extracted: 15,
            inlined: 3,
            unmatched_refs: 1,
            unmatched_samples: vec!["#n99 ([99])".to_string()],
        }
    );
}

#[test]
fn test_fixture_chrome_removed() {
    let (latex, _) = fixture_latex();
    assert!(!latex.contains("MIA"));
    assert!(!latex.contains("Back to"));
    assert!(!latex.contains("window.onload"));
    assert!(!latex.contains("margin-left"));
}

#[test]
fn test_fixture_links() {
    let (latex, _) = fixture_latex();
    assert!(latex.contains(
        "\\href{https://www.marxists.org/glossary/terms/l/a.htm\\#labour-power}{glossary}"
    ));
    assert!(latex.contains(
        "\\href{https://www.marxists.org/archive/marx/works/1847/wage-labour/ch02.htm}{Chapter Two}"
    ));

    let without_base = convert_file(FIXTURE, "", &Config::default()).unwrap();
    assert!(without_base.latex.contains(" and Chapter Two."));
}

#[test]
fn test_long_lines_wrapped() {
    let sentence = "The value of labour power is determined by the labour time necessary. ";
    let html = format!("<p>{}</p>", sentence.repeat(40));
    let config = Config {
        max_line_length: 200,
        ..Config::default()
    };

    let conversion = convert_html(&html, "", &config);
    assert!(conversion.latex.lines().all(|line| line.chars().count() <= 200));
    assert_eq!(
        conversion.latex.split_whitespace().count(),
        sentence.split_whitespace().count() * 40
    );
}

#[test]
fn test_deeply_nested_page() {
    let depth = 5000;
    let html = format!(
        "<body><div id=\"content\"><p>Before.</p><div>{}Buried text{}</div></div></body>",
        "<sup>".repeat(depth),
        "</sup>".repeat(depth)
    );
    let config = Config {
        max_depth: 64,
        ..Config::default()
    };

    let conversion = convert_html(&html, "", &config);
    assert_eq!(conversion.latex, "Before.\n\nBuried text\n\n");
}

#[test]
fn test_bytes_and_str_agree() {
    let html = std::fs::read(FIXTURE).unwrap();
    let from_bytes = convert_html_bytes(&html, BASE_URL, &Config::default());
    let from_str = convert_html(&String::from_utf8(html).unwrap(), BASE_URL, &Config::default());
    assert_eq!(from_bytes, from_str);
}

#[test]
fn test_config_file_roundtrip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "footnote_scan_limit": 20, "unmatched_sample_limit": 2 }}"#).unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.footnote_scan_limit, 20);
    assert_eq!(config.unmatched_sample_limit, 2);
    assert_eq!(config.max_line_length, 10_000);
}

#[test]
fn test_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(Config::load(&missing), Err(Error::Io(_))));

    assert!(matches!(Config::from_json_str("{ not json"), Err(Error::Config(_))));
    assert!(matches!(
        Config::from_json_str(r#"{ "max_line_length": 0 }"#),
        Err(Error::InvalidConfig(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_conversion_is_deterministic(
        paragraphs in proptest::collection::vec("[a-z ,.\\[\\]0-9]{5,40}", 1..6),
        number in 1u32..20,
    ) {
        let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        let html = format!(
            r##"{body}<p>Cited<a href="#n{number}">[{number}]</a>.</p>
            <h3>Notes</h3><p><a name="n{number}"></a>{number}. A note about the text.</p>"##
        );

        let first = convert_html(&html, "", &Config::default());
        let second = convert_html(&html, "", &Config::default());
        prop_assert_eq!(&first, &second);
        prop_assert!(first.stats.inlined >= 1);
    }
}
