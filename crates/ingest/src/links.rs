use scraper::{Html, Selector};

/// Extract every `href` from anchor tags, in document order.
///
/// Relative hrefs are kept as written; deduplication happens later in the
/// TSV store, not here.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");
    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_hrefs_in_document_order() {
        let html = r#"
            <html><body>
              <a href="https://example.com/1">one</a>
              <p>filler</p>
              <a href="/relative/2">two</a>
              <div><a href="https://example.com/3">three</a></div>
            </body></html>
        "#;
        assert_eq!(
            extract_links(html),
            vec![
                "https://example.com/1",
                "/relative/2",
                "https://example.com/3"
            ]
        );
    }

    #[test]
    fn anchors_without_href_are_skipped() {
        let html = r#"<a name="top">anchor</a><a href="https://example.com/">ok</a>"#;
        assert_eq!(extract_links(html), vec!["https://example.com/"]);
    }

    #[test]
    fn duplicate_hrefs_are_kept() {
        let html = r#"<a href="/x">a</a><a href="/x">b</a>"#;
        assert_eq!(extract_links(html), vec!["/x", "/x"]);
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("<p>no links here</p>").is_empty());
    }
}
