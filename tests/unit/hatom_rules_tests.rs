use crate::common::test_helpers::*;

const MISSING_CONTENT: &str = "hentry must contain at least one entry-content or entry-summary";
const MISSING_TITLE: &str = "hentry must contain exactly one entry-title, none found";

#[test]
fn test_entry_without_content() {
    let reports = reports(TITLE_ONLY_ENTRY);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].message(), MISSING_CONTENT);
    assert_eq!(reports[0].node_path(), "#document > div > div");
}

#[test]
fn test_stray_entry_title() {
    let reports = reports(STRAY_TITLE);

    assert_eq!(reports.len(), 1);
    assert!(reports[0].message().starts_with("Attribute class with value entry-title"));
    assert_eq!(reports[0].node_name(), Some("span"));
    assert_eq!(reports[0].node_path(), "#document > html > body > span");
}

#[test]
fn test_complete_entry_is_valid() {
    assert_eq!(report_messages(COMPLETE_ENTRY), Vec::<String>::new());
}

#[test]
fn test_pages_without_microformats_are_valid() {
    for page in [
        PLAIN_PAGE,
        "<html/>",
        r#"<html><body><p class="summary content title">Not hAtom</p></body></html>"#,
    ] {
        assert!(report_messages(page).is_empty(), "{page}");
    }
}

#[test]
fn test_sibling_entries_are_independent() {
    let page = feed_page(&[
        entry(r#"<p>nothing</p>"#),
        entry(r#"<h2 class="entry-title">Fine</h2><p class="entry-summary">s</p>"#),
        entry(r#"<h2 class="entry-title">No body</h2>"#),
    ]);

    assert_eq!(
        report_messages(&page),
        vec![MISSING_TITLE, MISSING_CONTENT, MISSING_CONTENT]
    );
}

#[test]
fn test_duplicate_entry_keys() {
    let page = feed_page(&[entry(
        r#"<h2 class="entry-title">T</h2><p class="entry-content">c</p>
<span class="entry-key" title="k1"/><span class="entry-key" title="k2"/>
<span class="entry-key" title="k1"/><span class="entry-key" title="k1"/>"#,
    )]);

    let messages = report_messages(&page);
    assert_eq!(
        messages,
        vec![
            "Duplicate entry-key value k1 inside the same hentry",
            "Duplicate entry-key value k1 inside the same hentry",
        ]
    );
}

#[test]
fn test_entry_keys_are_scoped_per_entry() {
    let body = r#"<h2 class="entry-title">T</h2><p class="entry-content">c</p><span class="entry-key" title="same"/>"#;
    let page = feed_page(&[entry(body), entry(body)]);

    assert!(report_messages(&page).is_empty());
}

#[test]
fn test_nested_same_level_keyword() {
    let page = feed_page(&[entry(
        r#"<div class="entry-title">Outer <span class="entry-title">Inner <b class="entry-title">Deepest</b></span></div>
<p class="entry-content">c</p>"#,
    )]);

    let reports = reports(&page);
    let nested: Vec<_> = reports
        .iter()
        .filter(|r| r.message().contains("cannot be contained inside another hAtom node"))
        .collect();

    assert_eq!(reports.len(), 2);
    assert_eq!(nested.len(), 2);
    assert_eq!(nested[0].node_name(), Some("span"));
    assert_eq!(nested[1].node_name(), Some("b"));
}

#[test]
fn test_misplaced_keywords_reported_once_each() {
    let page = r#"<html><body>
<div class="hfeed">
  <div class="hentry"><h2 class="entry-title">T</h2><p class="entry-content">c</p></div>
  <span class="published">2008-10-21</span>
</div>
<p class="entry-summary">outside</p>
<div class="hentry"><h2 class="entry-title">Orphan</h2></div>
</body></html>"#;

    let reports = reports(page);
    let messages: Vec<&str> = reports.iter().map(|r| r.message()).collect();

    // Inside the hfeed first, then everything outside it in keyword order
    assert_eq!(messages.len(), 4, "{messages:?}");
    assert!(messages[0].contains("with value published"));
    assert!(messages[1].contains("with value entry-title"));
    assert!(messages[2].contains("with value entry-summary"));
    assert!(messages[3].contains("with value hentry"));
    assert_eq!(reports[1].node_path(), "#document > html > body > div > h2");
    // Properties inside the matched entry are never reported as misplaced
    assert!(!messages.iter().any(|m| m.contains("with value entry-content")));
}

#[test]
fn test_implicit_feed_entries() {
    let page = r#"<html><body>
<div class="hentry"><h2 class="entry-title">One</h2><p class="entry-content">c</p></div>
<div class="hentry"><h2 class="entry-title">Two</h2></div>
</body></html>"#;

    assert_eq!(report_messages(page), vec![MISSING_CONTENT]);
}

#[test]
fn test_empty_hfeed() {
    let page = r#"<html><body><div class="hfeed"><p>Nothing yet</p></div></body></html>"#;
    assert_eq!(
        report_messages(page),
        vec!["hfeed does not contain any hentry"]
    );
}

#[test]
fn test_property_rules() {
    let page = feed_page(&[entry(
        r#"<h2 class="entry-title">T</h2><p class="entry-content">c</p>
<abbr class="published" title="21 October 2008">Oct 21</abbr>
<a rel="bookmark" href="">permalink</a>
<a rel="tag" href="/tags/rust">rust</a>
<span class="author">Ann</span>"#,
    )]);

    assert_eq!(
        report_messages(&page),
        vec![
            "published keyword value 21 October 2008 is not a valid ISO 8601 date",
            "author keyword must be placed on a vcard or contain one",
            "bookmark keyword requires a non-empty href attribute",
        ]
    );
}

#[test]
fn test_malformed_document_is_an_error() {
    let registry = validate_hatom::SessionRegistry::default();
    let result = validate_hatom::validate_document(&registry, "broken.html", "<p><b></p>");

    match result {
        Err(validate_hatom::ValidationError::Parse { document, .. }) => {
            assert_eq!(document, "broken.html")
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}
