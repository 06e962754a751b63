use validate_hatom::Report;
use validate_hatom::xml_utils::parse_document;

#[test]
fn test_node_path_for_every_node() {
    let document = parse_document(
        r#"<html><body><div class="hfeed"><div class="hentry"><h2 class="entry-title">T <em>now</em></h2></div></div></body></html>"#,
    )
    .unwrap();

    for node in document.descendants().filter(|n| n.is_element()) {
        let mut expected: Vec<String> = node
            .ancestors()
            .map(|n| {
                if n.is_root() {
                    "#document".to_string()
                } else {
                    n.tag_name().name().to_string()
                }
            })
            .collect();
        expected.reverse();

        let mut report = Report::message_only("path check");
        report.set_node(node);
        assert_eq!(report.node_path(), expected.join(" > "));
    }
}

#[test]
fn test_report_serializes_node_snapshot() {
    let document =
        parse_document(r#"<div><a rel="bookmark" href="">link</a></div>"#).unwrap();
    let link = document
        .descendants()
        .find(|n| n.has_tag_name("a"))
        .unwrap();

    let report = Report::with_node("bookmark keyword requires a non-empty href attribute", link);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["node"]["name"], "a");
    assert_eq!(value["node"]["path"], "#document > div > a");
    assert_eq!(value["node"]["attributes"][0][0], "rel");
}
