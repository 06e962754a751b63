//! Feed level rules
//!
//! An hfeed must contain at least one hentry, and its `feed-key` values must be
//! present and unique. A page without any hfeed is treated as a single
//! implicit feed. Keywords left outside their container are reported last.

use roxmltree::Node;

use super::{
    ALL_KEYWORDS, ATTR_CLASS, ATTR_TITLE, AnalyzerKind, HENTRY_CHILDREN, KEYWORD_FEED_KEY,
    KEYWORD_HENTRY, KEYWORD_HFEED, ValidationContext,
};
use crate::error::Result;

pub fn analyze<'a, 'input>(
    ctx: &mut ValidationContext<'a, 'input>,
    root: Node<'a, 'input>,
) -> Result<()> {
    let feeds = ctx.search_nodes(root, ATTR_CLASS, KEYWORD_HFEED);
    ctx.check_nested_nodes(&feeds, ATTR_CLASS, KEYWORD_HFEED);

    tracing::debug!(
        document = ctx.document_name(),
        feeds = feeds.len(),
        "analyzing hfeed"
    );

    if feeds.is_empty() {
        // The whole page acts as the feed
        analyze_feed(ctx, root, false)?;
        report_unmatching(ctx, &HENTRY_CHILDREN);
    } else {
        for feed in &feeds {
            analyze_feed(ctx, *feed, true)?;
        }
        report_unmatching(ctx, &ALL_KEYWORDS);
    }

    Ok(())
}

fn analyze_feed<'a, 'input>(
    ctx: &mut ValidationContext<'a, 'input>,
    feed: Node<'a, 'input>,
    explicit: bool,
) -> Result<()> {
    let entries = ctx.search_nodes(feed, ATTR_CLASS, KEYWORD_HENTRY);
    ctx.check_nested_nodes(&entries, ATTR_CLASS, KEYWORD_HENTRY);

    if explicit && entries.is_empty() {
        ctx.report_at("hfeed does not contain any hentry", feed);
    }

    check_feed_keys(ctx, feed);

    for entry in &entries {
        AnalyzerKind::Hentry.analyze(ctx, *entry)?;
    }

    if explicit {
        ctx.scan_misplaced_in_subtree(feed, &HENTRY_CHILDREN);
    }

    Ok(())
}

fn check_feed_keys<'a, 'input>(ctx: &mut ValidationContext<'a, 'input>, feed: Node<'a, 'input>) {
    ctx.reset_attribute_value_list(ATTR_TITLE);

    let keys = ctx.search_nodes(feed, ATTR_CLASS, KEYWORD_FEED_KEY);
    ctx.check_nested_nodes(&keys, ATTR_CLASS, KEYWORD_FEED_KEY);

    for key in keys {
        let value = key.attribute(ATTR_TITLE).unwrap_or_default();
        if value.trim().is_empty() {
            ctx.report_at(
                "feed-key keyword requires a non-empty title attribute",
                key,
            );
        } else if ctx.is_duplicate_attribute_value(ATTR_TITLE, value) {
            ctx.report_at(
                format!("Duplicate feed-key value {} inside the same hfeed", value),
                key,
            );
        } else {
            ctx.add_mapped_attribute_value(ATTR_TITLE, key);
        }
    }
}

// Reports keywords carried by elements that are neither consumed nor below a
// consumed node.
fn report_unmatching<'a, 'input>(ctx: &mut ValidationContext<'a, 'input>, keywords: &[&str]) {
    let outside: Vec<Node<'a, 'input>> = ctx
        .document()
        .descendants()
        .filter(|node| node.is_element() && !ctx.is_within_consumed(*node))
        .collect();
    ctx.scan_misplaced_nodes(&outside, keywords);
}
