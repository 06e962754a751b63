//! Entry level rules
//!
//! Properties are searched in [`HentryProperty::ALL`] order. A property node
//! hides its subtree from the searches that follow it.

use roxmltree::Node;

use super::{
    ATTR_HREF, ATTR_TITLE, AnalyzerKind, Cardinality, DateProperty, HentryProperty,
    ValidationContext,
};
use crate::error::Result;

/// Run every property rule over one hentry
pub fn analyze_entry<'a, 'input>(
    ctx: &mut ValidationContext<'a, 'input>,
    entry: Node<'a, 'input>,
) -> Result<()> {
    ctx.reset_attribute_value_list(ATTR_TITLE);

    let mut summaries = 0;
    let mut contents = 0;
    for property in HentryProperty::ALL {
        let found = analyze_property(ctx, entry, property)?;
        match property {
            HentryProperty::EntrySummary => summaries = found,
            HentryProperty::EntryContent => contents = found,
            _ => {}
        }
    }

    if summaries == 0 && contents == 0 {
        ctx.report_at(
            "hentry must contain at least one entry-content or entry-summary",
            entry,
        );
    }

    Ok(())
}

/// Check one property of `entry`, returning how many occurrences were found
pub fn analyze_property<'a, 'input>(
    ctx: &mut ValidationContext<'a, 'input>,
    entry: Node<'a, 'input>,
    property: HentryProperty,
) -> Result<usize> {
    let attr_name = property.attribute();
    let keyword = property.keyword();

    let nodes = ctx.search_nodes(entry, attr_name, keyword);
    ctx.check_nested_nodes(&nodes, attr_name, keyword);

    match property.cardinality() {
        Cardinality::ExactlyOne if nodes.is_empty() => {
            ctx.report_at(
                format!("hentry must contain exactly one {}, none found", keyword),
                entry,
            );
        }
        Cardinality::ExactlyOne | Cardinality::AtMostOne => {
            for extra in nodes.iter().skip(1) {
                ctx.report_at(
                    format!("{} keyword found more than once inside the same hentry", keyword),
                    *extra,
                );
            }
        }
        Cardinality::Any => {}
    }

    for node in &nodes {
        match property {
            HentryProperty::Updated => {
                AnalyzerKind::DateTime(DateProperty::Updated).analyze(ctx, *node)?
            }
            HentryProperty::Published => {
                AnalyzerKind::DateTime(DateProperty::Published).analyze(ctx, *node)?
            }
            HentryProperty::Author => AnalyzerKind::AuthorVcard.analyze(ctx, *node)?,
            HentryProperty::Bookmark | HentryProperty::Tag => check_href(ctx, *node, keyword),
            HentryProperty::EntryKey => check_entry_key(ctx, *node),
            _ => {}
        }
    }

    Ok(nodes.len())
}

fn check_href(ctx: &mut ValidationContext<'_, '_>, node: Node<'_, '_>, keyword: &str) {
    let href = node.attribute(ATTR_HREF).unwrap_or_default();
    if href.trim().is_empty() {
        ctx.report_at(
            format!("{} keyword requires a non-empty href attribute", keyword),
            node,
        );
    }
}

fn check_entry_key(ctx: &mut ValidationContext<'_, '_>, node: Node<'_, '_>) {
    let value = node.attribute(ATTR_TITLE).unwrap_or_default();
    if value.trim().is_empty() {
        ctx.report_at("entry-key keyword requires a non-empty title attribute", node);
    } else if ctx.is_duplicate_attribute_value(ATTR_TITLE, value) {
        ctx.report_at(
            format!("Duplicate entry-key value {} inside the same hentry", value),
            node,
        );
    } else {
        ctx.add_mapped_attribute_value(ATTR_TITLE, node);
    }
}
