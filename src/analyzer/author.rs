use roxmltree::Node;

use super::{
    ATTR_CLASS, ATTR_HREF, KEYWORD_EMAIL, KEYWORD_FN, KEYWORD_VCARD, ValidationContext,
};
use crate::error::Result;
use crate::xml_utils::node_attribute_matches;

const MAILTO_SCHEME: &str = "mailto:";

/// hCard rules for an `author` property node
pub fn analyze<'a, 'input>(
    ctx: &mut ValidationContext<'a, 'input>,
    author: Node<'a, 'input>,
) -> Result<()> {
    let cards = if node_attribute_matches(author, ATTR_CLASS, KEYWORD_VCARD) {
        vec![author]
    } else {
        ctx.search_nodes(author, ATTR_CLASS, KEYWORD_VCARD)
    };

    if cards.is_empty() {
        ctx.report_at(
            "author keyword must be placed on a vcard or contain one",
            author,
        );
        return Ok(());
    }

    for card in cards {
        check_card(ctx, card);
    }

    Ok(())
}

fn check_card<'a, 'input>(ctx: &mut ValidationContext<'a, 'input>, card: Node<'a, 'input>) {
    let mut names = Vec::new();
    if node_attribute_matches(card, ATTR_CLASS, KEYWORD_FN) {
        names.push(card);
    }
    names.extend(ctx.search_nodes(card, ATTR_CLASS, KEYWORD_FN));

    match names.len() {
        0 => ctx.report_at("hCard must contain an fn property", card),
        1 => {}
        _ => {
            for extra in names.iter().skip(1) {
                ctx.report_at("fn property found more than once inside the same hCard", *extra);
            }
        }
    }

    for email in ctx.search_nodes(card, ATTR_CLASS, KEYWORD_EMAIL) {
        if !email.has_tag_name("a") {
            continue;
        }
        let href = email.attribute(ATTR_HREF).unwrap_or_default().trim();
        let is_mailto = href
            .get(..MAILTO_SCHEME.len())
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case(MAILTO_SCHEME));
        if !is_mailto {
            ctx.report_at("email property on a link must use a mailto: href", email);
        }
    }
}
