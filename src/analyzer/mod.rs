//! hAtom / hCard structural rules
//!
//! Every rule runs against a shared [`ValidationContext`] and is selected by an
//! [`AnalyzerKind`]. The root rule is [`AnalyzerKind::Hfeed`], which reaches
//! the others while walking the document.

pub mod author;
pub mod context;
pub mod datetime;
pub mod hentry;
pub mod hfeed;

use roxmltree::Node;

use crate::error::Result;

pub use context::{AttributeValueCache, ValidationContext};

pub const ATTR_CLASS: &str = "class";
pub const ATTR_REL: &str = "rel";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_HREF: &str = "href";

pub const KEYWORD_HFEED: &str = "hfeed";
pub const KEYWORD_HENTRY: &str = "hentry";
pub const KEYWORD_FEED_KEY: &str = "feed-key";

pub const KEYWORD_VCARD: &str = "vcard";
pub const KEYWORD_FN: &str = "fn";
pub const KEYWORD_EMAIL: &str = "email";

/// Keywords that are only valid inside an hentry, in search order
pub const HENTRY_CHILDREN: [&str; 9] = [
    "entry-title",
    "entry-summary",
    "entry-content",
    "updated",
    "published",
    "author",
    "bookmark",
    "tag",
    "entry-key",
];

/// Every hAtom keyword checked for misplacement
pub const ALL_KEYWORDS: [&str; 12] = [
    "entry-title",
    "entry-summary",
    "entry-content",
    "updated",
    "published",
    "author",
    "bookmark",
    "tag",
    "entry-key",
    KEYWORD_HFEED,
    KEYWORD_FEED_KEY,
    KEYWORD_HENTRY,
];

/// Attribute expected to carry a keyword
///
/// `bookmark` and `tag` are link relations, everything else is a class name.
pub fn keyword_attribute(keyword: &str) -> &'static str {
    match keyword {
        "bookmark" | "tag" => ATTR_REL,
        _ => ATTR_CLASS,
    }
}

/// How many occurrences of a property an hentry may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ExactlyOne,
    AtMostOne,
    Any,
}

/// Properties of an hentry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HentryProperty {
    EntryTitle,
    EntrySummary,
    EntryContent,
    Updated,
    Published,
    Author,
    Bookmark,
    Tag,
    EntryKey,
}

impl HentryProperty {
    /// All properties in the order they are searched
    pub const ALL: [HentryProperty; 9] = [
        HentryProperty::EntryTitle,
        HentryProperty::EntrySummary,
        HentryProperty::EntryContent,
        HentryProperty::Updated,
        HentryProperty::Published,
        HentryProperty::Author,
        HentryProperty::Bookmark,
        HentryProperty::Tag,
        HentryProperty::EntryKey,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            HentryProperty::EntryTitle => "entry-title",
            HentryProperty::EntrySummary => "entry-summary",
            HentryProperty::EntryContent => "entry-content",
            HentryProperty::Updated => "updated",
            HentryProperty::Published => "published",
            HentryProperty::Author => "author",
            HentryProperty::Bookmark => "bookmark",
            HentryProperty::Tag => "tag",
            HentryProperty::EntryKey => "entry-key",
        }
    }

    pub fn attribute(self) -> &'static str {
        keyword_attribute(self.keyword())
    }

    pub fn cardinality(self) -> Cardinality {
        match self {
            HentryProperty::EntryTitle => Cardinality::ExactlyOne,
            HentryProperty::Updated | HentryProperty::Published | HentryProperty::Bookmark => {
                Cardinality::AtMostOne
            }
            _ => Cardinality::Any,
        }
    }
}

/// hentry properties holding a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateProperty {
    Updated,
    Published,
}

impl DateProperty {
    pub fn keyword(self) -> &'static str {
        match self {
            DateProperty::Updated => "updated",
            DateProperty::Published => "published",
        }
    }
}

/// The rule applied to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerKind {
    /// Root rule, run once per document with the document root as node
    Hfeed,
    /// Every property rule of a single hentry
    Hentry,
    /// One property rule of an hentry, the node being the hentry
    HentryChild(HentryProperty),
    /// hCard rules of an author property
    AuthorVcard,
    /// Date format rule of an updated or published property
    DateTime(DateProperty),
}

impl AnalyzerKind {
    pub fn analyze<'a, 'input>(
        self,
        ctx: &mut ValidationContext<'a, 'input>,
        node: Node<'a, 'input>,
    ) -> Result<()> {
        tracing::trace!(kind = ?self, node = ?node.id(), "running analyzer");
        match self {
            AnalyzerKind::Hfeed => hfeed::analyze(ctx, node),
            AnalyzerKind::Hentry => hentry::analyze_entry(ctx, node),
            AnalyzerKind::HentryChild(property) => {
                hentry::analyze_property(ctx, node, property).map(|_| ())
            }
            AnalyzerKind::AuthorVcard => author::analyze(ctx, node),
            AnalyzerKind::DateTime(property) => datetime::analyze(ctx, node, property),
        }
    }
}
