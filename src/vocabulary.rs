//! Keyword vocabulary
//!
//! Two ordered lists of unique names (hAtom keywords and XHTML element names)
//! plus a documentation string per hAtom keyword. A vocabulary is built once at
//! startup and handed to whoever needs it; the built-in one can be replaced by
//! a TOML or JSON file.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VocabularyError, VocabularyResult};

const HATOM_KEYWORDS: [(&str, &str); 14] = [
    (
        "hfeed",
        "Container of hentry elements. Optional: when missing, the whole page is the feed.",
    ),
    (
        "hentry",
        "A single entry. Must contain one entry-title and an entry-content or entry-summary.",
    ),
    ("entry-title", "Title of the entry. Required, exactly once per hentry."),
    (
        "entry-content",
        "Content of the entry. An hentry needs entry-content, entry-summary or both.",
    ),
    ("entry-summary", "Summary of the entry."),
    (
        "updated",
        "Last update of the entry as an ISO 8601 date, usually in the title of an abbr element.",
    ),
    (
        "published",
        "Publication date of the entry as an ISO 8601 date. Optional, at most once.",
    ),
    (
        "author",
        "Author of the entry, expressed with an hCard (class vcard with an fn property).",
    ),
    (
        "bookmark",
        "rel value of the permanent link to the entry. Requires an href, at most once.",
    ),
    ("tag", "rel value of a link to a tag of the entry. Requires an href."),
    (
        "entry-key",
        "Identifier of the entry, carried in the title attribute. Unique inside the hentry.",
    ),
    (
        "feed-key",
        "Identifier of the feed, carried in the title attribute. Unique inside the hfeed.",
    ),
    ("vcard", "Root class of an hCard."),
    ("fn", "Formatted name of an hCard. Required, exactly once."),
];

const XHTML_ELEMENTS: [&str; 77] = [
    "a", "abbr", "acronym", "address", "area", "b", "base", "bdo", "big", "blockquote", "body",
    "br", "button", "caption", "cite", "code", "col", "colgroup", "dd", "del", "dfn", "div", "dl",
    "dt", "em", "fieldset", "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "html", "i",
    "img", "input", "ins", "kbd", "label", "legend", "li", "link", "map", "meta", "noscript",
    "object", "ol", "optgroup", "option", "p", "param", "pre", "q", "samp", "script", "select",
    "small", "span", "strong", "style", "sub", "sup", "table", "tbody", "td", "textarea", "tfoot",
    "th", "thead", "title", "tr", "tt", "ul", "var",
];

/// Read-only keyword tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vocabulary {
    hatom_keywords: Vec<String>,
    xhtml_elements: Vec<String>,
    documentation: BTreeMap<String, String>,
}

/// On-disk layout, every table optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VocabularyFile {
    hatom_keywords: Vec<String>,
    xhtml_elements: Vec<String>,
    documentation: BTreeMap<String, String>,
}

impl From<VocabularyFile> for Vocabulary {
    fn from(file: VocabularyFile) -> Self {
        Self {
            hatom_keywords: file.hatom_keywords,
            xhtml_elements: file.xhtml_elements,
            documentation: file.documentation,
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Vocabulary {
    /// Vocabulary shipped with the validator
    pub fn builtin() -> Self {
        Self {
            hatom_keywords: HATOM_KEYWORDS.iter().map(|(k, _)| k.to_string()).collect(),
            xhtml_elements: XHTML_ELEMENTS.iter().map(|e| e.to_string()).collect(),
            documentation: HATOM_KEYWORDS
                .iter()
                .map(|(k, doc)| (k.to_string(), doc.to_string()))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            hatom_keywords: Vec::new(),
            xhtml_elements: Vec::new(),
            documentation: BTreeMap::new(),
        }
    }

    /// Load a vocabulary file, TOML or JSON by extension
    pub async fn load(path: &Path) -> VocabularyResult<Self> {
        if !path.exists() {
            return Err(VocabularyError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| VocabularyError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let file: VocabularyFile = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| VocabularyError::InvalidFormat {
                    details: e.to_string(),
                })?
            }
            _ => toml::from_str(&content).map_err(|e| VocabularyError::InvalidFormat {
                details: e.to_string(),
            })?,
        };

        Ok(Vocabulary::from(file).normalized())
    }

    /// Load `path` if given, falling back to empty lists when it cannot be read
    pub async fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match Self::load(path).await {
            Ok(vocabulary) => {
                tracing::debug!(
                    path = %path.display(),
                    keywords = vocabulary.hatom_keywords.len(),
                    "vocabulary loaded"
                );
                vocabulary
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unable to load hAtom keyword list");
                Self::empty()
            }
        }
    }

    pub fn hatom_keywords(&self) -> &[String] {
        &self.hatom_keywords
    }

    pub fn xhtml_elements(&self) -> &[String] {
        &self.xhtml_elements
    }

    pub fn documentation(&self, keyword: &str) -> Option<&str> {
        self.documentation.get(keyword).map(String::as_str)
    }

    /// hAtom keywords starting with `prefix`, in vocabulary order
    pub fn keywords_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.hatom_keywords
            .iter()
            .filter(|k| k.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    // Trimmed, non-empty, first occurrence wins.
    fn normalized(mut self) -> Self {
        self.hatom_keywords = unique(self.hatom_keywords);
        self.xhtml_elements = unique(self.xhtml_elements);
        self
    }
}

fn unique(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}
