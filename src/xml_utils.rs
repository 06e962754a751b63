//! Helpers over the parsed XHTML tree
//!
//! The validator never mutates the tree. Node identity is the `roxmltree`
//! [`NodeId`], which is what the analyzers record when they consume a node.

use roxmltree::{Document, Node, NodeType, ParsingOptions};

use crate::error::ParseError;

pub use roxmltree::NodeId;

/// Name used for the document root in node paths, as a DOM would report it
pub const DOCUMENT_NODE_NAME: &str = "#document";

/// Parse raw bytes into a document tree
pub fn get_document(input: &[u8]) -> Result<Document<'_>, ParseError> {
    let text = std::str::from_utf8(input)?;
    parse_document(text)
}

/// Parse markup text into a document tree
///
/// DTDs are accepted since XHTML documents usually start with a doctype.
pub fn parse_document(text: &str) -> Result<Document<'_>, ParseError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(text, options)?)
}

/// True if `keyword` is one of the whitespace separated tokens of `attr_value`
pub fn attribute_value_matches(attr_value: &str, keyword: &str) -> bool {
    !keyword.is_empty() && attr_value.split_whitespace().any(|token| token == keyword)
}

/// True if `node` carries `attr_name` and its value token-matches `value`
pub fn node_attribute_matches(node: Node<'_, '_>, attr_name: &str, value: &str) -> bool {
    node.attribute(attr_name)
        .is_some_and(|attr_value| attribute_value_matches(attr_value, value))
}

/// DOM style node name
pub fn node_name(node: Node<'_, '_>) -> String {
    match node.node_type() {
        NodeType::Root => DOCUMENT_NODE_NAME.to_string(),
        NodeType::Element => node.tag_name().name().to_string(),
        NodeType::Text => "#text".to_string(),
        NodeType::Comment => "#comment".to_string(),
        NodeType::PI => node
            .pi()
            .map(|pi| pi.target.to_string())
            .unwrap_or_default(),
    }
}

/// Names from the document root down to `node`, joined by `" > "`
pub fn node_path(node: Node<'_, '_>) -> String {
    let mut names: Vec<String> = node.ancestors().map(node_name).collect();
    names.reverse();
    names.join(" > ")
}

/// Concatenated text of every text node below `node`
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// 1-based line and column where `node` starts in the source text
pub fn node_position(node: Node<'_, '_>) -> (u32, u32) {
    let pos = node.document().text_pos_at(node.range().start);
    (pos.row, pos.col)
}

/// Build an iterator over the descendants of `scope`
///
/// When `scope` is `None` the whole document is traversed.
pub fn get_node_iterator<'a, 'input>(
    document: &'a Document<'input>,
    scope: Option<Node<'a, 'input>>,
) -> NodeIterator<'a, 'input> {
    NodeIterator::new(scope.unwrap_or_else(|| document.root()))
}

/// Lazy depth-first (pre-order) traversal of a subtree
///
/// The scope node itself is not yielded. The iterator can be rewound with
/// [`NodeIterator::reset`] and must be released with [`NodeIterator::detach`]
/// once a search is over; a detached iterator yields nothing.
#[derive(Debug, Clone)]
pub struct NodeIterator<'a, 'input> {
    scope: Node<'a, 'input>,
    current: Option<Node<'a, 'input>>,
    skip_children: bool,
    finished: bool,
    detached: bool,
}

impl<'a, 'input> NodeIterator<'a, 'input> {
    pub fn new(scope: Node<'a, 'input>) -> Self {
        Self {
            scope,
            current: None,
            skip_children: false,
            finished: false,
            detached: false,
        }
    }

    /// Root of the traversed subtree
    pub fn scope(&self) -> Node<'a, 'input> {
        self.scope
    }

    /// Advance to the next node in document order
    pub fn next_node(&mut self) -> Option<Node<'a, 'input>> {
        if self.detached || self.finished {
            return None;
        }

        let next = match self.current {
            None => self.scope.first_child(),
            Some(current) => {
                let child = if self.skip_children {
                    None
                } else {
                    current.first_child()
                };
                child.or_else(|| self.following(current))
            }
        };

        self.skip_children = false;
        match next {
            Some(node) => self.current = Some(node),
            None => self.finished = true,
        }
        next
    }

    /// Step back to the node before the current one
    ///
    /// Once the traversal is exhausted the first call returns the last node.
    /// Stepping back past the first node rewinds the iterator.
    pub fn previous_node(&mut self) -> Option<Node<'a, 'input>> {
        if self.detached {
            return None;
        }
        if self.finished {
            self.finished = false;
            return self.current;
        }

        let previous = self.current.and_then(|current| self.preceding(current));
        self.current = previous;
        self.skip_children = false;
        previous
    }

    /// Do not descend into the node returned by the last `next_node` call
    pub fn skip_children(&mut self) {
        self.skip_children = true;
    }

    /// Rewind to the position before the first node
    pub fn reset(&mut self) {
        self.current = None;
        self.skip_children = false;
        self.finished = false;
    }

    /// Release the iterator; later calls to `next_node` return `None`
    pub fn detach(&mut self) {
        self.detached = true;
        self.current = None;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    // Next node after `node`'s subtree, without leaving the scope.
    fn following(&self, node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
        let mut cursor = node;
        loop {
            if cursor.id() == self.scope.id() {
                return None;
            }
            if let Some(sibling) = cursor.next_sibling() {
                return Some(sibling);
            }
            cursor = cursor.parent()?;
        }
    }

    // Pre-order predecessor of `node`, `None` when `node` is the first one.
    fn preceding(&self, node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
        match node.prev_sibling() {
            Some(sibling) => {
                let mut last = sibling;
                while let Some(child) = last.last_child() {
                    last = child;
                }
                Some(last)
            }
            None => node.parent().filter(|parent| parent.id() != self.scope.id()),
        }
    }
}

impl<'a, 'input> Iterator for NodeIterator<'a, 'input> {
    type Item = Node<'a, 'input>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node()
    }
}
