use std::collections::{HashMap, HashSet};

use roxmltree::{Document, Node, NodeId};

use crate::engine::{self, ReportSink};
use crate::report::Report;
use crate::xml_utils::{NodeIterator, node_attribute_matches};

/// Values already seen per attribute name, used for duplicate detection
#[derive(Debug, Default, Clone)]
pub struct AttributeValueCache {
    values: HashMap<String, Vec<String>>,
}

impl AttributeValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attr_name: &str, value: impl Into<String>) {
        self.values
            .entry(attr_name.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn contains(&self, attr_name: &str, value: &str) -> bool {
        self.values
            .get(attr_name)
            .is_some_and(|list| list.iter().any(|v| v == value))
    }

    pub fn values(&self, attr_name: &str) -> &[String] {
        self.values.get(attr_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn reset(&mut self, attr_name: &str) {
        if let Some(list) = self.values.get_mut(attr_name) {
            list.clear();
        }
    }
}

/// State shared by every rule of one validation pass
///
/// Nodes matched by a structural search are recorded as consumed. Later
/// searches skip a consumed node together with its subtree unless the
/// consumed node is the scope of the search itself.
pub struct ValidationContext<'a, 'input> {
    document: &'a Document<'input>,
    document_name: &'a str,
    consumed: HashSet<NodeId>,
    sink: &'a mut dyn ReportSink,
    attribute_values: AttributeValueCache,
}

impl<'a, 'input> ValidationContext<'a, 'input> {
    pub fn new(
        document: &'a Document<'input>,
        document_name: &'a str,
        sink: &'a mut dyn ReportSink,
    ) -> Self {
        Self {
            document,
            document_name,
            consumed: HashSet::new(),
            sink,
            attribute_values: AttributeValueCache::new(),
        }
    }

    pub fn document(&self) -> &'a Document<'input> {
        self.document
    }

    pub fn document_name(&self) -> &str {
        self.document_name
    }

    pub fn root(&self) -> Node<'a, 'input> {
        self.document.root()
    }

    pub fn consumed(&self) -> &HashSet<NodeId> {
        &self.consumed
    }

    pub fn is_consumed(&self, node: Node<'_, '_>) -> bool {
        self.consumed.contains(&node.id())
    }

    pub fn consume(&mut self, node: Node<'_, '_>) {
        self.consumed.insert(node.id());
    }

    /// True if `node` or one of its ancestors has been consumed
    pub fn is_within_consumed(&self, node: Node<'_, '_>) -> bool {
        node.ancestors().any(|n| self.consumed.contains(&n.id()))
    }

    pub fn report(&mut self, report: Report) {
        self.sink.add_report(report);
    }

    pub fn report_at(&mut self, message: impl Into<String>, node: Node<'_, '_>) {
        self.report(Report::with_node(message, node));
    }

    /// Collect and consume every node below `scope` whose `attr_name` matches `attr_value`
    ///
    /// The subtree of a match is not searched any further.
    pub fn search_nodes(
        &mut self,
        scope: Node<'a, 'input>,
        attr_name: &str,
        attr_value: &str,
    ) -> Vec<Node<'a, 'input>> {
        let mut iterator = NodeIterator::new(scope);
        let mut matching = Vec::new();

        while let Some(node) = iterator.next_node() {
            if self.is_consumed(node) {
                iterator.skip_children();
                continue;
            }
            if node.is_element() && node_attribute_matches(node, attr_name, attr_value) {
                self.consume(node);
                iterator.skip_children();
                matching.push(node);
            }
        }

        iterator.detach();
        matching
    }

    pub fn check_nested_nodes(
        &mut self,
        nodes: &[Node<'a, 'input>],
        attr_name: &str,
        attr_value: &str,
    ) {
        for node in nodes {
            self.check_nested_node(*node, attr_name, attr_value);
        }
    }

    /// Report every descendant of `node` carrying the same keyword
    ///
    /// Consumed subtrees are skipped. Reports follow document order.
    pub fn check_nested_node(&mut self, node: Node<'a, 'input>, attr_name: &str, attr_value: &str) {
        let mut iterator = NodeIterator::new(node);

        while let Some(descendant) = iterator.next_node() {
            if self.is_consumed(descendant) {
                iterator.skip_children();
                continue;
            }
            if descendant.is_element() && node_attribute_matches(descendant, attr_name, attr_value)
            {
                self.report_at(
                    format!(
                        "{} keyword cannot be contained inside another hAtom node of the same level",
                        attr_value
                    ),
                    descendant,
                );
            }
        }

        iterator.detach();
    }

    /// Cache the non-empty value of `attr_name` on `node`; returns whether it was added
    pub fn add_mapped_attribute_value(&mut self, attr_name: &str, node: Node<'_, '_>) -> bool {
        if !node.is_element() {
            return false;
        }
        match node.attribute(attr_name) {
            Some(value) if !value.is_empty() => {
                self.attribute_values.push(attr_name, value);
                true
            }
            _ => false,
        }
    }

    pub fn is_duplicate_attribute_value(&self, attr_name: &str, value: &str) -> bool {
        self.attribute_values.contains(attr_name, value)
    }

    pub fn reset_attribute_value_list(&mut self, attr_name: &str) {
        self.attribute_values.reset(attr_name);
    }

    /// Report keywords found below `root` outside every consumed subtree
    pub fn scan_misplaced_in_subtree(&mut self, root: Node<'a, 'input>, keywords: &[&str]) {
        engine::analyze_unmatching_subtree(
            self.document,
            Some(root),
            &self.consumed,
            keywords,
            &mut *self.sink,
        );
    }

    /// Report keywords carried by any of `nodes`
    pub fn scan_misplaced_nodes(&mut self, nodes: &[Node<'a, 'input>], keywords: &[&str]) {
        engine::analyze_unmatching_nodes(nodes, keywords, &mut *self.sink);
    }
}
