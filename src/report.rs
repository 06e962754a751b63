//! Validation findings
//!
//! A [`Report`] does not borrow the parsed tree: when a node is attached the
//! parts needed for rendering (name, path, attributes, source position) are
//! captured, so reports outlive the document they were produced from.

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::session::SessionRegistry;
use crate::xml_utils::{node_name, node_path, node_position};

/// Snapshot of the node a report points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub path: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    pub line: u32,
    pub column: u32,
}

impl NodeSnapshot {
    pub fn capture(node: Node<'_, '_>) -> Self {
        let (line, column) = node_position(node);
        Self {
            name: node_name(node),
            path: node_path(node),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            line,
            column,
        }
    }

    /// Opening tag rebuilt from the captured attributes
    pub fn open_tag(&self) -> String {
        let mut tag = format!("<{} ", self.name);
        for (name, value) in &self.attributes {
            tag.push_str(&format!("{}=\"{}\" ", name, value));
        }
        tag.push('>');
        tag
    }
}

/// A single validation error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    message: String,
    node: Option<NodeSnapshot>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report attached to the node where the problem was found
    pub fn with_node(message: impl Into<String>, node: Node<'_, '_>) -> Self {
        let mut report = Self::message_only(message);
        report.set_node(node);
        report
    }

    /// Report that is not related to a specific node
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            node: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Attach a node, recomputing the node path
    pub fn set_node(&mut self, node: Node<'_, '_>) {
        self.node = Some(NodeSnapshot::capture(node));
    }

    pub fn node(&self) -> Option<&NodeSnapshot> {
        self.node.as_ref()
    }

    pub fn node_name(&self) -> Option<&str> {
        self.node.as_ref().map(|n| n.name.as_str())
    }

    /// Path from the document root to the node, empty without a node
    pub fn node_path(&self) -> &str {
        self.node.as_ref().map(|n| n.path.as_str()).unwrap_or("")
    }

    /// Line and column of the node in the validated text
    pub fn position(&self) -> Option<(u32, u32)> {
        self.node.as_ref().map(|n| (n.line, n.column))
    }

    pub fn as_string(&self) -> String {
        let mut buf = format!("{}\n", self.message);
        if let Some(node) = &self.node {
            buf.push_str(&format!("Node name: {}\n", node.name));
            buf.push_str(&format!("Node path: {}\n", node.path));
            buf.push_str(&node.open_tag());
        }
        buf.push_str(" \n");
        buf
    }

    /// Add a message-only report to the engine registered for `document_name`
    ///
    /// Entry point for hosts that attach findings of their own to a document
    /// being validated, for messages that belong to no particular node.
    pub fn add_error_report(
        registry: &SessionRegistry,
        document_name: &str,
        message: impl Into<String>,
    ) -> Result<()> {
        let engine = registry
            .get_engine(document_name)
            .ok_or_else(|| ValidationError::SessionNotFound {
                document: document_name.to_string(),
            })?;
        let mut engine = engine.lock().map_err(|e| ValidationError::Concurrency {
            details: format!("Validation engine lock poisoned: {}", e),
        })?;
        engine.add_report(Report::message_only(message));
        Ok(())
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_string())
    }
}
