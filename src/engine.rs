//! Validation engine
//!
//! A [`ValidatorEngine`] owns the reports of exactly one validation pass over
//! one document. Engines are created by the
//! [`SessionRegistry`](crate::session::SessionRegistry); a finished engine
//! refuses to validate again.

use std::collections::HashSet;
use std::time::Duration;

use roxmltree::{Document, Node, NodeId};
use serde::Serialize;

use crate::analyzer::{AnalyzerKind, ValidationContext};
use crate::error::{Result, ValidationError};
use crate::report::Report;
use crate::session::SessionRegistry;
use crate::validator::TimeMeasurer;
use crate::xml_utils::{attribute_value_matches, get_node_iterator, parse_document};

/// Destination of the reports produced by the analyzers
#[cfg_attr(test, mockall::automock)]
pub trait ReportSink {
    fn add_report(&mut self, report: Report);
}

impl ReportSink for Vec<Report> {
    fn add_report(&mut self, report: Report) {
        self.push(report);
    }
}

/// Lifecycle of a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnginePhase {
    Idle,
    Parsing,
    Analyzing,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct ValidatorEngine {
    document_name: String,
    reports: Vec<Report>,
    phase: EnginePhase,
    elapsed: Option<Duration>,
}

impl ValidatorEngine {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            reports: Vec::new(),
            phase: EnginePhase::Idle,
            elapsed: None,
        }
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Duration of the last completed pass
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn reports_mut(&mut self) -> &mut Vec<Report> {
        &mut self.reports
    }

    pub fn add_report(&mut self, report: Report) {
        self.reports.push(report);
    }

    /// Parse `text` and run the hAtom rules over it
    ///
    /// Structural problems end up in [`reports`](Self::reports); only a
    /// document that cannot be parsed fails the pass.
    pub fn validate(&mut self, text: &str) -> Result<()> {
        if self.phase != EnginePhase::Idle {
            return Err(ValidationError::EngineReused {
                document: self.document_name.clone(),
            });
        }

        let timer = TimeMeasurer::start();
        self.phase = EnginePhase::Parsing;

        let document = match parse_document(text) {
            Ok(document) => document,
            Err(source) => {
                self.phase = EnginePhase::Failed;
                tracing::debug!(document = %self.document_name, error = %source, "parse failed");
                return Err(ValidationError::Parse {
                    document: self.document_name.clone(),
                    source,
                });
            }
        };

        self.phase = EnginePhase::Analyzing;
        let outcome = {
            let mut ctx =
                ValidationContext::new(&document, &self.document_name, &mut self.reports);
            let root = ctx.root();
            AnalyzerKind::Hfeed.analyze(&mut ctx, root)
        };

        if let Err(e) = outcome {
            self.phase = EnginePhase::Failed;
            return Err(e);
        }

        let elapsed = timer.elapsed();
        self.elapsed = Some(elapsed);
        self.phase = EnginePhase::Done;
        tracing::debug!(
            document = %self.document_name,
            reports = self.reports.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "validation pass finished"
        );
        Ok(())
    }
}

impl ReportSink for ValidatorEngine {
    fn add_report(&mut self, report: Report) {
        ValidatorEngine::add_report(self, report);
    }
}

fn misplaced_keyword_message(attr_name: &str, attr_value: &str) -> String {
    format!(
        "Attribute {} with value {} is in invalid position. \nPlease check that node is inside its regular parent node",
        attr_name, attr_value
    )
}

fn check_invalid_hatom_attributes(node: Node<'_, '_>, keyword: &str, sink: &mut dyn ReportSink) {
    for attr in node.attributes() {
        if attribute_value_matches(attr.value(), keyword) {
            sink.add_report(Report::with_node(
                misplaced_keyword_message(attr.name(), attr.value()),
                node,
            ));
        }
    }
}

/// Report every attribute of `nodes` that carries one of `keywords`
pub fn analyze_unmatching_nodes(nodes: &[Node<'_, '_>], keywords: &[&str], sink: &mut dyn ReportSink) {
    for keyword in keywords {
        for node in nodes {
            check_invalid_hatom_attributes(*node, keyword, sink);
        }
    }
}

/// Report keywords carried by the descendants of `root`, or of the whole document
///
/// Consumed nodes and their subtrees are not visited. Each keyword gets its
/// own traversal.
pub fn analyze_unmatching_subtree<'a, 'input>(
    document: &'a Document<'input>,
    root: Option<Node<'a, 'input>>,
    consumed: &HashSet<NodeId>,
    keywords: &[&str],
    sink: &mut dyn ReportSink,
) {
    for keyword in keywords {
        let mut iterator = get_node_iterator(document, root);
        while let Some(node) = iterator.next_node() {
            if consumed.contains(&node.id()) {
                iterator.skip_children();
                continue;
            }
            check_invalid_hatom_attributes(node, keyword, sink);
        }
        iterator.detach();
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    pub document_name: String,
    pub reports: Vec<Report>,
    pub elapsed: Duration,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Validate `text` with a fresh engine registered under `document_name`
pub fn validate_document(
    registry: &SessionRegistry,
    document_name: &str,
    text: &str,
) -> Result<Validation> {
    let engine = registry.create_engine(document_name);
    let mut engine = engine.lock().map_err(|e| ValidationError::Concurrency {
        details: format!("Validation engine lock poisoned: {}", e),
    })?;

    engine.validate(text)?;

    Ok(Validation {
        document_name: document_name.to_string(),
        reports: engine.reports().to_vec(),
        elapsed: engine.elapsed().unwrap_or_default(),
    })
}
