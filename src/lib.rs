//! # validate-hatom Library
//!
//! Structural validation of hAtom 0.1 and hCard microformats embedded in
//! well-formed XHTML. A validation pass parses the document, walks the hfeed,
//! hentry and property structure, and returns a list of [`Report`]s; an empty
//! list means the document is valid.
//!
//! ```no_run
//! use validate_hatom::{SessionRegistry, validate_document};
//!
//! let registry = SessionRegistry::default();
//! let validation = validate_document(&registry, "index.html", "<html/>")?;
//! assert!(validation.is_valid());
//! # Ok::<(), validate_hatom::ValidationError>(())
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod error_reporter;
pub mod file_discovery;
pub mod output;
pub mod report;
pub mod session;
pub mod validator;
pub mod vocabulary;
pub mod xml_utils;

pub use analyzer::{AnalyzerKind, ValidationContext};
pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigError, ConfigManager};
pub use engine::{EnginePhase, ReportSink, Validation, ValidatorEngine, validate_document};
pub use error::{ParseError, ValidationError, VocabularyError};
pub use error_reporter::ErrorReporter;
pub use file_discovery::{DiscoveryStats, FileDiscovery};
pub use output::{Output, render_reports};
pub use report::{NodeSnapshot, Report};
pub use session::{SessionRegistry, SharedEngine};
pub use validator::{
    BatchConfig, BatchValidator, FileValidationResult, PerformanceMetrics, ProgressCallback,
    TimeMeasurer, ValidationPhase, ValidationProgress, ValidationResults, ValidationStatus,
};
pub use vocabulary::Vocabulary;
