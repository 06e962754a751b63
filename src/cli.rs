use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show every report of every file
    Verbose,
    /// Show all available debugging information
    Debug,
}

impl VerbosityLevel {
    /// Default `tracing` filter directive for this verbosity
    pub fn log_directive(self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::Debug => "debug",
        }
    }
}

/// Output format of the validation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable reports
    #[default]
    Human,
    /// Machine readable JSON
    Json,
    /// Totals only
    Summary,
}

/// hAtom microformat validation tool
#[derive(Parser, Debug, Clone)]
#[command(name = "validate-hatom")]
#[command(about = "Validate hAtom 0.1 / hCard microformats embedded in XHTML documents")]
#[command(version)]
pub struct Cli {
    /// Path to scan for XHTML files (directory or file)
    #[arg(
        help = "Directory or file to validate",
        required_unless_present = "list_keywords"
    )]
    pub path: Option<PathBuf>,

    /// File extensions to process (comma-separated)
    #[arg(
        short = 'e',
        long = "extensions",
        help = "File extensions to process (e.g., 'html,xhtml')"
    )]
    pub extensions: Option<String>,

    /// Number of concurrent validations
    #[arg(short = 't', long = "threads", help = "Number of concurrent validations")]
    pub threads: Option<usize>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Include file patterns (glob syntax)
    #[arg(long = "include", action = clap::ArgAction::Append)]
    pub include_patterns: Vec<String>,

    /// Exclude file patterns (glob syntax)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to scan
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,

    /// Per-document validation timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Maximum number of validation sessions kept in memory
    #[arg(long = "max-sessions")]
    pub max_sessions: Option<u64>,

    /// Keyword vocabulary file (TOML or JSON)
    #[arg(long = "vocabulary")]
    pub vocabulary: Option<PathBuf>,

    /// Show progress indicators
    #[arg(long = "progress")]
    pub progress: bool,

    /// Exit successfully even when reports are found
    #[arg(long = "no-fail")]
    pub no_fail: bool,

    /// Print the hAtom keywords with their documentation and exit
    #[arg(long = "list-keywords")]
    pub list_keywords: bool,

    /// Only list keywords starting with this prefix
    #[arg(long = "keyword-prefix", requires = "list_keywords")]
    pub keyword_prefix: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn get_extensions(&self) -> Option<Vec<String>> {
        self.extensions.as_ref().map(|extensions| {
            extensions
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.path
            && !path.exists()
        {
            return Err(format!("Path does not exist: {}", path.display()));
        }
        if let Some(threads) = self.threads
            && threads == 0
        {
            return Err("Number of threads must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}
