use crate::cli::VerbosityLevel;
use crate::config::ConfigError;
use crate::error::{ParseError, ValidationError};
use std::path::Path;

/// Error reporter with configurable verbosity
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl ErrorReporter {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    pub fn with_timestamps(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    /// Report an error that aborted the run
    pub fn report_validation_error(&self, error: &ValidationError) {
        if let Some(formatted) = self.format_validation_error(error) {
            eprintln!("{}", formatted);
        }
    }

    /// Formatted error, `None` when the verbosity hides it
    pub fn format_validation_error(&self, error: &ValidationError) -> Option<String> {
        match self.verbosity {
            VerbosityLevel::Quiet => self
                .is_critical_error(error)
                .then(|| self.format_error_brief(error)),
            VerbosityLevel::Normal => Some(self.format_error_normal(error)),
            VerbosityLevel::Verbose => Some(self.format_error_verbose(error)),
            VerbosityLevel::Debug => Some(self.format_error_debug(error)),
        }
    }

    pub fn report_config_error(&self, error: &ConfigError) {
        eprintln!("{}", self.format_config_error(error));
    }

    pub fn format_config_error(&self, error: &ConfigError) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("Config error: {}", error),
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                format!("Configuration Error: {}\n{}", error, self.get_config_help(error))
            }
            VerbosityLevel::Debug => {
                format!(
                    "Configuration Error: {}\nDebug: {:?}\n{}",
                    error,
                    error,
                    self.get_config_help(error)
                )
            }
        }
    }

    /// Progress line for long batches, overwritten in place
    pub fn report_progress(&self, current: usize, total: usize, current_file: Option<&Path>) {
        if self.verbosity == VerbosityLevel::Quiet || total == 0 {
            return;
        }

        let percentage = (current as f64 / total as f64 * 100.0) as u32;

        match (self.verbosity, current_file) {
            (VerbosityLevel::Verbose | VerbosityLevel::Debug, Some(file)) => {
                eprint!(
                    "\rProgress: {}/{} ({}%) - Processing: {}",
                    current,
                    total,
                    percentage,
                    file.display()
                );
            }
            _ => eprint!("\rProgress: {}/{} ({}%)", current, total, percentage),
        }

        if current == total {
            eprintln!();
        }
    }

    fn is_critical_error(&self, error: &ValidationError) -> bool {
        matches!(
            error,
            ValidationError::Config(_)
                | ValidationError::Concurrency { .. }
                | ValidationError::FileSystemTraversal { .. }
        )
    }

    fn format_error_brief(&self, error: &ValidationError) -> String {
        match error {
            ValidationError::Parse { document, .. } => format!("UNPARSABLE: {}", document),
            _ => format!("ERROR: {}", error),
        }
    }

    fn format_error_normal(&self, error: &ValidationError) -> String {
        let timestamp = if self.show_timestamps {
            format!("[{}] ", chrono::Utc::now().format("%H:%M:%S"))
        } else {
            String::new()
        };

        format!("{}{}", timestamp, error)
    }

    fn format_error_verbose(&self, error: &ValidationError) -> String {
        let mut output = self.format_error_normal(error);

        match error {
            ValidationError::Parse { document, source } => {
                output.push_str(&format!("\nDocument: {}", document));
                match source {
                    ParseError::InvalidUtf8(_) => {
                        output.push_str("\nSuggestion: Save the document as UTF-8")
                    }
                    ParseError::Malformed(_) => output.push_str(
                        "\nSuggestion: hAtom validation needs well-formed XHTML, check unclosed tags and entities",
                    ),
                }
            }
            ValidationError::EngineReused { .. } => {
                output.push_str("\nSuggestion: Create a new engine for every validation pass");
            }
            ValidationError::Vocabulary(_) => {
                output.push_str("\nSuggestion: Check the vocabulary file path and its TOML/JSON syntax");
            }
            ValidationError::FileSystemTraversal { path, .. } => {
                output.push_str(&format!("\nPath: {}", path.display()));
            }
            _ => {}
        }

        output
    }

    fn format_error_debug(&self, error: &ValidationError) -> String {
        let mut output = self.format_error_verbose(error);
        output.push_str(&format!("\nDebug Info: {:?}", error));

        output.push_str("\nError Chain:");
        let mut current_error: &dyn std::error::Error = error;
        let mut level = 0;
        while let Some(source) = current_error.source() {
            output.push_str(&format!("\n  {}: {}", level + 1, source));
            current_error = source;
            level += 1;
        }

        output
    }

    fn get_config_help(&self, error: &ConfigError) -> String {
        match error {
            ConfigError::Io(_) => "Check that the configuration file is readable".to_string(),
            ConfigError::TomlParsing(_) | ConfigError::JsonParsing(_) => {
                "Check the configuration file syntax (TOML/JSON format expected)".to_string()
            }
            ConfigError::Validation(_) => {
                "Fix the invalid value in the configuration file, environment or command line"
                    .to_string()
            }
            ConfigError::Environment(_) => {
                "Check the VALIDATE_HATOM_* environment variables".to_string()
            }
            ConfigError::UnsupportedFormat(_) => {
                "Use a .toml or .json configuration file".to_string()
            }
        }
    }
}
