//! Output and reporting
//!
//! Renders single-document report lists and batch results as human readable
//! text, a one-line summary, or JSON.

use std::time::Duration;

use serde::Serialize;

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::report::Report;
use crate::validator::{FileValidationResult, PerformanceMetrics, ValidationResults, ValidationStatus};
use crate::vocabulary::Vocabulary;

/// Render the reports of one validation pass
pub fn render_reports(reports: &[Report], elapsed: Duration) -> String {
    let mut output = format!(
        "Validation completed in {} milliseconds\n",
        elapsed.as_millis()
    );
    if reports.is_empty() {
        output.push_str("File contains valid hAtom microformat\n");
    } else {
        output.push_str(&format!("{} errors found\n", reports.len()));
        for report in reports {
            output.push_str(&report.as_string());
        }
    }
    output
}

/// Output formatter for validation results
pub struct Output {
    verbosity: VerbosityLevel,
    format: OutputFormat,
    show_colors: bool,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    status: &'a ValidationStatus,
    duration_ms: u128,
    reports: &'a [Report],
}

#[derive(Serialize)]
struct JsonResults<'a> {
    total_files: usize,
    valid_files: usize,
    invalid_files: usize,
    error_files: usize,
    skipped_files: usize,
    total_reports: usize,
    duration_ms: u128,
    files: Vec<JsonFile<'a>>,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel, format: OutputFormat) -> Self {
        Self {
            verbosity,
            format,
            show_colors: format == OutputFormat::Human && atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_results(&self, results: &ValidationResults) -> String {
        match self.format {
            OutputFormat::Json => self.format_json(results),
            OutputFormat::Summary => self.format_summary_line(results),
            OutputFormat::Human => self.format_human(results),
        }
    }

    fn format_human(&self, results: &ValidationResults) -> String {
        let mut output = String::new();

        if self.verbosity == VerbosityLevel::Quiet {
            if results.has_errors() {
                output.push_str(&format!(
                    "Errors: {} Invalid: {}\n",
                    results.error_files, results.invalid_files
                ));
            }
            return output;
        }

        for file_result in &results.file_results {
            if self.verbosity >= VerbosityLevel::Verbose || !file_result.status.is_valid() {
                output.push_str(&self.format_file_result(file_result));
                output.push('\n');
            }
        }

        if results.total_files > 1 || self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&self.format_summary(results));
        }

        output
    }

    /// One file, with its reports rendered below the status line
    pub fn format_file_result(&self, result: &FileValidationResult) -> String {
        let path_display = result.path.display();
        let duration_str = format_duration(result.duration);

        match &result.status {
            ValidationStatus::Valid => {
                format!(
                    "{}  {} ({})",
                    self.colorize("✓ VALID", "32"),
                    path_display,
                    duration_str
                )
            }
            ValidationStatus::Invalid { report_count } => {
                let mut output = format!(
                    "{}  {} ({}) - {} error{}\n",
                    self.colorize("✗ INVALID", "31"),
                    path_display,
                    duration_str,
                    report_count,
                    if *report_count == 1 { "" } else { "s" }
                );
                output.push_str(&render_reports(&result.reports, result.duration));
                output
            }
            ValidationStatus::Error { message } => {
                format!(
                    "{}  {} ({}) - {}",
                    self.colorize("⚠ ERROR", "33"),
                    path_display,
                    duration_str,
                    message
                )
            }
            ValidationStatus::Skipped { reason } => {
                format!(
                    "{}  {} ({}) - {}",
                    self.colorize("- SKIPPED", "36"),
                    path_display,
                    duration_str,
                    reason
                )
            }
        }
    }

    fn format_summary(&self, results: &ValidationResults) -> String {
        let mut output = String::new();
        output.push_str("Validation Summary:\n");
        output.push_str(&format!("  Total files: {}\n", results.total_files));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Valid:", "32"),
            results.valid_files
        ));

        if results.invalid_files > 0 {
            output.push_str(&format!(
                "  {} {} ({} reports)\n",
                self.colorize("Invalid:", "31"),
                results.invalid_files,
                results.total_reports
            ));
        }
        if results.error_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Errors:", "33"),
                results.error_files
            ));
        }
        if results.skipped_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Skipped:", "36"),
                results.skipped_files
            ));
        }

        output.push_str(&format!("  Success rate: {:.1}%\n", results.success_rate()));
        output.push_str(&format!(
            "  Duration: {}\n",
            format_duration(results.performance_metrics.total_duration)
        ));

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&self.format_performance_metrics(&results.performance_metrics));
        }

        output
    }

    fn format_performance_metrics(&self, metrics: &PerformanceMetrics) -> String {
        let mut output = String::new();
        output.push_str("\nPerformance Metrics:\n");
        output.push_str(&format!(
            "  Throughput: {:.1} files/sec\n",
            metrics.throughput_files_per_second
        ));
        output.push_str(&format!(
            "  Concurrent validations: {}\n",
            metrics.concurrent_validations
        ));

        if self.verbosity == VerbosityLevel::Debug {
            output.push_str(&format!(
                "  Discovery: {}\n",
                format_duration(metrics.discovery_duration)
            ));
            output.push_str(&format!(
                "  Validation: {}\n",
                format_duration(metrics.validation_duration)
            ));
            output.push_str(&format!(
                "  Average per file: {}\n",
                format_duration(metrics.average_time_per_file)
            ));
        }
        output
    }

    fn format_summary_line(&self, results: &ValidationResults) -> String {
        format!(
            "{} files: {} valid, {} invalid, {} errors, {} skipped, {} reports\n",
            results.total_files,
            results.valid_files,
            results.invalid_files,
            results.error_files,
            results.skipped_files,
            results.total_reports
        )
    }

    fn format_json(&self, results: &ValidationResults) -> String {
        let json = JsonResults {
            total_files: results.total_files,
            valid_files: results.valid_files,
            invalid_files: results.invalid_files,
            error_files: results.error_files,
            skipped_files: results.skipped_files,
            total_reports: results.total_reports,
            duration_ms: results.performance_metrics.total_duration.as_millis(),
            files: results
                .file_results
                .iter()
                .map(|r| JsonFile {
                    path: r.path.display().to_string(),
                    status: &r.status,
                    duration_ms: r.duration.as_millis(),
                    reports: &r.reports,
                })
                .collect(),
        };
        match serde_json::to_string_pretty(&json) {
            Ok(mut text) => {
                text.push('\n');
                text
            }
            Err(e) => format!("{{\"error\": \"{}\"}}\n", e),
        }
    }
}

/// Keyword listing with documentation, restricted to keywords starting with `prefix`
pub fn format_keywords(vocabulary: &Vocabulary, prefix: &str) -> String {
    let keywords = vocabulary.keywords_with_prefix(prefix);
    let width = keywords.iter().map(|k| k.len()).max().unwrap_or(0);

    let mut output = String::new();
    for keyword in keywords {
        match vocabulary.documentation(keyword) {
            Some(doc) => output.push_str(&format!("{:width$}  {}\n", keyword, doc)),
            None => output.push_str(&format!("{}\n", keyword)),
        }
    }
    output
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
