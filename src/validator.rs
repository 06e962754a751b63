//! Batch validation of many documents
//!
//! Files are discovered asynchronously, read with `tokio::fs`, and each
//! document is validated on the blocking pool by its own engine from the
//! shared [`SessionRegistry`]. Concurrency is bounded by a semaphore and every
//! document gets a timeout.

use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigManager};
use crate::engine::validate_document;
use crate::error::{ParseError, Result, ValidationError};
use crate::file_discovery::FileDiscovery;
use crate::report::Report;
use crate::session::SessionRegistry;

/// Wall clock measurement of a validation pass
#[derive(Debug, Clone, Copy)]
pub struct TimeMeasurer {
    start: Instant,
}

impl TimeMeasurer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn start_time(&self) -> Instant {
        self.start
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed().as_millis()
    }
}

impl Default for TimeMeasurer {
    fn default() -> Self {
        Self::start()
    }
}

/// Batch configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Number of documents validated at the same time
    pub max_concurrent_validations: usize,
    /// Timeout for a single document
    pub validation_timeout: Duration,
    /// Collect performance metrics
    pub collect_metrics: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_validations: num_cpus::get(),
            validation_timeout: Duration::from_secs(30),
            collect_metrics: true,
        }
    }
}

impl From<&Config> for BatchConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrent_validations: ConfigManager::get_thread_count(config),
            validation_timeout: ConfigManager::get_timeout_duration(config),
            collect_metrics: true,
        }
    }
}

/// Status of a single file validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    /// No report was produced
    Valid,
    /// The document has hAtom problems
    Invalid { report_count: usize },
    /// The document could not be validated
    Error { message: String },
    /// The document was not validated
    Skipped { reason: String },
}

impl ValidationStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationStatus::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationStatus::Invalid { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationStatus::Error { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ValidationStatus::Skipped { .. })
    }
}

/// Result of validating a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileValidationResult {
    pub path: PathBuf,
    pub status: ValidationStatus,
    /// Duration of the validation pass
    pub duration: Duration,
    /// Reports in detection order
    pub reports: Vec<Report>,
}

impl FileValidationResult {
    /// Result of a completed pass, valid when `reports` is empty
    pub fn completed(path: PathBuf, reports: Vec<Report>, duration: Duration) -> Self {
        let status = if reports.is_empty() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid {
                report_count: reports.len(),
            }
        };
        Self {
            path,
            status,
            duration,
            reports,
        }
    }

    pub fn error(path: PathBuf, error: ValidationError, duration: Duration) -> Self {
        Self {
            path,
            status: ValidationStatus::Error {
                message: error.to_string(),
            },
            duration,
            reports: Vec::new(),
        }
    }

    pub fn skipped(path: PathBuf, reason: impl Into<String>, duration: Duration) -> Self {
        Self {
            path,
            status: ValidationStatus::Skipped {
                reason: reason.into(),
            },
            duration,
            reports: Vec::new(),
        }
    }
}

/// Progress update for validation
#[derive(Debug, Clone)]
pub struct ValidationProgress {
    /// File currently being processed
    pub current_file: Option<PathBuf>,
    pub completed: usize,
    pub total: usize,
    pub phase: ValidationPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    Discovery,
    Validation,
    Aggregation,
    Complete,
}

/// Performance metrics for validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_duration: Duration,
    pub discovery_duration: Duration,
    pub validation_duration: Duration,
    pub average_time_per_file: Duration,
    pub throughput_files_per_second: f64,
    pub concurrent_validations: usize,
    /// Number of reports over all files
    pub total_reports: usize,
}

/// Aggregated results of validating multiple files
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResults {
    pub total_files: usize,
    pub valid_files: usize,
    pub invalid_files: usize,
    pub error_files: usize,
    pub skipped_files: usize,
    pub total_reports: usize,
    pub total_duration: Duration,
    pub average_duration: Duration,
    pub file_results: Vec<FileValidationResult>,
    pub performance_metrics: PerformanceMetrics,
}

impl ValidationResults {
    /// Aggregate individual file results into summary
    pub fn aggregate(file_results: Vec<FileValidationResult>) -> Self {
        let total_files = file_results.len();
        let mut valid_files = 0;
        let mut invalid_files = 0;
        let mut error_files = 0;
        let mut skipped_files = 0;
        let mut total_reports = 0;
        let mut total_duration = Duration::ZERO;

        for result in &file_results {
            match result.status {
                ValidationStatus::Valid => valid_files += 1,
                ValidationStatus::Invalid { .. } => invalid_files += 1,
                ValidationStatus::Error { .. } => error_files += 1,
                ValidationStatus::Skipped { .. } => skipped_files += 1,
            }
            total_reports += result.reports.len();
            total_duration += result.duration;
        }

        let average_duration = if total_files > 0 {
            total_duration / total_files as u32
        } else {
            Duration::ZERO
        };

        let performance_metrics = PerformanceMetrics {
            total_duration,
            discovery_duration: Duration::ZERO,
            validation_duration: total_duration,
            average_time_per_file: average_duration,
            throughput_files_per_second: if total_duration.as_secs_f64() > 0.0 {
                total_files as f64 / total_duration.as_secs_f64()
            } else {
                0.0
            },
            concurrent_validations: 1,
            total_reports,
        };

        Self {
            total_files,
            valid_files,
            invalid_files,
            error_files,
            skipped_files,
            total_reports,
            total_duration,
            average_duration,
            file_results,
            performance_metrics,
        }
    }

    /// Create results with detailed performance metrics
    pub fn with_metrics(
        file_results: Vec<FileValidationResult>,
        mut performance_metrics: PerformanceMetrics,
    ) -> Self {
        let mut results = Self::aggregate(file_results);
        performance_metrics.total_reports = results.total_reports;
        results.performance_metrics = performance_metrics;
        results
    }

    pub fn all_valid(&self) -> bool {
        self.valid_files == self.total_files && self.total_files > 0
    }

    /// True if any file has reports or could not be validated
    pub fn has_errors(&self) -> bool {
        self.error_files > 0 || self.invalid_files > 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.valid_files as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Progress callback type for validation updates
pub type ProgressCallback = Arc<dyn Fn(ValidationProgress) + Send + Sync>;

/// Validates every document below a path concurrently
pub struct BatchValidator {
    registry: Arc<SessionRegistry>,
    config: BatchConfig,
}

impl BatchValidator {
    pub fn new(registry: Arc<SessionRegistry>, config: BatchConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub async fn validate_path(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
    ) -> Result<ValidationResults> {
        self.validate_path_with_progress(path, file_discovery, None)
            .await
    }

    /// Discover, validate and aggregate, reporting progress along the way
    pub async fn validate_path_with_progress(
        &self,
        path: &Path,
        file_discovery: &FileDiscovery,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<ValidationResults> {
        let workflow_start = Instant::now();
        let mut performance_metrics = PerformanceMetrics {
            concurrent_validations: self.config.max_concurrent_validations,
            ..PerformanceMetrics::default()
        };

        let discovery_start = Instant::now();
        if let Some(ref callback) = progress_callback {
            callback(ValidationProgress {
                current_file: None,
                completed: 0,
                total: 0,
                phase: ValidationPhase::Discovery,
            });
        }

        let files = file_discovery.discover_files(path).await?;
        performance_metrics.discovery_duration = discovery_start.elapsed();
        tracing::debug!(files = files.len(), path = %path.display(), "discovery finished");

        if files.is_empty() {
            performance_metrics.total_duration = workflow_start.elapsed();
            return Ok(ValidationResults::with_metrics(
                Vec::new(),
                performance_metrics,
            ));
        }

        let validation_start = Instant::now();
        let results = self
            .validate_files_with_progress(files, progress_callback.clone())
            .await?;
        performance_metrics.validation_duration = validation_start.elapsed();

        if let Some(ref callback) = progress_callback {
            callback(ValidationProgress {
                current_file: None,
                completed: results.len(),
                total: results.len(),
                phase: ValidationPhase::Aggregation,
            });
        }

        performance_metrics.total_duration = workflow_start.elapsed();
        if self.config.collect_metrics {
            performance_metrics.average_time_per_file =
                performance_metrics.validation_duration / results.len() as u32;
            performance_metrics.throughput_files_per_second =
                if performance_metrics.total_duration.as_secs_f64() > 0.0 {
                    results.len() as f64 / performance_metrics.total_duration.as_secs_f64()
                } else {
                    0.0
                };
        }

        let final_results = ValidationResults::with_metrics(results, performance_metrics);
        tracing::info!(
            files = final_results.total_files,
            valid = final_results.valid_files,
            invalid = final_results.invalid_files,
            errors = final_results.error_files,
            reports = final_results.total_reports,
            "batch validation finished"
        );

        if let Some(ref callback) = progress_callback {
            callback(ValidationProgress {
                current_file: None,
                completed: final_results.total_files,
                total: final_results.total_files,
                phase: ValidationPhase::Complete,
            });
        }

        Ok(final_results)
    }

    pub async fn validate_files(&self, files: Vec<PathBuf>) -> Result<Vec<FileValidationResult>> {
        self.validate_files_with_progress(files, None).await
    }

    /// Validate `files` concurrently; results keep the order of `files`
    pub async fn validate_files_with_progress(
        &self,
        files: Vec<PathBuf>,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Vec<FileValidationResult>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let total_files = files.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(tokio::sync::Semaphore::new(
            self.config.max_concurrent_validations.max(1),
        ));

        let validation_tasks: Vec<_> = files
            .into_iter()
            .map(|file_path| {
                let registry = Arc::clone(&self.registry);
                let semaphore = Arc::clone(&semaphore);
                let timeout = self.config.validation_timeout;
                let progress_callback = progress_callback.clone();
                let completed = Arc::clone(&completed);

                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await.map_err(|_| {
                        ValidationError::Concurrency {
                            details: "Failed to acquire validation semaphore".to_string(),
                        }
                    })?;

                    let result = tokio::time::timeout(
                        timeout,
                        Self::validate_single_file_internal(file_path.clone(), registry),
                    )
                    .await;

                    let validation_result = match result {
                        Ok(validation_result) => validation_result,
                        Err(_) => FileValidationResult::error(
                            file_path.clone(),
                            ValidationError::Concurrency {
                                details: format!("Validation timeout after {:?}", timeout),
                            },
                            timeout,
                        ),
                    };

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = progress_callback {
                        callback(ValidationProgress {
                            current_file: Some(file_path),
                            completed: done,
                            total: total_files,
                            phase: ValidationPhase::Validation,
                        });
                    }

                    Ok::<FileValidationResult, ValidationError>(validation_result)
                })
            })
            .collect();

        let task_results =
            try_join_all(validation_tasks)
                .await
                .map_err(|e| ValidationError::Concurrency {
                    details: format!("Task join error: {}", e),
                })?;

        let mut file_results = Vec::with_capacity(task_results.len());
        for result in task_results {
            file_results.push(result?);
        }

        Ok(file_results)
    }

    async fn validate_single_file_internal(
        file_path: PathBuf,
        registry: Arc<SessionRegistry>,
    ) -> FileValidationResult {
        let timer = TimeMeasurer::start();

        let bytes = match tokio::fs::read(&file_path).await {
            Ok(bytes) => bytes,
            Err(e) => return FileValidationResult::error(file_path, e.into(), timer.elapsed()),
        };

        let document_name = file_path.display().to_string();

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return FileValidationResult::skipped(file_path, "Document is empty", timer.elapsed());
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                let error = ValidationError::Parse {
                    document: document_name,
                    source: ParseError::from(e.utf8_error()),
                };
                return FileValidationResult::error(file_path, error, timer.elapsed());
            }
        };

        // Parsing and rule evaluation are CPU bound
        let outcome = tokio::task::spawn_blocking(move || {
            validate_document(&registry, &document_name, &text)
        })
        .await;

        match outcome {
            Ok(Ok(validation)) => {
                FileValidationResult::completed(file_path, validation.reports, validation.elapsed)
            }
            Ok(Err(e)) => FileValidationResult::error(file_path, e, timer.elapsed()),
            Err(e) => FileValidationResult::error(
                file_path,
                ValidationError::Concurrency {
                    details: format!("Join error: {}", e),
                },
                timer.elapsed(),
            ),
        }
    }

    pub async fn validate_single_file(&self, file_path: &Path) -> Result<FileValidationResult> {
        Ok(
            Self::validate_single_file_internal(file_path.to_path_buf(), Arc::clone(&self.registry))
                .await,
        )
    }
}
