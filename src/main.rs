use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use validate_hatom::cli::Cli;
use validate_hatom::config::ConfigManager;
use validate_hatom::error_reporter::ErrorReporter;
use validate_hatom::file_discovery::FileDiscovery;
use validate_hatom::output::{Output, format_keywords};
use validate_hatom::session::SessionRegistry;
use validate_hatom::validator::{BatchConfig, BatchValidator, ProgressCallback, ValidationPhase};
use validate_hatom::vocabulary::Vocabulary;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.verbosity().log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(message) = cli.validate() {
        anyhow::bail!(message);
    }

    let config = match ConfigManager::load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            ErrorReporter::new(cli.verbosity()).report_config_error(&e);
            return Ok(ExitCode::from(2));
        }
    };
    let verbosity = config.output.verbosity();
    tracing::debug!(?config, "configuration loaded");

    if cli.list_keywords {
        let vocabulary = Vocabulary::load_or_default(config.vocabulary.path.as_deref()).await;
        let prefix = cli.keyword_prefix.as_deref().unwrap_or_default();
        print!("{}", format_keywords(&vocabulary, prefix));
        return Ok(ExitCode::SUCCESS);
    }

    let path = cli.path.as_deref().context("No path to validate")?;

    let registry = Arc::new(SessionRegistry::new(&config.sessions));
    let validator = BatchValidator::new(registry, BatchConfig::from(&config));
    let discovery = FileDiscovery::from_config(&config.files)?;

    let progress: Option<ProgressCallback> = config.validation.show_progress.then(|| {
        let reporter = ErrorReporter::new(verbosity);
        Arc::new(move |progress: validate_hatom::ValidationProgress| {
            if progress.phase == ValidationPhase::Validation {
                reporter.report_progress(
                    progress.completed,
                    progress.total,
                    progress.current_file.as_deref(),
                );
            }
        }) as ProgressCallback
    });

    let results = match validator
        .validate_path_with_progress(path, &discovery, progress)
        .await
    {
        Ok(results) => results,
        Err(e) => {
            ErrorReporter::new(verbosity).report_validation_error(&e);
            return Ok(ExitCode::from(2));
        }
    };

    let output = Output::new(verbosity, config.output.format.into());
    print!("{}", output.format_results(&results));

    if results.has_errors() && config.validation.fail_on_reports {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
