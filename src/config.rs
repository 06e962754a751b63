use crate::cli::{Cli, OutputFormat, VerbosityLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
    pub sessions: SessionConfig,
    pub output: OutputConfig,
    pub files: FileConfig,
    pub vocabulary: VocabularyConfig,
}

/// Validation-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Number of concurrent validations
    pub threads: Option<usize>,
    /// Per-document validation timeout in seconds
    pub timeout_seconds: u64,
    /// Exit with a failure status when any report is produced
    pub fail_on_reports: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

/// Validation session registry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of engines kept by the registry
    pub max_sessions: u64,
    /// Seconds an unused engine is kept before eviction
    pub idle_ttl_seconds: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormatConfig,
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
}

/// File processing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// File extensions to process
    pub extensions: Vec<String>,
    /// Include patterns (glob syntax)
    pub include_patterns: Vec<String>,
    /// Exclude patterns (glob syntax)
    pub exclude_patterns: Vec<String>,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Keyword vocabulary configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Vocabulary file replacing the built-in keyword lists
    pub path: Option<PathBuf>,
}

/// Output format configuration (serializable version of CLI OutputFormat)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatConfig {
    #[default]
    Human,
    Json,
    Summary,
}

impl From<OutputFormat> for OutputFormatConfig {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputFormatConfig::Human,
            OutputFormat::Json => OutputFormatConfig::Json,
            OutputFormat::Summary => OutputFormatConfig::Summary,
        }
    }
}

impl From<OutputFormatConfig> for OutputFormat {
    fn from(format: OutputFormatConfig) -> Self {
        match format {
            OutputFormatConfig::Human => OutputFormat::Human,
            OutputFormatConfig::Json => OutputFormat::Json,
            OutputFormatConfig::Summary => OutputFormat::Summary,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            threads: None,
            timeout_seconds: 30,
            fail_on_reports: true,
            show_progress: false,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 256,
            idle_ttl_seconds: 600,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormatConfig::Human,
            verbose: false,
            quiet: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                "html".to_string(),
                "xhtml".to_string(),
                "htm".to_string(),
            ],
            include_patterns: vec![],
            exclude_patterns: vec![],
            max_depth: None,
        }
    }
}

impl OutputConfig {
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

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path).await?;
            config = Self::merge_configs(config, file_config);
        } else if let Some(found_config) = Self::find_config_file().await? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::apply_environment_overrides(config)?;

        // CLI arguments have the highest precedence
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub async fn find_config_file() -> Result<Option<Config>> {
        let config_names = [
            "validate-hatom.toml",
            "validate-hatom.json",
            ".validate-hatom.toml",
            ".validate-hatom.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("validate-hatom");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(threads) = env.get("VALIDATE_HATOM_THREADS") {
            config.validation.threads = Some(parse_env("VALIDATE_HATOM_THREADS", &threads)?);
        }

        if let Some(timeout) = env.get("VALIDATE_HATOM_TIMEOUT") {
            config.validation.timeout_seconds = parse_env("VALIDATE_HATOM_TIMEOUT", &timeout)?;
        }

        if let Some(fail) = env.get("VALIDATE_HATOM_FAIL_ON_REPORTS") {
            config.validation.fail_on_reports =
                parse_env("VALIDATE_HATOM_FAIL_ON_REPORTS", &fail)?;
        }

        if let Some(max_sessions) = env.get("VALIDATE_HATOM_MAX_SESSIONS") {
            config.sessions.max_sessions = parse_env("VALIDATE_HATOM_MAX_SESSIONS", &max_sessions)?;
        }

        if let Some(ttl) = env.get("VALIDATE_HATOM_SESSION_TTL") {
            config.sessions.idle_ttl_seconds = parse_env("VALIDATE_HATOM_SESSION_TTL", &ttl)?;
        }

        if let Some(verbose) = env.get("VALIDATE_HATOM_VERBOSE") {
            config.output.verbose = parse_env("VALIDATE_HATOM_VERBOSE", &verbose)?;
        }

        if let Some(quiet) = env.get("VALIDATE_HATOM_QUIET") {
            config.output.quiet = parse_env("VALIDATE_HATOM_QUIET", &quiet)?;
        }

        if let Some(format) = env.get("VALIDATE_HATOM_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "human" => OutputFormatConfig::Human,
                "json" => OutputFormatConfig::Json,
                "summary" => OutputFormatConfig::Summary,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid VALIDATE_HATOM_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        if let Some(extensions) = env.get("VALIDATE_HATOM_EXTENSIONS") {
            config.files.extensions = extensions
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(vocabulary) = env.get("VALIDATE_HATOM_VOCABULARY") {
            config.vocabulary.path = Some(PathBuf::from(vocabulary));
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if cli.threads.is_some() {
            config.validation.threads = cli.threads;
        }
        if let Some(timeout) = cli.timeout {
            config.validation.timeout_seconds = timeout;
        }
        if cli.no_fail {
            config.validation.fail_on_reports = false;
        }
        if cli.progress {
            config.validation.show_progress = true;
        }

        if let Some(max_sessions) = cli.max_sessions {
            config.sessions.max_sessions = max_sessions;
        }

        if let Some(format) = cli.output_format {
            config.output.format = format.into();
        }
        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }

        if let Some(extensions) = cli.get_extensions() {
            config.files.extensions = extensions;
        }
        if !cli.include_patterns.is_empty() {
            config.files.include_patterns = cli.include_patterns.clone();
        }
        if !cli.exclude_patterns.is_empty() {
            config.files.exclude_patterns = cli.exclude_patterns.clone();
        }
        if cli.max_depth.is_some() {
            config.files.max_depth = cli.max_depth;
        }

        if let Some(vocabulary) = &cli.vocabulary {
            config.vocabulary.path = Some(vocabulary.clone());
        }

        config
    }

    /// Overlay a file configuration on `base`
    ///
    /// Scalar settings are taken from `overlay`; lists and optional values
    /// only when the overlay sets them.
    pub fn merge_configs(mut base: Config, overlay: Config) -> Config {
        let Config {
            validation,
            sessions,
            output,
            files,
            vocabulary,
        } = overlay;

        base.validation = ValidationConfig {
            threads: validation.threads.or(base.validation.threads),
            ..validation
        };
        base.sessions = sessions;
        base.output = output;

        if !files.extensions.is_empty() {
            base.files.extensions = files.extensions;
        }
        if !files.include_patterns.is_empty() {
            base.files.include_patterns = files.include_patterns;
        }
        if !files.exclude_patterns.is_empty() {
            base.files.exclude_patterns = files.exclude_patterns;
        }
        base.files.max_depth = files.max_depth.or(base.files.max_depth);
        base.vocabulary.path = vocabulary.path.or(base.vocabulary.path);

        base
    }

    /// Reject settings the validator cannot run with
    pub fn validate_config(config: &Config) -> Result<()> {
        let threads = config.validation.threads;
        ensure(threads != Some(0), "Number of threads must be greater than 0")?;
        ensure(
            threads.is_none_or(|t| t <= 1000),
            "Number of threads cannot exceed 1000",
        )?;
        ensure(
            config.validation.timeout_seconds > 0,
            "Timeout must be greater than 0",
        )?;
        ensure(
            config.sessions.max_sessions > 0,
            "Maximum number of sessions must be greater than 0",
        )?;
        ensure(
            config.sessions.idle_ttl_seconds > 0,
            "Session TTL must be greater than 0",
        )?;
        ensure(
            !(config.output.verbose && config.output.quiet),
            "Cannot enable both verbose and quiet modes",
        )?;
        ensure(
            !config.files.extensions.is_empty(),
            "At least one file extension must be specified",
        )?;

        if let Some(ext) = config
            .files
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(['/', '\\', '.']))
        {
            return Err(ConfigError::Validation(format!(
                "Invalid file extension: {:?}",
                ext
            )));
        }

        if let Some(path) = &config.vocabulary.path {
            let format = path.extension().and_then(|ext| ext.to_str());
            if !matches!(format, Some("toml" | "json")) {
                return Err(ConfigError::Validation(format!(
                    "Vocabulary file must be .toml or .json: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    /// Get the effective thread count
    pub fn get_thread_count(config: &Config) -> usize {
        config.validation.threads.unwrap_or_else(num_cpus::get)
    }

    /// Convert configuration to Duration for the validation timeout
    pub fn get_timeout_duration(config: &Config) -> Duration {
        Duration::from_secs(config.validation.timeout_seconds)
    }

    /// Convert configuration to Duration for the session idle TTL
    pub fn get_session_ttl_duration(config: &Config) -> Duration {
        Duration::from_secs(config.sessions.idle_ttl_seconds)
    }
}

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Validation(message.to_string()))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Mock environment variable provider for testing
    #[derive(Default)]
    struct MockEnvProvider {
        vars: HashMap<String, String>,
    }

    impl MockEnvProvider {
        fn new() -> Self {
            Self {
                vars: HashMap::new(),
            }
        }

        fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
            self.vars.insert(key.into(), value.into());
        }
    }

    impl EnvProvider for MockEnvProvider {
        fn get(&self, key: &str) -> Option<String> {
            self.vars.get(key).cloned()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.validation.threads, None);
        assert_eq!(config.validation.timeout_seconds, 30);
        assert!(config.validation.fail_on_reports);
        assert!(!config.validation.show_progress);

        assert_eq!(config.sessions.max_sessions, 256);
        assert_eq!(config.sessions.idle_ttl_seconds, 600);

        assert_eq!(config.output.format, OutputFormatConfig::Human);
        assert_eq!(config.output.verbosity(), VerbosityLevel::Normal);

        assert_eq!(config.files.extensions, vec!["html", "xhtml", "htm"]);
        assert!(config.files.include_patterns.is_empty());
        assert!(config.vocabulary.path.is_none());
    }

    #[tokio::test]
    async fn test_load_toml_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let toml_content = r#"
[validation]
threads = 8
timeout_seconds = 5
fail_on_reports = false

[sessions]
max_sessions = 16
idle_ttl_seconds = 60

[output]
format = "json"
verbose = true

[files]
extensions = ["html", "xhtml"]
exclude_patterns = ["**/drafts/**"]
max_depth = 3

[vocabulary]
path = "/etc/validate-hatom/keywords.toml"
"#;

        fs::write(&config_path, toml_content).unwrap();

        let config = ConfigManager::load_from_file(&config_path).await.unwrap();

        assert_eq!(config.validation.threads, Some(8));
        assert_eq!(config.validation.timeout_seconds, 5);
        assert!(!config.validation.fail_on_reports);
        assert!(!config.validation.show_progress);

        assert_eq!(config.sessions.max_sessions, 16);
        assert_eq!(config.sessions.idle_ttl_seconds, 60);

        assert_eq!(config.output.format, OutputFormatConfig::Json);
        assert!(config.output.verbose);
        assert!(!config.output.quiet);

        assert_eq!(config.files.extensions, vec!["html", "xhtml"]);
        assert_eq!(config.files.exclude_patterns, vec!["**/drafts/**"]);
        assert_eq!(config.files.max_depth, Some(3));
        assert_eq!(
            config.vocabulary.path,
            Some(PathBuf::from("/etc/validate-hatom/keywords.toml"))
        );
    }

    #[tokio::test]
    async fn test_load_json_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let json_content = r#"{
  "validation": { "threads": 4 },
  "output": { "format": "summary", "quiet": true },
  "files": { "extensions": ["xhtml"] }
}"#;

        fs::write(&config_path, json_content).unwrap();

        let config = ConfigManager::load_from_file(&config_path).await.unwrap();

        assert_eq!(config.validation.threads, Some(4));
        assert_eq!(config.validation.timeout_seconds, 30);
        assert_eq!(config.output.format, OutputFormatConfig::Summary);
        assert!(config.output.quiet);
        assert_eq!(config.files.extensions, vec!["xhtml"]);
        assert_eq!(config.sessions, SessionConfig::default());
    }

    #[tokio::test]
    async fn test_unsupported_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        fs::write(&config_path, "invalid: yaml").unwrap();

        let result = ConfigManager::load_from_file(&config_path).await;
        match result.unwrap_err() {
            ConfigError::UnsupportedFormat(ext) => assert_eq!(ext, "yaml"),
            _ => panic!("Expected UnsupportedFormat error"),
        }
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        fs::write(&config_path, "invalid toml [[[").unwrap();

        let result = ConfigManager::load_from_file(&config_path).await;
        assert!(matches!(result.unwrap_err(), ConfigError::TomlParsing(_)));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        fs::write(&config_path, "{ invalid json }").unwrap();

        let result = ConfigManager::load_from_file(&config_path).await;
        assert!(matches!(result.unwrap_err(), ConfigError::JsonParsing(_)));
    }

    #[test]
    fn test_environment_overrides() {
        let mut mock_env = MockEnvProvider::new();
        mock_env.set("VALIDATE_HATOM_THREADS", "16");
        mock_env.set("VALIDATE_HATOM_TIMEOUT", "120");
        mock_env.set("VALIDATE_HATOM_FAIL_ON_REPORTS", "false");
        mock_env.set("VALIDATE_HATOM_MAX_SESSIONS", "32");
        mock_env.set("VALIDATE_HATOM_SESSION_TTL", "90");
        mock_env.set("VALIDATE_HATOM_VERBOSE", "true");
        mock_env.set("VALIDATE_HATOM_FORMAT", "json");
        mock_env.set("VALIDATE_HATOM_EXTENSIONS", "html,xhtml");
        mock_env.set("VALIDATE_HATOM_VOCABULARY", "/env/keywords.toml");

        let config =
            ConfigManager::apply_environment_overrides_with(&mock_env, Config::default()).unwrap();

        assert_eq!(config.validation.threads, Some(16));
        assert_eq!(config.validation.timeout_seconds, 120);
        assert!(!config.validation.fail_on_reports);
        assert_eq!(config.sessions.max_sessions, 32);
        assert_eq!(config.sessions.idle_ttl_seconds, 90);
        assert!(config.output.verbose);
        assert_eq!(config.output.format, OutputFormatConfig::Json);
        assert_eq!(config.files.extensions, vec!["html", "xhtml"]);
        assert_eq!(
            config.vocabulary.path,
            Some(PathBuf::from("/env/keywords.toml"))
        );
    }

    #[test]
    fn test_invalid_environment_values() {
        let mut mock_env = MockEnvProvider::new();
        mock_env.set("VALIDATE_HATOM_THREADS", "invalid");

        let result = ConfigManager::apply_environment_overrides_with(&mock_env, Config::default());
        assert!(matches!(result.unwrap_err(), ConfigError::Environment(_)));

        let mut mock_env = MockEnvProvider::new();
        mock_env.set("VALIDATE_HATOM_FORMAT", "xml");
        let result = ConfigManager::apply_environment_overrides_with(&mock_env, Config::default());
        assert!(matches!(result.unwrap_err(), ConfigError::Environment(_)));
    }

    #[test]
    fn test_merge_with_cli() {
        let temp_dir = TempDir::new().unwrap();
        let args = vec![
            "validate-hatom",
            "--threads",
            "12",
            "--verbose",
            "--timeout",
            "90",
            "--extensions",
            "html,xhtml",
            "--format",
            "summary",
            "--no-fail",
            "--max-sessions",
            "8",
            temp_dir.path().to_str().unwrap(),
        ];

        let cli = Cli::try_parse_from(args).unwrap();
        let config = ConfigManager::merge_with_cli(Config::default(), &cli);

        assert_eq!(config.validation.threads, Some(12));
        assert!(config.output.verbose);
        assert_eq!(config.validation.timeout_seconds, 90);
        assert!(!config.validation.fail_on_reports);
        assert_eq!(config.sessions.max_sessions, 8);
        assert_eq!(config.files.extensions, vec!["html", "xhtml"]);
        assert_eq!(config.output.format, OutputFormatConfig::Summary);
    }

    #[test]
    fn test_cli_without_options_keeps_config() {
        let mut base = Config::default();
        base.validation.timeout_seconds = 7;
        base.files.extensions = vec!["xhtml".to_string()];

        let cli = Cli::try_parse_from(vec!["validate-hatom", "/tmp"]).unwrap();
        let config = ConfigManager::merge_with_cli(base, &cli);

        assert_eq!(config.validation.timeout_seconds, 7);
        assert_eq!(config.files.extensions, vec!["xhtml"]);
        assert!(config.validation.fail_on_reports);
    }

    #[test]
    fn test_merge_configs() {
        let mut base = Config::default();
        base.validation.threads = Some(4);
        base.vocabulary.path = Some(PathBuf::from("/base/keywords.toml"));

        let mut override_config = Config::default();
        override_config.validation.threads = Some(8);
        override_config.sessions.max_sessions = 10;

        let merged = ConfigManager::merge_configs(base, override_config);

        assert_eq!(merged.validation.threads, Some(8));
        assert_eq!(merged.sessions.max_sessions, 10);
        assert_eq!(
            merged.vocabulary.path,
            Some(PathBuf::from("/base/keywords.toml"))
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(ConfigManager::validate_config(&config).is_ok());

        config.validation.threads = Some(0);
        assert!(ConfigManager::validate_config(&config).is_err());
        config.validation.threads = Some(1001);
        assert!(ConfigManager::validate_config(&config).is_err());
        config.validation.threads = Some(4);

        config.validation.timeout_seconds = 0;
        assert!(ConfigManager::validate_config(&config).is_err());
        config.validation.timeout_seconds = 30;

        config.sessions.max_sessions = 0;
        assert!(ConfigManager::validate_config(&config).is_err());
        config.sessions.max_sessions = 1;

        config.sessions.idle_ttl_seconds = 0;
        assert!(ConfigManager::validate_config(&config).is_err());
        config.sessions.idle_ttl_seconds = 1;

        config.output.verbose = true;
        config.output.quiet = true;
        assert!(ConfigManager::validate_config(&config).is_err());
        config.output.verbose = false;
        config.output.quiet = false;

        config.files.extensions = vec![];
        assert!(ConfigManager::validate_config(&config).is_err());

        config.files.extensions = vec!["invalid/ext".to_string()];
        assert!(ConfigManager::validate_config(&config).is_err());
        config.files.extensions = vec!["html".to_string()];

        config.vocabulary.path = Some(PathBuf::from("keywords.yaml"));
        assert!(ConfigManager::validate_config(&config).is_err());
        config.vocabulary.path = Some(PathBuf::from("keywords.json"));
        assert!(ConfigManager::validate_config(&config).is_ok());
    }

    #[test]
    fn test_utility_functions() {
        let config = Config::default();

        assert!(ConfigManager::get_thread_count(&config) >= 1);
        assert_eq!(
            ConfigManager::get_timeout_duration(&config),
            Duration::from_secs(30)
        );
        assert_eq!(
            ConfigManager::get_session_ttl_duration(&config),
            Duration::from_secs(600)
        );
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            OutputFormatConfig::from(OutputFormat::Json),
            OutputFormatConfig::Json
        );
        assert_eq!(
            OutputFormat::from(OutputFormatConfig::Summary),
            OutputFormat::Summary
        );
    }

    #[tokio::test]
    async fn test_load_config_integration() {
        let temp_dir = TempDir::new().unwrap();

        let config_path = temp_dir.path().join("test.toml");
        let toml_content = r#"
[validation]
threads = 6
timeout_seconds = 45

[output]
format = "summary"
"#;
        fs::write(&config_path, toml_content).unwrap();

        let args = vec![
            "validate-hatom",
            "--config",
            config_path.to_str().unwrap(),
            "--threads",
            "8",
            "--verbose",
            temp_dir.path().to_str().unwrap(),
        ];

        let cli = Cli::try_parse_from(args).unwrap();
        let config = ConfigManager::load_config(&cli).await.unwrap();

        // CLI overrides the file, the file fills in what the CLI leaves unset
        assert_eq!(config.validation.threads, Some(8));
        assert!(config.output.verbose);
        assert_eq!(config.validation.timeout_seconds, 45);
        assert_eq!(config.output.format, OutputFormatConfig::Summary);
    }
}
