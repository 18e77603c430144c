//! Configuration management for the narrative chunker.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults (`chunk_size` 512, `chunk_overlap` 64, `batch_size` 256)
//! - Config file (`.narrative/config.yaml` in the workspace, or `NARRATIVE_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! `validate` must pass before any record is processed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::logging::LogFormat;

/// Default target word budget per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default overlap between adjacent chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 64;

/// Default number of chunk texts sent to the embedding provider per call.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .narrative/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Target word budget per chunk
    pub chunk_size: usize,

    /// Overlap between adjacent chunks
    pub chunk_overlap: usize,

    /// Embedding batch size
    pub batch_size: usize,

    /// Embedding provider settings
    pub embedding: EmbeddingSettings,

    /// Log level override
    pub log_level: Option<String>,

    /// Log line format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Embedding provider selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingSettings {
    /// Provider name (e.g., "trigram")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Vector dimensions
    pub dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    chunking: Option<ChunkingSection>,
    embedding: Option<EmbeddingSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChunkingSection {
    #[serde(rename = "chunkSize")]
    chunk_size: Option<usize>,
    #[serde(rename = "chunkOverlap")]
    chunk_overlap: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    #[serde(rename = "batchSize")]
    batch_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    format: Option<LogFormat>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            batch_size: DEFAULT_BATCH_SIZE,
            embedding: EmbeddingSettings::default(),
            log_level: None,
            log_format: LogFormat::default(),
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and
    /// environment variables.
    ///
    /// Environment variables:
    /// - `NARRATIVE_WORKSPACE`: Override workspace path
    /// - `NARRATIVE_CONFIG`: Path to config file
    /// - `NARRATIVE_CHUNK_SIZE`: Target word budget per chunk
    /// - `NARRATIVE_CHUNK_OVERLAP`: Overlap between chunks
    /// - `NARRATIVE_BATCH_SIZE`: Embedding batch size
    /// - `NARRATIVE_LOG_FORMAT`: `pretty` or `json`
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use narrative_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("chunk_size = {}", config.chunk_size);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like `load`, with a workspace and config file chosen by the caller
    /// (usually CLI flags). These win over `NARRATIVE_WORKSPACE` and
    /// `NARRATIVE_CONFIG` and decide which YAML file is merged.
    ///
    /// An explicitly named config file must exist; the default
    /// `<workspace>/.narrative/config.yaml` is optional.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let workspace =
            workspace.or_else(|| std::env::var_os("NARRATIVE_WORKSPACE").map(PathBuf::from));
        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var_os("NARRATIVE_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        match config.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                config = config.merge_yaml(&path)?;
            }
            None => {
                let default_path = config.narrative_dir().join("config.yaml");
                if default_path.exists() {
                    config = config.merge_yaml(&default_path)?;
                }
            }
        }

        // Environment variables override YAML config
        if let Some(chunk_size) = env_usize("NARRATIVE_CHUNK_SIZE")? {
            config.chunk_size = chunk_size;
        }
        if let Some(chunk_overlap) = env_usize("NARRATIVE_CHUNK_OVERLAP")? {
            config.chunk_overlap = chunk_overlap;
        }
        if let Some(batch_size) = env_usize("NARRATIVE_BATCH_SIZE")? {
            config.batch_size = batch_size;
        }

        if let Ok(format) = std::env::var("NARRATIVE_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!("Merging config file {:?}", path);

        Ok(self.clone().merge(config_file))
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(chunking) = file.chunking {
            if let Some(size) = chunking.chunk_size {
                self.chunk_size = size;
            }
            if let Some(overlap) = chunking.chunk_overlap {
                self.chunk_overlap = overlap;
            }
        }

        if let Some(embedding) = file.embedding {
            if let Some(provider) = embedding.provider {
                self.embedding.provider = provider;
            }
            if let Some(model) = embedding.model {
                self.embedding.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                self.embedding.dimensions = dimensions;
            }
            if let Some(batch_size) = embedding.batch_size {
                self.batch_size = batch_size;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(format) = logging.format {
                self.log_format = format;
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        self
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the config file and
    /// environment variables. The workspace and config file are not
    /// overrides; pass them to `load_with` so the right file is merged.
    pub fn with_overrides(
        mut self,
        chunk_size: Option<usize>,
        chunk_overlap: Option<usize>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(chunk_size) = chunk_size {
            self.chunk_size = chunk_size;
        }

        if let Some(chunk_overlap) = chunk_overlap {
            self.chunk_overlap = chunk_overlap;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .narrative directory.
    pub fn narrative_dir(&self) -> PathBuf {
        self.workspace.join(".narrative")
    }

    /// Validate the chunking and embedding settings.
    ///
    /// Fails fast with `AppError::Config` when `chunk_size` is zero,
    /// `chunk_overlap >= chunk_size`, or `batch_size` is zero.
    pub fn validate(&self) -> AppResult<()> {
        validate_chunking(self.chunk_size, self.chunk_overlap)?;

        if self.batch_size == 0 {
            return Err(AppError::Config(
                "batch_size must be greater than zero".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding dimensions must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Check the `0 <= chunk_overlap < chunk_size` invariant.
pub fn validate_chunking(chunk_size: usize, chunk_overlap: usize) -> AppResult<()> {
    if chunk_size == 0 {
        return Err(AppError::Config(
            "chunk_size must be greater than zero".to_string(),
        ));
    }

    if chunk_overlap >= chunk_size {
        return Err(AppError::Config(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            chunk_overlap, chunk_size
        )));
    }

    Ok(())
}

fn env_usize(key: &str) -> AppResult<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<usize>().map(Some).map_err(|e| {
            AppError::Config(format!("{} must be a non-negative integer, got {:?}: {}", key, raw, e))
        }),
        Err(_) => Ok(None),
    }
}
