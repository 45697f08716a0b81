//! Configuration for the evaluation harness.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// RAG service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagServiceConfig {
    /// Base URL for the RAG service (e.g., "http://localhost:8080")
    pub api_base: String,

    /// API key for authentication (may be empty for local services)
    #[serde(default)]
    pub api_key: String,
}

impl Default for RagServiceConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
        }
    }
}

/// Judge LLM configuration (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Base URL for the judge LLM API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name (e.g., "gpt-4", "claude-3-opus")
    pub model: String,

    /// Maximum tokens for a judge response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for judge generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.0
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Evaluation run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Path to the ground-truth dataset file.
    #[serde(default = "default_ground_truth_path")]
    pub ground_truth_path: PathBuf,

    /// Directory where result files are written.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_ground_truth_path() -> PathBuf {
    PathBuf::from("results/ground_truth_dataset.json")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            ground_truth_path: default_ground_truth_path(),
            results_dir: default_results_dir(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// RAG service settings
    pub rag: RagServiceConfig,
    /// Judge LLM settings
    pub judge: JudgeConfig,
    /// Evaluation run settings
    #[serde(default)]
    pub eval: EvalConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    rag: Option<RagFileSection>,
    judge: Option<JudgeFileSection>,
    eval: Option<EvalFileSection>,
}

#[derive(Debug, Deserialize)]
struct RagFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JudgeFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct EvalFileSection {
    ground_truth_path: Option<PathBuf>,
    results_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (RAG_API_BASE, JUDGE_API_KEY, ...)
    /// 2. Config file (~/.config/rag-evaluator/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        // Override with environment variables
        if let Ok(api_base) = env::var("RAG_API_BASE") {
            config.rag.api_base = api_base;
        }

        if let Ok(api_key) = env::var("RAG_API_KEY") {
            config.rag.api_key = api_key;
        }

        if let Ok(api_base) = env::var("JUDGE_API_BASE") {
            config.judge.api_base = api_base;
        }

        if let Ok(api_key) = env::var("JUDGE_API_KEY") {
            config.judge.api_key = api_key;
        }

        if let Ok(model) = env::var("JUDGE_MODEL") {
            config.judge.model = model;
        }

        if let Ok(max_tokens) = env::var("JUDGE_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse() {
                config.judge.max_tokens = tokens;
            }
        }

        if let Ok(temperature) = env::var("JUDGE_TEMPERATURE") {
            if let Ok(temp) = temperature.parse() {
                config.judge.temperature = temp;
            }
        }

        if let Ok(path) = env::var("EVAL_GROUND_TRUTH") {
            config.eval.ground_truth_path = PathBuf::from(path);
        }

        if let Ok(dir) = env::var("EVAL_RESULTS_DIR") {
            config.eval.results_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(rag) = file_config.rag {
            if let Some(api_base) = rag.api_base {
                config.rag.api_base = api_base;
            }
            if let Some(api_key) = rag.api_key {
                config.rag.api_key = api_key;
            }
        }

        if let Some(judge) = file_config.judge {
            if let Some(api_base) = judge.api_base {
                config.judge.api_base = api_base;
            }
            if let Some(api_key) = judge.api_key {
                config.judge.api_key = api_key;
            }
            if let Some(model) = judge.model {
                config.judge.model = model;
            }
            if let Some(max_tokens) = judge.max_tokens {
                config.judge.max_tokens = max_tokens;
            }
            if let Some(temperature) = judge.temperature {
                config.judge.temperature = temperature;
            }
        }

        if let Some(eval) = file_config.eval {
            if let Some(ground_truth_path) = eval.ground_truth_path {
                config.eval.ground_truth_path = ground_truth_path;
            }
            if let Some(results_dir) = eval.results_dir {
                config.eval.results_dir = results_dir;
            }
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rag-evaluator")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that required configuration is present.
    ///
    /// The RAG service base URL is deliberately not required here: a missing
    /// RAG endpoint degrades to an "unavailable" collector, not a hard error.
    pub fn validate(&self) -> Result<()> {
        if self.judge.api_base.is_empty() {
            return Err(EvalError::Config(
                "Judge API base URL is required. Set JUDGE_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        if self.judge.api_key.is_empty() {
            return Err(EvalError::Config(
                "Judge API key is required. Set JUDGE_API_KEY environment variable or add to config file.".to_string()
            ));
        }

        if self.judge.model.is_empty() {
            return Err(EvalError::Config(
                "Judge model is required. Set JUDGE_MODEL environment variable or add to config file."
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Create a config from explicit endpoints (useful for testing).
    pub fn with_endpoints(
        rag_base: impl Into<String>,
        judge_base: impl Into<String>,
        judge_key: impl Into<String>,
    ) -> Self {
        Self {
            rag: RagServiceConfig {
                api_base: rag_base.into(),
                ..Default::default()
            },
            judge: JudgeConfig {
                api_base: judge_base.into(),
                api_key: judge_key.into(),
                ..Default::default()
            },
            eval: EvalConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rag.api_base.is_empty());
        assert!(config.judge.api_base.is_empty());
        assert_eq!(config.judge.model, "gpt-4");
        assert_eq!(config.judge.max_tokens, 1024);
        assert_eq!(config.judge.temperature, 0.0);
        assert_eq!(
            config.eval.ground_truth_path,
            PathBuf::from("results/ground_truth_dataset.json")
        );
    }

    #[test]
    fn test_validate_fails_without_required_fields() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_endpoints() {
        let config =
            Config::with_endpoints("http://localhost:8080", "https://api.example.com", "key");
        assert_eq!(config.rag.api_base, "http://localhost:8080");
        assert_eq!(config.judge.api_base, "https://api.example.com");
        assert_eq!(config.judge.api_key, "key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_rag_endpoint_still_validates() {
        let mut config = Config::default();
        config.judge.api_base = "https://api.example.com".to_string();
        config.judge.api_key = "key".to_string();
        assert!(config.validate().is_ok());
    }
}
