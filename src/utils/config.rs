//! TOML-based configuration for Insight
//!
//! Every field has a default, so a missing `insight.toml` still yields a
//! working local setup (Ollama on localhost). Secrets are never stored in the
//! file: providers name the environment variable that holds their API key,
//! and `.env` is loaded through `dotenvy` before resolution.

use crate::llm::Provider;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Root configuration structure loaded from insight.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Origins allowed to open the event stream from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            cors_origins: default_cors_origins(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LlmConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        model: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        match self {
            LlmConfig::Ollama { model, .. } | LlmConfig::OpenAI { model, .. } => model,
        }
    }

    /// Resolve into a [`Provider`], reading the API key from the environment
    pub fn to_provider(&self) -> Result<Provider> {
        match self {
            LlmConfig::Ollama { base_url, model } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
            LlmConfig::OpenAI {
                api_key_env,
                api_base,
                model,
            } => {
                let api_key = std::env::var(api_key_env).map_err(|_| {
                    AppError::Configuration(format!(
                        "environment variable '{}' is not set",
                        api_key_env
                    ))
                })?;
                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                })
            }
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Hits requested per planned sub-query
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    2
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

// ============= Workflow Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Upper bound on planner sub-queries
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    /// Capacity of the per-run event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_max_queries() -> usize {
    3
}

fn default_event_buffer() -> usize {
    32
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_queries: default_max_queries(),
            event_buffer: default_event_buffer(),
        }
    }
}

// ============= Loading =============

impl InsightConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file falls back to defaults; a malformed or invalid one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dotenvy::dotenv().ok();

        let config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                AppError::Configuration(format!("failed to read {}: {}", path.display(), e))
            })?;
            let config = Self::from_toml(&content)?;
            info!(path = %path.display(), "Loaded configuration");
            config
        } else {
            warn!(path = %path.display(), "Configuration file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without touching the filesystem
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Configuration(format!("invalid TOML: {}", e)))
    }

    /// Reject values the workflow cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.search.max_results == 0 {
            return Err(AppError::Configuration(
                "search.max_results must be at least 1".to_string(),
            ));
        }
        if self.workflow.max_queries == 0 {
            return Err(AppError::Configuration(
                "workflow.max_queries must be at least 1".to_string(),
            ));
        }
        if self.workflow.event_buffer == 0 {
            return Err(AppError::Configuration(
                "workflow.event_buffer must be at least 1".to_string(),
            ));
        }
        if self.llm.model().trim().is_empty() {
            return Err(AppError::Configuration(
                "llm.model must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = InsightConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.search.max_results, 2);
        assert_eq!(config.workflow.max_queries, 3);
        assert_eq!(config.llm.model(), "llama3.2");
    }

    #[test]
    fn test_parse_openai_section() {
        let config = InsightConfig::from_toml(
            r#"
            [server]
            port = 9000

            [llm]
            type = "openai"
            api_key_env = "GEMINI_API_KEY"
            api_base = "https://generativelanguage.googleapis.com/v1beta/openai"
            model = "gemini-2.0-flash"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        match &config.llm {
            LlmConfig::OpenAI {
                api_key_env, model, ..
            } => {
                assert_eq!(api_key_env, "GEMINI_API_KEY");
                assert_eq!(model, "gemini-2.0-flash");
            }
            other => panic!("Expected OpenAI config, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_api_key_env_is_configuration_error() {
        let llm = LlmConfig::OpenAI {
            api_key_env: "INSIGHT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            api_base: default_openai_base(),
            model: "gpt-4o-mini".to_string(),
        };
        let err = llm.to_provider().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = InsightConfig::default();
        config.search.max_results = 0;
        assert!(config.validate().is_err());

        let mut config = InsightConfig::default();
        config.workflow.max_queries = 0;
        assert!(config.validate().is_err());

        let mut config = InsightConfig::default();
        config.workflow.event_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = InsightConfig::from_toml("[server\nport = ").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }
}
