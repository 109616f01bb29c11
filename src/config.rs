//! # Application Configuration Module
//!
//! This module provides the configuration object shared by every component of
//! the service. Configuration is read from the environment exactly once at
//! process start and validated eagerly, so a missing credential fails startup
//! instead of the first request that happens to need it.
//!
//! ## Key Components
//!
//! - `AppConfig`: the complete, validated configuration
//! - `DataForSeoConfig`: optional credentials for the backlink passthrough
//! - `ConfigError`: typed startup validation failures

use crate::error::Error as CrateError;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable holds an unusable value
    #[error("invalid value for {var}: {reason}")]
    InvalidVar {
        /// Name of the offending variable
        var: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl From<ConfigError> for CrateError {
    fn from(err: ConfigError) -> Self {
        CrateError::Config(err.to_string())
    }
}

/// Credentials and target for the DataForSEO backlink passthrough
#[derive(Debug, Clone)]
pub struct DataForSeoConfig {
    /// Account login
    pub login: String,

    /// Account password
    pub password: String,

    /// Target site whose live backlinks are fetched
    pub target: String,
}

/// Validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,

    /// API key for the model provider
    pub openai_api_key: String,

    /// Completion model used for recommendations and answers
    pub completion_model: String,

    /// Embedding model used for document and query vectors
    pub embedding_model: String,

    /// Dimensions of the embedding vectors
    pub embedding_dimensions: usize,

    /// Path of the vector-store database file
    pub database_path: PathBuf,

    /// Source text files indexed by the document indexer
    pub source_files: Vec<PathBuf>,

    /// Lighthouse executable invoked for page audits
    pub audit_command: PathBuf,

    /// Backlink API credentials, present only when both variables are set
    pub dataforseo: Option<DataForSeoConfig>,
}

impl AppConfig {
    /// Load and validate the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load the configuration through a variable lookup function
    ///
    /// Split out from [`AppConfig::from_env`] so tests can supply variables
    /// without mutating process-wide environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar("OPENAI_API_KEY"))?;

        let bind_addr = lookup("SEOLENS_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidVar {
                var: "SEOLENS_ADDR",
                reason: e.to_string(),
            })?;

        let embedding_dimensions = match lookup("SEOLENS_EMBEDDING_DIMENSIONS") {
            Some(value) => value.parse::<usize>().map_err(|e| ConfigError::InvalidVar {
                var: "SEOLENS_EMBEDDING_DIMENSIONS",
                reason: e.to_string(),
            })?,
            None => 1536,
        };

        let source_files = lookup("SEOLENS_SOURCE_FILES")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|path| !path.is_empty())
                    .map(PathBuf::from)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|| vec![PathBuf::from("data/corpus.txt")]);

        if source_files.is_empty() {
            return Err(ConfigError::InvalidVar {
                var: "SEOLENS_SOURCE_FILES",
                reason: "no source files configured".to_string(),
            });
        }

        // Both credentials or neither; half a credential pair is a mistake.
        let dataforseo = match (lookup("DATAFORSEO_LOGIN"), lookup("DATAFORSEO_PASSWORD")) {
            (Some(login), Some(password)) => Some(DataForSeoConfig {
                login,
                password,
                target: lookup("SEOLENS_BACKLINKS_TARGET")
                    .unwrap_or_else(|| "https://example.com/".to_string()),
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidVar {
                    var: "DATAFORSEO_LOGIN",
                    reason: "login and password must be set together".to_string(),
                });
            }
        };

        Ok(Self {
            bind_addr,
            openai_api_key,
            completion_model: lookup("SEOLENS_COMPLETION_MODEL")
                .unwrap_or_else(|| "gpt-4".to_string()),
            embedding_model: lookup("SEOLENS_EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
            embedding_dimensions,
            database_path: lookup("SEOLENS_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("seolens.db")),
            source_files,
            audit_command: lookup("SEOLENS_LIGHTHOUSE_BIN")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("lighthouse")),
            dataforseo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |var| map.get(var).map(|v| v.to_string())
    }

    #[test]
    fn test_defaults_with_api_key_only() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("OPENAI_API_KEY", "test-key")])).unwrap();

        assert_eq!(config.openai_api_key, "test-key");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.completion_model, "gpt-4");
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.embedding_dimensions, 1536);
        assert_eq!(config.database_path, PathBuf::from("seolens.db"));
        assert_eq!(config.source_files, vec![PathBuf::from("data/corpus.txt")]);
        assert!(config.dataforseo.is_none());
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingVar("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_source_file_list_is_split_and_trimmed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "test-key"),
            ("SEOLENS_SOURCE_FILES", "data/a.txt, data/b.txt"),
        ]))
        .unwrap();

        assert_eq!(
            config.source_files,
            vec![PathBuf::from("data/a.txt"), PathBuf::from("data/b.txt")]
        );
    }

    #[test]
    fn test_half_configured_backlinks_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "test-key"),
            ("DATAFORSEO_LOGIN", "login"),
        ]));

        assert!(matches!(result, Err(ConfigError::InvalidVar { .. })));
    }

    #[test]
    fn test_invalid_bind_addr() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "test-key"),
            ("SEOLENS_ADDR", "not-an-address"),
        ]));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidVar {
                var: "SEOLENS_ADDR",
                ..
            })
        ));
    }
}
