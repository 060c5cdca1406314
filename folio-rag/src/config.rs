//! Runtime configuration assembled from environment variables
//!
//! | Variable                 | Default                           |
//! |--------------------------|-----------------------------------|
//! | `OPENROUTER_API_KEY`     | required                          |
//! | `MODEL_NAME`             | `deepseek/deepseek-chat`          |
//! | `EMBEDDING_MODEL`        | `openai/text-embedding-3-small`   |
//! | `QDRANT_URL`             | `http://localhost:6333`           |
//! | `QDRANT_COLLECTION_NAME` | `shakespeare_collection`          |
//! | `QDRANT_API_KEY`         | unset                             |
//! | `OPENROUTER_BASE_URL`    | `https://openrouter.ai/api/v1`    |
//! | `FOLIO_CORPUS_DIR`       | `data/folger-shakespeares`        |

use crate::error::ConfigError;
use folio_embed::{DEFAULT_BASE_URL, DEFAULT_EMBEDDING_MODEL};
use folio_retriever::DEFAULT_COLLECTION_NAME;
use folio_retriever::retrieval::corpus::DEFAULT_CORPUS_DIR;
use folio_retriever::storage::qdrant_store::DEFAULT_QDRANT_URL;
use std::path::PathBuf;

pub const DEFAULT_MODEL_NAME: &str = "deepseek/deepseek-chat";

pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const MODEL_NAME: &str = "MODEL_NAME";
pub const EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";
pub const QDRANT_URL: &str = "QDRANT_URL";
pub const QDRANT_COLLECTION_NAME: &str = "QDRANT_COLLECTION_NAME";
pub const QDRANT_API_KEY: &str = "QDRANT_API_KEY";
pub const OPENROUTER_BASE_URL: &str = "OPENROUTER_BASE_URL";
pub const FOLIO_CORPUS_DIR: &str = "FOLIO_CORPUS_DIR";

#[derive(Clone, PartialEq, Eq)]
pub struct RagConfig {
    pub openrouter_api_key: String,
    pub model_name: String,
    pub embedding_model: String,
    pub qdrant_url: String,
    pub qdrant_collection_name: String,
    pub qdrant_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub corpus_dir: PathBuf,
}

impl std::fmt::Debug for RagConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagConfig")
            .field("openrouter_api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("embedding_model", &self.embedding_model)
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_collection_name", &self.qdrant_collection_name)
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("corpus_dir", &self.corpus_dir)
            .finish()
    }
}

impl RagConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any name-to-value source. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let or_default = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let openrouter_api_key = get(OPENROUTER_API_KEY).ok_or(ConfigError::MissingVar {
            name: OPENROUTER_API_KEY,
        })?;

        let config = Self {
            openrouter_api_key,
            model_name: or_default(MODEL_NAME, DEFAULT_MODEL_NAME),
            embedding_model: or_default(EMBEDDING_MODEL, DEFAULT_EMBEDDING_MODEL),
            qdrant_url: or_default(QDRANT_URL, DEFAULT_QDRANT_URL),
            qdrant_collection_name: or_default(QDRANT_COLLECTION_NAME, DEFAULT_COLLECTION_NAME),
            qdrant_api_key: get(QDRANT_API_KEY),
            openrouter_base_url: or_default(OPENROUTER_BASE_URL, DEFAULT_BASE_URL),
            corpus_dir: PathBuf::from(or_default(FOLIO_CORPUS_DIR, DEFAULT_CORPUS_DIR)),
        };

        check_url(QDRANT_URL, &config.qdrant_url)?;
        check_url(OPENROUTER_BASE_URL, &config.openrouter_base_url)?;
        Ok(config)
    }
}

fn check_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RagConfig::from_lookup(lookup(&[(OPENROUTER_API_KEY, "sk-or-test")])).unwrap();
        assert_eq!(config.openrouter_api_key, "sk-or-test");
        assert_eq!(config.model_name, "deepseek/deepseek-chat");
        assert_eq!(config.embedding_model, "openai/text-embedding-3-small");
        assert_eq!(config.qdrant_url, "http://localhost:6333");
        assert_eq!(config.qdrant_collection_name, "shakespeare_collection");
        assert_eq!(config.qdrant_api_key, None);
        assert_eq!(config.openrouter_base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.corpus_dir, PathBuf::from("data/folger-shakespeares"));
    }

    #[test]
    fn test_overrides() {
        let config = RagConfig::from_lookup(lookup(&[
            (OPENROUTER_API_KEY, "sk-or-test"),
            (MODEL_NAME, "anthropic/claude-3-haiku"),
            (QDRANT_URL, "https://qdrant.example.com"),
            (QDRANT_COLLECTION_NAME, "sonnets"),
            (FOLIO_CORPUS_DIR, "/srv/plays"),
        ]))
        .unwrap();
        assert_eq!(config.model_name, "anthropic/claude-3-haiku");
        assert_eq!(config.qdrant_url, "https://qdrant.example.com");
        assert_eq!(config.qdrant_collection_name, "sonnets");
        assert_eq!(config.corpus_dir, PathBuf::from("/srv/plays"));
    }

    #[test]
    fn test_missing_or_blank_api_key() {
        let missing = RagConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            missing,
            ConfigError::MissingVar {
                name: OPENROUTER_API_KEY
            }
        );

        let blank = RagConfig::from_lookup(lookup(&[(OPENROUTER_API_KEY, "   ")])).unwrap_err();
        assert_eq!(
            blank.to_string(),
            "Missing required environment variable: OPENROUTER_API_KEY"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = RagConfig::from_lookup(lookup(&[
            (OPENROUTER_API_KEY, "sk-or-test"),
            (QDRANT_URL, "localhost:6333"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: QDRANT_URL, .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RagConfig::from_lookup(lookup(&[(OPENROUTER_API_KEY, "sk-or-secret")])).unwrap();
        assert!(!format!("{config:?}").contains("sk-or-secret"));
    }
}
