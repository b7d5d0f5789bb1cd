//! Configuration management

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::core::errors::{RelayError, Result};

/// Default upstream chat-completion endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Name of the dictionary file served at `/chinookwords.json`
pub const DICTIONARY_FILE_NAME: &str = "chinookwords.json";

/// Origins allowed to read responses when `ALLOWED_ORIGINS` is unset
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://olympusmultimedia.com",
    "http://olympusmultimedia.com",
];

/// Immutable relay configuration, built once at startup
#[derive(Clone)]
pub struct RelayConfig {
    /// Bearer credential for the upstream API
    pub api_key: String,
    /// Chat-completion endpoint URL
    pub api_endpoint: String,
    /// Model identifier sent upstream
    pub model: String,
    /// Generation cap per request
    pub max_tokens: u32,
    /// Upstream request timeout
    pub timeout_ms: u64,
    /// Bind host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Origins echoed in `Access-Control-Allow-Origin`
    pub allowed_origins: BTreeSet<String>,
    /// Directory served for unmatched GET paths
    pub static_root: PathBuf,
    /// File served at `/chinookwords.json`
    pub dictionary_path: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        let static_root = PathBuf::from("public");
        Self {
            api_key: String::new(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: "gpt-4".to_string(),
            max_tokens: 100,
            timeout_ms: 30_000,
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            dictionary_path: static_root.join(DICTIONARY_FILE_NAME),
            static_root,
        }
    }
}

// The key never reaches logs.
impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("api_endpoint", &self.api_endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("static_root", &self.static_root)
            .field("dictionary_path", &self.dictionary_path)
            .finish()
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup("OPENAI_API_KEY").unwrap_or_default();

        let api_endpoint = lookup("OPENAI_API_ENDPOINT").unwrap_or(defaults.api_endpoint);
        let model = lookup("OPENAI_MODEL").unwrap_or(defaults.model);
        let max_tokens = parse_var(&lookup, "MAX_TOKENS", defaults.max_tokens)?;
        let timeout_ms = parse_var(&lookup, "REQUEST_TIMEOUT_MS", defaults.timeout_ms)?;
        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT", defaults.port)?;

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => defaults.allowed_origins,
        };

        let static_root = lookup("STATIC_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_root);
        let dictionary_path = lookup("DICTIONARY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| static_root.join(DICTIONARY_FILE_NAME));

        Ok(Self {
            api_key,
            api_endpoint,
            model,
            max_tokens,
            timeout_ms,
            host,
            port,
            allowed_origins,
            static_root,
            dictionary_path,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(RelayError::MissingField {
                field: "OPENAI_API_KEY".to_string(),
            });
        }

        if self.api_endpoint.is_empty() {
            return Err(RelayError::ConfigError {
                message: "API endpoint is required".to_string(),
            });
        }

        if self.model.is_empty() {
            return Err(RelayError::ConfigError {
                message: "model is required".to_string(),
            });
        }

        if self.max_tokens == 0 {
            return Err(RelayError::ConfigError {
                message: "max_tokens must be greater than 0".to_string(),
            });
        }

        if self.timeout_ms == 0 {
            return Err(RelayError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        if self.allowed_origins.is_empty() {
            warn!("No allowed origins configured, browsers will block every cross-origin response");
        }

        debug!(
            "Configuration valid: model={}, endpoint={}, {} allowed origins",
            self.model,
            self.api_endpoint,
            self.allowed_origins.len()
        );

        Ok(())
    }

    /// Address the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| RelayError::ConfigError {
            message: format!("{key}={raw:?} is invalid: {e}"),
        }),
        None => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes
pub fn parse_origins(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
