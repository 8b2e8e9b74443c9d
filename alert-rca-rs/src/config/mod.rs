//! Configuration management for the advice source
//!
//! Values are read through `ConfigProvider` implementations so that tests can
//! substitute in-memory values for environment variables. Loading never fails
//! because the credential is missing: an absent key selects heuristic-only
//! operation.

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;

use crate::error::{RcaError, Result};
use crate::util::parse_duration;

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get a duration, accepting bare (possibly fractional) seconds or a unit suffix
    fn get_duration(&self, key: &str) -> Result<Duration> {
        let value = self.get_string(key)?;
        parse_duration(&value).ok_or_else(|| {
            RcaError::configuration(format!("Invalid duration for key {}: {}", key, value))
        })
    }

    /// Get a string value, treating blank values as absent
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_string(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_non_empty(key).unwrap_or_else(|| default.to_string())
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub(crate) fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                RcaError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => RcaError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| RcaError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// A composite config provider that tries multiple providers in order
#[derive(Default)]
pub struct CompositeConfigProvider {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl CompositeConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider to the end of the chain
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl ConfigProvider for CompositeConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.providers
            .iter()
            .find_map(|provider| provider.get_string(key).ok())
            .ok_or_else(|| {
                RcaError::configuration(format!(
                    "Configuration key not found in any provider: {}",
                    key
                ))
            })
    }
}

/// Global default configuration provider (unprefixed process environment)
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new()));

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;
}

/// Configuration of the chat-completion advice source
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Bearer credential; `None` selects heuristic-only operation
    pub api_key: Option<String>,

    /// Default model identifier
    pub model: String,

    /// Base URL without trailing slash
    pub base_url: String,

    /// Bound on the single outbound call
    pub timeout: Duration,

    /// Optional `HTTP-Referer` attribution header
    pub http_referer: Option<String>,

    /// Optional `X-Title` attribution header
    pub app_title: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            http_referer: None,
            app_title: None,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from a config provider.
    ///
    /// Keys are looked up unprefixed (`OPENROUTER_API_KEY`, `PUBLIC_URL`, ...)
    /// so that `EnvConfigProvider::new()` reads the usual variable names.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let timeout = match provider.get_non_empty("openrouter_timeout") {
            Some(_) => provider.get_duration("openrouter_timeout")?,
            None => DEFAULT_TIMEOUT,
        };

        let config = Self {
            api_key: provider.get_non_empty("openrouter_api_key"),
            model: provider.get_string_or("openrouter_model", DEFAULT_MODEL),
            base_url: provider
                .get_string_or("openrouter_base_url", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout,
            http_referer: provider
                .get_non_empty("openrouter_http_referer")
                .or_else(|| provider.get_non_empty("public_url")),
            app_title: provider
                .get_non_empty("openrouter_app_title")
                .or_else(|| provider.get_non_empty("app_name")),
        };

        config.validate()?;
        Ok(config)
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.is_empty())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ServiceConfig for AdvisorConfig {
    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(RcaError::configuration("Advice source base URL is required"));
        }

        if self.model.is_empty() {
            return Err(RcaError::configuration("Advice source model is required"));
        }

        if self.timeout.is_zero() {
            return Err(RcaError::configuration("Advice source timeout must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_formatting() {
        let provider = EnvConfigProvider::new().with_prefix("TEST");

        assert_eq!(provider.format_key("api_key"), "TEST_API_KEY");
        assert_eq!(provider.format_key("base-url"), "TEST_BASE_URL");
        assert_eq!(EnvConfigProvider::new().format_key("openrouter_model"), "OPENROUTER_MODEL");
    }

    #[test]
    fn test_defaults_without_credential() {
        let config = AdvisorConfig::from_provider(&MemoryConfigProvider::new()).unwrap();

        assert!(config.api_key.is_none());
        assert!(!config.has_credential());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = AdvisorConfig::default().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
