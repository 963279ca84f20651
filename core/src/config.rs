use crate::errors::{BridgeError, BridgeResult};
use crate::types::{GenerationParams, Provider};
use config::{Config, Environment, File, FileFormat};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Application name used for the config directory
pub const APP_NAME: &str = "askllm";

/// Prefix of the environment variables read by [`BridgeConfig::load`]
pub const ENV_PREFIX: &str = "ASKLLM";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw, partially specified settings as read from the config file and environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub provider: Option<Provider>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub answer_pointer: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Layers the optional TOML file under the given environment source
    pub fn collect(path: Option<&Path>, env: Environment) -> BridgeResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        builder
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| BridgeError::ConfigError(format!("Failed to load configuration: {}", e)))
    }
}

/// Values given on the command line; they win over every other layer
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<Provider>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

/// Fully resolved configuration handed to the upstream client at construction
#[derive(Clone)]
pub struct BridgeConfig {
    pub provider: Provider,
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub params: GenerationParams,
    pub answer_pointer: String,
    pub timeout: Duration,
}

// The key stays out of Debug so configs can be logged.
impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("params", &self.params)
            .field("answer_pointer", &self.answer_pointer)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BridgeConfig {
    /// Builds a config for `provider` with its default endpoint, model and schema
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            endpoint: expand_endpoint(provider.default_endpoint(), &model),
            api_key: api_key.into(),
            model,
            params: GenerationParams::default(),
            answer_pointer: provider.answer_pointer().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Loads configuration from `.env`, the config file, `ASKLLM_*` variables and `overrides`.
    ///
    /// `path` falls back to `~/.config/askllm/config.toml`; a missing file is not an error.
    /// A missing API key is.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> BridgeResult<Self> {
        if let Ok(dotenv_path) = dotenvy::dotenv() {
            debug!(path = %dotenv_path.display(), "Loaded .env file");
        }

        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => get_default_config_file(APP_NAME).ok(),
        };

        let raw = FileConfig::collect(path.as_deref(), Environment::with_prefix(ENV_PREFIX))?;
        let config = Self::resolve(raw, overrides, |name| std::env::var(name).ok())?;
        info!(
            provider = %config.provider,
            model = %config.model,
            endpoint = %config.endpoint,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Applies overrides and defaults to `raw`, then validates the result.
    ///
    /// `lookup_env` resolves the provider's conventional key variable when no key was given.
    pub fn resolve<F>(raw: FileConfig, overrides: &ConfigOverrides, lookup_env: F) -> BridgeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = overrides.provider.or(raw.provider).unwrap_or_default();

        let model = overrides
            .model
            .clone()
            .or(raw.model)
            .unwrap_or_else(|| provider.default_model().to_string());

        let endpoint = overrides
            .endpoint
            .clone()
            .or(raw.endpoint)
            .unwrap_or_else(|| provider.default_endpoint().to_string());

        let api_key = overrides
            .api_key
            .clone()
            .or(raw.api_key)
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup_env(provider.api_key_env()))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                BridgeError::ConfigError(format!(
                    "No API key configured. Set {}_API_KEY or {}, or pass --api-key",
                    ENV_PREFIX,
                    provider.api_key_env()
                ))
            })?;

        let config = Self {
            provider,
            endpoint: expand_endpoint(&endpoint, &model),
            api_key: api_key.trim().to_string(),
            model,
            params: GenerationParams {
                temperature: raw.temperature,
                max_tokens: raw.max_tokens,
                system_prompt: raw.system_prompt.filter(|s| !s.trim().is_empty()),
            },
            answer_pointer: raw
                .answer_pointer
                .unwrap_or_else(|| provider.answer_pointer().to_string()),
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the client relies on
    pub fn validate(&self) -> BridgeResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(BridgeError::ConfigError("API key cannot be empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(BridgeError::ConfigError("Model name cannot be empty".to_string()));
        }
        Url::parse(&self.endpoint).map_err(|e| {
            BridgeError::ConfigError(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if !self.answer_pointer.starts_with('/') {
            return Err(BridgeError::ConfigError(format!(
                "Answer pointer '{}' must be a JSON pointer starting with '/'",
                self.answer_pointer
            )));
        }
        if self.timeout.is_zero() {
            return Err(BridgeError::ConfigError("Timeout must be at least one second".to_string()));
        }
        if let Some(t) = self.params.temperature {
            if !t.is_finite() || t < 0.0 {
                return Err(BridgeError::ConfigError(format!("Invalid temperature: {}", t)));
            }
        }
        Ok(())
    }
}

/// Substitutes `{model}` in endpoint templates such as the Gemini URL
fn expand_endpoint(endpoint: &str, model: &str) -> String {
    endpoint.replace("{model}", model)
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> BridgeResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        BridgeError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> BridgeResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
