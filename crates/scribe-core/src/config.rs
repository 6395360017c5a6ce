//! Configuration management for Scribe
//!
//! Handles loading, saving, and managing application configuration
//! including API keys, provider endpoints, and UI preferences.
//!
//! Environment overrides are resolved at lookup time and never written back
//! to disk:
//! - `ZHIPU_API_KEY` / `DEEPSEEK_API_KEY` fill a provider's empty key
//! - `AI_API_KEY` fills the active provider's key when still empty
//! - `AI_PROVIDER` replaces the configured active provider
//! - `SCRIBE_CONFIG_DIR` relocates the whole configuration directory

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::provider::ProviderKind;

/// Environment variable that relocates the configuration directory
pub const CONFIG_DIR_ENV: &str = "SCRIBE_CONFIG_DIR";
/// Environment variable that overrides the active provider
pub const PROVIDER_ENV: &str = "AI_PROVIDER";
/// Environment variable holding a key for whichever provider is active
pub const GENERIC_API_KEY_ENV: &str = "AI_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Model backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Active provider name ("zhipu" or "deepseek")
    #[serde(default = "default_provider_name")]
    pub provider: String,
    /// Per-provider credentials and endpoints
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ModelConfig>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_provider_name() -> String {
    ProviderKind::Zhipu.as_str().to_string()
}

fn default_providers() -> HashMap<String, ModelConfig> {
    ProviderKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), ModelConfig::for_kind(*kind)))
        .collect()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider_name(),
            providers: default_providers(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Credentials and endpoint for one provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ModelConfig {
    /// Default entry for a built-in provider
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            api_key: None,
            api_key_env: Some(kind.api_key_env().to_string()),
            base_url: Some(kind.default_base_url().to_string()),
            model: Some(kind.default_model().to_string()),
        }
    }

    /// Resolve the API key: the configured value first, then `api_key_env`.
    pub fn resolve_api_key(&self, env: &dyn Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(key) = non_empty(self.api_key.as_deref()) {
            return Some(key.to_string());
        }
        self.api_key_env
            .as_deref()
            .and_then(env)
            .filter(|k| !k.is_empty())
    }

    /// Model name, if one is configured
    pub fn model_name(&self) -> Option<&str> {
        non_empty(self.model.as_deref())
    }

    /// Base URL, if one is configured
    pub fn endpoint(&self) -> Option<&str> {
        non_empty(self.base_url.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Interactive front-end preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_welcome: bool,
    /// Lines kept in the readline history file
    pub max_history: usize,
    /// Hide per-tool progress lines
    pub compact_mode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_welcome: true,
            max_history: 1000,
            compact_mode: false,
        }
    }
}

/// Turn and persistence tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Extra attempts for the follow-up model call
    pub max_retries: u32,
    /// Base delay between follow-up attempts, multiplied by the attempt number
    pub retry_backoff_ms: u64,
    /// Default timeout for `execute_command`
    pub tool_timeout_secs: u64,
    /// Provider request timeout
    pub request_timeout_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_backoff_ms: 1000,
            tool_timeout_secs: 60,
            request_timeout_secs: 120,
        }
    }
}

/// Configuration manager for loading and saving config
pub struct ConfigManager {
    config_dir: PathBuf,
    config: Config,
    env: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl ConfigManager {
    /// Create a config manager rooted at the default directory
    pub fn new() -> Result<Self> {
        Self::with_dir(Self::default_config_dir()?)
    }

    /// Create a config manager rooted at `config_dir`, reading the process environment
    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        Self::with_env(config_dir, |key| std::env::var(key).ok())
    }

    /// Create a config manager with an explicit environment lookup
    pub fn with_env<F>(config_dir: PathBuf, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        let path = config_dir.join("config.toml");
        let mut config = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            Config::default()
        };

        // Built-in providers always have an entry so `set_value` can target them
        for kind in ProviderKind::ALL {
            config
                .ai
                .providers
                .entry(kind.as_str().to_string())
                .or_insert_with(|| ModelConfig::for_kind(kind));
        }

        Ok(Self {
            config_dir,
            config,
            env: Box::new(env),
        })
    }

    /// `$SCRIBE_CONFIG_DIR`, falling back to the platform config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;
        Ok(config_dir.join("scribe"))
    }

    fn load_from_path(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Write the defaults on first run
    pub fn init(&self) -> Result<bool> {
        if self.config_path().exists() {
            return Ok(false);
        }
        self.save()?;
        info!("Created default configuration at {:?}", self.config_path());
        Ok(true)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.config_dir.join("sessions")
    }

    pub fn history_path(&self) -> PathBuf {
        self.config_dir.join("history")
    }

    /// Persisted activity tracker state
    pub fn context_path(&self) -> PathBuf {
        self.config_dir.join("context.json")
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)
            .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;

        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(self.config_path(), content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        debug!("Saved configuration to {:?}", self.config_path());
        Ok(())
    }

    /// Active provider name, honouring `AI_PROVIDER`
    pub fn active_provider(&self) -> String {
        (self.env)(PROVIDER_ENV)
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.config.ai.provider.clone())
    }

    pub fn provider(&self, name: &str) -> Option<&ModelConfig> {
        self.config.ai.providers.get(name)
    }

    /// API key for `name`, after environment overrides
    pub fn api_key_for(&self, name: &str) -> Option<String> {
        let from_config = self
            .provider(name)
            .and_then(|p| p.resolve_api_key(self.env.as_ref()));
        if from_config.is_some() {
            return from_config;
        }
        if name == self.active_provider() {
            return (self.env)(GENERIC_API_KEY_ENV).filter(|k| !k.is_empty());
        }
        None
    }

    pub fn has_api_key_for(&self, name: &str) -> bool {
        self.api_key_for(name).is_some()
    }

    /// Set the active provider
    pub fn set_default_provider(&mut self, name: &str) {
        self.config.ai.provider = name.to_string();
    }

    /// Set a value addressed as `section.field`.
    ///
    /// Supported keys: `ai.provider`, `ai.max_tokens`, `ai.temperature`, and
    /// `<provider>.api_key|model|base_url` for any configured provider.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| Error::Config(format!("Invalid config key '{}': expected section.field", key)))?;

        if section == "ai" {
            match field {
                "provider" => {
                    if !self.config.ai.providers.contains_key(value) {
                        return Err(Error::Config(format!("Unknown provider: {}", value)));
                    }
                    self.config.ai.provider = value.to_string();
                }
                "max_tokens" => {
                    self.config.ai.max_tokens = value
                        .parse()
                        .map_err(|_| Error::Config(format!("Invalid max_tokens: {}", value)))?;
                }
                "temperature" => {
                    self.config.ai.temperature = value
                        .parse()
                        .map_err(|_| Error::Config(format!("Invalid temperature: {}", value)))?;
                }
                other => return Err(Error::Config(format!("Unknown config key: ai.{}", other))),
            }
            return Ok(());
        }

        let provider = self
            .config
            .ai
            .providers
            .get_mut(section)
            .ok_or_else(|| Error::Config(format!("Unknown config section: {}", section)))?;

        match field {
            "api_key" => provider.api_key = Some(value.to_string()),
            "model" => provider.model = Some(value.to_string()),
            "base_url" => provider.base_url = Some(value.to_string()),
            other => {
                return Err(Error::Config(format!(
                    "Unknown config key: {}.{}",
                    section, other
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ai.provider, "zhipu");
        assert_eq!(config.ai.max_tokens, 2048);
        assert_eq!(config.session.max_retries, 2);

        let zhipu = &config.ai.providers["zhipu"];
        assert_eq!(zhipu.model_name(), Some("glm-4"));
        let deepseek = &config.ai.providers["deepseek"];
        assert_eq!(deepseek.endpoint(), Some("https://api.deepseek.com"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[ai.providers.zhipu]"));
        assert!(toml_str.contains("[ai.providers.deepseek]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.ai.provider, config.ai.provider);
        assert_eq!(parsed.ai.providers.len(), config.ai.providers.len());
    }

    #[test]
    fn test_partial_file_fills_missing_providers() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[ai]\nprovider = \"deepseek\"\n\n[ai.providers.deepseek]\napi_key = \"sk-1\"\n",
        )
        .unwrap();

        let manager = ConfigManager::with_env(dir.path().to_path_buf(), no_env).unwrap();
        assert_eq!(manager.active_provider(), "deepseek");
        assert_eq!(manager.api_key_for("deepseek"), Some("sk-1".to_string()));
        assert!(manager.provider("zhipu").is_some());
    }

    #[test]
    fn test_env_overrides() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_env(dir.path().to_path_buf(), |key| match key {
            "DEEPSEEK_API_KEY" => Some("from-env".to_string()),
            "AI_API_KEY" => Some("generic".to_string()),
            "AI_PROVIDER" => Some("Zhipu".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(manager.active_provider(), "zhipu");
        assert_eq!(manager.api_key_for("deepseek"), Some("from-env".to_string()));
        // AI_API_KEY only applies to the active provider
        assert_eq!(manager.api_key_for("zhipu"), Some("generic".to_string()));
    }

    #[test]
    fn test_configured_key_wins_over_env() {
        let dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::with_env(dir.path().to_path_buf(), |key| {
            (key == "ZHIPU_API_KEY").then(|| "env-key".to_string())
        })
        .unwrap();
        manager.set_value("zhipu.api_key", "file-key").unwrap();
        assert_eq!(manager.api_key_for("zhipu"), Some("file-key".to_string()));
    }

    #[test]
    fn test_set_value() {
        let dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::with_env(dir.path().to_path_buf(), no_env).unwrap();

        manager.set_value("ai.provider", "deepseek").unwrap();
        manager.set_value("deepseek.model", "deepseek-coder").unwrap();
        manager.set_value("ai.temperature", "0.2").unwrap();

        assert_eq!(manager.config().ai.provider, "deepseek");
        assert_eq!(manager.provider("deepseek").unwrap().model_name(), Some("deepseek-coder"));
        assert!((manager.config().ai.temperature - 0.2).abs() < f32::EPSILON);

        assert!(manager.set_value("ai.provider", "nobody").is_err());
        assert!(manager.set_value("zhipu.color", "red").is_err());
        assert!(manager.set_value("provider", "zhipu").is_err());
    }

    #[test]
    fn test_init_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::with_env(dir.path().to_path_buf(), no_env).unwrap();
        assert!(manager.init().unwrap());
        assert!(!manager.init().unwrap());

        manager.set_value("zhipu.api_key", "saved").unwrap();
        manager.save().unwrap();

        let reloaded = ConfigManager::with_env(dir.path().to_path_buf(), no_env).unwrap();
        assert_eq!(reloaded.api_key_for("zhipu"), Some("saved".to_string()));
    }
}
