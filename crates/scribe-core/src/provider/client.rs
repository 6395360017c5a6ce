//! Switchable provider front
//!
//! Holds resolved settings for every configured provider and swaps the
//! active backend atomically on `switch_provider`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ConfigManager;
use crate::error::{Error, Result};
use crate::tools::ToolDefinition;

use super::{ChatProvider, ChatResponse, Message, OpenAiCompatProvider, ProviderKind, ProviderSettings};

struct ActiveBackend {
    kind: ProviderKind,
    model: String,
    provider: Arc<dyn ChatProvider>,
}

/// Provider client that can change backends between turns
pub struct ProviderClient {
    /// Per provider: settings, or `None` when no credential is configured
    available: HashMap<ProviderKind, Option<ProviderSettings>>,
    active: RwLock<ActiveBackend>,
}

impl ProviderClient {
    /// Resolve every built-in provider from configuration and activate the configured one
    pub fn from_config(manager: &ConfigManager) -> Result<Self> {
        let config = manager.config();
        let timeout = Duration::from_secs(config.session.request_timeout_secs);

        let available = ProviderKind::ALL
            .iter()
            .map(|kind| {
                let name = kind.as_str();
                let settings = manager.api_key_for(name).map(|api_key| {
                    let mut settings = ProviderSettings::new(*kind, api_key);
                    if let Some(entry) = manager.provider(name) {
                        if let Some(url) = entry.endpoint() {
                            settings.base_url = url.to_string();
                        }
                        if let Some(model) = entry.model_name() {
                            settings.model = model.to_string();
                        }
                    }
                    settings.max_tokens = Some(config.ai.max_tokens);
                    settings.temperature = Some(config.ai.temperature);
                    settings.timeout = timeout;
                    settings
                });
                (*kind, settings)
            })
            .collect();

        let kind: ProviderKind = manager.active_provider().parse()?;
        Self::new(available, kind)
    }

    /// Build from explicit settings; fails if `active` has no credential
    pub fn new(
        available: HashMap<ProviderKind, Option<ProviderSettings>>,
        active: ProviderKind,
    ) -> Result<Self> {
        let backend = Self::connect(&available, active)?;
        Ok(Self {
            available,
            active: RwLock::new(backend),
        })
    }

    fn connect(
        available: &HashMap<ProviderKind, Option<ProviderSettings>>,
        kind: ProviderKind,
    ) -> Result<ActiveBackend> {
        let settings = available
            .get(&kind)
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                Error::Config(format!(
                    "No API key configured for provider {} (set {} or run `config set {}.api_key <KEY>`)",
                    kind,
                    kind.api_key_env(),
                    kind
                ))
            })?;

        let model = settings.model.clone();
        let provider = OpenAiCompatProvider::new(settings.clone())?;
        Ok(ActiveBackend {
            kind,
            model,
            provider: Arc::new(provider),
        })
    }

    /// Replace the active backend; the previous one stays active on failure
    pub fn switch_provider(&self, name: &str) -> Result<()> {
        let kind: ProviderKind = name.parse()?;
        let backend = Self::connect(&self.available, kind)?;
        info!("Switched provider to {} ({})", kind, backend.model);
        *self.active.write() = backend;
        Ok(())
    }

    pub fn active_kind(&self) -> ProviderKind {
        self.active.read().kind
    }

    pub fn active_model(&self) -> String {
        self.active.read().model.clone()
    }

    /// Whether a credential exists for `kind`
    pub fn is_available(&self, kind: ProviderKind) -> bool {
        self.available.get(&kind).is_some_and(Option::is_some)
    }
}

#[async_trait]
impl ChatProvider for ProviderClient {
    fn name(&self) -> String {
        self.active_kind().as_str().to_string()
    }

    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        // Never hold the lock across the request
        let provider = self.active.read().provider.clone();
        provider.chat(messages, tools, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_zhipu() -> HashMap<ProviderKind, Option<ProviderSettings>> {
        HashMap::from([
            (ProviderKind::Zhipu, Some(ProviderSettings::new(ProviderKind::Zhipu, "key"))),
            (ProviderKind::Deepseek, None),
        ])
    }

    #[test]
    fn test_requires_credential_for_active() {
        let result = ProviderClient::new(only_zhipu(), ProviderKind::Deepseek);
        assert!(result.is_err());
    }

    #[test]
    fn test_switch_without_key_keeps_current() {
        let client = ProviderClient::new(only_zhipu(), ProviderKind::Zhipu).unwrap();
        let err = client.switch_provider("deepseek").unwrap_err();
        assert!(err.to_string().contains("No API key"));
        assert_eq!(client.active_kind(), ProviderKind::Zhipu);
        assert_eq!(client.active_model(), "glm-4");
    }

    #[test]
    fn test_switch_unknown_provider() {
        let client = ProviderClient::new(only_zhipu(), ProviderKind::Zhipu).unwrap();
        assert!(client.switch_provider("openai").is_err());
    }

    #[test]
    fn test_switch_with_key() {
        let mut available = only_zhipu();
        available.insert(
            ProviderKind::Deepseek,
            Some(ProviderSettings::new(ProviderKind::Deepseek, "sk")),
        );
        let client = ProviderClient::new(available, ProviderKind::Zhipu).unwrap();
        client.switch_provider("deepseek").unwrap();
        assert_eq!(client.name(), "deepseek");
        assert_eq!(client.active_model(), "deepseek-chat");
    }
}
