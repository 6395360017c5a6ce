//! Built-in provider catalog

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Supported chat-completion backends. Both speak the OpenAI wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Zhipu,
    Deepseek,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Zhipu, ProviderKind::Deepseek];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Zhipu => "zhipu",
            ProviderKind::Deepseek => "deepseek",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Zhipu => "Zhipu GLM",
            ProviderKind::Deepseek => "DeepSeek",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Zhipu => "https://open.bigmodel.cn/api/paas/v4",
            ProviderKind::Deepseek => "https://api.deepseek.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Zhipu => "glm-4",
            ProviderKind::Deepseek => "deepseek-chat",
        }
    }

    pub fn known_models(&self) -> &'static [&'static str] {
        match self {
            ProviderKind::Zhipu => &["glm-4", "glm-4-flash", "glm-4-plus"],
            ProviderKind::Deepseek => &["deepseek-chat", "deepseek-coder"],
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Zhipu => "ZHIPU_API_KEY",
            ProviderKind::Deepseek => "DEEPSEEK_API_KEY",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zhipu" | "glm" => Ok(ProviderKind::Zhipu),
            "deepseek" => Ok(ProviderKind::Deepseek),
            other => Err(Error::Config(format!(
                "Unsupported provider '{}' (expected zhipu or deepseek)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!("zhipu".parse::<ProviderKind>().unwrap(), ProviderKind::Zhipu);
        assert_eq!(" DeepSeek ".parse::<ProviderKind>().unwrap(), ProviderKind::Deepseek);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_defaults_are_known_models() {
        for kind in ProviderKind::ALL {
            assert!(kind.known_models().contains(&kind.default_model()));
        }
    }
}
