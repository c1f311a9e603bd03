//! Runtime configuration read from the environment.
//!
//! Values come from the process environment, then a `.env` file, then the
//! bundled `assets/config.env` defaults. Earlier sources always win.

use std::time::Duration;

/// Non-secret defaults shipped with the binary
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown provider '{0}' (expected openai, anthropic or ollama)")]
    UnknownProvider(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    OpenAI,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }

    fn credential_var(self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama => None,
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::Ollama => "llama3.1:latest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionConfig {
    pub provider: ProviderKind,
    /// Session credential. May be absent; requests then fail as unauthorized.
    pub api_key: Option<String>,
    pub model: String,
    /// Only used by the OpenAI-compatible provider.
    pub base_url: String,
    /// Upper bound on a single completion call.
    pub timeout: Duration,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            model: ProviderKind::default().default_model().to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CompanionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = match get("COMPANION_PROVIDER") {
            Some(raw) => ProviderKind::parse(&raw)?,
            None => ProviderKind::default(),
        };

        let api_key = provider.credential_var().and_then(|var| get(var));
        let model = get("COMPANION_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let base_url =
            get("COMPANION_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        let timeout = match get("COMPANION_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "COMPANION_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            timeout,
        })
    }
}

/// Load `.env` when present, then fill remaining gaps from the bundled defaults.
///
/// Writes to the process environment, so call it from `main` before any
/// other thread exists. Inside an async runtime it leaves the environment
/// untouched and logs a warning.
pub fn load_dotenv() {
    if tokio::runtime::Handle::try_current().is_ok() {
        tracing::warn!("load_dotenv called inside a running runtime; environment left unchanged");
        return;
    }

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!(error = %err, "failed to read .env file");
        }
    }

    for (key, value) in missing_bundled_defaults(|key| std::env::var(key).is_ok()) {
        // SAFETY: no runtime is active and `main` has not spawned threads yet
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// Bundled defaults whose key is not already set.
fn missing_bundled_defaults(
    is_set: impl Fn(&str) -> bool,
) -> Vec<(&'static str, &'static str)> {
    parse_env_lines(BUNDLED_CONFIG)
        .filter(|(key, _)| !is_set(*key))
        .collect()
}

fn parse_env_lines(source: &str) -> impl Iterator<Item = (&str, &str)> {
    source.lines().filter_map(|line| {
        let line = line.trim();
        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (key, value) = line.split_once('=')?;
        Some((key.trim(), value.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_openai_without_credential() {
        let config = CompanionConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAI);
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config, CompanionConfig::default());
    }

    #[test]
    fn reads_provider_specific_credential() {
        let config = CompanionConfig::from_lookup(lookup(&[
            ("COMPANION_PROVIDER", "Anthropic"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ]))
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert_eq!(config.api_key.as_deref(), Some("sk-ant"));
        assert_eq!(config.model, "claude-3-5-sonnet-20241022");
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let config = CompanionConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = CompanionConfig::from_lookup(lookup(&[("COMPANION_PROVIDER", "palm")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownProvider("palm".to_string()));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = CompanionConfig::from_lookup(lookup(&[("COMPANION_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "COMPANION_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn bundled_defaults_never_override_existing_values() {
        let all = missing_bundled_defaults(|_| false);
        assert!(all.iter().any(|(key, _)| *key == "COMPANION_PROVIDER"));

        let rest = missing_bundled_defaults(|key| key == "COMPANION_PROVIDER");
        assert_eq!(rest.len(), all.len() - 1);
        assert!(!rest.iter().any(|(key, _)| *key == "COMPANION_PROVIDER"));

        assert!(missing_bundled_defaults(|_| true).is_empty());
    }

    #[tokio::test]
    async fn load_inside_runtime_leaves_environment_alone() {
        let unset: Vec<_> = missing_bundled_defaults(|key| std::env::var(key).is_ok())
            .into_iter()
            .map(|(key, _)| key)
            .collect();

        load_dotenv();

        for key in unset {
            assert!(std::env::var(key).is_err(), "{key} was written");
        }
    }

    #[test]
    fn bundled_config_has_no_secrets() {
        let keys: Vec<_> = parse_env_lines(BUNDLED_CONFIG).map(|(k, _)| k).collect();
        assert!(keys.contains(&"COMPANION_PROVIDER"));
        assert!(!keys.iter().any(|k| k.ends_with("_API_KEY")));
    }
}
