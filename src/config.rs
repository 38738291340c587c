use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// Extra or overriding task templates, keyed by task identifier
    #[serde(default)]
    pub tasks: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Explicit credential; takes precedence over `api_key_env`
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_base_url() -> String {
    crate::gateway::DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl ModelConfig {
    /// Credential from the config file, falling back to the environment.
    /// Blank values and `${VAR}` placeholders left unresolved count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .and_then(usable_key)
            .or_else(|| std::env::var(&self.api_key_env).ok().as_deref().and_then(usable_key))
    }
}

fn usable_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    let unresolved = key.starts_with("${") && key.ends_with('}');
    if key.is_empty() || unresolved {
        None
    } else {
        Some(key.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Filesystem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_backend")]
    pub backend: SessionBackend,
    #[serde(default = "default_session_dir")]
    pub dir: String,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
}

fn default_session_backend() -> SessionBackend {
    SessionBackend::Filesystem
}

fn default_session_dir() -> String {
    "sessions".to_string()
}

fn default_cookie_name() -> String {
    "studybuddy_session".to_string()
}

fn default_history_cap() -> usize {
    crate::history::DEFAULT_HISTORY_CAP
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = substitute_env_vars(&fs::read_to_string(path)?);

        let path_lower = path.to_lowercase();
        let config: Config = if path_lower.ends_with(".json") || path_lower.ends_with(".jsonld") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.history_cap < 2 {
            anyhow::bail!(
                "session.history_cap must hold at least one exchange (2 turns), got {}",
                self.session.history_cap
            );
        }
        if self.model.provider != "gemini" {
            anyhow::bail!("Unsupported model provider: {}", self.model.provider);
        }
        Ok(())
    }
}

/// Replace `${VAR_NAME}` with the environment value, leaving unknown variables as-is
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static regex");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            api_key: None,
            request_timeout_secs: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: default_session_backend(),
            dir: default_session_dir(),
            cookie_name: default_cookie_name(),
            history_cap: default_history_cap(),
        }
    }
}
