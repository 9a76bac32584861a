//! Bot configuration
//!
//! Layered loading: built-in defaults, then a TOML file, then `PMKB_BOT_*`
//! environment variables, then the flat deployment variables
//! (`PMKB_API_USERNAME`, `BIND_ADDR`, ...).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::{Error, Result};
use crate::logging::LogConfig;
use crate::presentation::PromptCatalog;
use crate::query::QueryPolicy;

/// Standard config file locations, tried in order when no path is given
const CONFIG_PATHS: [&str; 2] = ["pmkb-bot", "config/pmkb-bot"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    pub server: ServerConfig,
    pub pmkb: PmkbConfig,
    pub nlu: NluConfig,
    pub presentation: PresentationConfig,
    pub conversation: ConversationConfig,
    pub logging: LogConfig,
    pub prompts: PromptCatalog,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3978".to_string(),
        }
    }
}

/// Knowledge-base API access
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PmkbConfig {
    /// REST API root, e.g. `https://pmkb.weill.cornell.edu/api/`
    pub api_base_url: String,
    /// Public site used for deep links
    pub site_url: String,
    pub username: String,
    pub password: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    /// Total attempts for retryable failures (1 = no retry)
    pub max_attempts: u32,
}

impl Default for PmkbConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://pmkb.weill.cornell.edu/api/".to_string(),
            site_url: "https://pmkb.weill.cornell.edu/".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            max_attempts: 1,
        }
    }
}

impl PmkbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// Intent recognition service. Disabled while `endpoint` is empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NluConfig {
    pub endpoint: String,
    pub app_id: String,
    pub subscription_key: String,
    pub timeout_seconds: u64,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            app_id: String::new(),
            subscription_key: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl NluConfig {
    pub fn is_enabled(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Maximum cards per reply, overflow card included
    pub max_cards: usize,
    /// Maximum names listed per variant/tumor/site line
    pub list_limit: usize,
    /// Host serving the card illustrations
    pub asset_host: String,
    /// Illustration paths relative to `asset_host`
    pub card_images: Vec<String>,
    pub disclaimer_image: String,
    pub getting_started_image: String,
    pub query_policy: QueryPolicy,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            max_cards: 10,
            list_limit: 10,
            asset_host: "http://localhost:3978".to_string(),
            card_images: (1..=6)
                .map(|n| format!("/assets/cards/card{}.jpg", n))
                .collect(),
            disclaimer_image: "/assets/eipm.png".to_string(),
            getting_started_image: "/assets/pmkb.jpg".to_string(),
            query_policy: QueryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Deadline for the knowledge-base call of a single turn
    pub turn_timeout_ms: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            turn_timeout_ms: 15_000,
        }
    }
}

impl ConversationConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }
}

impl BotConfig {
    /// 設定ファイルから読み込み、環境変数で上書き
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&BotConfig::default())?);

        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        } else {
            for name in CONFIG_PATHS {
                builder = builder.add_source(config::File::with_name(name).required(false));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PMKB_BOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: BotConfig = builder.build()?.try_deserialize()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies the flat deployment variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PMKB_API_BASE_URI") {
            self.pmkb.api_base_url = url;
        }
        if let Some(username) = lookup("PMKB_API_USERNAME") {
            self.pmkb.username = username;
        }
        if let Some(password) = lookup("PMKB_API_PASSWORD") {
            self.pmkb.password = password;
        }
        if let Some(host) = lookup("PMKB_HOST") {
            self.pmkb.site_url = host;
        }
        if let Some(host) = lookup("ASSET_HOST") {
            self.presentation.asset_host = host;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = addr;
        } else if let Some(port) = lookup("PORT") {
            self.server.bind_addr = format!("0.0.0.0:{}", port);
        }
    }

    /// Checks values that would otherwise fail at request time
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("pmkb.api_base_url", &self.pmkb.api_base_url),
            ("pmkb.site_url", &self.pmkb.site_url),
            ("presentation.asset_host", &self.presentation.asset_host),
        ] {
            url::Url::parse(value)
                .map_err(|e| Error::Config(format!("{} '{}': {}", name, value, e)))?;
        }

        if self.nlu.is_enabled() {
            url::Url::parse(&self.nlu.endpoint)
                .map_err(|e| Error::Config(format!("nlu.endpoint: {}", e)))?;
            if self.nlu.app_id.trim().is_empty() {
                return Err(Error::Config("nlu.app_id is required".to_string()));
            }
        }

        if self.presentation.max_cards == 0 {
            return Err(Error::Config(
                "presentation.max_cards must be at least 1".to_string(),
            ));
        }
        if self.presentation.list_limit == 0 {
            return Err(Error::Config(
                "presentation.list_limit must be at least 1".to_string(),
            ));
        }
        if self.pmkb.timeout_seconds == 0 || self.conversation.turn_timeout_ms == 0 {
            return Err(Error::Config("timeouts must be positive".to_string()));
        }
        if self.pmkb.max_attempts == 0 {
            return Err(Error::Config("pmkb.max_attempts must be at least 1".to_string()));
        }

        Ok(())
    }

    /// サンプル設定ファイルの内容を生成
    pub fn sample_toml() -> Result<String> {
        let mut sample = BotConfig::default();
        sample.pmkb.username = "your_username".to_string();
        sample.pmkb.password = "your_password".to_string();
        sample.nlu.endpoint = "https://westus.api.cognitive.microsoft.com/".to_string();
        sample.nlu.app_id = "your_app_id".to_string();
        sample.nlu.subscription_key = "your_subscription_key".to_string();

        let body = toml::to_string_pretty(&sample)
            .map_err(|e| Error::Config(format!("failed to render sample: {}", e)))?;

        Ok(format!(
            r#"# PMKB bot configuration
#
# Save as pmkb-bot.toml. Every value can be overridden from the environment,
# e.g. PMKB_BOT_PMKB__USERNAME=alice or PMKB_BOT_PRESENTATION__MAX_CARDS=5.
#
# [pmkb]          knowledge-base API root, deep-link site, basic-auth credentials
# [nlu]           intent recognition endpoint; leave endpoint empty to disable
# [presentation]  card cap, list cap, illustrations, query policy (strict|lenient)
# [conversation]  per-turn deadline for the knowledge-base search

{}"#,
            body
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.presentation.max_cards, 10);
        assert_eq!(config.presentation.query_policy, QueryPolicy::Strict);
        assert!(!config.nlu.is_enabled());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PMKB_API_USERNAME", "alice"),
            ("PMKB_API_PASSWORD", "secret"),
            ("PMKB_HOST", "https://pmkb.example.org/"),
            ("PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let mut config = BotConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.pmkb.username, "alice");
        assert_eq!(config.pmkb.password, "secret");
        assert_eq!(config.pmkb.site_url, "https://pmkb.example.org/");
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_validate_rejects_zero_cards() {
        let mut config = BotConfig::default();
        config.presentation.max_cards = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = BotConfig::default();
        config.pmkb.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_app_id_when_nlu_enabled() {
        let mut config = BotConfig::default();
        config.nlu.endpoint = "https://nlu.example.org/".to_string();
        assert!(config.validate().is_err());
        config.nlu.app_id = "app".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sample_toml_parses_back() {
        let sample = BotConfig::sample_toml().unwrap();
        let parsed: BotConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.pmkb.username, "your_username");
        assert!(parsed.nlu.is_enabled());
    }
}
