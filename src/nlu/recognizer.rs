use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use super::luis::NluResult;
use crate::config::NluConfig;
use crate::error::{Error, Result};

/// Intent recognizer trait
#[async_trait]
pub trait IntentRecognizer: Send + Sync {
    /// Recognizes the intent and entities of one utterance
    async fn recognize(&self, utterance: &str) -> Result<NluResult>;
}

/// Client for a LUIS v2 prediction endpoint
#[derive(Debug)]
pub struct LuisRecognizer {
    client: Client,
    endpoint: Url,
    subscription_key: SecretString,
}

impl LuisRecognizer {
    pub fn new(config: &NluConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pmkb-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base = config.endpoint.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)?.join(&format!(
            "luis/v2.0/apps/{}",
            urlencoding::encode(config.app_id.trim())
        ))?;

        Ok(Self {
            client,
            endpoint,
            subscription_key: SecretString::new(config.subscription_key.clone().into_boxed_str()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl IntentRecognizer for LuisRecognizer {
    async fn recognize(&self, utterance: &str) -> Result<NluResult> {
        debug!(utterance, "Sending utterance to NLU service");

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("subscription-key", self.subscription_key.expose_secret()),
                ("verbose", "true"),
                ("q", utterance),
            ])
            .send()
            .await
            .map_err(|e| Error::Recognizer(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("NLU service returned {}: {}", status, body);
            return Err(Error::Recognizer(format!("status {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Recognizer(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| Error::Recognizer(format!("invalid response: {}", e)))
    }
}

/// Stand-in used when no NLU endpoint is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRecognizer;

#[async_trait]
impl IntentRecognizer for DisabledRecognizer {
    async fn recognize(&self, _utterance: &str) -> Result<NluResult> {
        Err(Error::Recognizer("NLU service is not configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_layout() {
        let config = NluConfig {
            endpoint: "https://westus.api.cognitive.microsoft.com".to_string(),
            app_id: "abc-123".to_string(),
            subscription_key: "key".to_string(),
            timeout_seconds: 5,
        };
        let recognizer = LuisRecognizer::new(&config).unwrap();
        assert_eq!(
            recognizer.endpoint().as_str(),
            "https://westus.api.cognitive.microsoft.com/luis/v2.0/apps/abc-123"
        );
    }

    #[tokio::test]
    async fn test_disabled_recognizer_fails() {
        let result = DisabledRecognizer.recognize("EGFR").await;
        assert!(matches!(result, Err(Error::Recognizer(_))));
    }
}
