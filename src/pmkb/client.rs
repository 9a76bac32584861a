use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::models::{Gene, GenesResponse, Interpretation, SearchResponse};
use super::KnowledgeBaseGateway;
use crate::config::PmkbConfig;
use crate::error::{Error, Result};

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// HTTP client for the PMKB REST API
#[derive(Debug)]
pub struct PmkbClient {
    client: Client,
    base_url: Url,
    username: String,
    password: SecretString,
    max_attempts: u32,
}

impl PmkbClient {
    pub fn new(config: &PmkbConfig) -> Result<Self> {
        // タイムアウト設定付きのHTTPクライアントを作成
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("pmkb-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Url::join drops the last segment unless the base ends with a slash
        let mut base = config.api_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            client,
            base_url: Url::parse(&base)?,
            username: config.username.clone(),
            password: SecretString::new(config.password.clone().into_boxed_str()),
            max_attempts: config.max_attempts.max(1),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self.client.get(url);
        if self.username.is_empty() {
            request
        } else {
            request.basic_auth(&self.username, Some(self.password.expose_secret()))
        }
    }

    /// Sends the request, retrying 5xx/429 and transport failures up to `max_attempts`
    async fn execute<T>(&self, request_builder: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 1;
        loop {
            let request = request_builder.try_clone().ok_or_else(|| {
                Error::InvalidInput("request cannot be cloned for retry".to_string())
            })?;

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::OK {
                        let body = response.text().await?;
                        return Ok(serde_json::from_str(&body)?);
                    }

                    let body = response.text().await.unwrap_or_default();
                    let retryable =
                        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
                    if !retryable || attempt >= self.max_attempts {
                        return Err(Error::Gateway {
                            status: status.as_u16(),
                            body,
                        });
                    }
                    warn!("PMKB returned {} on attempt {}, retrying", status, attempt);
                }
                Err(e) => {
                    if attempt >= self.max_attempts {
                        return Err(Error::Http(e));
                    }
                    warn!("PMKB request failed on attempt {}: {}", attempt, e);
                }
            }

            tokio::time::sleep(RETRY_DELAY * attempt).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl KnowledgeBaseGateway for PmkbClient {
    async fn search_interpretations(&self, query: &str) -> Result<Vec<Interpretation>> {
        let url = self.endpoint("search")?;
        info!(query, "Searching PMKB interpretations");

        let response: SearchResponse = self.execute(self.get(url).query(&[("query", query)])).await?;
        debug!(
            count = response.results.interpretations.len(),
            "PMKB search completed"
        );
        Ok(response.results.interpretations)
    }

    async fn get_genes(&self) -> Result<Vec<Gene>> {
        let url = self.endpoint("genes")?;
        info!("Fetching PMKB genes");

        let response: GenesResponse = self.execute(self.get(url)).await?;
        Ok(response.genes)
    }

    async fn is_alive(&self) -> bool {
        let url = match self.endpoint("health_check") {
            Ok(url) => url,
            Err(e) => {
                warn!("Invalid health check URL: {}", e);
                return false;
            }
        };

        match self.get(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!("PMKB health check failed: {}", e);
                false
            }
        }
    }
}
