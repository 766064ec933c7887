use crate::domain::model::FetchResponse;
use crate::domain::ports::WebFetcher;
use crate::utils::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; SeoScanBot/0.1; +https://github.com/seoscan)";

/// 基於 reqwest 的網頁抓取，每個請求都有時間上限
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl WebFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        tracing::debug!("🌐 GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScanError::TimeoutError {
                    operation: format!("GET {}", url),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                ScanError::HttpError(e)
            }
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.text().await?;

        tracing::debug!("🌐 {} -> {} ({} bytes)", url, status, body.len());
        Ok(FetchResponse {
            url: final_url,
            status,
            headers,
            body,
        })
    }
}
