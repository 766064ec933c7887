use crate::domain::ports::SearchProvider;
use crate::utils::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com";

/// SerpAPI Google 搜尋
pub struct SerpApiSearch {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    organic_results: Option<Vec<OrganicResult>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: Option<String>,
}

impl SerpApiSearch {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_SERPAPI_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    async fn organic_results(&self, query: &str, count: usize) -> Result<Vec<String>> {
        let endpoint = format!("{}/search.json", self.base_url.trim_end_matches('/'));
        let num = count.to_string();

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ScanError::search(format!("request to SerpAPI failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::search(format!("SerpAPI returned {}: {}", status, body)));
        }

        let parsed: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| ScanError::search(format!("malformed SerpAPI response: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(ScanError::search(error));
        }

        let results = parsed
            .organic_results
            .ok_or_else(|| ScanError::search("malformed SerpAPI response: no organic_results"))?;

        Ok(results.into_iter().filter_map(|r| r.link).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> SerpApiSearch {
        SerpApiSearch::new("test-key".to_string(), Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.base_url())
    }

    #[tokio::test]
    async fn test_organic_links_in_rank_order() {
        let server = MockServer::start_async().await;
        let search = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search.json")
                    .query_param("engine", "google")
                    .query_param("q", "coffee roasters")
                    .query_param("api_key", "test-key")
                    .query_param("num", "8");
                then.status(200).json_body(json!({
                    "organic_results": [
                        {"position": 1, "link": "https://roaster-one.com"},
                        {"position": 2},
                        {"position": 3, "link": "https://roaster-two.com/shop"}
                    ]
                }));
            })
            .await;

        let links = client(&server).organic_results("coffee roasters", 8).await.unwrap();

        search.assert_async().await;
        assert_eq!(links, vec!["https://roaster-one.com", "https://roaster-two.com/shop"]);
    }

    #[tokio::test]
    async fn test_missing_results_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search.json");
                then.status(200).json_body(json!({"search_metadata": {}}));
            })
            .await;

        let err = client(&server).organic_results("q", 5).await.unwrap_err();
        assert!(matches!(err, ScanError::SearchError { .. }));
        assert!(err.to_string().contains("no organic_results"));
    }

    #[tokio::test]
    async fn test_provider_error_and_malformed_body_fail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search.json").query_param("q", "quota");
                then.status(200).json_body(json!({"error": "Your account has run out of searches."}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search.json").query_param("q", "garbage");
                then.status(200).body("<html>not json</html>");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search.json").query_param("q", "down");
                then.status(503);
            })
            .await;

        let search = client(&server);
        for query in ["quota", "garbage", "down"] {
            let err = search.organic_results(query, 5).await.unwrap_err();
            assert!(matches!(err, ScanError::SearchError { .. }), "{}: {}", query, err);
        }
    }
}
