use crate::core::normalize::canonical_host;
use crate::domain::ports::SearchProvider;
use crate::utils::error::{Result, ScanError};
use std::collections::HashSet;
use std::sync::Arc;

/// 搜尋轉接層：每個主機只保留排名最前的一筆
#[derive(Clone)]
pub struct WebSearchAdapter {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchAdapter {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    pub async fn search(&self, query: &str, top_n: usize) -> Result<Vec<String>> {
        if top_n == 0 {
            return Ok(Vec::new());
        }

        tracing::debug!("🔎 Searching for '{}' (top {})", query, top_n);
        let links = self
            .provider
            .organic_results(query, top_n)
            .await
            .map_err(|e| match e {
                search @ ScanError::SearchError { .. } => search,
                other => ScanError::search(other.to_string()),
            })?;

        let urls = collapse_by_host(links, top_n);
        tracing::debug!("🔎 {} unique hosts in search results", urls.len());
        Ok(urls)
    }
}

/// 依出現順序保留每個正規化主機的第一個連結
pub fn collapse_by_host(links: Vec<String>, top_n: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for link in links {
        if urls.len() == top_n {
            break;
        }
        let host = canonical_host(&link);
        if link.trim().is_empty() || host.is_empty() || !seen.insert(host) {
            continue;
        }
        urls.push(link);
    }

    urls
}
