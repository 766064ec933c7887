use crate::adapters::html::HtmlDocument;
use crate::domain::model::{Domain, HomepageProfile};
use crate::domain::ports::WebFetcher;
use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

pub const DEFAULT_KEYWORD_CAP: usize = 6;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w{4,}\b").expect("word pattern"));

/// 小寫後長度 >= 4 的詞，保留原順序（可重複）
pub fn word_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// 去重（先出現者優先）後取前 cap 個
pub fn distinct_keywords(text: &str, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    word_tokens(text)
        .into_iter()
        .filter(|w| seen.insert(w.clone()))
        .take(cap)
        .collect()
}

pub fn profile_from_html(markup: &str, keyword_cap: usize) -> HomepageProfile {
    let doc = HtmlDocument::parse(markup);
    let title = doc.title();
    let description = doc.meta_content("description").unwrap_or_default();
    let keywords = distinct_keywords(&format!("{} {}", title, description), keyword_cap);

    HomepageProfile {
        title,
        description,
        keywords,
        error: None,
    }
}

/// 抓取首頁並擷取 title、description 與關鍵字
#[derive(Clone)]
pub struct HomepageProfiler {
    fetcher: Arc<dyn WebFetcher>,
    keyword_cap: usize,
}

impl HomepageProfiler {
    pub fn new(fetcher: Arc<dyn WebFetcher>) -> Self {
        Self {
            fetcher,
            keyword_cap: DEFAULT_KEYWORD_CAP,
        }
    }

    pub fn with_keyword_cap(mut self, keyword_cap: usize) -> Self {
        self.keyword_cap = keyword_cap;
        self
    }

    pub async fn profile(&self, domain: &Domain) -> HomepageProfile {
        let url = domain.homepage_url();
        tracing::debug!("🏠 Fetching homepage {}", url);

        match self.fetcher.get_ok(&url).await {
            Ok(response) => {
                let profile = profile_from_html(&response.body, self.keyword_cap);
                tracing::debug!(
                    "🏠 {}: title={:?} description={:?} keywords={:?}",
                    domain,
                    profile.title,
                    profile.description,
                    profile.keywords
                );
                profile
            }
            Err(e) => {
                tracing::warn!("⚠️ Homepage fetch failed for {}: {}", domain, e);
                HomepageProfile::failed(format!("homepage fetch failed for {}: {}", domain, e))
            }
        }
    }
}
