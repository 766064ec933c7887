use crate::app::checks::content::{keyword_ranking, DEFAULT_KEYWORD_LIMIT};
use crate::core::prompts;
use crate::domain::model::{CapabilityOutput, Domain};
use crate::domain::ports::{AuditCapability, TextGenerator, WebFetcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// 首頁高頻詞；有 narrator 時附上每個詞的解讀
pub struct KeywordFocusAudit {
    fetcher: Arc<dyn WebFetcher>,
    narrator: Option<Arc<dyn TextGenerator>>,
    limit: usize,
}

impl KeywordFocusAudit {
    pub fn new(fetcher: Arc<dyn WebFetcher>) -> Self {
        Self {
            fetcher,
            narrator: None,
            limit: DEFAULT_KEYWORD_LIMIT,
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn TextGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }
}

#[async_trait]
impl AuditCapability for KeywordFocusAudit {
    fn name(&self) -> &str {
        "keyword_focus"
    }

    async fn audit(&self, domain: &Domain) -> Result<CapabilityOutput> {
        // 首頁抓不到就沒有可分析的內容，整個能力失敗
        let page = self.fetcher.get_ok(&domain.homepage_url()).await?;
        let ranking = keyword_ranking(&page.body, self.limit);
        let words: Vec<String> = ranking.iter().map(|(word, _)| word.clone()).collect();
        let details = json!({ "top_keywords": ranking });

        match &self.narrator {
            Some(narrator) => {
                let summary = narrator
                    .complete(&prompts::keyword_focus(domain.as_str(), &words))
                    .await?;
                Ok(CapabilityOutput::narrated(summary.trim().to_string(), details))
            }
            None => Ok(CapabilityOutput::details(details)),
        }
    }
}
