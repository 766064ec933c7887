use super::narrate;
use crate::app::checks::content::{self, DEFAULT_KEYWORD_LIMIT};
use crate::app::checks::finding;
use crate::core::prompts;
use crate::domain::model::{CapabilityOutput, Domain};
use crate::domain::ports::{AuditCapability, TextGenerator, WebFetcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// 結構化資料與首頁關鍵字
pub struct ContentAudit {
    fetcher: Arc<dyn WebFetcher>,
    narrator: Option<Arc<dyn TextGenerator>>,
    keyword_limit: usize,
}

impl ContentAudit {
    pub fn new(fetcher: Arc<dyn WebFetcher>) -> Self {
        Self {
            fetcher,
            narrator: None,
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn TextGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    async fn findings(&self, domain: &Domain) -> Value {
        let page = match self.fetcher.get_ok(&domain.homepage_url()).await {
            Ok(page) => page,
            Err(e) => {
                let failed = json!({ "error": e.to_string() });
                return json!({ "structured_data": failed.clone(), "keywords": failed });
            }
        };

        let mut details = json!({
            "structured_data": content::structured_data(&page.body),
            "keywords": content::keywords(&page.body, self.keyword_limit),
        });
        if let Some(narrator) = &self.narrator {
            details["llm_keywords"] = finding(
                "llm_keywords",
                content::llm_keywords(narrator.as_ref(), &page.body).await,
            );
        }
        details
    }
}

#[async_trait]
impl AuditCapability for ContentAudit {
    fn name(&self) -> &str {
        "content"
    }

    async fn audit(&self, domain: &Domain) -> Result<CapabilityOutput> {
        let details = self.findings(domain).await;
        narrate(self.narrator.as_deref(), prompts::CONTENT_ROLE, domain, details).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::capabilities::testing::{PageFetcher, RecordingGenerator, HOMEPAGE};

    fn domain() -> Domain {
        Domain::parse("acme.test").unwrap()
    }

    #[tokio::test]
    async fn test_content_findings_without_narrator() {
        let fetcher = PageFetcher::default().with_page("https://acme.test", 200, HOMEPAGE);
        let output = ContentAudit::new(Arc::new(fetcher)).audit(&domain()).await.unwrap();

        assert!(output.summary.is_none());
        assert_eq!(output.details["structured_data"]["jsonld_blocks"], 1);
        assert_eq!(output.details["keywords"]["top_keywords"][0], json!(["coffee", 4]));
        assert!(output.details.get("llm_keywords").is_none());
    }

    #[tokio::test]
    async fn test_homepage_failure_lands_in_each_slot() {
        let output = ContentAudit::new(Arc::new(PageFetcher::default()))
            .audit(&domain())
            .await
            .unwrap();

        assert!(output.details["structured_data"]["error"]
            .as_str()
            .unwrap()
            .contains("404"));
        assert_eq!(output.details["keywords"], output.details["structured_data"]);
    }

    #[tokio::test]
    async fn test_narrator_also_extracts_keywords() {
        let fetcher = PageFetcher::default().with_page("https://acme.test", 200, HOMEPAGE);
        let narrator = Arc::new(RecordingGenerator::replying("coffee, roasting, beans"));
        let output = ContentAudit::new(Arc::new(fetcher))
            .with_narrator(narrator.clone())
            .audit(&domain())
            .await
            .unwrap();

        assert_eq!(
            output.details["llm_keywords"]["llm_keywords"],
            json!(["coffee", "roasting", "beans"])
        );
        // 關鍵字萃取一次、整體說明一次
        assert_eq!(narrator.prompts().len(), 2);
        assert!(output.summary.is_some());
    }
}
