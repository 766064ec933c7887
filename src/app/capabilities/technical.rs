use super::narrate;
use crate::app::checks::{finding, technical};
use crate::app::checks::technical::PageSpeedInsights;
use crate::core::prompts;
use crate::domain::model::{CapabilityOutput, Domain};
use crate::domain::ports::{AuditCapability, TextGenerator, WebFetcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// 首頁以外再檢查的站內連結數
pub const DEFAULT_LINK_SAMPLE: usize = 1;

/// robots、sitemap、失效連結、標頭、轉址、可爬性與效能
pub struct TechnicalAudit {
    fetcher: Arc<dyn WebFetcher>,
    pagespeed: PageSpeedInsights,
    narrator: Option<Arc<dyn TextGenerator>>,
    link_sample: usize,
}

impl TechnicalAudit {
    pub fn new(fetcher: Arc<dyn WebFetcher>, pagespeed: PageSpeedInsights) -> Self {
        Self {
            fetcher,
            pagespeed,
            narrator: None,
            link_sample: DEFAULT_LINK_SAMPLE,
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn TextGenerator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn with_link_sample(mut self, link_sample: usize) -> Self {
        self.link_sample = link_sample;
        self
    }
}

#[async_trait]
impl AuditCapability for TechnicalAudit {
    fn name(&self) -> &str {
        "technical"
    }

    async fn audit(&self, domain: &Domain) -> Result<CapabilityOutput> {
        let fetcher = self.fetcher.as_ref();

        // crawlability 需要 robots 的結果，先取
        let robots = finding("robots_txt", technical::robots_txt(fetcher, domain).await);

        let (sitemap, broken_links, headers, redirects, crawlability, performance) = tokio::join!(
            technical::sitemap(fetcher, domain),
            technical::broken_links(fetcher, domain, self.link_sample),
            technical::http_headers(fetcher, domain),
            technical::redirects(fetcher, domain),
            technical::crawlability(fetcher, domain, &robots),
            self.pagespeed.run(fetcher, domain),
        );

        let details = json!({
            "robots_txt": robots,
            "sitemap": finding("sitemap", sitemap),
            "broken_links": finding("broken_links", broken_links),
            "http_headers": finding("http_headers", headers),
            "redirects": finding("redirects", redirects),
            "crawlability": finding("crawlability", crawlability),
            "performance": finding("performance", performance),
        });

        tracing::debug!("🔧 technical checks finished for {}", domain);
        narrate(self.narrator.as_deref(), prompts::TECHNICAL_ROLE, domain, details).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::capabilities::testing::{PageFetcher, RecordingGenerator, HOMEPAGE};

    fn domain() -> Domain {
        Domain::parse("acme.test").unwrap()
    }

    fn site() -> PageFetcher {
        PageFetcher::default()
            .with_page("https://acme.test", 200, HOMEPAGE)
            .with_page("https://acme.test/robots.txt", 200, "User-agent: *\nDisallow: /\n")
            .with_page("https://acme.test/shop", 500, "")
    }

    #[tokio::test]
    async fn test_checks_fill_every_slot() {
        let audit = TechnicalAudit::new(
            Arc::new(site()),
            PageSpeedInsights::new(None).with_base_url("https://psi.invalid/run"),
        );

        let output = audit.audit(&domain()).await.unwrap();
        let details = output.details;

        assert!(output.summary.is_none());
        assert_eq!(details["robots_txt"]["rules_count"], 2);
        assert_eq!(details["crawlability"]["robots_allow_homepage"], false);
        assert_eq!(details["sitemap"]["sitemap"], "Not found");
        assert_eq!(details["broken_links"]["pages_checked"], 2);
        assert_eq!(details["broken_links"]["broken_links_count"], 1);
        assert_eq!(details["http_headers"]["status"], 200);
        // PSI 未登錄，回 404 後只佔自己的欄位
        assert!(details["performance"]["error"].is_string());
    }

    #[tokio::test]
    async fn test_unreachable_site_still_produces_findings() {
        let audit = TechnicalAudit::new(
            Arc::new(PageFetcher::unreachable()),
            PageSpeedInsights::new(None),
        );

        let output = audit.audit(&domain()).await.unwrap();
        for slot in ["robots_txt", "sitemap", "broken_links", "http_headers", "crawlability"] {
            assert!(
                output.details[slot].is_object(),
                "slot {} should be present",
                slot
            );
        }
        assert!(output.details["broken_links"]["error"]
            .as_str()
            .unwrap()
            .contains("timed out"));
    }

    #[tokio::test]
    async fn test_narration_becomes_summary() {
        let narrator = Arc::new(RecordingGenerator::replying("  ## Technical SEO\nAll good.  "));
        let audit = TechnicalAudit::new(Arc::new(site()), PageSpeedInsights::new(None))
            .with_narrator(narrator.clone());

        let output = audit.audit(&domain()).await.unwrap();

        assert_eq!(output.summary.as_deref(), Some("## Technical SEO\nAll good."));
        let sent = narrator.prompts();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with(prompts::TECHNICAL_ROLE));
        assert!(sent[0].contains("acme.test"));
    }

    #[tokio::test]
    async fn test_narration_failure_fails_the_capability() {
        let audit = TechnicalAudit::new(Arc::new(site()), PageSpeedInsights::new(None))
            .with_narrator(Arc::new(RecordingGenerator::failing("quota exceeded")));

        let err = audit.audit(&domain()).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
