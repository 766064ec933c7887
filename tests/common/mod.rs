#![allow(dead_code)]

use async_trait::async_trait;
use seoscan::app::checks::technical::PageSpeedInsights;
use seoscan::app::pipelines::{PipelinePorts, SeoAuditPipeline};
use seoscan::core::{CapabilityOutput, SearchProvider, TextGenerator, WebFetcher};
use seoscan::domain::model::FetchResponse;
use seoscan::domain::ports::AuditCapability;
use seoscan::{Domain, Result, ScanConfig, ScanError};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const EXAMPLE_HOMEPAGE: &str = r#"<!doctype html>
<html><head>
    <title>Example Domain</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
</head><body><div>
    <h1>Example Domain</h1>
    <p>This domain is for use in illustrative examples in documents.</p>
</div></body></html>"#;

/// 依網址回傳固定頁面；未登錄者 404
#[derive(Default)]
pub struct FakeWeb {
    pages: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl FakeWeb {
    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages
            .insert(url.trim_end_matches('/').to_string(), (status, body.to_string()));
        self
    }

    pub fn requested(&self, url: &str) -> bool {
        self.requests.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl WebFetcher for FakeWeb {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        let (status, body) = self
            .pages
            .get(url.trim_end_matches('/'))
            .cloned()
            .unwrap_or((404, "not found".to_string()));
        Ok(FetchResponse {
            url: url.to_string(),
            status,
            headers: BTreeMap::new(),
            body,
        })
    }
}

/// 固定的搜尋結果，並記錄查詢
pub struct FakeSearch {
    links: std::result::Result<Vec<String>, String>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn returning(links: &[&str]) -> Self {
        Self {
            links: Ok(links.iter().map(|l| l.to_string()).collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            links: Err(reason.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn organic_results(&self, query: &str, count: usize) -> Result<Vec<String>> {
        self.queries.lock().unwrap().push((query.to_string(), count));
        self.links.clone().map_err(ScanError::search)
    }
}

/// 回傳固定文字並記錄呼叫次數與 prompt
pub struct FakeGenerator {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(ScanError::generation)
    }
}

/// 一律失敗或 panic 的稽核能力
pub struct BrokenCapability {
    pub name: &'static str,
    pub panics: bool,
}

#[async_trait]
impl AuditCapability for BrokenCapability {
    fn name(&self) -> &str {
        self.name
    }

    async fn audit(&self, domain: &Domain) -> Result<CapabilityOutput> {
        if self.panics {
            panic!("{} checker crashed on {}", self.name, domain);
        }
        Err(ScanError::HttpStatusError {
            url: domain.homepage_url(),
            status: 503,
        })
    }
}

pub struct Harness {
    pub web: Arc<FakeWeb>,
    pub search: Arc<FakeSearch>,
    pub query: Arc<FakeGenerator>,
    pub narration: Arc<FakeGenerator>,
    pub synthesis: Arc<FakeGenerator>,
}

impl Harness {
    pub fn new(web: FakeWeb, search: FakeSearch) -> Self {
        Self {
            web: Arc::new(web),
            search: Arc::new(search),
            query: Arc::new(FakeGenerator::replying("<think>hmm</think>\n\"example domain services\"")),
            narration: Arc::new(FakeGenerator::replying("Narrated findings.")),
            synthesis: Arc::new(FakeGenerator::replying("# SEO Competitor Report\n\nAll findings.")),
        }
    }

    pub fn with_query(mut self, query: FakeGenerator) -> Self {
        self.query = Arc::new(query);
        self
    }

    pub fn with_synthesis(mut self, synthesis: FakeGenerator) -> Self {
        self.synthesis = Arc::new(synthesis);
        self
    }

    pub fn ports(&self) -> PipelinePorts {
        PipelinePorts {
            fetcher: self.web.clone(),
            search: self.search.clone(),
            query_generator: self.query.clone(),
            narration_generator: Some(self.narration.clone()),
            synthesis_generator: self.synthesis.clone(),
            pagespeed: PageSpeedInsights::new(None).with_base_url("https://psi.test/run"),
        }
    }

    pub fn pipeline(&self, config: ScanConfig) -> SeoAuditPipeline<ScanConfig> {
        SeoAuditPipeline::from_ports(config, self.ports())
    }
}

/// 不產生說明文字的預設設定
pub fn quiet_config() -> ScanConfig {
    let mut config = ScanConfig::default();
    config.scan.narrate_audits = false;
    config
}

pub fn example_web() -> FakeWeb {
    FakeWeb::default().page("https://example.com", 200, EXAMPLE_HOMEPAGE)
}
