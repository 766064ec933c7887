use crate::core::normalize::canonical_host;
use crate::core::profiler::HomepageProfiler;
use crate::core::search::WebSearchAdapter;
use crate::core::{prompts, within};
use crate::domain::model::{CompetitorSet, Domain, HomepageProfile};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{Result, ScanError};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_COMPETITOR_COUNT: usize = 5;
pub const DEFAULT_SEARCH_OVERSAMPLE: usize = 8;

/// 不視為競爭者的主機片段（百科、社群、文件站、政府/教育、搜尋引擎、PDF）
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "wikipedia",
    "github",
    "reddit",
    "stack",
    "quora",
    "news.ycombinator",
    "google",
    "pdf",
    "docs.",
    "blog.",
    "wordpress",
    "medium.",
    ".gov",
    ".edu",
    "pinterest",
    "linkedin",
    "twitter",
    "facebook",
];

pub fn default_exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

/// 生成結果的最後一個非空白行
pub fn last_non_blank_line(raw: &str) -> Option<&str> {
    raw.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

/// 取最後一行並去掉包住整行的引號
pub fn extract_query(raw: &str) -> Option<String> {
    let line = last_non_blank_line(raw)?;
    let query = line.trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}

/// 依序篩選候選網址，遇到 desired 個即停止
pub fn filter_candidates<I, S>(
    target: &Domain,
    candidates: I,
    exclusions: &[String],
    desired: usize,
) -> CompetitorSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut accepted = CompetitorSet::empty();

    for candidate in candidates {
        if accepted.len() >= desired {
            break;
        }

        let host = canonical_host(candidate.as_ref());
        let Some(domain) = Domain::parse(&host) else {
            continue;
        };
        if domain == *target || accepted.contains(&domain) {
            continue;
        }
        if target.is_same_site(&domain) {
            tracing::debug!("⏭️ {} collides with target {}", domain, target);
            continue;
        }
        if let Some(token) = exclusions.iter().find(|ex| domain.as_str().contains(ex.as_str())) {
            tracing::debug!("⏭️ {} excluded by '{}'", domain, token);
            continue;
        }

        accepted.push(domain);
    }

    accepted
}

/// 從首頁資訊出發，透過生成查詢與搜尋找出競爭者
#[derive(Clone)]
pub struct CompetitorDiscovery {
    profiler: HomepageProfiler,
    generator: Arc<dyn TextGenerator>,
    search: WebSearchAdapter,
    exclusions: Vec<String>,
    oversample: usize,
    generation_timeout: Duration,
}

impl CompetitorDiscovery {
    pub fn new(
        profiler: HomepageProfiler,
        generator: Arc<dyn TextGenerator>,
        search: WebSearchAdapter,
    ) -> Self {
        Self {
            profiler,
            generator,
            search,
            exclusions: default_exclusions(),
            oversample: DEFAULT_SEARCH_OVERSAMPLE,
            generation_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn with_oversample(mut self, oversample: usize) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// 請生成服務寫出搜尋查詢
    pub async fn search_query(&self, profile: &HomepageProfile) -> Result<String> {
        let prompt = prompts::competitor_query(profile);
        let raw = within(
            "competitor query generation",
            self.generation_timeout,
            self.generator.complete(&prompt),
        )
        .await?;

        extract_query(&raw).ok_or_else(|| ScanError::discovery("query generation returned no text"))
    }

    /// 任何步驟失敗都會回傳錯誤
    pub async fn try_discover(&self, target: &Domain, desired: usize) -> Result<CompetitorSet> {
        if desired == 0 {
            return Ok(CompetitorSet::empty());
        }

        let profile = self.profiler.profile(target).await;
        if let Some(reason) = &profile.error {
            return Err(ScanError::discovery(reason.clone()));
        }

        let query = self.search_query(&profile).await?;
        tracing::info!("🔎 Competitor search query for {}: {}", target, query);

        let urls = self.search.search(&query, self.oversample.max(desired)).await?;
        tracing::debug!("🔎 Candidates: {:?}", urls);

        Ok(filter_candidates(target, urls, &self.exclusions, desired))
    }

    /// 探索失敗時回傳空集合，只稽核目標本身
    pub async fn discover(&self, target: &Domain, desired: usize) -> CompetitorSet {
        match self.try_discover(target, desired).await {
            Ok(competitors) => {
                tracing::info!(
                    "🏁 Discovered {} competitors for {}: {:?}",
                    competitors.len(),
                    target,
                    competitors.hosts()
                );
                competitors
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Competitor discovery failed for {}: {} - auditing the target alone",
                    target,
                    e
                );
                CompetitorSet::empty()
            }
        }
    }
}
