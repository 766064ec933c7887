use crate::domain::model::{AuditBundle, CapabilityOutput, CompetitorSet, Domain, FetchResponse};
use crate::utils::error::{Result, ScanError};
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 掃描管線需要的數值與清單設定
pub trait ConfigProvider: Send + Sync {
    fn competitor_count(&self) -> usize;
    fn search_oversample(&self) -> usize;
    fn exclusions(&self) -> &[String];
    fn keyword_cap(&self) -> usize;
    fn narrate_audits(&self) -> bool;
    fn concurrency(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn capability_timeout(&self) -> Duration;
    fn generation_timeout(&self) -> Duration;
}

/// 網頁抓取
#[async_trait]
pub trait WebFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchResponse>;

    /// 非 2xx 視為失敗
    async fn get_ok(&self, url: &str) -> Result<FetchResponse> {
        let response = self.get(url).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ScanError::HttpStatusError {
                url: response.url,
                status: response.status,
            })
        }
    }
}

/// 搜尋服務，依排名回傳結果連結
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn organic_results(&self, query: &str, count: usize) -> Result<Vec<String>>;
}

/// 文字生成
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// 技術、內容、UX 或關鍵字焦點等稽核能力
#[async_trait]
pub trait AuditCapability: Send + Sync {
    fn name(&self) -> &str;
    async fn audit(&self, domain: &Domain) -> Result<CapabilityOutput>;
}

/// 掃描管線的三個階段
#[async_trait]
pub trait ScanPipeline: Send + Sync {
    async fn discover(&self, target: &Domain) -> Result<CompetitorSet>;
    async fn audit(&self, target: &Domain, competitors: &CompetitorSet) -> Result<AuditBundle>;
    async fn synthesize(&self, bundle: &AuditBundle) -> Result<String>;
}
