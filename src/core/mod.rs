pub mod aggregator;
pub mod discovery;
pub mod engine;
pub mod normalize;
pub mod profiler;
pub mod prompts;
pub mod runner;
pub mod search;
pub mod synthesis;

pub use crate::domain::model::{
    AuditBundle, AuditRecord, CapabilityOutput, CompetitorSet, Domain, HomepageProfile, Outcome,
    ScanReport,
};
pub use crate::domain::ports::{
    AuditCapability, ConfigProvider, ScanPipeline, SearchProvider, Storage, TextGenerator,
    WebFetcher,
};
pub use crate::utils::error::Result;

use crate::utils::error::ScanError;
use std::future::Future;
use std::time::Duration;

/// 為外部呼叫加上時間上限，逾時轉成 TimeoutError
pub(crate) async fn within<T, F>(operation: &str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ScanError::TimeoutError {
            operation: operation.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}
