use crate::core::discovery::CompetitorDiscovery;
use crate::core::runner::AuditRunner;
use crate::domain::model::{AuditBundle, AuditRecord, CompetitorSet, Domain};
use crate::utils::error::{Result, ScanError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// 對目標與所有競爭者扇出稽核，組成 AuditBundle
pub struct AuditAggregator {
    discovery: CompetitorDiscovery,
    runner: Arc<AuditRunner>,
    concurrency: usize,
}

impl AuditAggregator {
    pub fn new(discovery: CompetitorDiscovery, runner: AuditRunner) -> Self {
        Self {
            discovery,
            runner: Arc::new(runner),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn discovery(&self) -> &CompetitorDiscovery {
        &self.discovery
    }

    /// 正規化、探索競爭者、稽核全部網域
    pub async fn run(&self, domain: &str, desired_competitors: usize) -> Result<AuditBundle> {
        let target = parse_target(domain)?;
        let competitors = self.discovery.discover(&target, desired_competitors).await;
        Ok(self.audit_all(&target, &competitors).await)
    }

    /// 每個網域必定產生一筆紀錄，即使整個稽核中斷
    pub async fn audit_all(&self, target: &Domain, competitors: &CompetitorSet) -> AuditBundle {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::new();

        for domain in std::iter::once(target).chain(competitors.iter()) {
            let runner = Arc::clone(&self.runner);
            let semaphore = Arc::clone(&semaphore);
            let task_domain = domain.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| format!("audit scheduling failed: {}", e))?;
                Ok::<_, String>(runner.audit_domain(&task_domain).await)
            });
            handles.push((domain.clone(), handle));
        }

        let mut records = BTreeMap::new();
        for (domain, handle) in handles {
            let record = match handle.await {
                Ok(Ok(record)) => record,
                Ok(Err(reason)) => AuditRecord::failed(reason),
                Err(join_error) => {
                    tracing::error!("💥 Audit task for {} aborted: {}", domain, join_error);
                    AuditRecord::failed(format!("audit of {} aborted: {}", domain, join_error))
                }
            };
            records.insert(domain, record);
        }

        AuditBundle {
            target: target.clone(),
            competitors: competitors.clone(),
            records,
        }
    }
}

pub fn parse_target(domain: &str) -> Result<Domain> {
    Domain::parse(domain).ok_or_else(|| ScanError::InvalidConfigValueError {
        field: "domain".to_string(),
        value: domain.to_string(),
        reason: "no hostname could be read from the input".to_string(),
    })
}
