use crate::core::within;
use crate::domain::model::{AuditRecord, CapabilityOutput, Domain, Outcome};
use crate::domain::ports::AuditCapability;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(180);

/// 對單一網域執行四個互相獨立的稽核能力
pub struct AuditRunner {
    technical: Arc<dyn AuditCapability>,
    content: Arc<dyn AuditCapability>,
    ux: Arc<dyn AuditCapability>,
    keyword_focus: Arc<dyn AuditCapability>,
    capability_timeout: Duration,
}

impl AuditRunner {
    pub fn new(
        technical: Arc<dyn AuditCapability>,
        content: Arc<dyn AuditCapability>,
        ux: Arc<dyn AuditCapability>,
        keyword_focus: Arc<dyn AuditCapability>,
    ) -> Self {
        Self {
            technical,
            content,
            ux,
            keyword_focus,
            capability_timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    pub fn with_capability_timeout(mut self, timeout: Duration) -> Self {
        self.capability_timeout = timeout;
        self
    }

    /// 任一能力失敗只影響自己的欄位
    pub async fn audit_domain(&self, domain: &Domain) -> AuditRecord {
        tracing::info!("🔍 Auditing {} ...", domain);

        let (technical, content, ux, keyword_focus) = tokio::join!(
            self.invoke(self.technical.as_ref(), domain),
            self.invoke(self.content.as_ref(), domain),
            self.invoke(self.ux.as_ref(), domain),
            self.invoke(self.keyword_focus.as_ref(), domain),
        );

        let record = AuditRecord {
            technical,
            content,
            ux,
            keyword_focus,
        };
        tracing::info!(
            "✅ Audit for {} complete ({} of 4 capabilities failed)",
            domain,
            record.failure_count()
        );
        record
    }

    async fn invoke(&self, capability: &dyn AuditCapability, domain: &Domain) -> Outcome {
        let operation = format!("{} audit of {}", capability.name(), domain);
        let call = within(&operation, self.capability_timeout, capability.audit(domain));

        let result = match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result.map(CapabilityOutput::into_text),
            Err(_) => {
                tracing::error!("💥 {} panicked", operation);
                return Outcome::error(format!("{} panicked", operation));
            }
        };

        if let Err(e) = &result {
            tracing::warn!("⚠️ {} failed: {}", operation, e);
        }
        Outcome::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{Result, ScanError};
    use async_trait::async_trait;
    use serde_json::json;

    enum Behaviour {
        Summary(&'static str),
        Details,
        Fail,
        Hang,
        Panic,
    }

    struct Scripted {
        name: &'static str,
        behaviour: Behaviour,
    }

    fn scripted(name: &'static str, behaviour: Behaviour) -> Arc<dyn AuditCapability> {
        Arc::new(Scripted { name, behaviour })
    }

    #[async_trait]
    impl AuditCapability for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn audit(&self, domain: &Domain) -> Result<CapabilityOutput> {
            match self.behaviour {
                Behaviour::Summary(text) => {
                    Ok(CapabilityOutput::narrated(text.to_string(), json!({})))
                }
                Behaviour::Details => Ok(CapabilityOutput::details(json!({"host": domain.as_str()}))),
                Behaviour::Fail => Err(ScanError::HttpStatusError {
                    url: domain.homepage_url(),
                    status: 500,
                }),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(CapabilityOutput::details(json!(null)))
                }
                Behaviour::Panic => panic!("checker bug"),
            }
        }
    }

    #[tokio::test]
    async fn test_each_slot_is_isolated() {
        let runner = AuditRunner::new(
            scripted("technical", Behaviour::Fail),
            scripted("content", Behaviour::Summary("content looks fine")),
            scripted("ux", Behaviour::Panic),
            scripted("keyword_focus", Behaviour::Details),
        );

        let record = runner.audit_domain(&Domain::parse("site.test").unwrap()).await;

        assert!(record.technical.reason().unwrap().contains("500"));
        assert_eq!(record.content.output(), Some("content looks fine"));
        assert!(record.ux.reason().unwrap().contains("panicked"));
        assert_eq!(record.keyword_focus.output(), Some(r#"{"host":"site.test"}"#));
        assert_eq!(record.failure_count(), 2);
    }

    #[tokio::test]
    async fn test_slow_capability_times_out_without_blocking_others() {
        let runner = AuditRunner::new(
            scripted("technical", Behaviour::Hang),
            scripted("content", Behaviour::Details),
            scripted("ux", Behaviour::Details),
            scripted("keyword_focus", Behaviour::Details),
        )
        .with_capability_timeout(Duration::from_millis(50));

        let record = runner.audit_domain(&Domain::parse("slow.test").unwrap()).await;

        assert!(record.technical.reason().unwrap().contains("timed out"));
        assert!(record.content.is_ok());
        assert!(record.ux.is_ok());
        assert!(record.keyword_focus.is_ok());
    }
}
