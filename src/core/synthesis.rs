use crate::core::{prompts, within};
use crate::domain::model::AuditBundle;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{Result, ScanError};
use std::sync::Arc;
use std::time::Duration;

/// 把 AuditBundle 序列化後交給生成服務寫成報告
#[derive(Clone)]
pub struct ReportSynthesizer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl ReportSynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build_prompt(bundle: &AuditBundle) -> Result<String> {
        let bundle_json = bundle.to_sorted_json()?;
        let competitors = bundle.competitors.hosts();
        Ok(prompts::comparison_report(
            bundle.target.as_str(),
            &competitors,
            &bundle_json,
        ))
    }

    /// 生成失敗或回傳空白都視為合成錯誤
    pub async fn synthesize(&self, bundle: &AuditBundle) -> Result<String> {
        let prompt = Self::build_prompt(bundle)
            .map_err(|e| ScanError::synthesis(format!("could not serialize audit bundle: {}", e)))?;

        tracing::debug!("📝 Submitting {} bytes of audit data for synthesis", prompt.len());
        let report = within("report synthesis", self.timeout, self.generator.complete(&prompt))
            .await
            .map_err(|e| ScanError::synthesis(e.to_string()))?;

        let report = report.trim();
        if report.is_empty() {
            return Err(ScanError::synthesis("text generation returned an empty report"));
        }
        Ok(report.to_string())
    }
}
