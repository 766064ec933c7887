use crate::core::aggregator::parse_target;
use crate::domain::model::ScanReport;
use crate::domain::ports::ScanPipeline;
use crate::utils::error::{Result, Stage};
use crate::utils::monitor::RunMonitor;
use chrono::Utc;

pub struct ScanEngine<P: ScanPipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: ScanPipeline> ScanEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    /// 探索 → 稽核 → 合成，失敗時錯誤會標示階段
    pub async fn run(&self, domain: &str) -> Result<ScanReport> {
        let target = parse_target(domain)?;
        tracing::info!("🚀 Starting SEO scan for {}", target);

        // 探索競爭者
        let competitors = self
            .pipeline
            .discover(&target)
            .await
            .map_err(|e| e.at_stage(Stage::Discovery))?;
        self.monitor.log_stage("Discovery");

        // 稽核目標與競爭者
        tracing::info!("🔍 Auditing {} domains", competitors.len() + 1);
        let bundle = self
            .pipeline
            .audit(&target, &competitors)
            .await
            .map_err(|e| e.at_stage(Stage::Audit))?;
        self.monitor.log_stage("Audits");

        // 合成報告
        tracing::info!("📝 Synthesizing comparative report");
        let report = self
            .pipeline
            .synthesize(&bundle)
            .await
            .map_err(|e| e.at_stage(Stage::Synthesis))?;
        self.monitor.log_stage("Synthesis");
        self.monitor.log_final_stats();

        tracing::info!("✅ Report ready ({} characters)", report.len());
        Ok(ScanReport {
            bundle,
            report,
            generated_at: Utc::now(),
        })
    }
}
