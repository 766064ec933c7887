use crate::adapters::{HttpFetcher, OllamaGenerator, OpenAiGenerator, SerpApiSearch};
use crate::app::capabilities::{ContentAudit, KeywordFocusAudit, TechnicalAudit, UxAudit};
use crate::app::checks::technical::PageSpeedInsights;
use crate::config::toml_config::{require_secret, resolved_secret};
use crate::config::{GeneratorConfig, ProviderKind, ScanConfig};
use crate::core::aggregator::AuditAggregator;
use crate::core::discovery::CompetitorDiscovery;
use crate::core::profiler::HomepageProfiler;
use crate::core::runner::AuditRunner;
use crate::core::search::WebSearchAdapter;
use crate::core::synthesis::ReportSynthesizer;
use crate::core::{
    AuditBundle, CompetitorSet, ConfigProvider, Domain, ScanPipeline, SearchProvider,
    TextGenerator, WebFetcher,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// 管線用到的外部服務
pub struct PipelinePorts {
    pub fetcher: Arc<dyn WebFetcher>,
    pub search: Arc<dyn SearchProvider>,
    pub query_generator: Arc<dyn TextGenerator>,
    pub narration_generator: Option<Arc<dyn TextGenerator>>,
    pub synthesis_generator: Arc<dyn TextGenerator>,
    pub pagespeed: PageSpeedInsights,
}

/// 探索競爭者、稽核、合成報告
pub struct SeoAuditPipeline<C: ConfigProvider> {
    pub(crate) config: C,
    pub(crate) aggregator: AuditAggregator,
    pub(crate) synthesizer: ReportSynthesizer,
}

impl<C: ConfigProvider> SeoAuditPipeline<C> {
    pub fn new(config: C, aggregator: AuditAggregator, synthesizer: ReportSynthesizer) -> Self {
        Self {
            config,
            aggregator,
            synthesizer,
        }
    }

    /// 依設定把各服務組裝成完整管線
    pub fn from_ports(config: C, ports: PipelinePorts) -> Self {
        let profiler =
            HomepageProfiler::new(Arc::clone(&ports.fetcher)).with_keyword_cap(config.keyword_cap());
        let discovery = CompetitorDiscovery::new(
            profiler,
            ports.query_generator,
            WebSearchAdapter::new(ports.search),
        )
        .with_exclusions(config.exclusions().to_vec())
        .with_oversample(config.search_oversample())
        .with_generation_timeout(config.generation_timeout());

        let narrator = if config.narrate_audits() {
            ports.narration_generator
        } else {
            None
        };
        let runner = standard_runner(ports.fetcher, ports.pagespeed, narrator)
            .with_capability_timeout(config.capability_timeout());

        let aggregator =
            AuditAggregator::new(discovery, runner).with_concurrency(config.concurrency());
        let synthesizer = ReportSynthesizer::new(ports.synthesis_generator)
            .with_timeout(config.generation_timeout());

        Self::new(config, aggregator, synthesizer)
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

/// technical / content / ux / keyword_focus 四個能力
pub fn standard_runner(
    fetcher: Arc<dyn WebFetcher>,
    pagespeed: PageSpeedInsights,
    narrator: Option<Arc<dyn TextGenerator>>,
) -> AuditRunner {
    let mut technical = TechnicalAudit::new(Arc::clone(&fetcher), pagespeed);
    let mut content = ContentAudit::new(Arc::clone(&fetcher));
    let mut ux = UxAudit::new(Arc::clone(&fetcher));
    let mut keyword_focus = KeywordFocusAudit::new(fetcher);

    if let Some(narrator) = narrator {
        technical = technical.with_narrator(Arc::clone(&narrator));
        content = content.with_narrator(Arc::clone(&narrator));
        ux = ux.with_narrator(Arc::clone(&narrator));
        keyword_focus = keyword_focus.with_narrator(narrator);
    }

    AuditRunner::new(
        Arc::new(technical),
        Arc::new(content),
        Arc::new(ux),
        Arc::new(keyword_focus),
    )
}

/// 依角色設定建立生成服務
pub fn generator_for(
    role: &str,
    settings: &GeneratorConfig,
    timeout: Duration,
) -> Result<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match settings.provider {
        ProviderKind::OpenAi => {
            let api_key = require_secret(&format!("generation.{}.api_key", role), &settings.api_key)?;
            let mut generator = OpenAiGenerator::new(
                api_key.to_string(),
                settings.model.clone(),
                settings.temperature,
                timeout,
            )?;
            if let Some(base_url) = &settings.base_url {
                generator = generator.with_base_url(base_url.as_str());
            }
            Arc::new(generator)
        }
        ProviderKind::Ollama => {
            let mut generator =
                OllamaGenerator::new(settings.model.clone(), settings.temperature, timeout)?;
            if let Some(base_url) = &settings.base_url {
                generator = generator.with_base_url(base_url.as_str());
            }
            Arc::new(generator)
        }
    };
    tracing::debug!("🤖 {} generator: {:?} {}", role, settings.provider, settings.model);
    Ok(generator)
}

/// 用真實的 HTTP、SerpAPI 與生成服務建立管線
pub fn build_pipeline(config: ScanConfig) -> Result<SeoAuditPipeline<ScanConfig>> {
    let request_timeout = config.request_timeout();
    let generation_timeout = config.generation_timeout();

    let fetcher: Arc<dyn WebFetcher> = Arc::new(HttpFetcher::new(request_timeout)?);
    let serp_key = require_secret("search.api_key", &config.search.api_key)?;
    let search: Arc<dyn SearchProvider> = Arc::new(
        SerpApiSearch::new(serp_key.to_string(), request_timeout)?
            .with_base_url(config.search.base_url.as_str()),
    );

    let query_generator = generator_for("query", &config.generation.query, generation_timeout)?;
    let synthesis_generator =
        generator_for("synthesis", &config.generation.synthesis, generation_timeout)?;
    let narration_generator = if config.narrate_audits() {
        Some(generator_for(
            "narration",
            &config.generation.narration,
            generation_timeout,
        )?)
    } else {
        None
    };

    let pagespeed = PageSpeedInsights::new(resolved_secret(&config.pagespeed.api_key).map(str::to_string))
        .with_base_url(config.pagespeed.base_url.as_str());

    let ports = PipelinePorts {
        fetcher,
        search,
        query_generator,
        narration_generator,
        synthesis_generator,
        pagespeed,
    };
    Ok(SeoAuditPipeline::from_ports(config, ports))
}

#[async_trait]
impl<C: ConfigProvider> ScanPipeline for SeoAuditPipeline<C> {
    async fn discover(&self, target: &Domain) -> Result<CompetitorSet> {
        Ok(self
            .aggregator
            .discovery()
            .discover(target, self.config.competitor_count())
            .await)
    }

    async fn audit(&self, target: &Domain, competitors: &CompetitorSet) -> Result<AuditBundle> {
        Ok(self.aggregator.audit_all(target, competitors).await)
    }

    async fn synthesize(&self, bundle: &AuditBundle) -> Result<String> {
        self.synthesizer.synthesize(bundle).await
    }
}
