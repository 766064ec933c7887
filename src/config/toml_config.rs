use crate::core::discovery::{default_exclusions, DEFAULT_COMPETITOR_COUNT, DEFAULT_SEARCH_OVERSAMPLE};
use crate::core::profiler::DEFAULT_KEYWORD_CAP;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, ScanError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const MAX_COMPETITORS: usize = 10;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

/// 完整的掃描設定，可由 TOML、CLI 與環境變數組成
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub scan: ScanSection,
    pub timeouts: TimeoutSection,
    pub search: SearchSection,
    pub generation: GenerationSection,
    pub pagespeed: PageSpeedSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    pub competitors: usize,
    pub search_oversample: usize,
    pub exclusions: Vec<String>,
    pub keyword_cap: usize,
    pub concurrency: usize,
    pub narrate_audits: bool,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            competitors: DEFAULT_COMPETITOR_COUNT,
            search_oversample: DEFAULT_SEARCH_OVERSAMPLE,
            exclusions: default_exclusions(),
            keyword_cap: DEFAULT_KEYWORD_CAP,
            concurrency: crate::core::aggregator::DEFAULT_CONCURRENCY,
            narrate_audits: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSection {
    pub request_seconds: u64,
    pub capability_seconds: u64,
    pub generation_seconds: u64,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            request_seconds: 30,
            capability_seconds: 180,
            generation_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: crate::adapters::serpapi::DEFAULT_SERPAPI_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Ollama,
}

/// 單一生成角色的模型設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub provider: ProviderKind,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_temperature() -> f32 {
    0.3
}

impl GeneratorConfig {
    pub fn openai(model: &str) -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: model.to_string(),
            temperature: default_temperature(),
            base_url: None,
            api_key: None,
        }
    }

    pub fn ollama(model: &str) -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: model.to_string(),
            temperature: 0.2,
            base_url: None,
            api_key: None,
        }
    }

    fn validate_as(&self, role: &str) -> Result<()> {
        validate_non_empty_string(&format!("generation.{}.model", role), &self.model)?;
        validate_range(
            &format!("generation.{}.temperature", role),
            self.temperature,
            0.0,
            2.0,
        )?;
        if let Some(base_url) = &self.base_url {
            validate_url(&format!("generation.{}.base_url", role), base_url)?;
        }
        if self.provider == ProviderKind::OpenAi {
            require_secret(&format!("generation.{}.api_key", role), &self.api_key)?;
        }
        Ok(())
    }
}

/// 查詢生成用小模型，說明與報告用較大的模型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    pub query: GeneratorConfig,
    pub narration: GeneratorConfig,
    pub synthesis: GeneratorConfig,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            query: GeneratorConfig::ollama("qwen3:4b"),
            narration: GeneratorConfig::openai("gpt-4o-mini"),
            synthesis: GeneratorConfig::openai("gpt-4o-mini"),
        }
    }
}

impl GenerationSection {
    fn roles_mut(&mut self) -> [&mut GeneratorConfig; 3] {
        [&mut self.query, &mut self.narration, &mut self.synthesis]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSpeedSection {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for PageSpeedSection {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: crate::app::checks::technical::DEFAULT_PAGESPEED_URL.to_string(),
        }
    }
}

impl ScanConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| ScanError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換 ${VAR} 形式的環境變數，未設定者保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let name = &caps[1];
                std::env::var(name).unwrap_or_else(|_| format!("${{{}}}", name))
            })
            .into_owned()
    }

    /// 未設定的金鑰改用常見環境變數
    pub fn apply_env_fallbacks(&mut self) {
        self.apply_fallbacks_from(|name| std::env::var(name).ok());
    }

    fn apply_fallbacks_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fill_missing(&mut self.search.api_key, lookup("SERPAPI_KEY"));
        fill_missing(&mut self.pagespeed.api_key, lookup("GOOGLE_PSI_API_KEY"));

        let openai_key = lookup("OPENAI_API_KEY");
        for role in self.generation.roles_mut() {
            if role.provider == ProviderKind::OpenAi {
                fill_missing(&mut role.api_key, openai_key.clone());
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_range("scan.competitors", self.scan.competitors, 1, MAX_COMPETITORS)?;
        if self.scan.search_oversample < self.scan.competitors {
            return Err(ScanError::InvalidConfigValueError {
                field: "scan.search_oversample".to_string(),
                value: self.scan.search_oversample.to_string(),
                reason: format!(
                    "must be at least the competitor count ({})",
                    self.scan.competitors
                ),
            });
        }
        validate_positive_number("scan.concurrency", self.scan.concurrency, 1)?;
        validate_positive_number("scan.keyword_cap", self.scan.keyword_cap, 1)?;

        for (field, seconds) in [
            ("timeouts.request_seconds", self.timeouts.request_seconds),
            ("timeouts.capability_seconds", self.timeouts.capability_seconds),
            ("timeouts.generation_seconds", self.timeouts.generation_seconds),
        ] {
            validate_positive_number(field, seconds as usize, 1)?;
        }

        validate_url("search.base_url", &self.search.base_url)?;
        require_secret("search.api_key", &self.search.api_key)?;
        validate_url("pagespeed.base_url", &self.pagespeed.base_url)?;

        self.generation.query.validate_as("query")?;
        self.generation.synthesis.validate_as("synthesis")?;
        if self.scan.narrate_audits {
            self.generation.narration.validate_as("narration")?;
        }
        Ok(())
    }
}

/// 空字串或未替換的 `${VAR}` 視為未設定
pub fn resolved_secret(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.starts_with("${"))
}

pub fn require_secret<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    validate_required_field(field, &resolved_secret(value)).copied()
}

fn fill_missing(slot: &mut Option<String>, fallback: Option<String>) {
    if resolved_secret(slot).is_none() {
        if let Some(value) = fallback.filter(|v| !v.trim().is_empty()) {
            *slot = Some(value);
        }
    }
}

impl ConfigProvider for ScanConfig {
    fn competitor_count(&self) -> usize {
        self.scan.competitors
    }

    fn search_oversample(&self) -> usize {
        self.scan.search_oversample
    }

    fn exclusions(&self) -> &[String] {
        &self.scan.exclusions
    }

    fn keyword_cap(&self) -> usize {
        self.scan.keyword_cap
    }

    fn narrate_audits(&self) -> bool {
        self.scan.narrate_audits
    }

    fn concurrency(&self) -> usize {
        self.scan.concurrency
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.request_seconds)
    }

    fn capability_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.capability_seconds)
    }

    fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.generation_seconds)
    }
}

impl Validate for ScanConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
