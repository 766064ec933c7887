pub mod cli;
pub mod toml_config;

pub use toml_config::{GeneratorConfig, ProviderKind, ScanConfig};

#[cfg(feature = "cli")]
use crate::core::aggregator::parse_target;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "seoscan")]
#[command(about = "Audit a website's SEO side by side with its discovered competitors")]
pub struct CliConfig {
    /// Target domain or URL, e.g. example.com
    pub domain: String,

    #[arg(short = 'n', long, help = "Number of competitors to discover (1-10)")]
    pub competitors: Option<usize>,

    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Directory for the report and audit bundle")]
    pub output: Option<String>,

    #[arg(long, help = "Keep raw check findings instead of narrated audits")]
    pub no_narration: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 設定檔（或預設值）+ 環境變數 + 命令列覆寫
    pub fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_file(path)?,
            None => ScanConfig::default(),
        };
        config.apply_env_fallbacks();
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ScanConfig) {
        if let Some(count) = self.competitors {
            config.scan.competitors = count;
            config.scan.search_oversample = config.scan.search_oversample.max(count);
        }
        if self.no_narration {
            config.scan.narrate_audits = false;
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("domain", &self.domain)?;
        parse_target(&self.domain)?;
        if let Some(count) = self.competitors {
            validate_range("competitors", count, 1, toml_config::MAX_COMPETITORS)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::try_parse_from([
            "seoscan",
            "https://www.example.com/",
            "-n",
            "9",
            "--no-narration",
            "--output",
            "./reports",
        ])
        .unwrap();

        assert_eq!(cli.domain, "https://www.example.com/");
        assert_eq!(cli.competitors, Some(9));
        assert_eq!(cli.output.as_deref(), Some("./reports"));
        assert!(cli.validate().is_ok());

        let mut config = ScanConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.scan.competitors, 9);
        assert_eq!(config.scan.search_oversample, 9);
        assert!(!config.scan.narrate_audits);
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        let cli = CliConfig::try_parse_from(["seoscan", "   "]).unwrap();
        assert!(cli.validate().is_err());

        let cli = CliConfig::try_parse_from(["seoscan", "example.com", "-n", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_domain_is_required() {
        assert!(CliConfig::try_parse_from(["seoscan"]).is_err());
    }
}
