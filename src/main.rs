use anyhow::Context;
use clap::Parser;
use seoscan::config::cli::save_report;
use seoscan::utils::error::ErrorSeverity;
use seoscan::utils::{logger, validation::Validate};
use seoscan::{build_pipeline, CliConfig, LocalStorage, ScanEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting seoscan CLI");
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證命令列與設定檔
    let config = match cli.validate().and_then(|_| cli.scan_config()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = match build_pipeline(config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };
    let engine = ScanEngine::new_with_monitoring(pipeline, cli.monitor);

    let scan = match engine.run(&cli.domain).await {
        Ok(scan) => scan,
        Err(e) => exit_with(&e),
    };

    if let Some(output) = &cli.output {
        let storage = LocalStorage::new(output.clone());
        let (report_file, bundle_file) = save_report(&storage, &scan)
            .await
            .with_context(|| format!("failed to write results to {}", output))?;
        eprintln!("📁 Report saved to: {}", storage.full_path(&report_file).display());
        eprintln!("📁 Audit bundle saved to: {}", storage.full_path(&bundle_file).display());
    }

    println!("{}", scan.report);
    Ok(())
}

/// 記錄錯誤、印出建議，依嚴重程度結束程式
fn exit_with(e: &seoscan::ScanError) -> ! {
    tracing::error!(
        "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    if let Some(stage) = e.stage() {
        tracing::error!("❌ Failing stage: {}", stage);
    }
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
