use clap::Parser;
use container_analysis_samples::utils::error::ErrorSeverity;
use container_analysis_samples::utils::{logger, validation::Validate};
use container_analysis_samples::{CliConfig, SampleRunner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting container-analysis-samples");
    if config.verbose {
        tracing::debug!("CLI command: {:?}", config.command);
    }

    // 合併並驗證配置
    let settings = match config.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::debug!(
        "Project {} (analysis: {}, pubsub: {})",
        settings.project_id,
        settings.analysis_endpoint,
        settings.pubsub_endpoint
    );

    let runner = SampleRunner::from_settings(&settings, config.format)?;
    let mut stdout = std::io::stdout().lock();

    if let Err(e) = runner.run(config.command.clone(), &mut stdout).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
