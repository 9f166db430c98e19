use clap::Parser;
use transfer_scout::app;
use transfer_scout::utils::{logger, validation::Validate};
use transfer_scout::{CliConfig, HttpPageSource, ParseRules, TransferFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入設定 (日誌尚未初始化，直接輸出到 stderr)
    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init(config.logging.verbose, config.logging.json);

    tracing::info!("Starting transfer-scout");
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 只建立一次 HTTP client，所有請求共用
    let source = HttpPageSource::new(&config.source)?;
    let rules = ParseRules::from_config(&config.parse)?;
    let fetcher = TransferFetcher::new(source, rules);

    tracing::info!("📡 Upstream: {}", config.source.url);

    app::serve(&config.server.bind, fetcher).await?;

    Ok(())
}
