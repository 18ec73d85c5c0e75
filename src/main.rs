use anyhow::Context;
use clap::Parser;
use shipping_quote::adapters::module::{self, ModuleRequest};
use shipping_quote::utils::{logger, validation::Validate};
use shipping_quote::{CliConfig, HttpRateGateway, QuoteConfig, QuoteEngine, QuoteRequest};
use std::io::Read;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting shipping-quote CLI");
    tracing::info!("📁 Loading configuration from: {}", config.config);

    let quote_config = match QuoteConfig::from_file(&config.config) {
        Ok(quote_config) => quote_config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", config.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    };

    // 驗證配置
    if let Err(e) = quote_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(3);
    }

    let raw_request = read_request(&config.request)
        .with_context(|| format!("Failed to read request from '{}'", config.request))?;

    let gateway = HttpRateGateway::new(quote_config.endpoint())?;
    let engine = QuoteEngine::new(gateway, quote_config.engine_settings());

    let (body, failure) = if config.module {
        let request: ModuleRequest =
            serde_json::from_str(&raw_request).context("Invalid module request JSON")?;
        let response = module::handle(&engine, request).await;
        (response.body, response.failure)
    } else {
        let merchant = match quote_config.merchant() {
            Ok(merchant) => merchant,
            Err(e) => {
                eprintln!("❌ {}", e);
                eprintln!("💡 Add a [merchant] section or pass --module with application data");
                std::process::exit(3);
            }
        };
        let request: QuoteRequest =
            serde_json::from_str(&raw_request).context("Invalid quote request JSON")?;

        match engine.quote(merchant, &request).await {
            Ok(response) => (serde_json::to_value(&response)?, None),
            Err(failure) => (
                serde_json::to_value(failure.to_response())?,
                Some(failure.category()),
            ),
        }
    };

    println!("{}", serde_json::to_string_pretty(&body)?);

    // 根據錯誤類別決定退出碼
    if let Some(category) = failure {
        tracing::error!("❌ Quote failed ({:?})", category);
        std::process::exit(category.exit_code());
    }

    tracing::info!("✅ Quote completed successfully");
    Ok(())
}

fn read_request(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source)
    }
}
