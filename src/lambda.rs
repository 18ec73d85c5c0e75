#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use shipping_quote::adapters::module::{self, ModuleRequest, ModuleResponse};
#[cfg(feature = "lambda")]
use shipping_quote::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use shipping_quote::{HttpRateGateway, LambdaConfig, QuoteEngine};
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
async fn function_handler(
    engine: &QuoteEngine<HttpRateGateway>,
    event: LambdaEvent<ModuleRequest>,
) -> Result<ModuleResponse, Error> {
    tracing::info!("Calculate shipping request {}", event.context.request_id);

    let response = module::handle(engine, event.payload).await;

    tracing::info!("Calculate shipping answered with status {}", response.status);
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時建立一次，之後每個事件共用
    let config = LambdaConfig::from_env()?;
    config.validate()?;

    let gateway = HttpRateGateway::new(config.endpoint.clone())?;
    let engine = Arc::new(QuoteEngine::new(gateway, config.settings.clone()));

    run(service_fn(move |event: LambdaEvent<ModuleRequest>| {
        let engine = Arc::clone(&engine);
        async move { function_handler(&engine, event).await }
    }))
    .await
}
