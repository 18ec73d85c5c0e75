//! Storefront "calculate shipping" module envelope.
//!
//! The storefront posts `{params, application: {data, hidden_data}}`. The
//! merchant options are the shallow merge of `data` with `hidden_data` on top.

use crate::core::quote::QuoteEngine;
use crate::domain::model::{MerchantConfig, QuoteRequest};
use crate::domain::ports::RateGateway;
use crate::utils::error::{ErrorResponse, FailureCategory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub hidden_data: Map<String, Value>,
}

impl Application {
    pub fn merchant_config(&self) -> Result<MerchantConfig, serde_json::Error> {
        let mut merged = self.data.clone();
        for (key, value) in &self.hidden_data {
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleRequest {
    pub params: QuoteRequest,
    #[serde(default)]
    pub application: Application,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResponse {
    pub status: u16,
    pub body: Value,
    /// 失敗類別，只給 CLI 決定退出碼，不輸出
    #[serde(skip)]
    pub failure: Option<FailureCategory>,
}

impl ModuleResponse {
    fn json<T: Serialize>(status: u16, body: &T, failure: Option<FailureCategory>) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self {
                status,
                body,
                failure,
            },
            Err(e) => {
                tracing::error!("Failed to serialize module response: {}", e);
                Self {
                    status: 500,
                    body: serde_json::json!({"error": "INTERNAL_ERROR", "message": "Unexpected error"}),
                    failure: Some(FailureCategory::Transport),
                }
            }
        }
    }
}

pub async fn handle<G: RateGateway>(engine: &QuoteEngine<G>, request: ModuleRequest) -> ModuleResponse {
    let merchant = match request.application.merchant_config() {
        Ok(merchant) => merchant,
        Err(e) => {
            tracing::warn!("❌ Invalid application data: {}", e);
            let body = ErrorResponse {
                error: "CONFIG_ERROR",
                message: format!("Invalid app configuration: {}", e),
            };
            return ModuleResponse::json(409, &body, Some(FailureCategory::Configuration));
        }
    };

    match engine.quote(&merchant, &request.params).await {
        Ok(response) => ModuleResponse::json(200, &response, None),
        Err(failure) => ModuleResponse::json(
            failure.http_status(),
            &failure.to_response(),
            Some(failure.category()),
        ),
    }
}
