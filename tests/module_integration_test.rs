use httpmock::prelude::*;
use shipping_quote::adapters::module::{self, ModuleRequest};
use shipping_quote::utils::validation::Validate;
use shipping_quote::{HttpRateGateway, QuoteConfig, QuoteEngine};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn engine_from_toml(toml: &str) -> QuoteEngine<HttpRateGateway> {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();

    let config = QuoteConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let gateway = HttpRateGateway::new(config.endpoint()).unwrap();
    QuoteEngine::new(gateway, config.engine_settings())
}

fn module_request(is_checkout_confirmation: bool) -> ModuleRequest {
    serde_json::from_value(serde_json::json!({
        "params": {
            "to": {"zip": "30130-010"},
            "subtotal": 59.9,
            "is_checkout_confirmation": is_checkout_confirmation,
            "items": [
                {"sku": "MUG", "quantity": 3, "weight": {"value": 350, "unit": "g"}}
            ]
        },
        "application": {
            "data": {
                "zip": "01310-100",
                "free_shipping_from_value": 199,
                "additional_price": -2.5,
                "posting_deadline_days": 1,
                "services": [
                    {"service_code": "04510", "label": "Econômico"},
                    {"service_code": "04014", "label": "Ignorado", "disabled": true}
                ]
            },
            "hidden_data": {"token": "tk-module"}
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_module_envelope_with_toml_config() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/rates")
            .query_param("token", "tk-module")
            .query_param("locale", "es_AR")
            .query_param("subtotal", "59,90")
            .query_param("destination", "30130010")
            .query_param("weight", "1,05")
            .query_param("cubic_weight", "1,05");
        then.status(200).json_body(serde_json::json!([
            {"price": "1.012,40", "carrier": "Correios", "service_code": "04014",
             "service_description": "SEDEX", "lead_time": "1 dia útil"},
            {"price": "15,00", "carrier": "Correios", "service_code": "04510",
             "service_description": "PAC", "lead_time": "6"}
        ]));
    });

    let engine = engine_from_toml(&format!(
        r#"
[carrier]
endpoint = "{}"
locale = "es_AR"
"#,
        server.url("/v1/rates")
    ));

    let response = module::handle(&engine, module_request(false)).await;

    api_mock.assert();
    assert_eq!(response.status, 200);

    let body = &response.body;
    assert_eq!(body["free_shipping_from_value"], serde_json::json!(199.0));

    let express = &body["shipping_services"][0];
    assert_eq!(express["label"], "SEDEX");
    assert_eq!(express["shipping_line"]["price"], serde_json::json!(1012.4));
    assert_eq!(express["shipping_line"]["total_price"], serde_json::json!(1009.9));
    assert_eq!(express["shipping_line"]["discount"], serde_json::json!(2.5));
    assert_eq!(express["shipping_line"]["delivery_time"]["days"], 1);
    assert_eq!(express["shipping_line"]["posting_deadline"]["days"], 1);
    assert!(express["shipping_line"].get("other_additionals").is_none());

    let economy = &body["shipping_services"][1];
    assert_eq!(economy["label"], "Econômico");
    assert_eq!(economy["shipping_line"]["from"]["zip"], "01310100");
    assert_eq!(economy["shipping_line"]["flags"][1], "pricing-30130010");
}

#[tokio::test]
async fn test_module_envelope_missing_token_is_auth_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/rates");
        then.status(200).json_body(serde_json::json!([]));
    });

    let engine = engine_from_toml(&format!(
        "[carrier]\nendpoint = \"{}\"\n",
        server.url("/v1/rates")
    ));

    let mut request = module_request(false);
    request.application.hidden_data.clear();

    let response = module::handle(&engine, request).await;

    api_mock.assert_hits(0);
    assert_eq!(response.status, 409);
    assert_eq!(response.body["error"], "AUTH_ERROR");
}

#[tokio::test]
async fn test_checkout_confirmation_waits_longer() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/rates");
        then.status(200)
            .delay(Duration::from_millis(600))
            .json_body(serde_json::json!({
                "price": "15,00", "service_code": "04510",
                "service_description": "PAC", "lead_time": "6"
            }));
    });

    let engine = engine_from_toml(&format!(
        r#"
[carrier]
endpoint = "{}"
timeout_ms = 100
checkout_timeout_ms = 5000
"#,
        server.url("/v1/rates")
    ));

    // 一般報價逾時
    let browsing = module::handle(&engine, module_request(false)).await;
    assert_eq!(browsing.status, 409);
    assert_eq!(browsing.body["error"], "TRANSPORT_ERROR");

    // 結帳確認有較長的等待時間
    let checkout = module::handle(&engine, module_request(true)).await;
    assert_eq!(checkout.status, 200);
    assert_eq!(checkout.body["shipping_services"][0]["label"], "Econômico");

    api_mock.assert_hits(2);
}
