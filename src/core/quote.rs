use crate::core::carrier::{build_rate_query, CarrierOptions, QuoteInputs};
use crate::core::classifier::classify;
use crate::core::offers::{build_offers, parse_rates, OfferContext};
use crate::core::weight::WeightPolicy;
use crate::domain::model::{Address, MerchantConfig, QuoteRequest, QuoteResponse, ShippingOffer};
use crate::domain::ports::{CarrierFailure, CarrierReply, RateGateway};
use crate::utils::error::QuoteFailure;
use tracing::Instrument;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub carrier: CarrierOptions,
    pub weight: WeightPolicy,
}

pub struct QuoteEngine<G: RateGateway> {
    gateway: G,
    settings: EngineSettings,
}

impl<G: RateGateway> QuoteEngine<G> {
    pub fn new(gateway: G, settings: EngineSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Runs one quote from validation to the final response. Every exit is
    /// either a response or a classified [`QuoteFailure`].
    pub async fn quote(
        &self,
        merchant: &MerchantConfig,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, QuoteFailure> {
        let destination = request
            .destination
            .as_ref()
            .map(Address::postal_digits)
            .unwrap_or_else(|| "-".to_string());
        let span = tracing::info_span!("quote", destination = %destination);

        self.run(merchant, request).instrument(span).await
    }

    async fn run(
        &self,
        merchant: &MerchantConfig,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, QuoteFailure> {
        let Some(token) = merchant.token() else {
            tracing::warn!("❌ Pricing token is not configured");
            return Err(QuoteFailure::Auth);
        };

        let mut response = QuoteResponse {
            free_shipping_from_value: merchant.free_shipping_threshold(),
            shipping_services: Vec::new(),
        };

        let Some(destination) = request.destination.as_ref() else {
            // 沒有收件地址，只回傳免運門檻
            tracing::debug!("No destination, answering free shipping preview");
            return Ok(response);
        };

        let origin_zip = request
            .origin
            .as_ref()
            .map(Address::postal_digits)
            .filter(|zip| !zip.is_empty())
            .unwrap_or_else(|| merchant.origin_digits());
        if origin_zip.is_empty() {
            tracing::warn!("❌ Origin zip is not configured");
            return Err(QuoteFailure::MissingOrigin);
        }

        let items = match request.items.as_deref() {
            Some(items) if !items.is_empty() => items,
            _ => {
                tracing::debug!("Empty cart, skipping pricing call");
                return Err(QuoteFailure::EmptyCart);
            }
        };

        let weight = self.settings.weight.calculate(items);
        let destination_zip = destination.postal_digits();
        let query = build_rate_query(
            &self.settings.carrier,
            &QuoteInputs {
                token,
                destination_zip: &destination_zip,
                subtotal: request.subtotal,
                weight,
                is_checkout_confirmation: request.is_checkout_confirmation,
            },
        );

        tracing::info!(
            "🚚 Requesting rates: {} → {}, weight {}kg (cubic tier {}kg)",
            origin_zip,
            destination_zip,
            weight.physical,
            weight.cubic_tier
        );
        tracing::debug!("Rate query: {:?}", query);

        let reply = self
            .gateway
            .fetch_rates(&query)
            .await
            .map_err(|failure| classify(&failure))?;

        let context = OfferContext {
            merchant,
            origin_zip: &origin_zip,
            destination,
            destination_zip: &destination_zip,
            package_weight: weight.billable(),
        };
        let offers = offers_from_reply(reply, &context).map_err(|failure| classify(&failure))?;

        tracing::info!("✅ {} shipping offers quoted", offers.len());
        response.shipping_services = offers;
        Ok(response)
    }
}

fn offers_from_reply(
    reply: CarrierReply,
    context: &OfferContext<'_>,
) -> Result<Vec<ShippingOffer>, CarrierFailure> {
    let CarrierReply { status, body } = reply;
    if status != 200 {
        return Err(CarrierFailure::Status { status, body });
    }

    let offers = parse_rates(&body).and_then(|rates| build_offers(rates, context));
    offers.map_err(|reason| CarrierFailure::Malformed {
        status,
        body,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CartItem, Measure, ServiceOverride, WeightUnit};
    use crate::domain::ports::RateQuery;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockGateway {
        reply: Result<CarrierReply, CarrierFailure>,
        calls: Arc<Mutex<Vec<RateQuery>>>,
    }

    impl MockGateway {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(CarrierReply {
                    status,
                    body: body.to_string(),
                }),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(failure: CarrierFailure) -> Self {
            Self {
                reply: Err(failure),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        async fn calls(&self) -> Vec<RateQuery> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl RateGateway for MockGateway {
        async fn fetch_rates(&self, query: &RateQuery) -> Result<CarrierReply, CarrierFailure> {
            self.calls.lock().await.push(query.clone());
            self.reply.clone()
        }
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn merchant() -> MerchantConfig {
        MerchantConfig {
            token: Some("tk-123".to_string()),
            zip: Some("01310-100".to_string()),
            free_shipping_from_value: Some(dec("199.90")),
            ..Default::default()
        }
    }

    fn request() -> QuoteRequest {
        QuoteRequest {
            origin: None,
            destination: Some(Address::from_zip("20040-020")),
            items: Some(vec![CartItem {
                sku: Some("MUG".to_string()),
                product_id: None,
                name: None,
                quantity: 2,
                weight: Some(Measure::new(dec("400"), WeightUnit::Gram)),
                dimensions: None,
            }]),
            subtotal: dec("59.8"),
            is_checkout_confirmation: false,
        }
    }

    const SINGLE_RATE: &str = r#"{
        "price": "12,50",
        "carrier": "Correios",
        "service_code": "04510",
        "service_description": "PAC",
        "lead_time": "6"
    }"#;

    #[tokio::test]
    async fn test_successful_quote() {
        let gateway = MockGateway::answering(200, SINGLE_RATE);
        let engine = QuoteEngine::new(gateway.clone(), EngineSettings::default());

        let response = engine.quote(&merchant(), &request()).await.unwrap();

        assert_eq!(response.free_shipping_from_value, Some(dec("199.90")));
        assert_eq!(response.shipping_services.len(), 1);
        let offer = &response.shipping_services[0];
        assert_eq!(offer.label, "PAC");
        assert_eq!(offer.shipping_line.price, dec("12.50"));
        assert_eq!(offer.shipping_line.from.zip, "01310100");
        assert_eq!(offer.shipping_line.package.weight.value, dec("0.8"));

        let calls = gateway.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token, "tk-123");
        assert_eq!(calls[0].destination, "20040020");
        assert_eq!(calls[0].subtotal, "59,80");
        assert_eq!(calls[0].weight, "0,8");
        assert_eq!(calls[0].cubic_weight, "0,8");
        assert_eq!(calls[0].timeout, Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_missing_token_is_auth_error_before_anything_else() {
        let gateway = MockGateway::answering(200, SINGLE_RATE);
        let engine = QuoteEngine::new(gateway.clone(), EngineSettings::default());
        let merchant = MerchantConfig {
            token: None,
            ..merchant()
        };

        let result = engine.quote(&merchant, &request()).await;
        assert_eq!(result.unwrap_err(), QuoteFailure::Auth);

        let preview = QuoteRequest {
            destination: None,
            ..request()
        };
        assert_eq!(
            engine.quote(&merchant, &preview).await.unwrap_err(),
            QuoteFailure::Auth
        );
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_destination_is_free_shipping_preview() {
        let gateway = MockGateway::answering(200, SINGLE_RATE);
        let engine = QuoteEngine::new(gateway.clone(), EngineSettings::default());
        let merchant = MerchantConfig {
            zip: None,
            ..merchant()
        };
        let preview = QuoteRequest {
            destination: None,
            items: None,
            ..request()
        };

        let response = engine.quote(&merchant, &preview).await.unwrap();

        assert_eq!(response.free_shipping_from_value, Some(dec("199.90")));
        assert!(response.shipping_services.is_empty());
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_origin_is_config_error() {
        let gateway = MockGateway::answering(200, SINGLE_RATE);
        let engine = QuoteEngine::new(gateway.clone(), EngineSettings::default());
        let merchant = MerchantConfig {
            zip: Some("---".to_string()),
            ..merchant()
        };

        let result = engine.quote(&merchant, &request()).await;
        assert_eq!(result.unwrap_err(), QuoteFailure::MissingOrigin);
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_request_origin_overrides_merchant_zip() {
        let gateway = MockGateway::answering(200, SINGLE_RATE);
        let engine = QuoteEngine::new(gateway, EngineSettings::default());
        let merchant = MerchantConfig {
            zip: None,
            ..merchant()
        };
        let with_origin = QuoteRequest {
            origin: Some(Address::from_zip("30130-010")),
            ..request()
        };

        let response = engine.quote(&merchant, &with_origin).await.unwrap();
        assert_eq!(response.shipping_services[0].shipping_line.from.zip, "30130010");
    }

    #[tokio::test]
    async fn test_empty_cart_never_calls_carrier() {
        let gateway = MockGateway::answering(200, SINGLE_RATE);
        let engine = QuoteEngine::new(gateway.clone(), EngineSettings::default());

        for items in [None, Some(vec![])] {
            let empty = QuoteRequest {
                items,
                ..request()
            };
            let result = engine.quote(&merchant(), &empty).await;
            assert_eq!(result.unwrap_err(), QuoteFailure::EmptyCart);
        }
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_confirmation_uses_longer_timeout() {
        let gateway = MockGateway::answering(200, SINGLE_RATE);
        let engine = QuoteEngine::new(gateway.clone(), EngineSettings::default());
        let checkout = QuoteRequest {
            is_checkout_confirmation: true,
            ..request()
        };

        engine.quote(&merchant(), &checkout).await.unwrap();
        assert_eq!(gateway.calls().await[0].timeout, Duration::from_millis(8000));
    }

    #[tokio::test]
    async fn test_multiple_rates_keep_carrier_order_and_overrides() {
        let body = r#"[
            {"price": "35,90", "carrier": "Correios", "service_code": "04014", "service_description": "SEDEX", "lead_time": "2"},
            {"price": "18,40", "carrier": "Correios", "service_code": "04510", "service_description": "PAC", "lead_time": "8"}
        ]"#;
        let engine = QuoteEngine::new(MockGateway::answering(200, body), EngineSettings::default());
        let merchant = MerchantConfig {
            additional_price: Some(dec("-2.00")),
            services: vec![ServiceOverride {
                service_code: Some("04014".to_string()),
                label: "Expresso".to_string(),
                ..Default::default()
            }],
            ..merchant()
        };

        let response = engine.quote(&merchant, &request()).await.unwrap();
        let labels: Vec<&str> = response
            .shipping_services
            .iter()
            .map(|o| o.label.as_str())
            .collect();

        assert_eq!(labels, vec!["Expresso", "PAC"]);
        assert_eq!(response.shipping_services[1].shipping_line.total_price, dec("16.40"));
        assert_eq!(response.shipping_services[1].shipping_line.discount, dec("2.00"));
    }

    #[tokio::test]
    async fn test_malformed_price_is_transport_error() {
        let body = r#"{"price": "N/A", "service_description": "PAC", "lead_time": "3"}"#;
        let engine = QuoteEngine::new(MockGateway::answering(200, body), EngineSettings::default());

        let result = engine.quote(&merchant(), &request()).await;
        assert_eq!(
            result.unwrap_err(),
            QuoteFailure::Transport { status: Some(200) }
        );
    }

    #[tokio::test]
    async fn test_price_overflow_is_transport_error() {
        let body = r#"{"price": "79228162514264337593543950335", "service_description": "PAC", "lead_time": "3"}"#;
        let engine = QuoteEngine::new(MockGateway::answering(200, body), EngineSettings::default());
        let merchant = MerchantConfig {
            additional_price: Some(Decimal::ONE),
            ..merchant()
        };

        let result = engine.quote(&merchant, &request()).await;
        assert_eq!(
            result.unwrap_err(),
            QuoteFailure::Transport { status: Some(200) }
        );
    }

    #[tokio::test]
    async fn test_carrier_business_error_surfaces_message() {
        let body = r#"{"error": {"message": "CEP de destino não atendido"}}"#;
        let engine = QuoteEngine::new(MockGateway::answering(400, body), EngineSettings::default());

        let result = engine.quote(&merchant(), &request()).await;
        assert_eq!(
            result.unwrap_err(),
            QuoteFailure::Carrier {
                message: "CEP de destino não atendido".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let engine = QuoteEngine::new(
            MockGateway::failing(CarrierFailure::Timeout),
            EngineSettings::default(),
        );

        let result = engine.quote(&merchant(), &request()).await;
        assert_eq!(result.unwrap_err(), QuoteFailure::Transport { status: None });
    }

    #[tokio::test]
    async fn test_empty_rate_list_is_valid() {
        let engine = QuoteEngine::new(MockGateway::answering(200, "[]"), EngineSettings::default());

        let response = engine.quote(&merchant(), &request()).await.unwrap();
        assert!(response.shipping_services.is_empty());
    }
}
