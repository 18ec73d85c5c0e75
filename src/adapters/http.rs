use crate::domain::ports::{CarrierFailure, CarrierReply, RateGateway, RateQuery};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Pricing gateway over plain HTTP GET with query parameters.
pub struct HttpRateGateway {
    client: Client,
    endpoint: String,
}

impl HttpRateGateway {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("shipping-quote/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RateGateway for HttpRateGateway {
    async fn fetch_rates(&self, query: &RateQuery) -> std::result::Result<CarrierReply, CarrierFailure> {
        tracing::debug!("Making pricing request to: {}", self.endpoint);

        // 逾時依每次查詢設定，不用 client 預設值
        let response = self
            .client
            .get(&self.endpoint)
            .query(&query.params())
            .timeout(query.timeout)
            .send()
            .await
            .map_err(connection_failure)?;

        let status = response.status().as_u16();
        tracing::debug!("Pricing response status: {}", status);

        let body = response.text().await.map_err(connection_failure)?;
        Ok(CarrierReply { status, body })
    }
}

fn connection_failure(error: reqwest::Error) -> CarrierFailure {
    if error.is_timeout() {
        CarrierFailure::Timeout
    } else {
        // URL 帶有 token，不可寫進錯誤訊息
        CarrierFailure::Network {
            reason: error.without_url().to_string(),
        }
    }
}
