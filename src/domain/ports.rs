use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 送往物流報價服務的查詢參數，數值欄位皆已轉成小數逗號格式
#[derive(Clone, PartialEq, Eq)]
pub struct RateQuery {
    pub token: String,
    pub locale: String,
    pub subtotal: String,
    pub destination: String,
    pub cubic_weight: String,
    pub weight: String,
    pub timeout: Duration,
}

impl RateQuery {
    pub fn params(&self) -> [(&'static str, &str); 6] {
        [
            ("token", self.token.as_str()),
            ("locale", self.locale.as_str()),
            ("subtotal", self.subtotal.as_str()),
            ("destination", self.destination.as_str()),
            ("cubic_weight", self.cubic_weight.as_str()),
            ("weight", self.weight.as_str()),
        ]
    }
}

impl fmt::Debug for RateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateQuery")
            .field("token", &"***")
            .field("locale", &self.locale)
            .field("subtotal", &self.subtotal)
            .field("destination", &self.destination)
            .field("cubic_weight", &self.cubic_weight)
            .field("weight", &self.weight)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Raw answer from the pricing service, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierReply {
    pub status: u16,
    pub body: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarrierFailure {
    #[error("pricing request timed out")]
    Timeout,

    #[error("pricing request failed: {reason}")]
    Network { reason: String },

    #[error("pricing service answered with status {status}")]
    Status { status: u16, body: String },

    #[error("malformed pricing response (status {status}): {reason}")]
    Malformed {
        status: u16,
        body: String,
        reason: String,
    },
}

impl CarrierFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            CarrierFailure::Status { status, .. } | CarrierFailure::Malformed { status, .. } => {
                Some(*status)
            }
            CarrierFailure::Timeout | CarrierFailure::Network { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            CarrierFailure::Status { body, .. } | CarrierFailure::Malformed { body, .. } => {
                Some(body.as_str())
            }
            CarrierFailure::Timeout | CarrierFailure::Network { .. } => None,
        }
    }
}

#[async_trait]
pub trait RateGateway: Send + Sync {
    /// 只有連線層失敗 (逾時、網路) 才回傳 Err，任何 HTTP 狀態都以 CarrierReply 回傳
    async fn fetch_rates(&self, query: &RateQuery) -> Result<CarrierReply, CarrierFailure>;
}
