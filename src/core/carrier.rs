use crate::core::weight::CartWeight;
use crate::domain::ports::RateQuery;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierOptions {
    pub locale: String,
    pub timeout_ms: u64,
    pub checkout_timeout_ms: u64,
}

impl Default for CarrierOptions {
    fn default() -> Self {
        Self {
            locale: "pt_BR".to_string(),
            timeout_ms: 5000,
            checkout_timeout_ms: 8000,
        }
    }
}

impl CarrierOptions {
    /// 結帳確認時給物流商較長的回應時間
    pub fn timeout_for(&self, is_checkout_confirmation: bool) -> Duration {
        if is_checkout_confirmation {
            Duration::from_millis(self.checkout_timeout_ms)
        } else {
            Duration::from_millis(self.timeout_ms)
        }
    }
}

/// Money on the wire: two decimal places, comma separator.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded).replace('.', ",")
}

/// Weights on the wire: up to three decimal places, trailing zeros trimmed.
pub fn format_weight(value: Decimal) -> String {
    value.round_dp(3).normalize().to_string().replace('.', ",")
}

/// Parses a carrier number such as `12,50` or `1.234,56`.
pub fn parse_decimal_comma(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let canonical = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    Decimal::from_str(&canonical).ok()
}

pub struct QuoteInputs<'a> {
    pub token: &'a str,
    pub destination_zip: &'a str,
    pub subtotal: Decimal,
    pub weight: CartWeight,
    pub is_checkout_confirmation: bool,
}

pub fn build_rate_query(options: &CarrierOptions, inputs: &QuoteInputs<'_>) -> RateQuery {
    RateQuery {
        token: inputs.token.to_string(),
        locale: options.locale.clone(),
        subtotal: format_money(inputs.subtotal),
        destination: inputs.destination_zip.to_string(),
        cubic_weight: format_weight(inputs.weight.cubic_tier),
        weight: format_weight(inputs.weight.physical),
        timeout: options.timeout_for(inputs.is_checkout_confirmation),
    }
}
