//! Turns the pricing service payload into storefront shipping offers.

use crate::core::carrier::parse_decimal_comma;
use crate::domain::model::{
    AdditionalCharge, Address, Deadline, MerchantConfig, Package, PackageWeight, ServiceOverride,
    ShippingLine, ShippingOffer,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

pub const SOURCE_TAG: &str = "pricing-ws";
pub const DEFAULT_POSTING_DEADLINE_DAYS: u32 = 3;
const FLAG_MAX_CHARS: usize = 20;

/// One rate entry as sent by the carrier. Text fields may arrive as strings or numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierRate {
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub carrier: Option<Value>,
    #[serde(default)]
    pub service_code: Option<Value>,
    #[serde(default)]
    pub service_description: Option<Value>,
    #[serde(default)]
    pub lead_time: Option<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatePayload {
    Many(Vec<CarrierRate>),
    One(CarrierRate),
}

/// 單一物件或陣列都轉成陣列
pub fn parse_rates(body: &str) -> Result<Vec<CarrierRate>, String> {
    match serde_json::from_str::<RatePayload>(body) {
        Ok(RatePayload::Many(rates)) => Ok(rates),
        Ok(RatePayload::One(rate)) => Ok(vec![rate]),
        Err(e) => Err(format!("unexpected rate payload: {}", e)),
    }
}

pub struct OfferContext<'a> {
    pub merchant: &'a MerchantConfig,
    pub origin_zip: &'a str,
    pub destination: &'a Address,
    pub destination_zip: &'a str,
    pub package_weight: Decimal,
}

pub fn build_offers(
    rates: Vec<CarrierRate>,
    context: &OfferContext<'_>,
) -> Result<Vec<ShippingOffer>, String> {
    rates
        .iter()
        .enumerate()
        .map(|(index, rate)| build_offer(rate, context).map_err(|e| format!("rate #{}: {}", index, e)))
        .collect()
}

fn build_offer(rate: &CarrierRate, context: &OfferContext<'_>) -> Result<ShippingOffer, String> {
    let raw_price = text(&rate.price).ok_or("missing price")?;
    let price =
        parse_decimal_comma(&raw_price).ok_or_else(|| format!("unparsable price '{}'", raw_price))?;

    let raw_lead_time = text(&rate.lead_time).ok_or("missing lead time")?;
    let lead_days = leading_integer(&raw_lead_time)
        .ok_or_else(|| format!("unparsable lead time '{}'", raw_lead_time))?;

    let service_name = text(&rate.service_description).unwrap_or_default();
    let service_code = text(&rate.service_code).unwrap_or_default();
    let carrier = text(&rate.carrier).unwrap_or_default();

    let label = resolve_label(&context.merchant.services, &service_name, &service_code)
        .map(str::to_string)
        .unwrap_or_else(|| service_name.clone());

    let mut total_price = price;
    let mut discount = Decimal::ZERO;
    let mut other_additionals = Vec::new();

    if let Some(additional) = context.merchant.additional_price.filter(|a| !a.is_zero()) {
        if additional > Decimal::ZERO {
            other_additionals.push(AdditionalCharge {
                tag: "additional_price".to_string(),
                label: "Additional price".to_string(),
                price: additional,
            });
        } else {
            discount = discount.checked_sub(additional).ok_or("discount overflow")?;
        }
        total_price = total_price
            .checked_add(additional)
            .ok_or("price overflow")?;
    }

    let posting_days = context
        .merchant
        .posting_deadline_days
        .unwrap_or(DEFAULT_POSTING_DEADLINE_DAYS);

    Ok(ShippingOffer {
        label,
        carrier,
        service_name,
        service_code,
        shipping_line: ShippingLine {
            from: Address::from_zip(context.origin_zip),
            to: context.destination.clone(),
            package: Package {
                weight: PackageWeight {
                    value: context.package_weight,
                    unit: "kg",
                },
            },
            price,
            total_price,
            discount,
            other_additionals,
            delivery_time: Deadline {
                days: lead_days,
                working_days: true,
            },
            posting_deadline: Deadline {
                days: posting_days,
                working_days: true,
            },
            flags: offer_flags(context.destination_zip),
        },
    })
}

/// Picks the label of the first enabled override matching the carrier service.
pub fn resolve_label<'a>(
    overrides: &'a [ServiceOverride],
    service_name: &str,
    service_code: &str,
) -> Option<&'a str> {
    let name = service_name.trim();
    let code = service_code.trim();

    overrides
        .iter()
        .filter(|o| !o.disabled && !o.label.trim().is_empty())
        .find(|o| {
            let key = non_blank(&o.service_name).or_else(|| non_blank(&o.service_code));
            match key {
                Some(key) => key.eq_ignore_ascii_case(name) || key.eq_ignore_ascii_case(code),
                None => true,
            }
        })
        .map(|o| o.label.as_str())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn offer_flags(destination_zip: &str) -> Vec<String> {
    let per_destination: String = format!("pricing-{}", destination_zip)
        .chars()
        .take(FLAG_MAX_CHARS)
        .collect();
    vec![SOURCE_TAG.to_string(), per_destination]
}

fn text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// 只取開頭的整數，例如 "5 dias" 取 5
fn leading_integer(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
