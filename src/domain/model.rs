use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeightUnit {
    Kilogram,
    Gram,
    Milligram,
    Unknown(String),
}

impl From<String> for WeightUnit {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "kg" => WeightUnit::Kilogram,
            "g" => WeightUnit::Gram,
            "mg" => WeightUnit::Milligram,
            _ => WeightUnit::Unknown(raw),
        }
    }
}

impl From<WeightUnit> for String {
    fn from(unit: WeightUnit) -> Self {
        match unit {
            WeightUnit::Kilogram => "kg".to_string(),
            WeightUnit::Gram => "g".to_string(),
            WeightUnit::Milligram => "mg".to_string(),
            WeightUnit::Unknown(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LengthUnit {
    Centimeter,
    Meter,
    Millimeter,
    Unknown(String),
}

impl From<String> for LengthUnit {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "cm" => LengthUnit::Centimeter,
            "m" => LengthUnit::Meter,
            "mm" => LengthUnit::Millimeter,
            _ => LengthUnit::Unknown(raw),
        }
    }
}

impl From<LengthUnit> for String {
    fn from(unit: LengthUnit) -> Self {
        match unit {
            LengthUnit::Centimeter => "cm".to_string(),
            LengthUnit::Meter => "m".to_string(),
            LengthUnit::Millimeter => "mm".to_string(),
            LengthUnit::Unknown(raw) => raw,
        }
    }
}

/// 數值加單位，兩者都可能缺漏
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure<U> {
    pub value: Option<Decimal>,
    pub unit: Option<U>,
}

impl<U> Measure<U> {
    pub fn new(value: Decimal, unit: U) -> Self {
        Self {
            value: Some(value),
            unit: Some(unit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub weight: Option<Measure<WeightUnit>>,
    #[serde(default)]
    pub dimensions: Option<BTreeMap<String, Option<Measure<LengthUnit>>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub zip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl Address {
    pub fn from_zip(zip: impl Into<String>) -> Self {
        Self {
            zip: zip.into(),
            ..Default::default()
        }
    }

    /// 郵遞區號只保留數字
    pub fn postal_digits(&self) -> String {
        digits_only(&self.zip)
    }
}

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(rename = "from", default)]
    pub origin: Option<Address>,
    #[serde(rename = "to", default)]
    pub destination: Option<Address>,
    #[serde(default)]
    pub items: Option<Vec<CartItem>>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub is_checkout_confirmation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOverride {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_code: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

/// Merchant options for one store. Passed by value into every quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub free_shipping_from_value: Option<Decimal>,
    #[serde(default)]
    pub additional_price: Option<Decimal>,
    #[serde(default)]
    pub services: Vec<ServiceOverride>,
    #[serde(default)]
    pub posting_deadline_days: Option<u32>,
}

impl MerchantConfig {
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// 只有非負值才回傳給前台
    pub fn free_shipping_threshold(&self) -> Option<Decimal> {
        self.free_shipping_from_value
            .filter(|value| !value.is_sign_negative() || value.is_zero())
    }

    pub fn origin_digits(&self) -> String {
        self.zip.as_deref().map(digits_only).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageWeight {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub weight: PackageWeight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdditionalCharge {
    pub tag: String,
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub days: u32,
    pub working_days: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingLine {
    pub from: Address,
    pub to: Address,
    pub package: Package,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_additionals: Vec<AdditionalCharge>,
    pub delivery_time: Deadline,
    pub posting_deadline: Deadline,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingOffer {
    pub label: String,
    pub carrier: String,
    pub service_name: String,
    pub service_code: String,
    pub shipping_line: ShippingLine,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteResponse {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub free_shipping_from_value: Option<Decimal>,
    pub shipping_services: Vec<ShippingOffer>,
}
