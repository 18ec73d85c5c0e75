use crate::core::carrier::CarrierOptions;
use crate::core::quote::EngineSettings;
use crate::core::weight::{CubicTier, TierComparator, WeightPolicy};
use crate::domain::model::MerchantConfig;
use crate::utils::error::{Result, ShippingError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub carrier: CarrierSection,
    #[serde(default)]
    pub weight: WeightSection,
    pub merchant: Option<MerchantConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierSection {
    pub endpoint: String,
    pub locale: Option<String>,
    pub timeout_ms: Option<u64>,
    pub checkout_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightSection {
    pub volumetric_factor: Option<Decimal>,
    pub cubic_threshold: Option<Decimal>,
    pub cubic_comparator: Option<TierComparator>,
}

impl CarrierSection {
    pub fn options(&self) -> CarrierOptions {
        let defaults = CarrierOptions::default();
        CarrierOptions {
            locale: self.locale.clone().unwrap_or(defaults.locale),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
            checkout_timeout_ms: self
                .checkout_timeout_ms
                .unwrap_or(defaults.checkout_timeout_ms),
        }
    }
}

impl WeightSection {
    pub fn policy(&self) -> WeightPolicy {
        let defaults = WeightPolicy::default();
        WeightPolicy {
            volumetric_factor: self
                .volumetric_factor
                .unwrap_or(defaults.volumetric_factor),
            tier: CubicTier {
                threshold: self.cubic_threshold.unwrap_or(defaults.tier.threshold),
                comparator: self.cubic_comparator.unwrap_or(defaults.tier.comparator),
            },
        }
    }
}

impl QuoteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShippingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            carrier: self.carrier.options(),
            weight: self.weight.policy(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.carrier.endpoint
    }

    pub fn merchant(&self) -> Result<&MerchantConfig> {
        validation::validate_required_field("merchant", &self.merchant)
    }
}

/// 替換環境變數 (例如 ${PRICING_TOKEN})，找不到的變數保留原字串
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShippingError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

pub fn validate_engine_settings(settings: &EngineSettings) -> Result<()> {
    validation::validate_non_empty_string("carrier.locale", &settings.carrier.locale)?;
    validation::validate_positive_number("carrier.timeout_ms", settings.carrier.timeout_ms, 1)?;
    validation::validate_positive_number(
        "carrier.checkout_timeout_ms",
        settings.carrier.checkout_timeout_ms,
        1,
    )?;
    validation::validate_positive_decimal(
        "weight.volumetric_factor",
        settings.weight.volumetric_factor,
    )?;
    validation::validate_non_negative_decimal(
        "weight.cubic_threshold",
        settings.weight.tier.threshold,
    )?;
    Ok(())
}

impl Validate for QuoteConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("carrier.endpoint", &self.carrier.endpoint)?;
        validate_engine_settings(&self.engine_settings())?;

        if let Some(token) = self.merchant.as_ref().and_then(|m| m.token.as_deref()) {
            if token.contains("${") {
                return Err(ShippingError::MissingConfigError {
                    field: format!("merchant.token ({} is not set)", token),
                });
            }
        }

        Ok(())
    }
}
