use crate::core::carrier::CarrierOptions;
use crate::core::quote::EngineSettings;
use crate::core::weight::{CubicTier, TierComparator, WeightPolicy};
use crate::utils::error::{Result, ShippingError};
use crate::utils::validation::{self, Validate};
use std::str::FromStr;

/// Carrier settings for the lambda entry point, read from the environment.
/// Merchant options travel inside each event.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub endpoint: String,
    pub settings: EngineSettings,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("PRICING_ENDPOINT").ok_or_else(|| ShippingError::ConfigError {
            message: "PRICING_ENDPOINT environment variable is required".to_string(),
        })?;

        let carrier_defaults = CarrierOptions::default();
        let weight_defaults = WeightPolicy::default();

        let comparator = match lookup("CUBIC_COMPARATOR").as_deref() {
            None => weight_defaults.tier.comparator,
            Some("greater_than") => TierComparator::GreaterThan,
            Some("at_least") => TierComparator::AtLeast,
            Some(other) => {
                return Err(ShippingError::InvalidConfigValueError {
                    field: "CUBIC_COMPARATOR".to_string(),
                    value: other.to_string(),
                    reason: "Expected 'greater_than' or 'at_least'".to_string(),
                })
            }
        };

        let settings = EngineSettings {
            carrier: CarrierOptions {
                locale: lookup("PRICING_LOCALE").unwrap_or(carrier_defaults.locale),
                timeout_ms: parse_or(&lookup, "PRICING_TIMEOUT_MS", carrier_defaults.timeout_ms)?,
                checkout_timeout_ms: parse_or(
                    &lookup,
                    "PRICING_CHECKOUT_TIMEOUT_MS",
                    carrier_defaults.checkout_timeout_ms,
                )?,
            },
            weight: WeightPolicy {
                volumetric_factor: parse_or(
                    &lookup,
                    "VOLUMETRIC_FACTOR",
                    weight_defaults.volumetric_factor,
                )?,
                tier: CubicTier {
                    threshold: parse_or(&lookup, "CUBIC_THRESHOLD", weight_defaults.tier.threshold)?,
                    comparator,
                },
            },
        };

        Ok(Self { endpoint, settings })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ShippingError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("PRICING_ENDPOINT", &self.endpoint)?;
        crate::config::toml_config::validate_engine_settings(&self.settings)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
