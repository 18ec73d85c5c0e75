pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::HttpRateGateway;
pub use crate::config::{lambda::LambdaConfig, toml_config::QuoteConfig};
pub use crate::core::quote::{EngineSettings, QuoteEngine};
pub use crate::domain::model::{MerchantConfig, QuoteRequest, QuoteResponse, ShippingOffer};
pub use crate::utils::error::{QuoteFailure, Result, ShippingError};
