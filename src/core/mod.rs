pub mod carrier;
pub mod classifier;
pub mod offers;
pub mod quote;
pub mod units;
pub mod weight;

pub use crate::domain::model::{MerchantConfig, QuoteRequest, QuoteResponse};
pub use crate::domain::ports::RateGateway;
pub use crate::utils::error::{QuoteFailure, Result};
