use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShippingError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ShippingError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ShippingError::ApiError(_) => "Check network access to the pricing endpoint",
            ShippingError::IoError(_) => "Make sure the file exists and is readable",
            ShippingError::SerializationError(_) => "Check that the JSON input is well formed",
            ShippingError::ConfigError { .. } => "Review the TOML configuration file",
            ShippingError::InvalidConfigValueError { .. } => {
                "Fix the configuration value mentioned above"
            }
            ShippingError::MissingConfigError { .. } => {
                "Set the missing value in the config file or environment"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ShippingError>;

/// 報價失敗的分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// 商家設定錯誤 (token / 起運郵遞區號)
    Configuration,
    /// 呼叫端輸入錯誤
    Input,
    /// 物流商回報的業務錯誤
    Carrier,
    /// 網路、逾時或協定錯誤
    Transport,
}

impl FailureCategory {
    /// CLI 退出碼：設定 3、輸入 1、物流商或傳輸 2 (可重試)
    pub fn exit_code(&self) -> i32 {
        match self {
            FailureCategory::Configuration => 3,
            FailureCategory::Input => 1,
            FailureCategory::Carrier | FailureCategory::Transport => 2,
        }
    }
}

/// Terminal outcome of a quote that did not produce offers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteFailure {
    #[error("Token unset on app hidden data (merchant must configure the app)")]
    Auth,

    #[error("Zip code is unset on app hidden data (merchant must configure the app)")]
    MissingOrigin,

    #[error("Cannot calculate shipping without cart items")]
    EmptyCart,

    #[error("{message}")]
    Carrier { message: String },

    #[error("{}", transport_message(.status))]
    Transport { status: Option<u16> },
}

fn transport_message(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("Unexpected error from the shipping pricing service (status {})", code),
        None => "Unexpected error from the shipping pricing service".to_string(),
    }
}

/// Structured error body sent back to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl QuoteFailure {
    pub fn code(&self) -> &'static str {
        match self {
            QuoteFailure::Auth => "AUTH_ERROR",
            QuoteFailure::MissingOrigin => "CONFIG_ERROR",
            QuoteFailure::EmptyCart => "EMPTY_CART",
            QuoteFailure::Carrier { .. } => "CARRIER_ERROR",
            QuoteFailure::Transport { .. } => "TRANSPORT_ERROR",
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            QuoteFailure::Auth | QuoteFailure::MissingOrigin => FailureCategory::Configuration,
            QuoteFailure::EmptyCart => FailureCategory::Input,
            QuoteFailure::Carrier { .. } => FailureCategory::Carrier,
            QuoteFailure::Transport { .. } => FailureCategory::Transport,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self.category() {
            FailureCategory::Input => 400,
            _ => 409,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.code(),
            message: self.to_string(),
        }
    }
}
