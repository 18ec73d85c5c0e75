use crate::domain::ports::CarrierFailure;
use crate::utils::error::QuoteFailure;
use serde_json::Value;

/// Maps a failed pricing call to what the storefront is allowed to see.
pub fn classify(failure: &CarrierFailure) -> QuoteFailure {
    if let Some(message) = failure.body().and_then(carrier_message) {
        tracing::info!("Carrier refused the quote: {}", message);
        return QuoteFailure::Carrier { message };
    }

    // 原始錯誤只寫進日誌，不回傳給前台
    match failure.body() {
        Some(body) => tracing::warn!("Pricing call failed: {} | body: {}", failure, body),
        None => tracing::warn!("Pricing call failed: {}", failure),
    }

    QuoteFailure::Transport {
        status: failure.status(),
    }
}

/// Extracts `{"<any>": {"message": "..."}}` from a body that may be JSON or a
/// JSON string wrapping JSON.
pub fn carrier_message(body: &str) -> Option<String> {
    let mut parsed: Value = serde_json::from_str(body).ok()?;
    if let Value::String(inner) = &parsed {
        parsed = serde_json::from_str(inner).ok()?;
    }

    parsed.as_object()?.values().find_map(|field| {
        field
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}
