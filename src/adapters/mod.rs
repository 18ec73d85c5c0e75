// Adapters layer: concrete implementations for external systems (pricing http, storefront module).

pub mod http;
pub mod module;
