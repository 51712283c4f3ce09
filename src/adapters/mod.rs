// Adapters layer: concrete implementations for external systems (files, CSV, pricing http).

pub mod cur_csv;
pub mod pricing_http;
pub mod storage;
