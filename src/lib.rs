pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{pricing_http::HttpPricingSource, storage::LocalStorage};
pub use app::pipelines::UsagePipeline;
pub use config::{toml_config::ToolConfig, OutputTarget, UsageOptions};
pub use core::{discount::DiscountCalculator, engine::ReportEngine};
pub use utils::error::{CurError, Result};
