pub mod discount;
pub mod engine;
pub mod extract;

pub use crate::domain::model::{UsageRecord, UsageReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, PricingSource, Storage};
pub use crate::utils::error::Result;
